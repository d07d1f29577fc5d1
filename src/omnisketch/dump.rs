//! Stable textual and JSON dumps of a sketch's internal state.
//!
//! These walk the opaque bucket/sample arrays directly with no host record
//! type dispatch involved, exactly as `omnisketch_text`/`omnisketch_json`
//! do in the original implementation (see DESIGN.md, "features the
//! distillation dropped", item 2). Stable within a major version.

use std::fmt::Write as _;

use super::sketch::OmniSketch;

/// Human-readable dump: header line, then a per-plane grid of
/// `(total, sampleCount)`, then a per-plane grid of sample item ids.
pub fn dump_text(sketch: &OmniSketch) -> String {
    let geometry = sketch.geometry();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "sketches: {} width: {} height: {} sample: {} item: {} count: {}",
        geometry.num_attributes,
        geometry.width,
        geometry.height,
        geometry.sample_size,
        geometry.item_bits,
        sketch.count()
    );

    for a in 0..geometry.num_attributes {
        if a > 0 {
            out.push_str(",\n");
        }
        let _ = write!(out, "{} => {{", a);
        for i in 0..geometry.height {
            if i > 0 {
                out.push_str(",\n");
            }
            out.push('{');
            for j in 0..geometry.width {
                if j > 0 {
                    out.push_str(", ");
                }
                let bucket = sketch.storage().bucket(a, i, j);
                let _ = write!(
                    out,
                    "({}, {}) => ({}, {})\n",
                    i, j, bucket.total_count, bucket.sample_count
                );
            }
            out.push('}');
        }
        out.push('}');
    }

    for a in 0..geometry.num_attributes {
        out.push_str(",\n");
        let _ = write!(out, "{} => {{", a);
        for i in 0..geometry.height {
            if i > 0 {
                out.push_str(",\n");
            }
            out.push('{');
            for j in 0..geometry.width {
                if j > 0 {
                    out.push_str(", ");
                }
                let bucket = sketch.storage().bucket(a, i, j);
                let sample = sketch.storage().sample(a, i, j);
                let _ = write!(out, "({}, {}) => [", i, j);
                for (l, &id) in sample[..bucket.sample_count as usize].iter().enumerate() {
                    if l > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}", id);
                }
                out.push_str("]\n");
            }
            out.push('}');
        }
        out.push('}');
    }

    out
}

/// JSON dump: header fields plus, for every plane, a `buckets` array of
/// `{i, j, total, sample, items}` objects.
pub fn dump_json(sketch: &OmniSketch) -> String {
    let geometry = sketch.geometry();
    let mut out = String::new();

    let _ = write!(
        out,
        "{{\"sketches\": {}, \"width\": {}, \"height\": {}, \"sample\": {}, \"item\": {}, \"count\": {}, \"planes\": [",
        geometry.num_attributes,
        geometry.width,
        geometry.height,
        geometry.sample_size,
        geometry.item_bits,
        sketch.count()
    );

    for a in 0..geometry.num_attributes {
        if a > 0 {
            out.push_str(", ");
        }
        out.push_str("{\"buckets\": [");

        for i in 0..geometry.height {
            if i > 0 {
                out.push_str(", ");
            }
            for j in 0..geometry.width {
                if j > 0 {
                    out.push_str(", ");
                }
                let bucket = sketch.storage().bucket(a, i, j);
                let sample = sketch.storage().sample(a, i, j);

                let _ = write!(
                    out,
                    "{{\"i\": {}, \"j\": {}, \"total\": {}, \"sample\": {}, \"items\": [",
                    i, j, bucket.total_count, bucket.sample_count
                );

                for (l, &id) in sample[..bucket.sample_count as usize].iter().enumerate() {
                    if l > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{}", id);
                }

                out.push_str("]}");
            }
        }
        out.push_str("]}");
    }

    out.push_str("]}");
    out
}
