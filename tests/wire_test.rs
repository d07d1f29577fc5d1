//! Binary wire format: serialize is stable and self-consistent; the
//! reconstruction and text-parsing directions are rejected outright.

mod support;

use omnisketch::{parse_text, recv, send, to_bytes, OmniSketch, SketchError};
use support::DeterministicRandomSource;

#[test]
fn to_bytes_is_byte_for_byte_stable() {
    let mut rng = DeterministicRandomSource::new(42);
    let record: Vec<u64> = vec![1, 2];
    let mut sketch = OmniSketch::add(None, 0.1, 0.1, record.as_slice(), &mut rng).unwrap();
    for v in 0u64..10 {
        let r = vec![v, v + 1];
        sketch = OmniSketch::add(Some(sketch), 0.1, 0.1, r.as_slice(), &mut rng).unwrap();
    }

    let once = to_bytes(&sketch);
    let twice = to_bytes(&sketch);
    assert_eq!(once, twice);
    assert_eq!(send(&sketch), once);
}

#[test]
fn to_bytes_length_prefix_is_consistent() {
    let mut rng = DeterministicRandomSource::new(43);
    let record: Vec<u64> = vec![5];
    let sketch = OmniSketch::add(None, 0.1, 0.1, record.as_slice(), &mut rng).unwrap();

    let bytes = to_bytes(&sketch);
    let declared_len = u32::from_ne_bytes(bytes[0..4].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), 4 + declared_len);
}

#[test]
fn binary_recv_is_unsupported() {
    match recv(&[0u8; 16]) {
        Err(SketchError::UnsupportedOperation(_)) => {}
        other => panic!("expected UnsupportedOperation, got {:?}", other),
    }
}

#[test]
fn text_parsing_is_unsupported() {
    match parse_text("{}") {
        Err(SketchError::UnsupportedOperation(_)) => {}
        other => panic!("expected UnsupportedOperation, got {:?}", other),
    }
}
