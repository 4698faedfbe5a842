//! Codec Property Tests
//!
//! - Every supported value survives encode/decode
//! - Tuple prefixes are byte prefixes of the full encoding
//! - Integer key ordering under each integer encoding
//! - Text and byte strings stay distinguishable
//! - Tuples of tuples are rejected, never flattened

use hbasta::codec::{CodecError, IntEncoding, Value, ValueCodec};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Int64),
        vec(any::<u8>(), 0..24).prop_map(Value::Bytes),
        any::<String>().prop_map(Value::Text),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => scalar(),
        1 => vec(scalar(), 0..6).prop_map(Value::Tuple),
    ]
}

fn int_encoding() -> impl Strategy<Value = IntEncoding> {
    prop_oneof![
        Just(IntEncoding::OrderPreserving),
        Just(IntEncoding::LittleEndian),
    ]
}

// =============================================================================
// Round trip
// =============================================================================

proptest! {
    #[test]
    fn test_round_trip_tagged(v in value(), encoding in int_encoding()) {
        let codec = ValueCodec::new(encoding);
        let tagged = codec.encode(&v).unwrap();
        prop_assert_eq!(codec.decode(&tagged).unwrap(), v);
    }

    #[test]
    fn test_round_trip_serialized(v in value(), encoding in int_encoding()) {
        let codec = ValueCodec::new(encoding);
        let bytes = codec.encode_bytes(&v).unwrap();
        prop_assert_eq!(codec.decode_bytes(&bytes).unwrap(), v);
    }

    #[test]
    fn test_tuple_prefix_is_byte_prefix(elements in vec(scalar(), 0..6), cut in 0usize..8) {
        let codec = ValueCodec::default();
        let k = cut.min(elements.len());

        let full = codec.encode_tuple(&elements, None).unwrap().to_bytes();
        let prefix = codec.encode_tuple(&elements, Some(k)).unwrap().to_bytes();
        prop_assert!(full.starts_with(&prefix));
    }

    /// Order-preserving integers sort in the store exactly as they compare.
    #[test]
    fn test_order_preserving_ints_sort_numerically(a in any::<i64>(), b in any::<i64>()) {
        let codec = ValueCodec::new(IntEncoding::OrderPreserving);
        let ea = codec.encode_bytes(&Value::Int64(a)).unwrap();
        let eb = codec.encode_bytes(&Value::Int64(b)).unwrap();
        prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
    }

    #[test]
    fn test_nested_tuples_rejected(inner in vec(scalar(), 0..3), outer in vec(scalar(), 0..3)) {
        let mut elements = outer;
        elements.push(Value::Tuple(inner));
        let err = ValueCodec::default().encode(&Value::Tuple(elements)).unwrap_err();
        prop_assert!(matches!(err, CodecError::UnsupportedType(_)));
    }
}

// =============================================================================
// Integer ordering policy
// =============================================================================

/// Legacy little-endian integers do not sort numerically: 256 lands before 1.
#[test]
fn test_little_endian_ints_break_key_order() {
    let codec = ValueCodec::new(IntEncoding::LittleEndian);
    let one = codec.encode_bytes(&Value::Int64(1)).unwrap();
    let big = codec.encode_bytes(&Value::Int64(256)).unwrap();
    assert!(big < one);

    let negative = codec.encode_bytes(&Value::Int64(-1)).unwrap();
    assert!(negative > one);
}

#[test]
fn test_order_preserving_negatives_sort_first() {
    let codec = ValueCodec::new(IntEncoding::OrderPreserving);
    let mut keys: Vec<Vec<u8>> = [i64::MAX, 0, -1, 1, i64::MIN, 256]
        .iter()
        .map(|&n| codec.encode_bytes(&Value::Int64(n)).unwrap())
        .collect();
    keys.sort();

    let decoded: Vec<Value> = keys.iter().map(|k| codec.decode_bytes(k).unwrap()).collect();
    assert_eq!(
        decoded,
        [i64::MIN, -1, 0, 1, 256, i64::MAX].map(Value::Int64).to_vec()
    );
}

// =============================================================================
// Text vs bytes
// =============================================================================

#[test]
fn test_text_and_bytes_have_distinct_tags() {
    let codec = ValueCodec::default();
    let text = codec.encode_bytes(&Value::text("abc")).unwrap();
    let bytes = codec.encode_bytes(&Value::bytes(b"abc".to_vec())).unwrap();

    assert_eq!(text, b"unicode:abc");
    assert_eq!(bytes, b"str:abc");
    assert_eq!(codec.decode_bytes(&text).unwrap(), Value::text("abc"));
    assert_eq!(codec.decode_bytes(&bytes).unwrap(), Value::bytes(b"abc".to_vec()));
}

#[test]
fn test_raw_bytes_pass_through_unchanged() {
    let codec = ValueCodec::default();
    let raw = vec![0x00, b':', 0xFF, b'\t', 0x80];
    let encoded = codec.encode_bytes(&Value::Bytes(raw.clone())).unwrap();
    assert_eq!(&encoded[4..], raw.as_slice());
    assert_eq!(codec.decode_bytes(&encoded).unwrap(), Value::Bytes(raw));
}
