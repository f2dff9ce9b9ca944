// Content hashing for verification payloads.

use crate::error::VerificationError;
use primitive_types::H256;
use serde_json::Value;
use solana_program::keccak;
use std::collections::BTreeMap;

pub const HEX_PREFIX: &str = "0x";

/// Sorts a JSON object's keys recursively.
/// This is essential for canonical serialization.
fn sort_json_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted_map: BTreeMap<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), sort_json_value(v)))
                .collect();
            Value::Object(sorted_map.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_value).collect()),
        _ => value.clone(),
    }
}

/// Compact JSON with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    sort_json_value(value).to_string()
}

pub fn keccak256(bytes: &[u8]) -> H256 {
    H256::from(keccak::hash(bytes).to_bytes())
}

/// The content hash of a payload: Keccak-256 over its canonical serialization.
pub fn content_hash(payload: &Value) -> H256 {
    keccak256(canonical_json(payload).as_bytes())
}

pub fn to_prefixed_hex(hash: &H256) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(hash.as_bytes()))
}

/// Parses a 32-byte hex string; the `0x` prefix is optional.
pub fn parse_prefixed_hex(s: &str) -> Result<H256, VerificationError> {
    let s = s.trim();
    let s = s.strip_prefix(HEX_PREFIX).unwrap_or(s);
    let bytes = hex::decode(s)
        .map_err(|_| VerificationError::InvalidPayload(format!("invalid hex hash: {}", s)))?;
    if bytes.len() != 32 {
        return Err(VerificationError::InvalidPayload(
            "expected 32-byte hex string".to_string(),
        ));
    }
    Ok(H256::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keccak_of_empty_input_matches_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"").as_bytes()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn content_hash_is_stable_for_the_same_payload() {
        let payload = json!({"name": "A", "university": "U", "gpa": 3.5});
        let first = content_hash(&payload);
        for _ in 0..5 {
            assert_eq!(content_hash(&payload), first);
        }
        assert_eq!(content_hash(&payload.clone()), first);
    }

    #[test]
    fn key_order_does_not_change_the_hash() {
        let a: Value = serde_json::from_str(r#"{"name":"A","meta":{"y":1,"x":2},"gpa":3.5}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"gpa":3.5,"meta":{"x":2,"y":1},"name":"A"}"#).unwrap();
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn different_payloads_hash_differently() {
        let a = json!({"name": "A", "gpa": 3.5});
        let b = json!({"name": "A", "gpa": 3.6});
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn canonical_json_is_compact_and_sorted() {
        let v = json!({"b": [ {"d": 1, "c": 2} ], "a": "x"});
        assert_eq!(canonical_json(&v), r#"{"a":"x","b":[{"c":2,"d":1}]}"#);
    }

    #[test]
    fn prefixed_hex_round_trips_and_accepts_bare_hex() {
        let h = content_hash(&json!({"name": "A"}));
        let s = to_prefixed_hex(&h);
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 66);
        assert_eq!(parse_prefixed_hex(&s).unwrap(), h);
        assert_eq!(parse_prefixed_hex(&s[2..]).unwrap(), h);
        assert!(parse_prefixed_hex("0x1234").is_err());
        assert!(parse_prefixed_hex("zz").is_err());
    }
}
