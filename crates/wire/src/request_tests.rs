// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn unit_variant_round_trips_with_hash() {
    let req = Request { hash: vec![1, 2, 3], body: RequestBody::Continue };
    let json = serde_json::to_string(&req).unwrap();
    let back: Request = serde_json::from_str(&json).unwrap();
    assert_eq!(back, req);
}

#[test]
fn value_children_defaults_max_depth_to_one() {
    let json = serde_json::json!({
        "hash": [],
        "type": "ValueChildren",
        "value_id": 1,
        "offset": 0,
        "count": 10,
        "max_children": 100,
    });
    let req: Request = serde_json::from_value(json).unwrap();
    match req.body {
        RequestBody::ValueChildren { max_depth, .. } => assert_eq!(max_depth, 1),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn unknown_type_tag_fails_to_deserialize() {
    let json = serde_json::json!({ "hash": [], "type": "NotARealRequest" });
    let result: Result<Request, _> = serde_json::from_value(json);
    assert!(result.is_err());
}

#[test]
fn decode_lenient_recovers_hash_for_unknown_variant() {
    let bytes = serde_json::to_vec(&serde_json::json!({
        "hash": [9, 8, 7],
        "type": "NotARealRequest",
    }))
    .unwrap();
    let err = Request::decode_lenient(&bytes).unwrap_err();
    assert_eq!(err, vec![9, 8, 7]);
}

#[test]
fn decode_lenient_passes_through_known_variants() {
    let req = Request { hash: vec![1], body: RequestBody::Continue };
    let bytes = crate::encode(&req).unwrap();
    assert_eq!(Request::decode_lenient(&bytes).unwrap(), req);
}

#[test]
fn decode_lenient_empty_hash_on_garbage() {
    let err = Request::decode_lenient(b"not json at all").unwrap_err();
    assert!(err.is_empty());
}
