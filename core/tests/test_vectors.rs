//! Check query building and decoding against JSON vectors in `test-vectors/`.
//!
//! Decoded results are compared as `serde_json::Value`, so key order in the
//! vector files does not matter.

use serde::{Deserialize, Serialize};
use webapi_core::{decode, Query, QueryParams, RequestDescriptor};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Joke {
    id: u32,
    joke: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct JokeResponse {
    #[serde(rename = "type")]
    kind: String,
    value: Joke,
}

// ---------------------------------------------------------------------------
// Query strings
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base = case["base_url"].as_str().unwrap();
        let params: QueryParams = case["params"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| {
                let pair = pair.as_array().unwrap();
                (pair[0].as_str().unwrap(), pair[1].as_str().unwrap())
            })
            .collect();
        let expected = case["expected_url"].as_str().unwrap();

        let qs = params.to_query_string();
        if params.is_empty() {
            assert!(qs.is_empty(), "{name}: empty params must render nothing");
        } else {
            assert!(qs.starts_with('?'), "{name}: leading ?");
            assert!(!qs.ends_with('&'), "{name}: trailing &");
            assert_eq!(qs.matches('&').count(), params.len() - 1, "{name}: separators");
        }

        let req = RequestDescriptor::new(base)
            .query(Some(Query::Params(params)))
            .build_get();
        assert_eq!(req.url, expected, "{name}: url");
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn decode_test_vectors() {
    let raw = include_str!("../../test-vectors/decode.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let body = case["body"].as_str().unwrap();
        let result = decode::<JokeResponse>(body);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Deserialization" => assert_eq!(err.body, body, "{name}: raw body kept"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let decoded = result.unwrap();
            let as_value = serde_json::to_value(&decoded).unwrap();
            assert_eq!(as_value, case["expected"], "{name}: decoded value");
        }
    }
}
