//! Purpose: Lock the JSON/YAML front-end contract with corpus + differential coverage.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch semantic drift between the YAML path and the JSON path.
//! Invariants: Documents expressible in both notations parse to equal trees.
//! Invariants: The JSON path agrees with serde_json's own decoding on valid input.

use serde_json::Value;
use unstructured::api::{Data, parse_json, parse_yaml};

fn assert_format_parity(yaml: &str, json: &str) {
    let from_yaml = parse_yaml(yaml).expect("yaml parses");
    let from_json = parse_json(json).expect("json parses");
    assert_eq!(from_yaml, from_json, "yaml={yaml:?} json={json:?}");
}

fn assert_serde_parity(input: &str) {
    let ours: Data = parse_json(input).expect("parses");
    let baseline: Value = serde_json::from_str(input).expect("serde_json parses");
    assert_eq!(ours.to_json(), baseline, "{input}");
}

#[test]
fn flow_and_block_yaml_match_json() {
    assert_format_parity("{name: fred, life: 42}", r#"{"name":"fred","life":42}"#);
    assert_format_parity("name: fred\nlife: 42\n", r#"{"life":42,"name":"fred"}"#);
}

#[test]
fn nested_yaml_matches_json() {
    let yaml = r#"
top-level-list:
- "a string"
- name: first
  payload: [1, 2.5, -3]
- name: second
  payload:
    some: embedded structure
    flag: false
    nothing: null
"#;
    let json = r#"{"top-level-list":[
        "a string",
        {"name":"first","payload":[1,2.5,-3]},
        {"name":"second","payload":{"some":"embedded structure","flag":false,"nothing":null}}
    ]}"#;
    assert_format_parity(yaml, json);
}

#[test]
fn json_documents_are_valid_yaml() {
    let corpus = [
        r#"{"a":1,"b":"ok"}"#,
        r#"[1,2,3,{"x":true}]"#,
        r#"{"nested":{"arr":[{"k":"v"}]}}"#,
        r#""just a string""#,
        "null",
    ];
    for case in corpus {
        assert_format_parity(case, case);
    }
}

#[test]
fn yaml_scalar_keys_become_strings() {
    assert_format_parity("1: one\ntrue: yes-ish", r#"{"1":"one","true":"yes-ish"}"#);
}

#[test]
fn corpus_valid_payloads_match_serde() {
    let corpus = [
        r#"{"a":1,"b":"ok"}"#,
        r#"[1,2,3,{"x":true}]"#,
        r#"{"nested":{"arr":[{"k":"v"}]}}"#,
        r#"{"unicode":"☃"}"#,
        r#"{"float":0.1,"neg":-12,"tiny":1.5e-7}"#,
    ];

    for case in corpus {
        assert_serde_parity(case);
    }
}

#[test]
fn corpus_duplicate_keys_keep_last_value() {
    assert_serde_parity(r#"{"a":1,"a":2}"#);
    let data = parse_json(r#"{"a":1,"a":2}"#).expect("parses");
    assert_eq!(data.f("a").as_number(), 2.0);
    assert_format_parity(r#"{"a":1,"a":2}"#, r#"{"a":1,"a":2}"#);
    assert_format_parity("a: 1\na: 2\n", r#"{"a":2}"#);
}

#[test]
fn large_integers_collapse_to_doubles() {
    let data = parse_json(r#"{"n":18446744073709551616}"#).expect("parses");
    assert_eq!(data.f("n").as_number(), 18446744073709551616.0);
    assert_format_parity("n: 18446744073709551616", r#"{"n":18446744073709551616}"#);
    assert_format_parity("n: -9223372036854775809", r#"{"n":-9223372036854775809}"#);
}

#[test]
fn yaml_merge_keys_expand_into_the_mapping() {
    let yaml = "base: &b {x: 1}\nderived:\n  <<: *b\n  y: 2\n";
    assert_format_parity(yaml, r#"{"base":{"x":1},"derived":{"x":1,"y":2}}"#);
    let data = parse_yaml(yaml).expect("yaml parses");
    assert!(data.has_pointer("/derived/x").expect("valid pointer"));
    assert!(!data.get_field("derived").has_key("<<"));
}
