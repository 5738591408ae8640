#![allow(clippy::approx_constant)]

use alloc::{string::ToString, vec, vec::Vec};

use rstest::rstest;

use crate::{Map, ParserOptions, StreamingParser, Value, parse_all};

fn parse(input: &str) -> Value {
    parse_all(input.as_bytes(), ParserOptions::default()).unwrap()
}

fn parse_with(input: &str, options: ParserOptions) -> Value {
    parse_all(input.as_bytes(), options).unwrap()
}

#[rstest]
#[case("null", Value::Null)]
#[case("true", Value::Bool(true))]
#[case("false", Value::Bool(false))]
#[case("42", Value::Int(42))]
#[case("-7", Value::Int(-7))]
#[case("3.14", Value::Double(3.14))]
#[case("1e3", Value::Double(1000.0))]
#[case("\"hi\"", Value::String("hi".into()))]
#[case("\"\"", Value::String("".into()))]
#[case("[]", Value::Array(vec![]))]
#[case("{}", Value::Object(Map::new()))]
#[case(" \t\r\n 1 \n", Value::Int(1))]
fn scalars_and_empty_containers(#[case] input: &str, #[case] expected: Value) {
    assert_eq!(parse(input), expected);
}

#[test]
fn array_order_is_preserved() {
    assert_eq!(
        parse("[1,2,3]"),
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn nested_object() {
    let mut expected = Map::new();
    expected.insert("a".into(), Value::Int(1));
    expected.insert(
        "b".into(),
        Value::Array(vec![Value::Bool(true), Value::Null]),
    );
    assert_eq!(parse(r#"{"a":1,"b":[true,null]}"#), Value::Object(expected));
}

#[test]
fn rendering_is_key_order_independent() {
    let first = parse(r#"{"b":1,"a":2}"#).to_string();
    let second = parse(r#"{"a":2,"b":1}"#).to_string();
    assert_eq!(first, second);
    assert_eq!(first, r#"{"a":2,"b":1}"#);
}

#[test]
fn duplicate_keys_last_write_wins() {
    let mut expected = Map::new();
    expected.insert("a".into(), Value::Int(2));
    assert_eq!(parse(r#"{"a":1,"a":2}"#), Value::Object(expected));
}

#[test]
fn deeply_nested() {
    let depth = 200;
    let input = "[".repeat(depth) + &"]".repeat(depth);
    let mut value = parse(&input);
    for _ in 1..depth {
        value = value.as_array().unwrap()[0].clone();
    }
    assert_eq!(value, Value::Array(vec![]));
}

#[test]
fn every_split_matches_whole_input() {
    let input = r#"{"name":"café 😀","tags":["a","b"],"n":-12.5e2,"ok":true,"none":null,"k":123}"#.as_bytes();
    let whole = parse_all(input, ParserOptions::default()).unwrap();
    for i in 0..=input.len() {
        for j in i..=input.len() {
            let mut parser = StreamingParser::default();
            assert_eq!(parser.feed(&input[..i], false), Ok(None));
            assert_eq!(parser.feed(&input[i..j], false), Ok(None));
            assert_eq!(parser.feed(&input[j..], true), Ok(Some(&whole)), "split at {i}, {j}");
        }
    }
}

#[test]
fn raw_utf8_split_inside_characters() {
    let input = "[\"日本語\", \"ü\"]".as_bytes();
    let chunks: Vec<&[u8]> = input.chunks(1).collect();
    let mut parser = StreamingParser::default();
    for chunk in &chunks {
        parser.feed(chunk, false).unwrap();
    }
    let value = parser.feed(b"", true).unwrap().cloned();
    assert_eq!(
        value,
        Some(Value::Array(vec![
            Value::String("日本語".into()),
            Value::String("ü".into()),
        ]))
    );
}

#[test]
fn comments_when_allowed() {
    let options = ParserOptions {
        allow_comments: true,
        ..Default::default()
    };
    assert_eq!(parse_with("// c\n1", options), Value::Int(1));
    assert_eq!(
        parse_with("/* a */ [1, /* b */ 2] // c", options),
        Value::Array(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn trailing_garbage_when_allowed() {
    let options = ParserOptions {
        allow_trailing_garbage: true,
        ..Default::default()
    };
    assert_eq!(parse_with("1 garbage", options), Value::Int(1));
    assert_eq!(parse_with("{\"a\":[]}]]]", options).to_string(), r#"{"a":[]}"#);
}

#[test]
fn multiple_values_return_the_first() {
    let options = ParserOptions {
        allow_multiple_values: true,
        ..Default::default()
    };
    assert_eq!(parse_with("{\"a\":1} [2] 3", options).to_string(), r#"{"a":1}"#);
    assert_eq!(parse_with("1 2 3", options), Value::Int(1));
}

#[test]
fn skipped_validation_replaces_invalid_bytes() {
    let options = ParserOptions {
        skip_string_validation: true,
        ..Default::default()
    };
    let value = parse_all(b"{\"k\xff\":\"v\xfe\"}", options).unwrap();
    assert_eq!(value.get("k\u{FFFD}"), Some(&Value::String("v\u{FFFD}".into())));
}

#[test]
fn integer_boundaries() {
    assert_eq!(parse("9223372036854775807"), Value::Int(i64::MAX));
    assert_eq!(parse("-9223372036854775808"), Value::Int(i64::MIN));
    assert_eq!(parse("[-0]"), Value::Array(vec![Value::Int(0)]));
}

#[test]
fn doubles_round_trip_through_rendering() {
    for input in ["0.1", "1e-7", "123456.789", "-2.5e300", "5e-324"] {
        let value = parse(input);
        assert!(matches!(value, Value::Double(_)), "{input}");
        assert_eq!(parse(&value.to_string()), value, "{input}");
    }
}

#[test]
fn agrees_with_serde_json() {
    for input in [
        r#"{"a":1,"b":[true,null,"xé"],"c":{"d":-2.5e-3}}"#,
        "[1, 2.0, 1e2, -17, 9007199254740993]",
        r#"{"a":1,"a":2}"#,
        r#"["😀", "tab\tnewline\n", ""]"#,
        "  \"bare\"  ",
    ] {
        let ours = serde_json::to_string(&parse(input)).unwrap();
        let ours: serde_json::Value = serde_json::from_str(&ours).unwrap();
        let expected: serde_json::Value = serde_json::from_str(input).unwrap();
        assert_eq!(ours, expected, "{input}");
    }
}
