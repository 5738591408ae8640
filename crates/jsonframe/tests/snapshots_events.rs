#![expect(missing_docs)]

use core::fmt::Write;

use jsonframe::{ParseEvent, ParserOptions, StreamingParser, Tokenizer, parse_all};

fn render_events(input: &str) -> String {
    let mut events: Vec<ParseEvent> = Vec::new();
    let mut tokenizer = Tokenizer::new(ParserOptions::default());
    tokenizer
        .feed(input.as_bytes(), &mut events)
        .expect("tokenizer should not error on valid input");
    tokenizer.finish(&mut events).expect("input is complete");

    let mut out = String::new();
    for event in events {
        writeln!(out, "{event:?}").unwrap();
    }
    out
}

fn render_feeds(chunks: &[(&str, bool)]) -> String {
    let mut parser = StreamingParser::new(ParserOptions::default());
    let mut out = String::new();
    for &(chunk, is_final) in chunks {
        let outcome = match parser.feed(chunk.as_bytes(), is_final) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => "pending".to_string(),
            Err(err) => format!("error: {err}"),
        };
        writeln!(out, "{chunk:?} final={is_final} -> {outcome}").unwrap();
    }
    out
}

#[test]
fn snapshot_complex_document_events() {
    let json = r#"{"users": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}],
        "meta": {"count": 2, "ratio": 0.5, "ok": true, "none": null}}"#;

    insta::assert_snapshot!(render_events(json), @r#"
    StartMap
    MapKey("users")
    StartArray
    StartMap
    MapKey("id")
    Integer(1)
    MapKey("name")
    String("Ada")
    EndMap
    StartMap
    MapKey("id")
    Integer(2)
    MapKey("name")
    String("Grace")
    EndMap
    EndArray
    MapKey("meta")
    StartMap
    MapKey("count")
    Integer(2)
    MapKey("ratio")
    Double(0.5)
    MapKey("ok")
    Boolean(true)
    MapKey("none")
    Null
    EndMap
    EndMap
    "#);
}

#[test]
fn snapshot_streaming_feeds() {
    let chunks = [
        (r#"{"k":[1"#, false),
        (r#",2,{"#, false),
        (r#""x":"y"}],"#, false),
        (r#""s":"he"#, false),
        (r#"llo"}"#, false),
        ("", true),
        ("", true),
        ("x", false),
    ];

    insta::assert_snapshot!(render_feeds(&chunks), @r#"
    "{\"k\":[1" final=false -> pending
    ",2,{" final=false -> pending
    "\"x\":\"y\"}]," final=false -> pending
    "\"s\":\"he" final=false -> pending
    "llo\"}" final=false -> pending
    "" final=true -> {"k":[1,2,{"x":"y"}],"s":"hello"}
    "" final=true -> {"k":[1,2,{"x":"y"}],"s":"hello"}
    "x" final=false -> error: parser already completed
    "#);
}

#[test]
fn snapshot_error_messages() {
    let inputs = [
        "[1,]",
        r#"{"a" 1}"#,
        "01",
        r#""\u00zz""#,
        "[1 2]",
        "// c\n1",
        "1 x",
        r#"{"a":"#,
        "\"tab\tchar\"",
        "99999999999999999999",
    ];

    let mut out = String::new();
    for input in inputs {
        let err = parse_all(input.as_bytes(), ParserOptions::default()).unwrap_err();
        writeln!(out, "{input:?} -> {err}").unwrap();
    }

    insta::assert_snapshot!(out, @r#"
    "[1,]" -> unexpected character ']' at byte 3
    "{\"a\" 1}" -> expected ':' after object key at byte 5
    "01" -> unexpected character '1' at byte 1
    "\"\\u00zz\"" -> invalid character 'z' in unicode escape at byte 5
    "[1 2]" -> expected ',' or ']' after array value at byte 3
    "// c\n1" -> probable comment found in input text, comments are not enabled at byte 0
    "1 x" -> trailing garbage after the top-level value at byte 2
    "{\"a\":" -> unexpected end of input
    "\"tab\tchar\"" -> control character 0x09 inside string at byte 4
    "99999999999999999999" -> integer overflow at byte 0
    "#);
}
