use std::io::{BufReader, ErrorKind, Read};
use variant_codec::{
    bcon, bson, json, new_parser, serialize, variant, ByteSource, Error, Format, JsonOptions,
    Kind, Parser, Variant, FORMAT_JSON_COMPACT,
};

fn encode(value: &Variant, format: Format, flags: u32) -> Vec<u8> {
    let mut out = Vec::new();
    serialize(&mut out, value, format, flags).unwrap();
    out
}

#[test]
fn test_json_flags() {
    let value = variant!({ "a": [1, 2], "b": "x" });

    let plain = encode(&value, Format::Json, 0);
    assert_eq!(plain, br#"{"a": [1, 2], "b": "x"}"#);

    let compact = encode(&value, Format::Json, FORMAT_JSON_COMPACT);
    assert_eq!(compact, br#"{"a":[1,2],"b":"x"}"#);

    let indented = encode(&value, Format::Json, 4);
    assert_eq!(
        String::from_utf8(indented).unwrap(),
        "{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": \"x\"\n}"
    );

    let both = encode(&value, Format::Json, FORMAT_JSON_COMPACT | 1);
    assert_eq!(
        String::from_utf8(both).unwrap(),
        "{\n \"a\":[\n  1,\n  2\n ],\n \"b\":\"x\"\n}"
    );
}

#[test]
fn test_json_syntax_errors() {
    match json::from_str(r#"{"a":}"#) {
        Err(Error::Syntax { line, msg, .. }) => {
            assert_eq!(line, 1);
            assert!(msg.contains("Object end"), "{msg}");
        }
        other => panic!("expected a syntax error, got {:?}", other),
    }
    assert!(matches!(json::from_str(r#"{"a" 1}"#), Err(Error::Syntax { .. })));
    assert!(matches!(json::from_str(r#"{1: 2}"#), Err(Error::Syntax { .. })));
    assert!(matches!(json::from_str("[1 2]"), Err(Error::Syntax { .. })));
    assert!(matches!(json::from_str("[nul]"), Err(Error::Syntax { .. })));
    assert!(matches!(json::from_str("[1, "), Err(Error::UnexpectedEof { .. })));
    assert!(matches!(json::from_str("true"), Err(Error::InvalidRoot(_))));
}

#[test]
fn test_json_multiline_error_position() {
    let err = json::from_str("{\n  \"a\": 1,\n  \"b\" 2\n}").unwrap_err();
    assert!(matches!(err, Error::Syntax { line: 3, .. }), "{err}");
}

#[test]
fn test_json_number_kinds() {
    let value = json::from_str("[1, 2147483648, -9223372036854775808, 18446744073709551615, 1.0, 1e2]")
        .unwrap();
    let kinds: Vec<Kind> = value.to_list().unwrap().iter().map(Variant::kind).collect();
    assert_eq!(
        kinds,
        vec![
            Kind::Int,
            Kind::Long,
            Kind::Long,
            Kind::ULong,
            Kind::Double,
            Kind::Double
        ]
    );
}

#[test]
fn test_truthiness_of_decoded_strings() {
    let value = json::from_str(r#"["0", " 0", "0.0", "False", ""]"#).unwrap();
    let truth: Vec<bool> = value
        .to_list()
        .unwrap()
        .iter()
        .map(|v| v.boolean_value().unwrap())
        .collect();
    assert_eq!(truth, vec![false, false, true, false, false]);
}

#[test]
fn test_bcon_map_writes_value_before_key() {
    let bytes = encode(&variant!({ "n": 5u8, "s": "hi" }), Format::Bcon, 0);
    assert_eq!(
        bytes,
        vec![0x0C, 0x04, 5, b'n', 0, 0xC2, b'h', b'i', b's', 0, 0x00]
    );
}

#[test]
fn test_bcon_string_tiers() {
    for (len, header) in [
        (63usize, vec![0xFF]),
        (64, vec![0x50, 0x04]),
        (4095, vec![0x5F, 0xFF]),
        (4096, vec![0x60, 0x00, 0x01]),
        (1_048_575, vec![0x6F, 0xFF, 0xFF]),
        (1_048_576, vec![0x70, 0x00, 0x00, 0x01]),
    ] {
        let text = "a".repeat(len);
        let bytes = bcon::to_vec(&Variant::from(text.as_str())).unwrap();
        assert_eq!(&bytes[..header.len()], &header[..], "len {len}");
        assert_eq!(bytes.len(), header.len() + len);
        assert_eq!(bcon::from_slice(&bytes).unwrap().as_str(), Some(text.as_str()));
    }
}

#[test]
fn test_bson_list_root_reads_back_as_map() {
    let bytes = encode(&variant!(["x", "y"]), Format::Bson, 0);
    let value = bson::from_slice(&bytes).unwrap();
    assert_eq!(value, variant!({ "0": "x", "1": "y" }));
}

#[test]
fn test_bson_nested_list_order() {
    let value = variant!({ "list": [3, "two", [1]] });
    let back = bson::from_slice(&bson::to_vec(&value).unwrap()).unwrap();
    assert_eq!(back, value);
}

#[test]
fn test_multiple_documents_in_one_stream() {
    for format in [Format::Json, Format::Bson, Format::Bcon] {
        let first = variant!({ "seq": 1 });
        let second = variant!({ "seq": 2, "tail": [true] });
        let mut bytes = encode(&first, format, 0);
        bytes.extend(encode(&second, format, 0));

        let mut parser = new_parser(&bytes[..], format);
        assert_eq!(parser.next(true).unwrap().as_ref(), Some(&first), "{format}");
        assert_eq!(parser.next(true).unwrap().as_ref(), Some(&second), "{format}");
        assert_eq!(parser.next(false).unwrap(), None, "{format}");
        assert!(parser.next(true).is_err(), "{format}");
    }
}

#[test]
fn test_parser_over_buffered_reader() {
    let value = variant!({ "k": [1, 2, 3], "s": "text" });
    for format in [Format::Json, Format::Bson, Format::Bcon] {
        let bytes = encode(&value, format, 0);
        let mut reader = BufReader::with_capacity(3, &bytes[..]);
        let decoded = {
            let mut parser = new_parser(&mut reader, format);
            parser.next(true).unwrap()
        };
        assert_eq!(decoded, Some(value.clone()), "{format}");
        assert_eq!(reader.peek_byte().unwrap(), None);
    }
}

/// A non-blocking reader: each `None` chunk fails with `WouldBlock`.
struct Trickle(Vec<Option<Vec<u8>>>);

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.0.is_empty() {
            return Ok(0);
        }
        match self.0.remove(0) {
            Some(chunk) => {
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            None => Err(ErrorKind::WouldBlock.into()),
        }
    }
}

#[test]
fn test_fresh_buffered_reader_yields_without_waiting() {
    let mut reader = BufReader::new(&b"[1]"[..]);
    let mut parser = new_parser(&mut reader, Format::Json);
    assert_eq!(parser.next(false).unwrap(), Some(variant!([1])));
    assert_eq!(parser.next(false).unwrap(), None);
}

#[test]
fn test_non_blocking_reader_polls_until_value_arrives() {
    let value = variant!({ "n": [1, 2], "s": "x" });
    for format in [Format::Json, Format::Bson, Format::Bcon] {
        let bytes = encode(&value, format, 0);
        let mut reader = BufReader::new(Trickle(vec![None, None, Some(bytes)]));
        let mut parser = new_parser(&mut reader, format);
        let mut polls = 0;
        let decoded = loop {
            polls += 1;
            if let Some(v) = parser.next(false).unwrap() {
                break v;
            }
            assert!(polls < 10, "{format}: nothing decoded after {polls} polls");
        };
        assert_eq!(decoded, value, "{format}");
        assert_eq!(polls, 3, "{format}");
        assert_eq!(parser.next(false).unwrap(), None, "{format}");
    }
}

#[test]
fn test_bson_and_bcon_keep_datetime() {
    let value = variant!({ "at": (Variant::DateTime(1_700_000_000_000)) });
    for format in [Format::Bson, Format::Bcon] {
        let bytes = encode(&value, format, 0);
        let mut parser = new_parser(&bytes[..], format);
        let back = parser.next(true).unwrap().unwrap();
        assert_eq!(back.get("at").unwrap().kind(), Kind::DateTime, "{format}");
    }
}

#[test]
fn test_json_from_reader_with_options() {
    let value = variant!({ "x": 1.5, "y": null });
    let text = json::to_string(&value, &JsonOptions::pretty()).unwrap();
    let back = json::from_reader(text.as_bytes()).unwrap();
    assert_eq!(back, value);
}
