#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonframe::{ParserOptions, StreamingParser, Value, parse_all};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Whitespace and comments. Comments only parse with `allow_comments`, which
/// keeps the error paths busy too.
static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"//x\n", b"/* y */"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x1F); // one bit per option
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
            prefix += append_whitespace(&mut data[prefix..], limit);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n = rng.random_range(1..=limit.min(4));
        let mut written = 0;
        for _ in 0..n {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(serde_json::Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        use serde_json::Value as Json;

        let value = match u.choose_index(21)? {
            0 => Json::Null,
            1 => Json::Bool(u.arbitrary()?),
            2 => Json::from(u.arbitrary::<i64>()?),
            3 => {
                let n: f64 = u.arbitrary()?;
                Json::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            4..=10 => Json::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Json::Array(elems.into_iter().map(|v| v.0).collect())
            }
            _ => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Json::Object(m.into_iter().map(|(k, v)| (k, v.0)).collect())
            }
        };
        Ok(ArbitraryValue(value))
    }
}

fn options(flags: u8) -> ParserOptions {
    ParserOptions {
        allow_comments: flags & 1 != 0,
        skip_string_validation: flags & 2 != 0,
        allow_trailing_garbage: flags & 4 != 0,
        allow_multiple_values: flags & 8 != 0,
        allow_partial_values: flags & 16 != 0,
    }
}

/// Feeding the input in chunks must give the same outcome as feeding it in
/// one go, and a parsed value must survive a render and re-parse.
fn parser(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let options = options(data[0]);
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as usize;
    let data = &data[HEADER..];

    let whole = parse_all(data, options);

    let mut parser = StreamingParser::new(options);
    let mut start = 0;
    let chunked = loop {
        let remaining = data.len() - start;
        let size = if remaining == 0 { 0 } else { split_seed % remaining + 1 };
        let is_final = start + size == data.len();
        match parser.feed(&data[start..start + size], is_final) {
            Ok(value) if is_final => {
                break value.cloned().ok_or(jsonframe::ParserError::UnexpectedEof);
            }
            Ok(_) => {}
            Err(err) => break Err(err),
        }
        start += size;
    };

    match (&whole, &chunked) {
        (Ok(a), Ok(b)) => assert!(same_value(a, b), "{a} != {b}"),
        (Err(_), Err(_)) => {}
        _ => panic!("whole: {whole:?}, chunked: {chunked:?}"),
    }

    if let Ok(value) = whole {
        let rendered = value.to_string();
        let reparsed = parse_all(rendered.as_bytes(), ParserOptions::default())
            .expect("rendered value must parse");
        assert!(same_value(&value, &reparsed), "{value} != {reparsed}");
    }
}

/// Structural equality, except that NaN never occurs and `-0.0 == 0.0` would
/// hide sign flips, so doubles compare by bits.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x.to_bits() == y.to_bits(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter().zip(y).all(|((kx, vx), (ky, vy))| kx == ky && same_value(vx, vy))
        }
        _ => a == b,
    }
}

fuzz_target!(|data: &[u8]| parser(data));
