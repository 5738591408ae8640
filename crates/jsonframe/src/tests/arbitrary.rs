use alloc::{boxed::Box, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 5 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Int(i64::arbitrary(g)),
                3 => Value::Double(JsonNumber::arbitrary(g).0),
                _ => Value::String(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return gen_scalar(g);
            }
            match usize::arbitrary(g) % 7 {
                0..=4 => gen_scalar(g),
                5 => {
                    let len = usize::arbitrary(g) % 4;
                    let items: Array = (0..len).map(|_| gen_val(g, depth - 1)).collect();
                    Value::Array(items)
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let map: Map = (0..len)
                        .map(|_| (String::arbitrary(g), gen_val(g, depth - 1)))
                        .collect();
                    Value::Object(map)
                }
            }
        }

        gen_val(g, 2)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => {
                let items = items.clone();
                Box::new(
                    items
                        .clone()
                        .into_iter()
                        .chain(items.shrink().map(Value::Array)),
                )
            }
            Value::Object(map) => {
                let values: Vec<Value> = map.values().cloned().collect();
                Box::new(values.into_iter())
            }
            Value::String(s) => Box::new(s.shrink().map(Value::String)),
            Value::Int(n) => Box::new(n.shrink().map(Value::Int)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}
