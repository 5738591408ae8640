//! Assembles a [`Value`] tree from tokenizer events.
//!
//! The builder keeps one frame per open container plus a root frame that
//! receives the top-level value. The frame being filled is held by value in
//! `active`; its ancestors sit on `stack`, innermost last. When a container
//! closes, its frame is frozen into a [`Value`] and handed to the parent.
//!
//! Object keys arrive as a separate event before their value. The key is held
//! in the object frame until the value arrives; a repeated key replaces the
//! earlier entry.
use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::{
    error::BuilderError,
    event::EventSink,
    tokenizer::Container,
    value::{Array, Map, Value},
};

#[derive(Debug)]
enum Frame {
    /// Receives the top-level value. Only the first one is kept.
    Root(Option<Value>),
    Object {
        map: Map,
        pending_key: Option<String>,
    },
    Array(Array),
}

impl Frame {
    fn kind(&self) -> &'static str {
        match self {
            Frame::Root(_) => "root",
            Frame::Object { .. } => "object",
            Frame::Array(_) => "array",
        }
    }
}

/// Consumes [`EventSink`] calls and builds the corresponding [`Value`].
///
/// Once the tokenizer has signalled the end of input, call
/// [`extract_result`](EventBuilder::extract_result) to take the value.
///
/// # Examples
///
/// ```
/// use jsonframe::{EventBuilder, EventSink, Value};
///
/// let mut builder = EventBuilder::new();
/// builder.start_map().unwrap();
/// builder.map_key(b"a").unwrap();
/// builder.integer(1).unwrap();
/// builder.map_key(b"a").unwrap();
/// builder.integer(2).unwrap();
/// builder.end_map().unwrap();
///
/// let value = builder.extract_result().unwrap();
/// assert_eq!(value.to_string(), r#"{"a":2}"#);
/// ```
#[derive(Debug)]
pub struct EventBuilder {
    active: Frame,
    stack: Vec<Frame>,
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Frame::Root(None),
            stack: Vec::new(),
        }
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Takes the top-level value.
    ///
    /// Returns [`Value::Null`] if no value was ever completed, and resets the
    /// builder so a second call also yields [`Value::Null`].
    ///
    /// # Errors
    ///
    /// [`BuilderError::InternalInvariantViolation`] if a container is still
    /// open.
    pub fn extract_result(&mut self) -> Result<Value, BuilderError> {
        match &mut self.active {
            Frame::Root(value) if self.stack.is_empty() => Ok(value.take().unwrap_or_default()),
            _ => Err(BuilderError::InternalInvariantViolation(
                "result requested while a container is still open",
            )),
        }
    }

    /// Attaches a completed value to the active frame.
    fn append(&mut self, value: Value) -> Result<(), BuilderError> {
        match &mut self.active {
            Frame::Root(slot) => {
                if slot.is_none() {
                    *slot = Some(value);
                }
            }
            Frame::Object { map, pending_key } => {
                let key = pending_key.take().ok_or(BuilderError::InternalInvariantViolation(
                    "object value without a preceding key",
                ))?;
                map.insert(key, value);
            }
            Frame::Array(items) => items.push(value),
        }
        Ok(())
    }

    fn open(&mut self, frame: Frame) {
        let parent = core::mem::replace(&mut self.active, frame);
        self.stack.push(parent);
    }

    /// Freezes the active frame and attaches it to its parent. `closing` is
    /// the container the closing event refers to.
    fn close(&mut self, closing: Container) -> Result<(), BuilderError> {
        let Some(parent) = self.stack.pop() else {
            return Err(BuilderError::MalformedStructure);
        };
        let frame = core::mem::replace(&mut self.active, parent);

        let value = match (closing, frame) {
            (Container::Object, Frame::Object { map, pending_key: None }) => Value::Object(map),
            (Container::Object, Frame::Object { .. }) => {
                return Err(BuilderError::InternalInvariantViolation(
                    "object closed with a key still waiting for its value",
                ));
            }
            (Container::Array, Frame::Array(items)) => Value::Array(items),
            (_, other) => {
                log::debug!("close of {closing:?} found {} frame", other.kind());
                return Err(BuilderError::InternalInvariantViolation(
                    "closing event does not match the open container",
                ));
            }
        };
        self.append(value)
    }
}

fn decode(bytes: &[u8]) -> String {
    bytes.to_str_lossy().into_owned()
}

impl EventSink for EventBuilder {
    type Error = BuilderError;

    fn null(&mut self) -> Result<(), Self::Error> {
        self.append(Value::Null)
    }

    fn boolean(&mut self, value: bool) -> Result<(), Self::Error> {
        self.append(Value::Bool(value))
    }

    fn integer(&mut self, value: i64) -> Result<(), Self::Error> {
        self.append(Value::Int(value))
    }

    fn double(&mut self, value: f64) -> Result<(), Self::Error> {
        self.append(Value::Double(value))
    }

    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error> {
        self.append(Value::String(decode(value)))
    }

    fn start_map(&mut self) -> Result<(), Self::Error> {
        self.open(Frame::Object {
            map: Map::new(),
            pending_key: None,
        });
        Ok(())
    }

    fn map_key(&mut self, key: &[u8]) -> Result<(), Self::Error> {
        match &mut self.active {
            Frame::Object {
                pending_key: pending_key @ None,
                ..
            } => {
                *pending_key = Some(decode(key));
                Ok(())
            }
            Frame::Object { .. } => Err(BuilderError::InternalInvariantViolation(
                "two keys in a row",
            )),
            _ => Err(BuilderError::InternalInvariantViolation(
                "key outside of an object",
            )),
        }
    }

    fn end_map(&mut self) -> Result<(), Self::Error> {
        self.close(Container::Object)
    }

    fn start_array(&mut self) -> Result<(), Self::Error> {
        self.open(Frame::Array(Array::new()));
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        self.close(Container::Array)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;
    use crate::ParseEvent;

    fn build(events: &[ParseEvent]) -> Result<Value, BuilderError> {
        let mut builder = EventBuilder::new();
        for event in events {
            event.apply(&mut builder)?;
        }
        builder.extract_result()
    }

    #[test]
    fn scalar_at_root() {
        assert_eq!(build(&[ParseEvent::Integer(7)]), Ok(Value::Int(7)));
        assert_eq!(
            build(&[ParseEvent::String("x".into())]),
            Ok(Value::String("x".into()))
        );
    }

    #[test]
    fn nothing_parsed_yields_null() {
        assert_eq!(build(&[]), Ok(Value::Null));
    }

    #[test]
    fn nested_containers() {
        let value = build(&[
            ParseEvent::StartMap,
            ParseEvent::MapKey("list".into()),
            ParseEvent::StartArray,
            ParseEvent::Boolean(true),
            ParseEvent::StartMap,
            ParseEvent::EndMap,
            ParseEvent::Double(0.5),
            ParseEvent::EndArray,
            ParseEvent::MapKey("n".into()),
            ParseEvent::Null,
            ParseEvent::EndMap,
        ])
        .unwrap();
        assert_eq!(value.to_string(), r#"{"list":[true,{},0.5],"n":null}"#);
    }

    #[test]
    fn duplicate_keys_keep_the_last_value() {
        let value = build(&[
            ParseEvent::StartMap,
            ParseEvent::MapKey("a".into()),
            ParseEvent::Integer(1),
            ParseEvent::MapKey("a".into()),
            ParseEvent::Integer(2),
            ParseEvent::EndMap,
        ])
        .unwrap();
        assert_eq!(value.get("a"), Some(&Value::Int(2)));
        assert_eq!(value.as_object().map(Map::len), Some(1));
    }

    #[test]
    fn a_key_named_root_is_an_ordinary_key() {
        let value = build(&[
            ParseEvent::StartMap,
            ParseEvent::MapKey("root".into()),
            ParseEvent::Integer(1),
            ParseEvent::EndMap,
        ])
        .unwrap();
        assert_eq!(value.to_string(), r#"{"root":1}"#);
    }

    #[test]
    fn first_top_level_value_wins() {
        assert_eq!(
            build(&[
                ParseEvent::Integer(1),
                ParseEvent::StartArray,
                ParseEvent::EndArray,
                ParseEvent::Integer(3),
            ]),
            Ok(Value::Int(1))
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(
            build(&[ParseEvent::String(vec![b'a', 0xFF].into())]),
            Ok(Value::String("a\u{FFFD}".into()))
        );
    }

    #[test]
    fn close_without_open_is_malformed() {
        assert_eq!(build(&[ParseEvent::EndMap]), Err(BuilderError::MalformedStructure));
        assert_eq!(build(&[ParseEvent::EndArray]), Err(BuilderError::MalformedStructure));
    }

    #[test]
    fn mismatched_close_violates_invariant() {
        assert!(matches!(
            build(&[ParseEvent::StartArray, ParseEvent::EndMap]),
            Err(BuilderError::InternalInvariantViolation(_))
        ));
        assert!(matches!(
            build(&[ParseEvent::StartMap, ParseEvent::EndArray]),
            Err(BuilderError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn key_protocol_violations() {
        for events in [
            &[ParseEvent::MapKey("a".into())][..],
            &[ParseEvent::StartArray, ParseEvent::MapKey("a".into())],
            &[
                ParseEvent::StartMap,
                ParseEvent::MapKey("a".into()),
                ParseEvent::MapKey("b".into()),
            ],
            &[ParseEvent::StartMap, ParseEvent::Null],
            &[
                ParseEvent::StartMap,
                ParseEvent::MapKey("a".into()),
                ParseEvent::EndMap,
            ],
        ] {
            assert!(
                matches!(build(events), Err(BuilderError::InternalInvariantViolation(_))),
                "{events:?}"
            );
        }
    }

    #[test]
    fn extract_with_open_container_fails() {
        let mut builder = EventBuilder::new();
        builder.start_array().unwrap();
        builder.integer(1).unwrap();
        assert_eq!(builder.depth(), 1);
        assert!(matches!(
            builder.extract_result(),
            Err(BuilderError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn extract_takes_the_value() {
        let mut builder = EventBuilder::new();
        builder.boolean(false).unwrap();
        assert_eq!(builder.extract_result(), Ok(Value::Bool(false)));
        assert_eq!(builder.extract_result(), Ok(Value::Null));
    }
}
