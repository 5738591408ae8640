//! The callback contract between the tokenizer and whatever consumes its
//! events.
//!
//! [`EventSink`] receives one call per lexical event. [`ParseEvent`] is the
//! owned form of those calls: a `Vec<ParseEvent>` is itself a sink, so a run
//! can be recorded and replayed later into any other sink.
//!
//! # Examples
//!
//! ```
//! use jsonframe::{EventBuilder, ParseEvent, ParserOptions, Tokenizer, Value};
//!
//! let mut events: Vec<ParseEvent> = Vec::new();
//! let mut tokenizer = Tokenizer::new(ParserOptions::default());
//! tokenizer.feed(br#"["foo"]"#, &mut events).unwrap();
//! tokenizer.finish(&mut events).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::StartArray,
//!         ParseEvent::String("foo".into()),
//!         ParseEvent::EndArray,
//!     ]
//! );
//!
//! let mut builder = EventBuilder::new();
//! for event in &events {
//!     event.apply(&mut builder).unwrap();
//! }
//! assert_eq!(
//!     builder.extract_result(),
//!     Ok(Value::Array(vec![Value::String("foo".into())]))
//! );
//! ```
use alloc::vec::Vec;
use core::convert::Infallible;

use bstr::BString;

/// Receiver for tokenizer events.
///
/// Every method may fail; an error aborts the current
/// [`Tokenizer::feed`](crate::Tokenizer::feed) or
/// [`Tokenizer::finish`](crate::Tokenizer::finish) call and is surfaced as
/// [`TokenizerError::Sink`](crate::TokenizerError::Sink).
///
/// The tokenizer only emits well-formed sequences: a `map_key` precedes every
/// value inside a map, and closes always match opens.
pub trait EventSink {
    type Error;

    fn null(&mut self) -> Result<(), Self::Error>;
    fn boolean(&mut self, value: bool) -> Result<(), Self::Error>;
    fn integer(&mut self, value: i64) -> Result<(), Self::Error>;
    fn double(&mut self, value: f64) -> Result<(), Self::Error>;
    /// A complete, unescaped string value. The bytes are UTF-8 unless string
    /// validation was skipped.
    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error>;
    fn start_map(&mut self) -> Result<(), Self::Error>;
    /// A complete, unescaped object key. Same encoding rules as
    /// [`string`](EventSink::string).
    fn map_key(&mut self, key: &[u8]) -> Result<(), Self::Error>;
    fn end_map(&mut self) -> Result<(), Self::Error>;
    fn start_array(&mut self) -> Result<(), Self::Error>;
    fn end_array(&mut self) -> Result<(), Self::Error>;
}

/// An owned tokenizer event.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(BString),
    StartMap,
    MapKey(BString),
    EndMap,
    StartArray,
    EndArray,
}

impl ParseEvent {
    /// Delivers this event to `sink`.
    ///
    /// # Errors
    ///
    /// Whatever the sink returns.
    pub fn apply<S: EventSink + ?Sized>(&self, sink: &mut S) -> Result<(), S::Error> {
        match self {
            ParseEvent::Null => sink.null(),
            ParseEvent::Boolean(b) => sink.boolean(*b),
            ParseEvent::Integer(n) => sink.integer(*n),
            ParseEvent::Double(n) => sink.double(*n),
            ParseEvent::String(s) => sink.string(s),
            ParseEvent::StartMap => sink.start_map(),
            ParseEvent::MapKey(k) => sink.map_key(k),
            ParseEvent::EndMap => sink.end_map(),
            ParseEvent::StartArray => sink.start_array(),
            ParseEvent::EndArray => sink.end_array(),
        }
    }
}

impl EventSink for Vec<ParseEvent> {
    type Error = Infallible;

    fn null(&mut self) -> Result<(), Self::Error> {
        self.push(ParseEvent::Null);
        Ok(())
    }

    fn boolean(&mut self, value: bool) -> Result<(), Self::Error> {
        self.push(ParseEvent::Boolean(value));
        Ok(())
    }

    fn integer(&mut self, value: i64) -> Result<(), Self::Error> {
        self.push(ParseEvent::Integer(value));
        Ok(())
    }

    fn double(&mut self, value: f64) -> Result<(), Self::Error> {
        self.push(ParseEvent::Double(value));
        Ok(())
    }

    fn string(&mut self, value: &[u8]) -> Result<(), Self::Error> {
        self.push(ParseEvent::String(value.into()));
        Ok(())
    }

    fn start_map(&mut self) -> Result<(), Self::Error> {
        self.push(ParseEvent::StartMap);
        Ok(())
    }

    fn map_key(&mut self, key: &[u8]) -> Result<(), Self::Error> {
        self.push(ParseEvent::MapKey(key.into()));
        Ok(())
    }

    fn end_map(&mut self) -> Result<(), Self::Error> {
        self.push(ParseEvent::EndMap);
        Ok(())
    }

    fn start_array(&mut self) -> Result<(), Self::Error> {
        self.push(ParseEvent::StartArray);
        Ok(())
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        self.push(ParseEvent::EndArray);
        Ok(())
    }
}
