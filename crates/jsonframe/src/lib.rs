//! Incremental JSON parser that builds an in-memory value tree.
//!
//! Bytes go in through [`StreamingParser::feed`] in chunks of any size; the
//! byte-level [`Tokenizer`] turns them into [`EventSink`] calls and the
//! [`EventBuilder`] assembles those into a [`Value`]. Use [`parse_all`] when
//! the whole document is already in memory.
//!
//! ```
//! use jsonframe::{ParserOptions, StreamingParser, Value};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! parser.feed(br#"{"b": 1, "a""#, false).unwrap();
//! let value = parser.feed(br#": [true, null]}"#, true).unwrap().unwrap();
//! assert_eq!(value.to_string(), r#"{"a":[true,null],"b":1}"#);
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod escape_buffer;
mod literal_buffer;

mod error;
mod event;
mod event_builder;
mod options;
mod parser;
mod tokenizer;
mod value;

#[cfg(test)]
mod tests;

pub use error::{BuilderError, ParserError, SyntaxError, TokenizerError};
pub use event::{EventSink, ParseEvent};
pub use event_builder::EventBuilder;
pub use options::ParserOptions;
pub use parser::{StreamingParser, parse_all};
pub use tokenizer::{MAX_DEPTH, Tokenizer};
pub use value::{Array, Map, Value};
