//! Incremental byte-level JSON tokenizer.
//!
//! [`Tokenizer`] turns raw bytes into [`EventSink`] calls. Input may arrive in
//! chunks of any size: every token (strings, escapes, numbers, literals,
//! comments) can be split at any byte, and the partial token is kept in the
//! tokenizer's scratch buffer until the next chunk completes it.
//!
//! Scope
//! - Grammar is RFC 8259, relaxed only by the switches in [`ParserOptions`].
//! - Numbers without a fraction or exponent are reported as `integer`, others
//!   as `double`. Out-of-range numbers are errors, never clamped.
//! - `\uXXXX` escapes are decoded; surrogate pairs are combined and unpaired
//!   surrogates become U+FFFD.
//! - Containers nest at most [`MAX_DEPTH`] deep.
//!
//! Invariants
//! - The event sequence is always well formed: keys precede values inside
//!   maps and every close matches the innermost open.
//! - Error offsets are absolute byte positions across all chunks.
//!
//! # Examples
//!
//! ```
//! use jsonframe::{ParseEvent, ParserOptions, Tokenizer};
//!
//! let mut events: Vec<ParseEvent> = Vec::new();
//! let mut tokenizer = Tokenizer::new(ParserOptions::default());
//! tokenizer.feed(b"[tr", &mut events).unwrap();
//! tokenizer.feed(b"ue, 1", &mut events).unwrap();
//! tokenizer.feed(b"2]", &mut events).unwrap();
//! tokenizer.finish(&mut events).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         ParseEvent::StartArray,
//!         ParseEvent::Boolean(true),
//!         ParseEvent::Integer(12),
//!         ParseEvent::EndArray,
//!     ]
//! );
//! ```
use alloc::vec::Vec;

use crate::{
    ParserOptions,
    error::{SyntaxError, TokenizerError},
    escape_buffer::UnicodeEscapeBuffer,
    event::EventSink,
    literal_buffer::{self, ExpectedLiteralBuffer},
};


/// Where we are in the grammar, between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    /// After `{`: a key or `}`.
    ObjectStart,
    /// After `,` in an object: a key only.
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    AfterPropertyValue,
    /// After `[`: a value or `]`.
    ArrayStart,
    /// After `,` in an array: a value only.
    BeforeArrayValue,
    AfterArrayValue,
    End,
    /// Trailing garbage is allowed and the top-level value is done.
    Ignore,
}

/// Where we are inside the current token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    Literal,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
    String,
    StringEscape,
    StringEscapeUnicode,
    CommentStart,
    LineComment,
    BlockComment,
    BlockCommentStar,
}

/// Deepest container nesting accepted. [`Value`](crate::Value) drops, clones
/// and renders recursively, so unbounded nesting would exhaust the stack.
pub const MAX_DEPTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    Object,
    Array,
}

/// Streaming JSON tokenizer.
///
/// Feed it bytes with [`feed`](Tokenizer::feed) and signal the end of input
/// with [`finish`](Tokenizer::finish). Events are delivered synchronously to
/// the sink passed to each call.
#[derive(Debug)]
pub struct Tokenizer {
    options: ParserOptions,
    parse_state: ParseState,
    lex_state: LexState,
    containers: Vec<Container>,

    /// Scratch for the token being lexed; reused for every string, key and
    /// number.
    buffer: Vec<u8>,
    string_is_key: bool,
    high_surrogate: Option<u16>,
    unicode_escape: UnicodeEscapeBuffer,
    expected_literal: ExpectedLiteralBuffer,

    /// Absolute offset of the first byte of the current token.
    token_start: usize,
    /// Absolute offset of the next byte to be read.
    offset: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Tokenizer {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            parse_state: ParseState::Start,
            lex_state: LexState::Default,
            containers: Vec::with_capacity(16),
            buffer: Vec::new(),
            string_is_key: false,
            high_surrogate: None,
            unicode_escape: UnicodeEscapeBuffer::new(),
            expected_literal: ExpectedLiteralBuffer::none(),
            token_start: 0,
            offset: 0,
        }
    }

    /// Total number of bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.containers.len()
    }

    /// Tokenizes `chunk`, delivering every event it completes to `sink`.
    ///
    /// A token cut off at the end of `chunk` is held back until a later
    /// `feed` or [`finish`](Tokenizer::finish) completes it.
    ///
    /// # Errors
    ///
    /// [`TokenizerError::Syntax`] if the bytes are not valid JSON under the
    /// configured options, [`TokenizerError::Sink`] if the sink fails.
    pub fn feed<S: EventSink>(
        &mut self,
        chunk: &[u8],
        sink: &mut S,
    ) -> Result<(), TokenizerError<S::Error>> {
        let mut i = 0;
        while i < chunk.len() {
            if self.parse_state == ParseState::Ignore {
                self.offset += chunk.len() - i;
                break;
            }

            if self.lex_state == LexState::String {
                // Fast path: copy a run of plain string bytes in one go.
                let run = chunk[i..]
                    .iter()
                    .take_while(|&&b| b != b'"' && b != b'\\' && b >= 0x20)
                    .count();
                if run > 0 {
                    self.flush_surrogate();
                    self.buffer.extend_from_slice(&chunk[i..i + run]);
                    i += run;
                    self.offset += run;
                    continue;
                }
            }

            if self.step(chunk[i], sink)? {
                i += 1;
                self.offset += 1;
            }
        }
        Ok(())
    }

    /// Signals the end of input.
    ///
    /// A number still pending at the end of the input is emitted here, since
    /// only the end of input can terminate a bare top-level number.
    ///
    /// # Errors
    ///
    /// [`TokenizerError::Incomplete`] if the input stopped inside a token or
    /// before the top-level value was closed, [`TokenizerError::Syntax`] for
    /// an unterminated comment after a complete value,
    /// [`TokenizerError::Sink`] if the sink fails.
    pub fn finish<S: EventSink>(&mut self, sink: &mut S) -> Result<(), TokenizerError<S::Error>> {
        match self.lex_state {
            LexState::Default | LexState::LineComment => {}
            LexState::Zero
            | LexState::DecimalInteger
            | LexState::DecimalFraction
            | LexState::DecimalExponentInteger => self.emit_number(sink)?,
            LexState::CommentStart | LexState::BlockComment | LexState::BlockCommentStar
                if self.parse_state == ParseState::End =>
            {
                if !self.options.allow_trailing_garbage {
                    return Err(self.syntax_error(SyntaxError::UnterminatedComment));
                }
            }
            _ => return Err(TokenizerError::Incomplete),
        }
        self.lex_state = LexState::Default;

        match self.parse_state {
            ParseState::End | ParseState::Ignore => Ok(()),
            _ => Err(TokenizerError::Incomplete),
        }
    }

    /// Processes one byte. Returns `false` when the byte was not consumed and
    /// must be fed again in the new state.
    #[allow(clippy::too_many_lines)]
    fn step<S: EventSink>(&mut self, b: u8, sink: &mut S) -> Result<bool, TokenizerError<S::Error>> {
        match self.lex_state {
            LexState::Default => self.step_default(b, sink),

            // -------------------------- LITERALS -----------------------------
            LexState::Literal => match self.expected_literal.step(b) {
                literal_buffer::Step::NeedMore => Ok(true),
                literal_buffer::Step::Done(literal) => {
                    self.lex_state = LexState::Default;
                    let emitted = match literal {
                        literal_buffer::Literal::Null => sink.null(),
                        literal_buffer::Literal::True => sink.boolean(true),
                        literal_buffer::Literal::False => sink.boolean(false),
                    };
                    emitted.map_err(TokenizerError::Sink)?;
                    self.value_completed();
                    Ok(true)
                }
                literal_buffer::Step::Reject => {
                    Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b)))
                }
            },

            // -------------------------- NUMBERS -----------------------------
            LexState::Sign => match b {
                b'0' => Ok(self.number_byte(b, LexState::Zero)),
                b'1'..=b'9' => Ok(self.number_byte(b, LexState::DecimalInteger)),
                _ => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
            },

            LexState::Zero => match b {
                b'.' => Ok(self.number_byte(b, LexState::DecimalPoint)),
                b'e' | b'E' => Ok(self.number_byte(b, LexState::DecimalExponent)),
                // no leading zeros
                b'0'..=b'9' => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
                _ => self.end_number(sink),
            },

            LexState::DecimalInteger => match b {
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalInteger)),
                b'.' => Ok(self.number_byte(b, LexState::DecimalPoint)),
                b'e' | b'E' => Ok(self.number_byte(b, LexState::DecimalExponent)),
                _ => self.end_number(sink),
            },

            LexState::DecimalPoint => match b {
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalFraction)),
                _ => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
            },

            LexState::DecimalFraction => match b {
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalFraction)),
                b'e' | b'E' => Ok(self.number_byte(b, LexState::DecimalExponent)),
                _ => self.end_number(sink),
            },

            LexState::DecimalExponent => match b {
                b'+' | b'-' => Ok(self.number_byte(b, LexState::DecimalExponentSign)),
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalExponentInteger)),
                _ => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
            },

            LexState::DecimalExponentSign => match b {
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalExponentInteger)),
                _ => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
            },

            LexState::DecimalExponentInteger => match b {
                b'0'..=b'9' => Ok(self.number_byte(b, LexState::DecimalExponentInteger)),
                _ => self.end_number(sink),
            },

            // -------------------------- STRINGS -----------------------------
            LexState::String => match b {
                b'"' => {
                    self.flush_surrogate();
                    self.lex_state = LexState::Default;
                    self.end_string(sink)?;
                    Ok(true)
                }
                b'\\' => {
                    self.lex_state = LexState::StringEscape;
                    Ok(true)
                }
                0x00..=0x1F => Err(self.syntax_error(SyntaxError::ControlCharacterInString(b))),
                _ => {
                    self.flush_surrogate();
                    self.buffer.push(b);
                    Ok(true)
                }
            },

            LexState::StringEscape => {
                let unescaped = match b {
                    b'"' | b'\\' | b'/' => b,
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'u' => {
                        self.unicode_escape.reset();
                        self.lex_state = LexState::StringEscapeUnicode;
                        return Ok(true);
                    }
                    _ => return Err(self.syntax_error(SyntaxError::InvalidEscape(b))),
                };
                self.flush_surrogate();
                self.buffer.push(unescaped);
                self.lex_state = LexState::String;
                Ok(true)
            }

            LexState::StringEscapeUnicode => match self.unicode_escape.feed(b) {
                Ok(None) => Ok(true),
                Ok(Some(unit)) => {
                    self.push_code_unit(unit);
                    self.lex_state = LexState::String;
                    Ok(true)
                }
                Err(b) => Err(self.syntax_error(SyntaxError::InvalidUnicodeEscape(b))),
            },

            // -------------------------- COMMENTS ----------------------------
            LexState::CommentStart => match b {
                b'/' => {
                    self.lex_state = LexState::LineComment;
                    Ok(true)
                }
                b'*' => {
                    self.lex_state = LexState::BlockComment;
                    Ok(true)
                }
                _ => Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
            },

            LexState::LineComment => {
                if b == b'\n' {
                    self.lex_state = LexState::Default;
                }
                Ok(true)
            }

            LexState::BlockComment => {
                if b == b'*' {
                    self.lex_state = LexState::BlockCommentStar;
                }
                Ok(true)
            }

            LexState::BlockCommentStar => {
                match b {
                    b'/' => self.lex_state = LexState::Default,
                    b'*' => {}
                    _ => self.lex_state = LexState::BlockComment,
                }
                Ok(true)
            }
        }
    }

    /// Between tokens: whitespace, comments, then structure.
    fn step_default<S: EventSink>(
        &mut self,
        b: u8,
        sink: &mut S,
    ) -> Result<bool, TokenizerError<S::Error>> {
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => Ok(true),
            // trailing garbage is never lexed, not even as a comment
            _ if self.parse_state == ParseState::End
                && self.options.allow_trailing_garbage
                && !self.options.allow_multiple_values =>
            {
                self.parse_state = ParseState::Ignore;
                Ok(true)
            }
            b'/' if self.options.allow_comments => {
                self.lex_state = LexState::CommentStart;
                Ok(true)
            }
            _ if self.parse_state == ParseState::End => self.step_after_end(),
            b'/' => Err(self.syntax_error(SyntaxError::CommentsNotEnabled)),
            _ => self.step_structure(b, sink),
        }
    }

    fn step_structure<S: EventSink>(
        &mut self,
        b: u8,
        sink: &mut S,
    ) -> Result<bool, TokenizerError<S::Error>> {
        match self.parse_state {
            ParseState::Start | ParseState::BeforePropertyValue | ParseState::BeforeArrayValue => {
                self.begin_value(b, sink)
            }

            ParseState::ArrayStart => match b {
                b']' => self.close_container(Container::Array, sink),
                _ => self.begin_value(b, sink),
            },

            ParseState::ObjectStart | ParseState::BeforePropertyName => match b {
                b'"' => {
                    self.begin_string(true);
                    Ok(true)
                }
                b'}' if self.parse_state == ParseState::ObjectStart => {
                    self.close_container(Container::Object, sink)
                }
                _ => Err(self.syntax_error(SyntaxError::InvalidObjectKey)),
            },

            ParseState::AfterPropertyName => match b {
                b':' => {
                    self.parse_state = ParseState::BeforePropertyValue;
                    Ok(true)
                }
                _ => Err(self.syntax_error(SyntaxError::ExpectedColon)),
            },

            ParseState::AfterPropertyValue => match b {
                b',' => {
                    self.parse_state = ParseState::BeforePropertyName;
                    Ok(true)
                }
                b'}' => self.close_container(Container::Object, sink),
                _ => Err(self.syntax_error(SyntaxError::ExpectedObjectCommaOrEnd)),
            },

            ParseState::AfterArrayValue => match b {
                b',' => {
                    self.parse_state = ParseState::BeforeArrayValue;
                    Ok(true)
                }
                b']' => self.close_container(Container::Array, sink),
                _ => Err(self.syntax_error(SyntaxError::ExpectedArrayCommaOrEnd)),
            },

            ParseState::End => self.step_after_end(),
            ParseState::Ignore => Ok(true),
        }
    }

    /// A non-whitespace byte after the top-level value.
    fn step_after_end<E>(&mut self) -> Result<bool, TokenizerError<E>> {
        if self.options.allow_multiple_values {
            // re-read the byte as the start of the next value
            self.parse_state = ParseState::Start;
            Ok(false)
        } else if self.options.allow_trailing_garbage {
            self.parse_state = ParseState::Ignore;
            Ok(true)
        } else {
            Err(self.syntax_error(SyntaxError::TrailingGarbage))
        }
    }

    fn begin_value<S: EventSink>(
        &mut self,
        b: u8,
        sink: &mut S,
    ) -> Result<bool, TokenizerError<S::Error>> {
        self.token_start = self.offset;
        if matches!(b, b'{' | b'[') && self.containers.len() >= MAX_DEPTH {
            return Err(self.syntax_error(SyntaxError::MaxDepthExceeded));
        }
        match b {
            b'{' => {
                sink.start_map().map_err(TokenizerError::Sink)?;
                self.containers.push(Container::Object);
                self.parse_state = ParseState::ObjectStart;
            }
            b'[' => {
                sink.start_array().map_err(TokenizerError::Sink)?;
                self.containers.push(Container::Array);
                self.parse_state = ParseState::ArrayStart;
            }
            b'"' => self.begin_string(false),
            b't' | b'f' | b'n' => {
                self.expected_literal = ExpectedLiteralBuffer::new(b);
                self.lex_state = LexState::Literal;
            }
            b'-' => self.begin_number(b, LexState::Sign),
            b'0' => self.begin_number(b, LexState::Zero),
            b'1'..=b'9' => self.begin_number(b, LexState::DecimalInteger),
            _ => return Err(self.syntax_error(SyntaxError::UnexpectedCharacter(b))),
        }
        Ok(true)
    }

    fn close_container<S: EventSink>(
        &mut self,
        container: Container,
        sink: &mut S,
    ) -> Result<bool, TokenizerError<S::Error>> {
        let closed = self.containers.pop();
        debug_assert_eq!(closed, Some(container));
        let emitted = match container {
            Container::Object => sink.end_map(),
            Container::Array => sink.end_array(),
        };
        emitted.map_err(TokenizerError::Sink)?;
        self.value_completed();
        Ok(true)
    }

    fn value_completed(&mut self) {
        self.parse_state = match self.containers.last() {
            None => ParseState::End,
            Some(Container::Object) => ParseState::AfterPropertyValue,
            Some(Container::Array) => ParseState::AfterArrayValue,
        };
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    fn begin_string(&mut self, is_key: bool) {
        self.token_start = self.offset;
        self.buffer.clear();
        self.string_is_key = is_key;
        self.high_surrogate = None;
        self.lex_state = LexState::String;
    }

    fn end_string<S: EventSink>(&mut self, sink: &mut S) -> Result<(), TokenizerError<S::Error>> {
        if !self.options.skip_string_validation && core::str::from_utf8(&self.buffer).is_err() {
            return Err(self.error_at_token(SyntaxError::InvalidUtf8));
        }

        if self.string_is_key {
            sink.map_key(&self.buffer).map_err(TokenizerError::Sink)?;
            self.parse_state = ParseState::AfterPropertyName;
        } else {
            sink.string(&self.buffer).map_err(TokenizerError::Sink)?;
            self.value_completed();
        }
        Ok(())
    }

    fn push_code_unit(&mut self, unit: u16) {
        match (self.high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(unit) - 0xDC00);
                self.push_char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            (pending, 0xD800..=0xDBFF) => {
                if pending.is_some() {
                    self.push_char(char::REPLACEMENT_CHARACTER);
                }
                self.high_surrogate = Some(unit);
            }
            (pending, _) => {
                if pending.is_some() {
                    self.push_char(char::REPLACEMENT_CHARACTER);
                }
                // a lone low surrogate is not a scalar value
                self.push_char(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    /// A high surrogate not followed by a low one decodes to U+FFFD.
    fn flush_surrogate(&mut self) {
        if self.high_surrogate.take().is_some() {
            self.push_char(char::REPLACEMENT_CHARACTER);
        }
    }

    fn push_char(&mut self, c: char) {
        let mut tmp = [0u8; 4];
        self.buffer.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
    }

    // ------------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------------

    fn begin_number(&mut self, b: u8, next: LexState) {
        self.buffer.clear();
        self.buffer.push(b);
        self.lex_state = next;
    }

    fn number_byte(&mut self, b: u8, next: LexState) -> bool {
        self.buffer.push(b);
        self.lex_state = next;
        true
    }

    /// The current byte terminates the number; it is not consumed.
    fn end_number<S: EventSink>(&mut self, sink: &mut S) -> Result<bool, TokenizerError<S::Error>> {
        self.emit_number(sink)?;
        Ok(false)
    }

    fn emit_number<S: EventSink>(&mut self, sink: &mut S) -> Result<(), TokenizerError<S::Error>> {
        self.lex_state = LexState::Default;
        let is_integer = !self.buffer.iter().any(|b| matches!(b, b'.' | b'e' | b'E'));
        let Ok(text) = core::str::from_utf8(&self.buffer) else {
            return Err(self.error_at_token(SyntaxError::MalformedNumber));
        };

        if is_integer {
            // the grammar only lets digits through, so failure means overflow
            let Ok(n) = text.parse::<i64>() else {
                return Err(self.error_at_token(SyntaxError::IntegerOverflow));
            };
            sink.integer(n).map_err(TokenizerError::Sink)?;
        } else {
            let Ok(n) = text.parse::<f64>() else {
                return Err(self.error_at_token(SyntaxError::MalformedNumber));
            };
            if !n.is_finite() {
                return Err(self.error_at_token(SyntaxError::NumberOverflow));
            }
            sink.double(n).map_err(TokenizerError::Sink)?;
        }

        self.value_completed();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------

    fn syntax_error<E>(&self, reason: SyntaxError) -> TokenizerError<E> {
        TokenizerError::Syntax {
            reason,
            offset: self.offset,
        }
    }

    fn error_at_token<E>(&self, reason: SyntaxError) -> TokenizerError<E> {
        TokenizerError::Syntax {
            reason,
            offset: self.token_start,
        }
    }
}
