use core::fmt;

use thiserror::Error;

/// Errors returned by [`StreamingParser::feed`](crate::StreamingParser::feed)
/// and [`parse_all`](crate::parse_all).
///
/// A parser that returned any of these should be discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// The tokenizer rejected the byte stream under the current options.
    #[error("{reason} at byte {offset}")]
    Syntax { reason: SyntaxError, offset: usize },
    /// A container was closed while no container was open.
    #[error("closing event without a matching open container")]
    MalformedStructure,
    /// Input ended inside the top-level value and partial values are not
    /// allowed.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Non-empty input was fed after the parser had been finished.
    #[error("parser already completed")]
    AlreadyComplete,
    /// An event contradicted the shape of the tree under construction.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),
}

/// What the tokenizer objected to. Paired with a byte offset in
/// [`ParserError::Syntax`] and [`TokenizerError::Syntax`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unexpected character {}", DisplayByte(*.0))]
    UnexpectedCharacter(u8),
    #[error("probable comment found in input text, comments are not enabled")]
    CommentsNotEnabled,
    #[error("trailing garbage after the top-level value")]
    TrailingGarbage,
    #[error("invalid object key (must be a string)")]
    InvalidObjectKey,
    #[error("expected ':' after object key")]
    ExpectedColon,
    #[error("expected ',' or '}}' after object value")]
    ExpectedObjectCommaOrEnd,
    #[error("expected ',' or ']' after array value")]
    ExpectedArrayCommaOrEnd,
    #[error("invalid escape character {} in string", DisplayByte(*.0))]
    InvalidEscape(u8),
    #[error("invalid character {} in unicode escape", DisplayByte(*.0))]
    InvalidUnicodeEscape(u8),
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("control character {} inside string", DisplayByte(*.0))]
    ControlCharacterInString(u8),
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("numeric (floating point) overflow")]
    NumberOverflow,
    #[error("malformed number")]
    MalformedNumber,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("max depth exceeded")]
    MaxDepthExceeded,
}

/// Errors raised by [`EventBuilder`](crate::EventBuilder) when an event does
/// not fit the tree it is building.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    #[error("closing event without a matching open container")]
    MalformedStructure,
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(&'static str),
}

/// Errors raised by [`Tokenizer`](crate::Tokenizer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError<E> {
    /// The event sink aborted the parse.
    #[error("event sink error: {0}")]
    Sink(E),
    #[error("{reason} at byte {offset}")]
    Syntax { reason: SyntaxError, offset: usize },
    /// Returned by [`Tokenizer::finish`](crate::Tokenizer::finish) when the
    /// input stopped inside a token or an open container.
    #[error("unexpected end of input")]
    Incomplete,
}

impl From<BuilderError> for ParserError {
    fn from(err: BuilderError) -> Self {
        match err {
            BuilderError::MalformedStructure => Self::MalformedStructure,
            BuilderError::InternalInvariantViolation(what) => Self::InternalInvariantViolation(what),
        }
    }
}

impl From<TokenizerError<BuilderError>> for ParserError {
    fn from(err: TokenizerError<BuilderError>) -> Self {
        match err {
            TokenizerError::Sink(err) => err.into(),
            TokenizerError::Syntax { reason, offset } => Self::Syntax { reason, offset },
            TokenizerError::Incomplete => Self::UnexpectedEof,
        }
    }
}

/// Printable ASCII as a quoted char, anything else as hex.
struct DisplayByte(u8);

impl fmt::Display for DisplayByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\'' => f.write_str("'\\''"),
            b @ 0x20..=0x7E => write!(f, "'{}'", b as char),
            b => write!(f, "0x{b:02X}"),
        }
    }
}
