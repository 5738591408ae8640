//! Chunked parsing front end.
//!
//! [`StreamingParser`] owns a [`Tokenizer`] and an [`EventBuilder`] and wires
//! one into the other. Callers push bytes with [`StreamingParser::feed`] as
//! they arrive and mark the last chunk as final; the finished [`Value`] is
//! returned by that final call and cached for later reads.
//!
//! [`parse_all`] covers the common case where the whole document is already
//! in memory.
use crate::{
    ParserOptions,
    error::{ParserError, TokenizerError},
    event_builder::EventBuilder,
    tokenizer::Tokenizer,
    value::Value,
};

/// Incremental JSON parser producing a single [`Value`].
///
/// # Examples
///
/// ```
/// use jsonframe::{ParserOptions, StreamingParser, Value};
///
/// let mut parser = StreamingParser::new(ParserOptions::default());
/// assert_eq!(parser.feed(br#"{"a": [1, tr"#, false), Ok(None));
/// let value = parser.feed(b"ue]}", true).unwrap().cloned();
/// assert_eq!(value.unwrap().to_string(), r#"{"a":[1,true]}"#);
///
/// // the result stays available
/// assert!(parser.is_complete());
/// assert!(parser.feed(b"", true).unwrap().is_some());
/// ```
///
/// A parser that returned an error should be discarded.
#[derive(Debug)]
pub struct StreamingParser {
    options: ParserOptions,
    tokenizer: Tokenizer,
    builder: EventBuilder,
    result: Option<Value>,
    /// The final chunk has been processed.
    closed: bool,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl StreamingParser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            tokenizer: Tokenizer::new(options),
            builder: EventBuilder::new(),
            result: None,
            closed: false,
        }
    }

    /// Parses a complete document in one call. Same as [`parse_all`].
    ///
    /// # Errors
    ///
    /// See [`parse_all`].
    pub fn parse(input: &[u8], options: ParserOptions) -> Result<Value, ParserError> {
        parse_all(input, options)
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Whether a value has been produced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Consumes the parser, returning the value if one has been produced.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.result
    }

    /// Feeds the next chunk of input.
    ///
    /// `chunk` may be empty and may end anywhere, including in the middle of
    /// a token or a multi-byte character. Set `is_final` on the last chunk
    /// (which may itself be empty).
    ///
    /// Returns `Ok(Some(value))` from the final call once the top-level value
    /// is complete, and `Ok(None)` while more input is needed. After
    /// completion, an empty chunk returns the cached value again.
    ///
    /// With [`ParserOptions::allow_partial_values`] an incomplete document
    /// makes the final call return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`ParserError::Syntax`] if the bytes are not acceptable JSON.
    /// - [`ParserError::UnexpectedEof`] if the final chunk leaves the value
    ///   incomplete and partial values are not allowed.
    /// - [`ParserError::AlreadyComplete`] if a non-empty chunk arrives after
    ///   the final one.
    /// - [`ParserError::MalformedStructure`] and
    ///   [`ParserError::InternalInvariantViolation`] if the event sequence
    ///   does not describe a tree.
    pub fn feed(&mut self, chunk: &[u8], is_final: bool) -> Result<Option<&Value>, ParserError> {
        if self.closed {
            if chunk.is_empty() {
                return Ok(self.result.as_ref());
            }
            log::debug!("rejecting {} bytes fed after completion", chunk.len());
            return Err(ParserError::AlreadyComplete);
        }

        if chunk.is_empty() && !is_final {
            return Ok(None);
        }

        log::trace!(
            "feeding {} bytes at offset {} (final: {is_final})",
            chunk.len(),
            self.tokenizer.offset()
        );
        if let Err(err) = self.tokenizer.feed(chunk, &mut self.builder) {
            return Err(Self::report(err.into()));
        }
        #[cfg(any(test, feature = "fuzzing"))]
        assert_eq!(
            self.tokenizer.depth(),
            self.builder.depth(),
            "tokenizer and builder disagree on nesting"
        );

        if !is_final {
            return Ok(None);
        }
        self.closed = true;

        match self.tokenizer.finish(&mut self.builder) {
            Ok(()) => {}
            Err(TokenizerError::Incomplete) if self.options.allow_partial_values => {
                log::debug!(
                    "input ended inside the value after {} bytes, accepting partial input",
                    self.tokenizer.offset()
                );
                return Ok(None);
            }
            Err(err) => return Err(Self::report(err.into())),
        }

        let value = self
            .builder
            .extract_result()
            .map_err(|err| Self::report(err.into()))?;
        log::debug!("parsed {} bytes", self.tokenizer.offset());
        Ok(Some(self.result.insert(value)))
    }

    fn report(err: ParserError) -> ParserError {
        log::debug!("parse failed: {err}");
        err
    }
}

/// Parses a complete in-memory document.
///
/// # Errors
///
/// Everything [`StreamingParser::feed`] reports, plus
/// [`ParserError::UnexpectedEof`] when partial values are allowed and the
/// document is incomplete.
///
/// # Examples
///
/// ```
/// use jsonframe::{parse_all, ParserError, ParserOptions, Value};
///
/// assert_eq!(parse_all(b"[1, 2]", ParserOptions::default()).unwrap().to_string(), "[1,2]");
/// assert_eq!(parse_all(b"[1, 2", ParserOptions::default()), Err(ParserError::UnexpectedEof));
/// ```
pub fn parse_all(input: &[u8], options: ParserOptions) -> Result<Value, ParserError> {
    let mut parser = StreamingParser::new(options);
    parser.feed(input, true)?;
    parser.into_value().ok_or(ParserError::UnexpectedEof)
}
