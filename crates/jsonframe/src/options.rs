#![allow(clippy::struct_excessive_bools)]

/// Lenience switches for the tokenizer.
///
/// Every option relaxes one rule of strict [RFC 8259] parsing and is
/// independent of the others. The options are fixed when a parser is created.
///
/// # Examples
///
/// ```rust
/// use jsonframe::{parse_all, ParserOptions, Value};
///
/// let options = ParserOptions {
///     allow_comments: true,
///     ..Default::default()
/// };
/// assert_eq!(parse_all(b"// answer\n42", options), Ok(Value::Int(42)));
/// ```
///
/// # Default
///
/// All options default to `false`, which is strict RFC 8259 behavior.
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether `// line` and `/* block */` comments are accepted wherever
    /// whitespace is.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether to skip checking that string and key bytes are valid UTF-8.
    ///
    /// Invalid sequences are replaced with U+FFFD when the string is handed
    /// to the value tree. Only use this for trusted input.
    ///
    /// # Default
    ///
    /// `false`
    pub skip_string_validation: bool,

    /// Whether bytes after the first complete top-level value are ignored
    /// instead of rejected.
    ///
    /// # Examples
    ///
    /// ```json
    /// {"a":1} this is ignored
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_garbage: bool,

    /// Whether the input may hold several top-level values back to back.
    ///
    /// Every value is tokenized and must be well formed, but only the first
    /// one becomes the parse result.
    ///
    /// # Examples
    ///
    /// ```json
    /// {}{}{}
    /// ```
    ///
    /// ```json
    /// 123 45 678 9
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,

    /// Whether input that ends in the middle of the top-level value is
    /// accepted.
    ///
    /// When set, the final `feed` returns `Ok(None)` for incomplete input
    /// instead of [`ParserError::UnexpectedEof`](crate::ParserError::UnexpectedEof).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_partial_values: bool,
}
