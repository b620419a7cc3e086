//! String literal recognition and value computation.
//!
//! The introducer decides the shape: `"…"` on one line, `"` followed by a
//! newline for multi-line, `'''` / `"""` for reflection (code-block)
//! literals, any of them wrapped in `n` hashes for a raw literal whose
//! escape trigger is `\` followed by `n` hashes. Reflection literals treat
//! the first line after the opening marker as a language tag and keep the
//! body verbatim modulo indent stripping.
//!
//! Value computation strips the indent established by the closing
//! terminator's line, collapses trailing horizontal whitespace, expands
//! escape sequences, and returns the raw content slice untouched whenever
//! no rewriting is needed.
//!
//! Diagnostic locations are byte offsets into the slice given to
//! [`StringLiteral::lex`].

use std::borrow::Cow;

use cinder_diagnostic::{diag_args, diagnostic, Span};
use memchr::{memchr, memchr2, memchr3};

use crate::char_set;
use crate::LexerDiagnosticEmitter;

const STRING_INDICATOR: &[u8] = b"\"";
const REFLECTION_INDICATOR: &[u8] = b"'''";
const REFLECTION_INDICATOR_DOUBLE_QUOTES: &[u8] = b"\"\"\"";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MultiLineKind {
    NotMultiLine,
    MultiLine,
    MaybeMultiLine,
    Reflection,
    ReflectionDoubleQuotes,
}

struct Introducer {
    kind: MultiLineKind,
    terminator: &'static [u8],
    prefix_size: usize,
}

impl Introducer {
    fn lex(source: &[u8]) -> Option<Introducer> {
        if source.is_empty() {
            return None;
        }

        let (kind, indicator): (MultiLineKind, &'static [u8]) =
            if source.starts_with(REFLECTION_INDICATOR) {
                (MultiLineKind::Reflection, REFLECTION_INDICATOR)
            } else if source.starts_with(REFLECTION_INDICATOR_DOUBLE_QUOTES) {
                (
                    MultiLineKind::ReflectionDoubleQuotes,
                    REFLECTION_INDICATOR_DOUBLE_QUOTES,
                )
            } else if source.starts_with(STRING_INDICATOR) {
                (MultiLineKind::MaybeMultiLine, STRING_INDICATOR)
            } else {
                (MultiLineKind::NotMultiLine, b"")
            };

        if kind == MultiLineKind::MaybeMultiLine {
            if let Some(prefix_end) =
                memchr2(b'\n', b'"', &source[indicator.len()..]).map(|i| i + indicator.len())
            {
                let kind = if source[prefix_end] == b'\n' {
                    MultiLineKind::MultiLine
                } else {
                    MultiLineKind::NotMultiLine
                };
                return Some(Introducer {
                    kind,
                    terminator: STRING_INDICATOR,
                    prefix_size: indicator.len(),
                });
            }
        } else if kind == MultiLineKind::Reflection || kind == MultiLineKind::ReflectionDoubleQuotes
        {
            if let Some(prefix_end) =
                memchr3(b'\n', b'\'', b'"', &source[indicator.len()..]).map(|i| i + indicator.len())
            {
                if source[prefix_end] == b'\n' {
                    return Some(Introducer {
                        kind,
                        terminator: indicator,
                        prefix_size: prefix_end + 1,
                    });
                }
                return Some(Introducer {
                    kind,
                    terminator: indicator,
                    prefix_size: indicator.len(),
                });
            }
        }

        if source[0] == b'"' {
            return Some(Introducer {
                kind: MultiLineKind::NotMultiLine,
                terminator: STRING_INDICATOR,
                prefix_size: 1,
            });
        }

        None
    }
}

/// A recognized string literal.
#[derive(Clone, Copy, Debug)]
pub struct StringLiteral<'a> {
    source: &'a [u8],
    content: &'a [u8],
    /// Offset of `content` within `source`.
    prefix_len: usize,
    multi_line_kind: MultiLineKind,
    hash_level: usize,
    is_format_string: bool,
    needs_validation: bool,
    terminated: bool,
}

impl<'a> StringLiteral<'a> {
    /// Recognize a string literal at the start of `input`.
    #[must_use]
    pub fn lex(input: &'a [u8]) -> Option<StringLiteral<'a>> {
        let source = input;
        let n = source.len();

        let hash_level = source.iter().position(|&c| c != b'#').unwrap_or(n);
        let mut cursor = hash_level;

        let introducer = Introducer::lex(&source[cursor.min(n)..])?;
        cursor += introducer.prefix_size;
        let prefix_len = cursor;

        let mut terminator = introducer.terminator.to_vec();
        terminator.resize(terminator.len() + hash_level, b'#');

        let is_reflection = matches!(
            introducer.kind,
            MultiLineKind::Reflection | MultiLineKind::ReflectionDoubleQuotes
        );
        if is_reflection {
            return Some(Self::lex_reflection(
                source,
                cursor,
                prefix_len,
                &terminator,
                hash_level,
                introducer.prefix_size > 3,
            ));
        }

        let mut content_needs_validation = false;
        let mut found_char = false;
        let mut is_format_string = false;

        fn is_interesting(c: u8) -> bool {
            matches!(c, b'\\' | b'"' | b'\n' | b' ' | b'\t' | b'{')
        }

        // Count a run of `{`; an odd count marks a format string.
        fn scan_format_braces(
            cursor: &mut usize,
            source: &[u8],
            is_format_string: &mut bool,
            content_needs_validation: &mut bool,
        ) {
            let mut open_brace_count = 0usize;
            while *cursor < source.len() && source[*cursor] == b'{' {
                open_brace_count += 1;
                *cursor += 1;
            }
            if open_brace_count & 1 == 1 {
                *is_format_string = true;
                *content_needs_validation = true;
            }
        }

        while cursor < n {
            let ch = source[cursor];
            found_char = found_char && !is_interesting(ch);
            if found_char {
                cursor += 1;
                continue;
            }

            match ch {
                b'"' => {
                    if source[cursor..].starts_with(&terminator) {
                        return Some(StringLiteral {
                            source: &source[..cursor + terminator.len()],
                            content: &source[prefix_len..cursor],
                            prefix_len,
                            multi_line_kind: introducer.kind,
                            hash_level,
                            is_format_string,
                            needs_validation: content_needs_validation,
                            terminated: true,
                        });
                    }
                }
                b'{' => {
                    if hash_level == 0 {
                        scan_format_braces(
                            &mut cursor,
                            source,
                            &mut is_format_string,
                            &mut content_needs_validation,
                        );
                    }
                }
                b' ' | b'\n' => {}
                b'\\' => {
                    if hash_level == 0 || matches_hashes(source, cursor + 1, hash_level) {
                        cursor += 1 + hash_level;
                        content_needs_validation = true;
                        if cursor < n {
                            if source[cursor] == b'u' {
                                cursor += 1;
                            } else if source[cursor] == b'{' && hash_level > 0 {
                                scan_format_braces(
                                    &mut cursor,
                                    source,
                                    &mut is_format_string,
                                    &mut content_needs_validation,
                                );
                            }
                        }
                    }
                    found_char = true;
                }
                _ => {
                    found_char = true;
                }
            }
            cursor += 1;
        }

        Some(StringLiteral {
            source,
            content: &source[prefix_len.min(n)..],
            prefix_len: prefix_len.min(n),
            multi_line_kind: introducer.kind,
            hash_level,
            is_format_string,
            needs_validation: content_needs_validation,
            terminated: false,
        })
    }

    fn lex_reflection(
        source: &'a [u8],
        mut cursor: usize,
        prefix_len: usize,
        terminator: &[u8],
        hash_level: usize,
        has_introducer: bool,
    ) -> StringLiteral<'a> {
        let mut content_needs_validation = false;
        let mut is_format_string = false;

        let n = source.len();
        while cursor < n {
            let ch = source[cursor];
            if (ch == b'\'' || ch == b'"') && source[cursor..].starts_with(terminator) {
                return StringLiteral {
                    source: &source[..cursor + terminator.len()],
                    content: &source[prefix_len..cursor],
                    prefix_len,
                    // Both quote styles collapse to one reflection kind;
                    // downstream only cares that it is a code block.
                    multi_line_kind: MultiLineKind::Reflection,
                    hash_level,
                    is_format_string,
                    needs_validation: content_needs_validation,
                    terminated: true,
                };
            }

            if !has_introducer && ch == b'{' {
                if cursor + 1 < n && source[cursor + 1] != b'{' {
                    is_format_string = true;
                    content_needs_validation = true;
                } else {
                    cursor += 1;
                }
            }
            cursor += 1;
        }

        StringLiteral {
            source,
            content: &source[prefix_len.min(n)..],
            prefix_len: prefix_len.min(n),
            multi_line_kind: MultiLineKind::Reflection,
            hash_level,
            is_format_string,
            needs_validation: content_needs_validation,
            terminated: false,
        }
    }

    #[must_use]
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// The bytes between the introducer and the terminator.
    #[must_use]
    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    #[must_use]
    pub fn is_format_string(&self) -> bool {
        self.is_format_string
    }

    /// Whether value computation must rewrite the content.
    #[must_use]
    pub fn needs_validation(&self) -> bool {
        self.needs_validation
    }

    /// The number of hashes bracketing a raw literal.
    #[must_use]
    pub fn hash_level(&self) -> usize {
        self.hash_level
    }

    #[must_use]
    pub fn is_multi_line(&self) -> bool {
        self.multi_line_kind == MultiLineKind::MultiLine
    }

    #[must_use]
    pub fn is_reflection(&self) -> bool {
        matches!(
            self.multi_line_kind,
            MultiLineKind::Reflection | MultiLineKind::ReflectionDoubleQuotes
        )
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The trimmed language tag of a reflection literal.
    #[must_use]
    pub fn codeblock_prefix(&self) -> &'a [u8] {
        if !self.is_reflection() {
            return b"";
        }

        let start = (3 + self.hash_level).min(self.source.len());
        let content = &self.source[start..];
        let end = memchr(b'\n', content).unwrap_or(content.len());
        trim_ascii(&content[..end])
    }

    /// Compute the canonical value.
    ///
    /// Unterminated literals compute to the empty value. When neither
    /// escapes nor indent stripping apply, the raw content slice is
    /// returned borrowed; otherwise the processed bytes are owned.
    #[must_use]
    pub fn compute_value(&self, emitter: &mut LexerDiagnosticEmitter<'_>) -> Cow<'a, [u8]> {
        if !self.terminated {
            return Cow::Borrowed(&b""[..]);
        }

        let terminator: &[u8] = match self.multi_line_kind {
            MultiLineKind::Reflection => REFLECTION_INDICATOR,
            MultiLineKind::ReflectionDoubleQuotes => REFLECTION_INDICATOR_DOUBLE_QUOTES,
            _ => STRING_INDICATOR,
        };
        let is_multi = self.is_reflection() || self.is_multi_line();

        let indent = if is_multi {
            self.check_indent(emitter, terminator)
        } else {
            &b""[..]
        };

        if !self.needs_validation && (!is_multi || indent.is_empty()) {
            return Cow::Borrowed(self.content);
        }

        let mut buffer = Vec::with_capacity(self.content.len());
        expand_escape_sequence_and_remove_indent(
            emitter,
            self.content,
            self.prefix_len,
            indent,
            self.hash_level,
            terminator,
            self.is_reflection(),
            &mut buffer,
        );
        Cow::Owned(buffer)
    }

    /// The whitespace run between the last newline and the terminator;
    /// every content line must start with it.
    fn check_indent(
        &self,
        emitter: &mut LexerDiagnosticEmitter<'_>,
        terminator: &[u8],
    ) -> &'a [u8] {
        let Some((indent_start, indent_end)) = compute_indent_from_final_line(self.source) else {
            return b"";
        };

        let content_end = self.prefix_len + self.content.len();
        if indent_end != content_end && terminator != b"\"" {
            diagnostic!(
                ContentBeforeStringTerminator,
                Error,
                "Only whitespace is permitted before the closing `{}` of a multi-line string."
            );
            emitter.emit(
                indent_end as u32,
                &ContentBeforeStringTerminator,
                diag_args![String::from_utf8_lossy(terminator)],
            );
        }

        &self.source[indent_start..indent_end]
    }
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

/// Whether `source[at..]` begins with `count` hashes.
fn matches_hashes(source: &[u8], at: usize, count: usize) -> bool {
    source.len() >= at + count && source[at..at + count].iter().all(|&c| c == b'#')
}

/// Walk the literal text backwards: the indent is what sits between the
/// final newline and the trailing non-space run (the terminator).
///
/// Returns `None` for single-line text.
fn compute_indent_from_final_line(text: &[u8]) -> Option<(usize, usize)> {
    let mut end = text.len();
    let mut i = text.len();
    while i > 0 {
        i -= 1;
        let ch = text[i];
        if ch == b'\n' {
            return Some((i + 1, end));
        }
        if !char_set::is_space(ch) {
            end = i;
        }
    }
    None
}

/// Consume the raw-level escape introducer (`\` plus `hash_level` hashes)
/// at `pos`, if present.
fn consume_raw_escape(content: &[u8], pos: &mut usize, hash_level: usize) -> bool {
    if content.get(*pos) != Some(&b'\\') {
        return false;
    }
    if !matches_hashes(content, *pos + 1, hash_level) {
        return false;
    }
    *pos += 1 + hash_level;
    true
}

/// Strip the indent from every line and expand escape sequences.
///
/// `base` is the offset of `content` within the lexed input, used for
/// diagnostic locations.
#[allow(clippy::too_many_arguments)]
fn expand_escape_sequence_and_remove_indent(
    emitter: &mut LexerDiagnosticEmitter<'_>,
    content: &[u8],
    base: usize,
    indent: &[u8],
    hash_level: usize,
    terminator: &[u8],
    is_reflection: bool,
    buffer: &mut Vec<u8>,
) {
    let n = content.len();
    let mut pos = 0usize;

    loop {
        // Consume the expected indent; a short, non-blank line is a
        // mismatch.
        if content[pos.min(n)..].starts_with(indent) {
            pos += indent.len();
        } else {
            let line_start = pos;
            while pos < n && char_set::is_horizontal_space(content[pos]) {
                pos += 1;
            }
            if !content[pos.min(n)..].starts_with(b"\n") {
                diagnostic!(
                    MismatchedIndentInString,
                    Error,
                    "Indentation does not match that of the closing `{}` in {} literal."
                );
                let found = (pos - line_start) as u32;
                emitter
                    .build(
                        (base + line_start) as u32,
                        &MismatchedIndentInString,
                        diag_args![
                            String::from_utf8_lossy(terminator),
                            if is_reflection {
                                "a codeblock"
                            } else {
                                "a multi-line string"
                            }
                        ],
                    )
                    .add_error_suggestion(
                        format!(
                            "Expected at least '{}' characters of indentation, but found '{}'",
                            indent.len(),
                            found
                        ),
                        Span::new(0, found).to_relative(),
                    )
                    .emit();
            }
        }

        if is_reflection {
            match memchr(b'\n', &content[pos.min(n)..]) {
                None => {
                    buffer.extend_from_slice(&content[pos.min(n)..]);
                    return;
                }
                Some(k) => {
                    buffer.extend_from_slice(&content[pos..pos + k]);
                    pos += k + 1;
                    buffer.push(b'\n');
                    continue;
                }
            }
        }

        // Watermark below which trailing-whitespace collapse never pops;
        // bumped past every escape expansion.
        let mut last_buffer_len = buffer.len();

        loop {
            let stop = content[pos.min(n)..].iter().position(|&c| {
                c == b'\n' || c == b'\\' || (char_set::is_horizontal_space(c) && c != b' ')
            });

            match stop {
                None => {
                    buffer.extend_from_slice(&content[pos.min(n)..]);
                    return;
                }
                Some(k) => {
                    buffer.extend_from_slice(&content[pos..pos + k]);
                    pos += k;
                }
            }

            if content[pos] == b'\n' {
                pos += 1;
                // Collapse trailing horizontal whitespace before the
                // newline.
                while buffer.len() > last_buffer_len {
                    let back = *buffer.last().expect("buffer is non-empty");
                    if back == b'\n' || !char_set::is_space(back) {
                        break;
                    }
                    buffer.pop();
                }
                buffer.push(b'\n');
                break;
            }

            if char_set::is_horizontal_space(content[pos]) {
                debug_assert!(content[pos] != b' ', "should not have stopped at a plain space");
                let non_space = content[pos..]
                    .iter()
                    .position(|&c| !char_set::is_horizontal_space(c));
                let run_ends_at_newline =
                    non_space.is_some_and(|k| content[pos + k] == b'\n');
                if !run_ends_at_newline {
                    diagnostic!(
                        InvalidHorizontalWhitespaceInString,
                        Error,
                        "Whitespace other than plain space must be expressed with an escape sequence in a string literal."
                    );
                    let run_len = non_space.unwrap_or(n - pos);
                    emitter
                        .build(
                            (base + pos) as u32,
                            &InvalidHorizontalWhitespaceInString,
                            diag_args![],
                        )
                        .add_error_suggestion(
                            "Use an escape sequence to express the whitespace",
                            Span::new(0, run_len as u32).to_relative(),
                        )
                        .emit();
                    buffer.extend_from_slice(&content[pos..pos + run_len]);
                }
                pos = non_space.map_or(n, |k| pos + k);
                continue;
            }

            if !consume_raw_escape(content, &mut pos, hash_level) {
                buffer.push(content[pos]);
                pos += 1;
                continue;
            }

            // Escaped newline joins the lines.
            if content[pos.min(n)..].starts_with(b"\n") {
                pos += 1;
                break;
            }

            expand_and_consume_escape_sequence(emitter, content, &mut pos, base, buffer);
            last_buffer_len = buffer.len();
        }
    }
}

/// Expand one escape sequence; `pos` sits just past the escape introducer.
///
/// Every error path still pushes a recovery byte so the computed value
/// stays usable.
fn expand_and_consume_escape_sequence(
    emitter: &mut LexerDiagnosticEmitter<'_>,
    content: &[u8],
    pos: &mut usize,
    base: usize,
    buffer: &mut Vec<u8>,
) {
    debug_assert!(*pos < content.len(), "should have escaped closing delimiter");
    let ch = content[*pos];
    *pos += 1;

    match ch {
        b't' => buffer.push(b'\t'),
        b'n' => buffer.push(b'\n'),
        b'r' => buffer.push(b'\r'),
        b'"' => buffer.push(b'"'),
        b'\'' => buffer.push(b'\''),
        b'\\' => buffer.push(b'\\'),
        b'0' => {
            buffer.push(0);
            match content.get(*pos) {
                Some(&next) if !char_set::is_oct_digit(next) => {
                    diagnostic!(DecimalEscapeSequence, Error, "Invalid octal digit.");
                    emitter
                        .build((base + *pos) as u32, &DecimalEscapeSequence, diag_args![])
                        .add_error_suggestion(
                            format!("Expected an octal digit, but got '{}'", next as char),
                            Span::default(),
                        )
                        .emit();
                }
                Some(&digit) => {
                    buffer.push(digit);
                    *pos += 1;
                }
                None => {}
            }
        }
        b'x' => {
            let rest = &content[*pos..];
            if rest.len() < 2 {
                diagnostic!(
                    HexadecimalEscapeMissingDigits,
                    Error,
                    "Hexadecimal escape sequence is too short."
                );
                emitter
                    .build(
                        (base + *pos - 1) as u32,
                        &HexadecimalEscapeMissingDigits,
                        diag_args![],
                    )
                    .add_error_suggestion(
                        format!(
                            "Expected 2 hexadecimal digits after this, but got {} digits",
                            rest.len()
                        ),
                        Span::default(),
                    )
                    .emit();
                buffer.push(ch);
                return;
            }

            diagnostic!(
                HexadecimalEscapeNotValid,
                Error,
                "Hexadecimal escape sequence contains invalid digit."
            );
            for offset in 0..2 {
                if !char_set::is_hex_digit(rest[offset]) {
                    emitter
                        .build(
                            (base + *pos + offset) as u32,
                            &HexadecimalEscapeNotValid,
                            diag_args![],
                        )
                        .add_error_suggestion(
                            format!(
                                "Expected a hexadecimal digit, but got '{}'",
                                rest[offset] as char
                            ),
                            Span::default(),
                        )
                        .emit();
                    buffer.push(ch);
                    return;
                }
            }

            buffer.push(hex_value(rest[0]) << 4 | hex_value(rest[1]));
            *pos += 2;
        }
        b'u' => {
            if !decode_unicode_escape_at(emitter, content, pos, base, buffer, false) {
                buffer.push(ch);
            }
        }
        _ => {
            diagnostic!(UnknownEscapeSequence, Error, "Unknown escape sequence `{}`.");
            emitter.emit(
                (base + *pos - 1) as u32,
                &UnknownEscapeSequence,
                diag_args![ch as char],
            );
            buffer.push(ch);
        }
    }
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => unreachable!("caller validated hex digits"),
    }
}

/// Validate braced unicode-escape digits and produce the code point.
fn get_and_check_code_point(
    emitter: &mut LexerDiagnosticEmitter<'_>,
    digits: &[u8],
    digits_base: usize,
) -> Option<u32> {
    let span = Span::new(0, digits.len() as u32).to_relative();

    if digits.len() > 6 {
        diagnostic!(
            UnicodeEscapeDigitsTooLarge,
            Error,
            "Unicode escape sequence has too many digits."
        );
        emitter
            .build(digits_base as u32, &UnicodeEscapeDigitsTooLarge, diag_args![])
            .add_error_suggestion(
                format!("Expected at most 6 digits, but got {} digits", digits.len()),
                span,
            )
            .add_info_suggestion(
                "Try reducing the number of digits in the unicode escape sequence",
                span,
            )
            .emit();
        return None;
    }

    let mut code_point = 0u32;
    for &c in digits {
        if !char_set::is_hex_digit(c) {
            diagnostic!(
                UnicodeEscapeInvalidDigits,
                Error,
                "Unicode escape sequence contains invalid hexadecimal digits."
            );
            emitter
                .build(digits_base as u32, &UnicodeEscapeInvalidDigits, diag_args![])
                .set_span_length(digits.len() as u32)
                .emit();
            return None;
        }
        code_point = code_point << 4 | u32::from(hex_value(c));
    }

    if code_point > 0x10FFFF {
        diagnostic!(
            UnicodeEscapeTooLarge,
            Error,
            "Invalid unicode escape sequence. Code point is too large."
        );
        emitter
            .build(digits_base as u32, &UnicodeEscapeTooLarge, diag_args![])
            .add_error_suggestion(
                "Unicode code points must be in the range 0x0 to 0x10FFFF.",
                span,
            )
            .emit();
        return None;
    }

    if (0xD800..0xE000).contains(&code_point) {
        diagnostic!(
            UnicodeEscapeSurrogate,
            Error,
            "Invalid unicode escape sequence. Code point is a surrogate."
        );
        emitter
            .build(digits_base as u32, &UnicodeEscapeSurrogate, diag_args![])
            .add_error_suggestion(
                "Unicode code points in the range 0xD800 to 0xDFFF are reserved for surrogates.",
                span,
            )
            .emit();
        return None;
    }

    Some(code_point)
}

/// Shared brace-and-digits scaffolding for the two decode entry points.
fn decode_unicode_escape_helper(
    emitter: &mut LexerDiagnosticEmitter<'_>,
    input: &[u8],
    pos: &mut usize,
    base: usize,
    should_check_prefix: bool,
    decode: impl FnOnce(&mut LexerDiagnosticEmitter<'_>, &[u8], usize) -> bool,
) -> bool {
    if should_check_prefix && input[(*pos).min(input.len())..].starts_with(b"\\u") {
        *pos += 2;
    }

    let input_pos = *pos;

    if input.get(*pos) != Some(&b'{') {
        diagnostic!(
            UnicodeEscapeMissingOpeningBrace,
            Error,
            "Unicode escape sequence is missing opening brace."
        );
        emitter
            .build(
                (base + input_pos) as u32,
                &UnicodeEscapeMissingOpeningBrace,
                diag_args![],
            )
            .add_error_suggestion("Try adding an opening brace `{`", Span::default())
            .emit();
        return false;
    }

    let digits_start = input_pos + 1;
    let mut end = digits_start;
    while end < input.len() && input[end] != b'}' {
        end += 1;
    }

    if input.get(end) != Some(&b'}') {
        diagnostic!(
            UnicodeEscapeMissingClosingBrace,
            Error,
            "Unicode escape sequence is missing closing brace."
        );
        emitter
            .build(
                (base + input_pos) as u32,
                &UnicodeEscapeMissingClosingBrace,
                diag_args![],
            )
            .add_error_suggestion("Try adding a closing brace `}`", Span::default())
            .emit();
        return false;
    }

    let raw_digits = &input[digits_start..end];
    let leading_ws = raw_digits
        .iter()
        .position(|&c| !c.is_ascii_whitespace())
        .unwrap_or(raw_digits.len());
    let digits = trim_ascii(raw_digits);

    if digits.is_empty() {
        diagnostic!(
            UnicodeEscapeMissingBracedDigits,
            Error,
            "Unicode escape sequence is missing digits."
        );
        emitter.emit(
            (base + input_pos) as u32,
            &UnicodeEscapeMissingBracedDigits,
            diag_args![],
        );
        return false;
    }

    if decode(emitter, digits, base + digits_start + leading_ws) {
        *pos = end + 1;
        return true;
    }
    false
}

/// Decode a `\u{…}` escape, appending the UTF-8 bytes to `buffer`.
///
/// `pos` is advanced past the escape on success and left in place on
/// failure so the caller can recover. Offsets in diagnostics are relative
/// to `input` plus `base`.
pub(crate) fn decode_unicode_escape_at(
    emitter: &mut LexerDiagnosticEmitter<'_>,
    input: &[u8],
    pos: &mut usize,
    base: usize,
    buffer: &mut Vec<u8>,
    should_check_prefix: bool,
) -> bool {
    decode_unicode_escape_helper(
        emitter,
        input,
        pos,
        base,
        should_check_prefix,
        |emitter, digits, digits_base| {
            let Some(code_point) = get_and_check_code_point(emitter, digits, digits_base) else {
                return false;
            };
            let Some(c) = char::from_u32(code_point) else {
                debug_assert!(false, "validated code point must convert");
                return false;
            };
            let mut utf8 = [0u8; 4];
            buffer.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            true
        },
    )
}

impl StringLiteral<'_> {
    /// Decode a `\u{…}` escape from `input[*pos..]` into `buffer`.
    ///
    /// With `should_check_prefix`, a leading `\u` is consumed first.
    pub fn decode_unicode_escape(
        emitter: &mut LexerDiagnosticEmitter<'_>,
        input: &[u8],
        pos: &mut usize,
        buffer: &mut Vec<u8>,
        should_check_prefix: bool,
    ) -> bool {
        decode_unicode_escape_at(emitter, input, pos, 0, buffer, should_check_prefix)
    }

    /// Decode a `\u{…}` escape from `input[*pos..]` to a single `char`,
    /// for the character literal lexer.
    pub fn decode_unicode_escape_char(
        emitter: &mut LexerDiagnosticEmitter<'_>,
        input: &[u8],
        pos: &mut usize,
        should_check_prefix: bool,
    ) -> Option<char> {
        let mut result = None;
        let ok = decode_unicode_escape_helper(
            emitter,
            input,
            pos,
            0,
            should_check_prefix,
            |emitter, digits, digits_base| {
                let Some(code_point) = get_and_check_code_point(emitter, digits, digits_base)
                else {
                    return false;
                };
                result = char::from_u32(code_point);
                result.is_some()
            },
        );
        if ok {
            result
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests;
