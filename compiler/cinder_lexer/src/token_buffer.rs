//! Packed token and line records over one source buffer.
//!
//! A [`TokenBuffer`] owns its tokens and lines but borrows the source and
//! never owns the shared value stores — operations that need interned
//! values take them as a parameter, so the buffer, the stores, and the
//! source form no ownership cycle.
//!
//! The construction API is driven by the language lexer: lines are added
//! as their starts are discovered and finalized once their extent is
//! known; every line is finalized before lexing ends. Tokens arrive in
//! source order, so line indices are monotonically non-decreasing, and a
//! balanced bracket pair ends up with each side holding the other's index.
//!
//! Literal token text is not stored: [`TokenBuffer::token_text`] re-runs
//! the literal recognizer at the token's position, which must succeed for
//! any token the lexer produced.

use std::fmt::Write as _;
use std::io::{self, Write};

use cinder_diagnostic::{
    DiagnosticBase, DiagnosticConverter, DiagnosticLocation,
};
use cinder_ir::{
    IdentifierId, IntId, LineIndex, RealId, SharedValueStores, StringLiteralId, TokenIndex,
    TokenKind,
};
use memchr::{memchr, memrchr};
use tracing::trace;

use crate::numeric_literal::NumericLiteral;
use crate::source_buffer::SourceBuffer;
use crate::string_literal::StringLiteral;

/// Per-kind token payload, discriminated in lock-step with the kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenPayload {
    #[default]
    None,
    Identifier(IdentifierId),
    StringLiteral(StringLiteralId),
    Int(IntId),
    Real(RealId),
    /// The partner of a grouping symbol.
    MatchedBracket(TokenIndex),
    /// Byte length of an `Error` token.
    ErrorLength(i32),
}

/// One packed token record.
#[derive(Clone, Copy, Debug)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub has_trailing_space: bool,
    pub is_recovery: bool,
    pub line: LineIndex,
    /// 0-based byte column within the line.
    pub column: i32,
    pub payload: TokenPayload,
}

impl TokenInfo {
    #[must_use]
    pub fn new(kind: TokenKind, line: LineIndex, column: i32) -> TokenInfo {
        TokenInfo {
            kind,
            has_trailing_space: false,
            is_recovery: false,
            line,
            column,
            payload: TokenPayload::None,
        }
    }
}

/// One source line: byte start, byte length, and indentation column.
#[derive(Clone, Copy, Debug)]
pub struct LineInfo {
    pub start: u32,
    /// [`LineInfo::NPOS`] until the line is finalized.
    pub length: u32,
    pub indent: u32,
}

impl LineInfo {
    pub const NPOS: u32 = u32::MAX;

    #[must_use]
    pub fn new(start: u32) -> LineInfo {
        LineInfo {
            start,
            length: LineInfo::NPOS,
            indent: 0,
        }
    }
}

/// The lexed form of one source buffer.
pub struct TokenBuffer<'s> {
    source: &'s SourceBuffer,
    token_infos: Vec<TokenInfo>,
    line_infos: Vec<LineInfo>,
    expected_parse_tree_size: i32,
    has_errors: bool,
}

impl<'s> TokenBuffer<'s> {
    #[must_use]
    pub fn new(source: &'s SourceBuffer) -> TokenBuffer<'s> {
        TokenBuffer {
            source,
            token_infos: Vec::new(),
            line_infos: Vec::new(),
            expected_parse_tree_size: 0,
            has_errors: false,
        }
    }

    #[must_use]
    pub fn source(&self) -> &'s SourceBuffer {
        self.source
    }

    // Construction.

    /// Register a line starting at byte `start`; its length is unknown
    /// until [`finish_line`](Self::finish_line).
    pub fn add_line(&mut self, start: u32) -> LineIndex {
        debug_assert!(
            self.line_infos
                .last()
                .map_or(true, |line| line.start <= start),
            "line starts must be non-decreasing"
        );
        let index = LineIndex::new(self.line_infos.len());
        self.line_infos.push(LineInfo::new(start));
        index
    }

    pub fn finish_line(&mut self, line: LineIndex, length: u32) {
        self.line_infos[line.index()].length = length;
    }

    pub fn set_line_indent(&mut self, line: LineIndex, indent: u32) {
        self.line_infos[line.index()].indent = indent;
    }

    /// Append a token, growing the running parse-tree size estimate.
    pub fn add_token(&mut self, info: TokenInfo) -> TokenIndex {
        debug_assert!(
            self.token_infos
                .last()
                .map_or(true, |last| last.line <= info.line),
            "token lines must be non-decreasing"
        );
        let index = TokenIndex::new(self.token_infos.len());
        self.expected_parse_tree_size += i32::from(info.kind.expected_parse_tree_size());
        trace!(index = index.as_raw(), kind = info.kind.name(), "add token");
        self.token_infos.push(info);
        index
    }

    /// Point a balanced bracket pair at each other.
    pub fn match_brackets(&mut self, opening: TokenIndex, closing: TokenIndex) {
        assert!(
            self.kind(opening).is_opening_symbol(),
            "token is not an opening token"
        );
        assert!(
            self.kind(closing).is_closing_symbol(),
            "token is not a closing token"
        );
        self.token_infos[opening.index()].payload = TokenPayload::MatchedBracket(closing);
        self.token_infos[closing.index()].payload = TokenPayload::MatchedBracket(opening);
    }

    pub fn set_has_errors(&mut self) {
        self.has_errors = true;
    }

    // Accessors.

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.token_infos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token_infos.is_empty()
    }

    /// Running estimate of the parse tree size for this buffer.
    #[must_use]
    pub fn expected_parse_tree_size(&self) -> i32 {
        self.expected_parse_tree_size
    }

    pub fn tokens(&self) -> impl Iterator<Item = TokenIndex> {
        (0..self.token_infos.len()).map(TokenIndex::new)
    }

    #[must_use]
    pub fn kind(&self, token: TokenIndex) -> TokenKind {
        self.token_info(token).kind
    }

    #[must_use]
    pub fn line(&self, token: TokenIndex) -> LineIndex {
        self.token_info(token).line
    }

    /// 1-based line number.
    #[must_use]
    pub fn line_number(&self, token: TokenIndex) -> u32 {
        self.line_number_of(self.line(token))
    }

    #[must_use]
    pub fn line_number_of(&self, line: LineIndex) -> u32 {
        line.index() as u32 + 1
    }

    /// 1-based column number.
    #[must_use]
    pub fn column_number(&self, token: TokenIndex) -> u32 {
        (self.token_info(token).column + 1).max(0) as u32
    }

    /// 1-based indentation column of a line.
    #[must_use]
    pub fn indent_column_number(&self, line: LineIndex) -> u32 {
        self.line_info(line).indent + 1
    }

    #[must_use]
    pub fn identifier(&self, token: TokenIndex) -> IdentifierId {
        match self.token_info(token).payload {
            TokenPayload::Identifier(id) => id,
            _ => IdentifierId::INVALID,
        }
    }

    #[must_use]
    pub fn int_literal(&self, token: TokenIndex) -> IntId {
        match self.token_info(token).payload {
            TokenPayload::Int(id) => id,
            _ => IntId::INVALID,
        }
    }

    #[must_use]
    pub fn real_literal(&self, token: TokenIndex) -> RealId {
        match self.token_info(token).payload {
            TokenPayload::Real(id) => id,
            _ => RealId::INVALID,
        }
    }

    #[must_use]
    pub fn string_literal_id(&self, token: TokenIndex) -> StringLiteralId {
        match self.token_info(token).payload {
            TokenPayload::StringLiteral(id) => id,
            _ => StringLiteralId::INVALID,
        }
    }

    /// The closing partner of an opening bracket token.
    #[must_use]
    pub fn matched_closing_token(&self, opening: TokenIndex) -> TokenIndex {
        let info = self.token_info(opening);
        assert!(info.kind.is_opening_symbol(), "token is not an opening token");
        match info.payload {
            TokenPayload::MatchedBracket(partner) => partner,
            _ => TokenIndex::INVALID,
        }
    }

    /// The opening partner of a closing bracket token.
    #[must_use]
    pub fn matched_opening_token(&self, closing: TokenIndex) -> TokenIndex {
        let info = self.token_info(closing);
        assert!(info.kind.is_closing_symbol(), "token is not a closing token");
        match info.payload {
            TokenPayload::MatchedBracket(partner) => partner,
            _ => TokenIndex::INVALID,
        }
    }

    #[must_use]
    pub fn has_leading_whitespace(&self, token: TokenIndex) -> bool {
        token.index() == 0 || self.token_infos[token.index() - 1].has_trailing_space
    }

    #[must_use]
    pub fn has_trailing_whitespace(&self, token: TokenIndex) -> bool {
        self.token_info(token).has_trailing_space
    }

    #[must_use]
    pub fn is_recovery_token(&self, token: TokenIndex) -> bool {
        self.token_info(token).is_recovery
    }

    /// The exact source spelling of a token.
    ///
    /// Symbols and keywords come from the kind table; identifiers from the
    /// value stores; literals and error tokens are reconstructed from the
    /// source, which must succeed for any token the lexer produced.
    #[must_use]
    pub fn token_text<'a>(
        &'a self,
        stores: &'a SharedValueStores,
        token: TokenIndex,
    ) -> &'a [u8] {
        let info = self.token_info(token);
        if let Some(spelling) = info.kind.fixed_spelling() {
            return spelling.as_bytes();
        }

        match info.kind {
            TokenKind::Error => {
                let start = self.token_start(info);
                let TokenPayload::ErrorLength(length) = info.payload else {
                    panic!("error token without an error length");
                };
                &self.source.source()[start..start + length as usize]
            }
            TokenKind::IntegerLiteral | TokenKind::RealLiteral => {
                let start = self.token_start(info);
                let literal = NumericLiteral::lex(&self.source.source()[start..])
                    .unwrap_or_else(|| {
                        panic!(
                            "{}:{}:{}: could not reconstruct the numeric literal",
                            self.source.filename(),
                            self.line_info(info.line).start,
                            info.column
                        )
                    });
                literal.source()
            }
            TokenKind::StringLiteral => {
                let start = self.token_start(info);
                let literal = StringLiteral::lex(&self.source.source()[start..])
                    .unwrap_or_else(|| {
                        panic!(
                            "{}:{}:{}: could not reconstruct the string literal",
                            self.source.filename(),
                            self.line_info(info.line).start,
                            info.column
                        )
                    });
                literal.source()
            }
            TokenKind::FileStart | TokenKind::FileEnd => b"",
            _ => {
                debug_assert!(
                    info.kind == TokenKind::Identifier,
                    "unexpected kind {}",
                    info.kind.name()
                );
                stores.identifier(self.identifier(token))
            }
        }
    }

    /// The `(line, column)` just past the token, accounting for newlines
    /// inside multi-line literals. The column is 1-based.
    #[must_use]
    pub fn end_location(
        &self,
        stores: &SharedValueStores,
        token: TokenIndex,
    ) -> (LineIndex, u32) {
        let line = self.line(token);
        let column = self.column_number(token);
        let text = self.token_text(stores, token);

        match memrchr(b'\n', text) {
            None => (line, column + text.len() as u32),
            Some(last) => {
                let second_half = &text[last + 1..];
                if second_half.is_empty() {
                    (line, column + last as u32)
                } else {
                    let newlines = text[..last].iter().filter(|&&c| c == b'\n').count();
                    (
                        LineIndex::new(line.index() + newlines + 1),
                        1 + second_half.len() as u32,
                    )
                }
            }
        }
    }

    // Printing.

    /// Dump every token as a YAML-ish record.
    pub fn print(&self, stores: &SharedValueStores, out: &mut dyn Write) -> io::Result<()> {
        if self.token_infos.is_empty() {
            return Ok(());
        }

        writeln!(out, "- Filename: {}", self.source.filename())?;
        writeln!(out, "  tokens: [")?;

        let mut widths = PrintWidths {
            index: digits(self.token_infos.len() as u32),
            ..PrintWidths::default()
        };
        for token in self.tokens() {
            widths.widen(self.print_widths(token));
        }

        for token in self.tokens() {
            self.print_token_with_widths(stores, out, token, widths)?;
            writeln!(out)?;
        }

        writeln!(out, "  ]")?;
        Ok(())
    }

    /// Dump a single token record.
    pub fn print_token(
        &self,
        stores: &SharedValueStores,
        out: &mut dyn Write,
        token: TokenIndex,
    ) -> io::Result<()> {
        self.print_token_with_widths(stores, out, token, PrintWidths::default())
    }

    fn print_token_with_widths(
        &self,
        stores: &SharedValueStores,
        out: &mut dyn Write,
        token: TokenIndex,
        mut widths: PrintWidths,
    ) -> io::Result<()> {
        widths.widen(self.print_widths(token));

        let info = self.token_info(token);
        let text = self.token_text(stores, token);

        let mut kind_field = String::new();
        let _ = write!(kind_field, "'{}'", info.kind.name());

        write!(
            out,
            "    {{ index: {index:>iw$}, kind: {kind:>kw$}, line: {line:>lw$}, column: {column:>cw$}, indent: {indent:>dw$}, spelling: '{spelling}'",
            index = token.index(),
            iw = widths.index as usize,
            kind = kind_field,
            kw = widths.kind as usize + 2,
            line = self.line_number(token),
            lw = widths.line as usize,
            column = self.column_number(token),
            cw = widths.column as usize,
            indent = self.indent_column_number(info.line),
            dw = widths.indent as usize,
            spelling = String::from_utf8_lossy(text),
        )?;

        match info.kind {
            TokenKind::Identifier => {
                write!(out, ", identifier: '{}'", self.identifier(token))?;
            }
            TokenKind::IntegerLiteral => {
                write!(out, ", value: `{}`", stores.ints().get(self.int_literal(token)))?;
            }
            TokenKind::RealLiteral => {
                write!(out, ", value: `{}`", stores.reals().get(self.real_literal(token)))?;
            }
            TokenKind::StringLiteral => {
                write!(
                    out,
                    ", value: `{}`",
                    String::from_utf8_lossy(stores.string_literal(self.string_literal_id(token)))
                )?;
            }
            _ => {
                if info.kind.is_opening_symbol() {
                    write!(out, ", closing token: {}", self.matched_closing_token(token))?;
                } else if info.kind.is_closing_symbol() {
                    write!(out, ", opening token: {}", self.matched_opening_token(token))?;
                }
            }
        }

        if info.has_trailing_space {
            write!(out, ", trailing_space: true")?;
        }
        if info.is_recovery {
            write!(out, ", recovery: true")?;
        }

        write!(out, " }}")?;
        Ok(())
    }

    fn print_widths(&self, token: TokenIndex) -> PrintWidths {
        let info = self.token_info(token);
        PrintWidths {
            index: digits(self.token_infos.len() as u32),
            kind: info.kind.name().len() as u32,
            line: digits(self.line_number(token)),
            column: digits(self.column_number(token)),
            indent: digits(self.indent_column_number(info.line)),
        }
    }

    // Internals.

    fn token_info(&self, token: TokenIndex) -> &TokenInfo {
        &self.token_infos[token.index()]
    }

    fn line_info(&self, line: LineIndex) -> &LineInfo {
        &self.line_infos[line.index()]
    }

    fn token_start(&self, info: &TokenInfo) -> usize {
        self.line_info(info.line).start as usize + info.column.max(0) as usize
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct PrintWidths {
    index: u32,
    kind: u32,
    line: u32,
    column: u32,
    indent: u32,
}

impl PrintWidths {
    fn widen(&mut self, other: PrintWidths) {
        self.index = self.index.max(other.index);
        self.kind = self.kind.max(other.kind);
        self.line = self.line.max(other.line);
        self.column = self.column.max(other.column);
        self.indent = self.indent.max(other.indent);
    }
}

fn digits(mut number: u32) -> u32 {
    let mut count = 1;
    while number != 0 {
        number /= 10;
        count += 1;
    }
    count
}

/// Converts byte offsets into the source to rendering locations by binary
/// searching the line table.
pub struct SourceBufferConverter<'b, 's> {
    buffer: &'b TokenBuffer<'s>,
}

impl<'b, 's> SourceBufferConverter<'b, 's> {
    #[must_use]
    pub fn new(buffer: &'b TokenBuffer<'s>) -> Self {
        SourceBufferConverter { buffer }
    }
}

impl DiagnosticConverter<u32> for SourceBufferConverter<'_, '_> {
    fn convert_loc(
        &self,
        loc: u32,
        _context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation {
        let source = self.buffer.source.source();
        debug_assert!((loc as usize) <= source.len(), "loc is not in the buffer");

        let lines = &self.buffer.line_infos;
        let partition = lines.partition_point(|line| line.start <= loc);
        assert!(partition > 0, "loc is before the first line");
        let line_index = partition - 1;
        let line_info = lines[line_index];

        let column = loc - line_info.start;
        let start = line_info.start as usize;
        let mut line = if line_info.length == LineInfo::NPOS {
            &source[start..]
        } else {
            &source[start..(start + line_info.length as usize).min(source.len())]
        };

        if line_info.length == LineInfo::NPOS {
            // The line is still being lexed; clamp at the next newline
            // past the error column.
            debug_assert!(
                memchr(b'\n', &line[..(column as usize).min(line.len())]).is_none(),
                "unlexed newline before the error column"
            );
            if let Some(end) = memchr(b'\n', &line[(column as usize).min(line.len())..]) {
                line = &line[..column as usize + end];
            }
        }

        DiagnosticLocation {
            filename: self.buffer.source.filename().to_string(),
            line: String::from_utf8_lossy(line).into_owned(),
            line_number: line_index as u32 + 1,
            column_number: column + 1,
            ..DiagnosticLocation::default()
        }
    }
}

/// Converts token indices to rendering locations, composing through the
/// source-offset converter and covering the token's text.
pub struct TokenDiagnosticConverter<'b, 's, 'v> {
    buffer: &'b TokenBuffer<'s>,
    stores: &'v SharedValueStores,
}

impl<'b, 's, 'v> TokenDiagnosticConverter<'b, 's, 'v> {
    #[must_use]
    pub fn new(buffer: &'b TokenBuffer<'s>, stores: &'v SharedValueStores) -> Self {
        TokenDiagnosticConverter { buffer, stores }
    }
}

impl DiagnosticConverter<TokenIndex> for TokenDiagnosticConverter<'_, '_, '_> {
    fn convert_loc(
        &self,
        loc: TokenIndex,
        context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation {
        let info = self.buffer.token_info(loc);
        let token_start = self.buffer.token_start(info) as u32;

        let mut location =
            SourceBufferConverter::new(self.buffer).convert_loc(token_start, context_fn);
        location.length = self.buffer.token_text(self.stores, loc).len() as u32;
        location
    }
}
