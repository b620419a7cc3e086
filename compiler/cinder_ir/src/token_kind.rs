//! Token kinds and their per-variant attribute table.
//!
//! Every variant has a row in a const table carrying its debug name, fixed
//! spelling (for symbols and keywords), bracket classification with the
//! matching partner, and the number of parse-tree nodes the parser expects
//! the token to expand into (used downstream to size arenas).

use std::fmt;

/// The token vocabulary of the Cinder grammar language.
///
/// Discriminants are contiguous and index [`INFO`]; symbols are ordered
/// longest spelling first so a maximal-munch scanner can probe in
/// declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    // Structural
    FileStart = 0,
    FileEnd,
    Error,

    // Variable-spelling tokens
    Identifier,
    IntegerLiteral,
    RealLiteral,
    StringLiteral,
    CharacterLiteral,
    BooleanLiteral,

    // Grouping symbols
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,

    // Symbols, longest spelling first
    EqualColonColon,
    RangeInclusive,
    Range,
    Or,
    ZeroOrMore,
    OneOrMore,
    Optional,
    Concat,
    Semicolon,
    Colon,
    Equal,
    Hash,
    Dollar,

    // Keywords
    Import,
}

/// Per-kind attribute row.
struct TokenKindInfo {
    name: &'static str,
    spelling: Option<&'static str>,
    is_symbol: bool,
    is_keyword: bool,
    is_opening: bool,
    is_closing: bool,
    matching: Option<TokenKind>,
    expected_parse_tree_size: i8,
}

const fn misc(name: &'static str, expected_parse_tree_size: i8) -> TokenKindInfo {
    TokenKindInfo {
        name,
        spelling: None,
        is_symbol: false,
        is_keyword: false,
        is_opening: false,
        is_closing: false,
        matching: None,
        expected_parse_tree_size,
    }
}

const fn symbol(name: &'static str, spelling: &'static str) -> TokenKindInfo {
    TokenKindInfo {
        name,
        spelling: Some(spelling),
        is_symbol: true,
        is_keyword: false,
        is_opening: false,
        is_closing: false,
        matching: None,
        expected_parse_tree_size: 1,
    }
}

const fn keyword(name: &'static str, spelling: &'static str) -> TokenKindInfo {
    TokenKindInfo {
        name,
        spelling: Some(spelling),
        is_symbol: false,
        is_keyword: true,
        is_opening: false,
        is_closing: false,
        matching: None,
        expected_parse_tree_size: 1,
    }
}

const fn group(
    name: &'static str,
    spelling: &'static str,
    is_opening: bool,
    matching: TokenKind,
) -> TokenKindInfo {
    TokenKindInfo {
        name,
        spelling: Some(spelling),
        is_symbol: true,
        is_keyword: false,
        is_opening,
        is_closing: !is_opening,
        matching: Some(matching),
        expected_parse_tree_size: if is_opening { 1 } else { 0 },
    }
}

/// Attribute table indexed by the numeric discriminant.
const INFO: [TokenKindInfo; 29] = [
    misc("FileStart", 0),
    misc("FileEnd", 0),
    misc("Error", 0),
    misc("Identifier", 1),
    misc("IntegerLiteral", 1),
    misc("RealLiteral", 1),
    misc("StringLiteral", 1),
    misc("CharacterLiteral", 1),
    misc("BooleanLiteral", 1),
    group("OpenParen", "(", true, TokenKind::CloseParen),
    group("CloseParen", ")", false, TokenKind::OpenParen),
    group("OpenBrace", "{", true, TokenKind::CloseBrace),
    group("CloseBrace", "}", false, TokenKind::OpenBrace),
    group("OpenBracket", "[", true, TokenKind::CloseBracket),
    group("CloseBracket", "]", false, TokenKind::OpenBracket),
    symbol("EqualColonColon", "=::"),
    symbol("RangeInclusive", "..="),
    symbol("Range", ".."),
    symbol("Or", "|"),
    symbol("ZeroOrMore", "*"),
    symbol("OneOrMore", "+"),
    symbol("Optional", "?"),
    symbol("Concat", ","),
    symbol("Semicolon", ";"),
    symbol("Colon", ":"),
    symbol("Equal", "="),
    symbol("Hash", "#"),
    symbol("Dollar", "$"),
    keyword("Import", "import"),
];

/// Every keyword kind, in declaration order.
pub const KEYWORD_TOKENS: [TokenKind; 1] = [TokenKind::Import];

impl TokenKind {
    #[inline]
    fn info(self) -> &'static TokenKindInfo {
        &INFO[self as usize]
    }

    /// The kind's debug name, e.g. `"IntegerLiteral"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The fixed source spelling for symbols and keywords.
    #[must_use]
    pub fn fixed_spelling(self) -> Option<&'static str> {
        self.info().spelling
    }

    #[must_use]
    pub fn is_symbol(self) -> bool {
        self.info().is_symbol
    }

    #[must_use]
    pub fn is_keyword(self) -> bool {
        self.info().is_keyword
    }

    #[must_use]
    pub fn is_grouping_symbol(self) -> bool {
        self.info().matching.is_some()
    }

    #[must_use]
    pub fn is_opening_symbol(self) -> bool {
        self.info().is_opening
    }

    #[must_use]
    pub fn is_closing_symbol(self) -> bool {
        self.info().is_closing
    }

    /// The partner of a grouping symbol.
    #[must_use]
    pub fn matching_kind(self) -> Option<TokenKind> {
        self.info().matching
    }

    /// Parse-tree nodes the parser expects this token to produce.
    #[must_use]
    pub fn expected_parse_tree_size(self) -> i8 {
        self.info().expected_parse_tree_size
    }

    /// Resolve keyword spellings, e.g. `b"import"` to [`TokenKind::Import`].
    #[must_use]
    pub fn from_keyword(spelling: &[u8]) -> Option<TokenKind> {
        KEYWORD_TOKENS
            .iter()
            .copied()
            .find(|kind| kind.fixed_spelling().map(str::as_bytes) == Some(spelling))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed_spelling() {
            Some(spelling) => f.write_str(spelling),
            None => f.write_str(self.name()),
        }
    }
}
