//! The stable diagnostic kind taxonomy.
//!
//! Every diagnostic the compiler can produce has a kind here. The kind is
//! the searchable identity of a message class; the format string and level
//! live in the `DiagnosticBase` declared at the emitting site.

/// Identity of a diagnostic message class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Source loading
    ErrorOpeningFile,
    ErrorStattingFile,
    FileTooLarge,
    ErrorReadingFile,

    // Lexer
    BinaryRealLiteral,
    ContentBeforeStringTerminator,
    DecimalEscapeSequence,
    EmptyDigitSequence,
    HexadecimalEscapeMissingDigits,
    HexadecimalEscapeNotValid,
    InvalidDigit,
    InvalidDigitSeparator,
    InvalidHorizontalWhitespaceInString,
    IrregularDigitSeparators,
    MismatchedClosing,
    MismatchedIndentInString,
    MultiLineStringWithDoubleQuotes,
    NoWhitespaceAfterCommentIntroducer,
    OctalRealLiteral,
    TooManyDigits,
    TrailingComment,
    UnicodeEscapeInvalidDigits,
    UnicodeEscapeMissingOpeningBrace,
    UnicodeEscapeMissingClosingBrace,
    UnicodeEscapeMissingBracedDigits,
    UnicodeEscapeSurrogate,
    UnicodeEscapeDigitsTooLarge,
    UnicodeEscapeTooLarge,
    UnknownBaseSpecifier,
    UnknownEscapeSequence,
    UnmatchedClosing,
    UnrecognizedCharacters,
    UnterminatedString,
    WrongRealLiteralExponent,

    // Test-only kinds, kept in the taxonomy so suites across crates can
    // declare bases without inventing lexer kinds.
    TestDiagnostic,
    TestDiagnosticNote,
    TestDiagnosticWarning,
    TestDiagnosticError,
    TestDiagnosticInfo,
}

impl DiagnosticKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::ErrorOpeningFile => "ErrorOpeningFile",
            DiagnosticKind::ErrorStattingFile => "ErrorStattingFile",
            DiagnosticKind::FileTooLarge => "FileTooLarge",
            DiagnosticKind::ErrorReadingFile => "ErrorReadingFile",
            DiagnosticKind::BinaryRealLiteral => "BinaryRealLiteral",
            DiagnosticKind::ContentBeforeStringTerminator => "ContentBeforeStringTerminator",
            DiagnosticKind::DecimalEscapeSequence => "DecimalEscapeSequence",
            DiagnosticKind::EmptyDigitSequence => "EmptyDigitSequence",
            DiagnosticKind::HexadecimalEscapeMissingDigits => "HexadecimalEscapeMissingDigits",
            DiagnosticKind::HexadecimalEscapeNotValid => "HexadecimalEscapeNotValid",
            DiagnosticKind::InvalidDigit => "InvalidDigit",
            DiagnosticKind::InvalidDigitSeparator => "InvalidDigitSeparator",
            DiagnosticKind::InvalidHorizontalWhitespaceInString => {
                "InvalidHorizontalWhitespaceInString"
            }
            DiagnosticKind::IrregularDigitSeparators => "IrregularDigitSeparators",
            DiagnosticKind::MismatchedClosing => "MismatchedClosing",
            DiagnosticKind::MismatchedIndentInString => "MismatchedIndentInString",
            DiagnosticKind::MultiLineStringWithDoubleQuotes => "MultiLineStringWithDoubleQuotes",
            DiagnosticKind::NoWhitespaceAfterCommentIntroducer => {
                "NoWhitespaceAfterCommentIntroducer"
            }
            DiagnosticKind::OctalRealLiteral => "OctalRealLiteral",
            DiagnosticKind::TooManyDigits => "TooManyDigits",
            DiagnosticKind::TrailingComment => "TrailingComment",
            DiagnosticKind::UnicodeEscapeInvalidDigits => "UnicodeEscapeInvalidDigits",
            DiagnosticKind::UnicodeEscapeMissingOpeningBrace => {
                "UnicodeEscapeMissingOpeningBrace"
            }
            DiagnosticKind::UnicodeEscapeMissingClosingBrace => {
                "UnicodeEscapeMissingClosingBrace"
            }
            DiagnosticKind::UnicodeEscapeMissingBracedDigits => {
                "UnicodeEscapeMissingBracedDigits"
            }
            DiagnosticKind::UnicodeEscapeSurrogate => "UnicodeEscapeSurrogate",
            DiagnosticKind::UnicodeEscapeDigitsTooLarge => "UnicodeEscapeDigitsTooLarge",
            DiagnosticKind::UnicodeEscapeTooLarge => "UnicodeEscapeTooLarge",
            DiagnosticKind::UnknownBaseSpecifier => "UnknownBaseSpecifier",
            DiagnosticKind::UnknownEscapeSequence => "UnknownEscapeSequence",
            DiagnosticKind::UnmatchedClosing => "UnmatchedClosing",
            DiagnosticKind::UnrecognizedCharacters => "UnrecognizedCharacters",
            DiagnosticKind::UnterminatedString => "UnterminatedString",
            DiagnosticKind::WrongRealLiteralExponent => "WrongRealLiteralExponent",
            DiagnosticKind::TestDiagnostic => "TestDiagnostic",
            DiagnosticKind::TestDiagnosticNote => "TestDiagnosticNote",
            DiagnosticKind::TestDiagnosticWarning => "TestDiagnosticWarning",
            DiagnosticKind::TestDiagnosticError => "TestDiagnosticError",
            DiagnosticKind::TestDiagnosticInfo => "TestDiagnosticInfo",
        }
    }
}
