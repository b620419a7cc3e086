use super::*;
use cinder_diagnostic::{
    Diagnostic, DiagnosticBase, DiagnosticConsumer, DiagnosticConverter, DiagnosticEmitter,
    DiagnosticKind, DiagnosticLocation, StreamDiagnosticConsumer,
};

#[derive(Default)]
struct Capture {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticConsumer for Capture {
    fn consume(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Maps byte offsets in the lexed input to line/column positions, the way
/// the token buffer's source converter would.
struct InputConverter<'s> {
    input: &'s [u8],
}

impl DiagnosticConverter<u32> for InputConverter<'_> {
    fn convert_loc(
        &self,
        loc: u32,
        _context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation {
        let offset = loc as usize;
        let line_start = self.input[..offset.min(self.input.len())]
            .iter()
            .rposition(|&c| c == b'\n')
            .map_or(0, |i| i + 1);
        let line_number = 1 + self.input[..line_start].iter().filter(|&&c| c == b'\n').count();
        let line_end = memchr(b'\n', &self.input[line_start..])
            .map_or(self.input.len(), |i| line_start + i);
        DiagnosticLocation {
            filename: "test.cn".to_string(),
            line: String::from_utf8_lossy(&self.input[line_start..line_end]).into_owned(),
            line_number: line_number as u32,
            column_number: (offset - line_start) as u32,
            ..DiagnosticLocation::default()
        }
    }
}

fn compute(input: &[u8]) -> (StringLiteral<'_>, Vec<u8>, Vec<DiagnosticKind>) {
    let literal = StringLiteral::lex(input).expect("input must lex");
    let mut capture = Capture::default();
    let value = {
        let converter = InputConverter { input };
        let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);
        literal.compute_value(&mut emitter).into_owned()
    };
    let kinds = capture
        .diagnostics
        .iter()
        .map(|d| d.collections[0].kind)
        .collect();
    (literal, value, kinds)
}

// Recognition

#[test]
fn single_line_string() {
    let s = StringLiteral::lex(br#""Hello, World!""#).unwrap();
    assert_eq!(s.content(), b"Hello, World!");
    assert_eq!(s.hash_level(), 0);
    assert!(!s.is_multi_line());
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());
    assert!(s.is_terminated());
    assert!(!s.is_reflection());
}

#[test]
fn multi_line_string() {
    let s = StringLiteral::lex(b"\"\nHello,\nWorld!\n\"").unwrap();
    assert_eq!(s.content(), b"\nHello,\nWorld!\n");
    assert!(s.is_multi_line());
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());
    assert!(s.is_terminated());

    let s = StringLiteral::lex(b"\"\n    Hello,\n    World!\n\"").unwrap();
    assert_eq!(s.content(), b"\n    Hello,\n    World!\n");
    assert!(s.is_multi_line());

    let s = StringLiteral::lex(b"\"\n    Hello,\nWorld!\n\"").unwrap();
    assert_eq!(s.content(), b"\n    Hello,\nWorld!\n");
    assert!(s.is_multi_line());
}

#[test]
fn escaped_newlines_do_not_make_a_multi_line_string() {
    let s = StringLiteral::lex(br#""\n    Hello,\nWorld!""#).unwrap();
    assert_eq!(s.content(), br"\n    Hello,\nWorld!");
    assert!(!s.is_multi_line());
    assert!(s.needs_validation());
    assert!(s.is_terminated());
}

#[test]
fn doubled_braces_are_not_a_format_string() {
    let s = StringLiteral::lex(br#""Hello, {{World}}!""#).unwrap();
    assert_eq!(s.content(), b"Hello, {{World}}!");
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());

    let s = StringLiteral::lex(b"\"\nHello,\n{{World}}!\n\"").unwrap();
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());
}

#[test]
fn odd_braces_mark_a_format_string() {
    let s = StringLiteral::lex(br#""Hello, {World}!""#).unwrap();
    assert_eq!(s.content(), b"Hello, {World}!");
    assert!(s.is_format_string());
    assert!(s.needs_validation());

    let s = StringLiteral::lex(b"\"\nHello,\n{World}!\n\"").unwrap();
    assert!(s.is_format_string());
    assert!(s.needs_validation());
}

#[test]
fn unicode_escape_needs_validation_but_is_not_a_format_string() {
    let s = StringLiteral::lex(b"\"\nHello,\n\\u{1F499}!\n\"").unwrap();
    assert_eq!(s.content(), b"\nHello,\n\\u{1F499}!\n");
    assert!(!s.is_format_string());
    assert!(s.needs_validation());
}

#[test]
fn raw_string_literals() {
    let s = StringLiteral::lex(br##"#"Hello, World!"#"##).unwrap();
    assert_eq!(s.content(), b"Hello, World!");
    assert_eq!(s.hash_level(), 1);
    assert!(s.is_terminated());
    assert!(!s.needs_validation());

    let s = StringLiteral::lex(br####"###"Hello, World!"###"####).unwrap();
    assert_eq!(s.content(), b"Hello, World!");
    assert_eq!(s.hash_level(), 3);
    assert!(s.is_terminated());
}

#[test]
fn raw_string_ignores_plain_braces_and_escapes() {
    let s = StringLiteral::lex(br##"#"{World} \n"#"##).unwrap();
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());
}

#[test]
fn raw_string_hash_escape_opens_a_format_hole() {
    let s = StringLiteral::lex(br##"#"a\#{x}b"#"##).unwrap();
    assert!(s.is_format_string());
    assert!(s.needs_validation());
}

#[test]
fn unterminated_string() {
    let s = StringLiteral::lex(br#""Hello"#).unwrap();
    assert!(!s.is_terminated());
    assert_eq!(s.content(), b"Hello");
}

#[test]
fn not_a_string() {
    assert!(StringLiteral::lex(b"hello").is_none());
    assert!(StringLiteral::lex(b"#hello").is_none());
    assert!(StringLiteral::lex(b"###").is_none());
    assert!(StringLiteral::lex(b"").is_none());
}

// Reflection literals

#[test]
fn reflection_single_line() {
    let s = StringLiteral::lex(b"'''Hello, World!'''").unwrap();
    assert_eq!(s.content(), b"Hello, World!");
    assert!(s.is_reflection());
    assert!(!s.is_multi_line());
    assert!(!s.is_format_string());
    assert!(s.is_terminated());

    let s = StringLiteral::lex(br#""""Hello, World!""""#).unwrap();
    assert_eq!(s.content(), b"Hello, World!");
    assert!(s.is_reflection());
    assert!(s.is_terminated());
}

#[test]
fn reflection_multi_line_skips_the_tag_line() {
    let s = StringLiteral::lex(b"'''\nHello,\nWorld!\n'''").unwrap();
    assert_eq!(s.content(), b"Hello,\nWorld!\n");
    assert!(s.is_reflection());
    assert!(s.is_terminated());

    let s = StringLiteral::lex(b"'''\n    Hello,\nWorld!\n'''").unwrap();
    assert_eq!(s.content(), b"    Hello,\nWorld!\n");
}

#[test]
fn reflection_format_strings() {
    let s = StringLiteral::lex(b"'''Hello, {{World}}!'''").unwrap();
    assert!(!s.is_format_string());
    assert!(!s.needs_validation());

    let s = StringLiteral::lex(b"'''Hello, {World}!'''").unwrap();
    assert!(s.is_format_string());
    assert!(s.needs_validation());
}

#[test]
fn codeblock_prefix_is_the_trimmed_tag_line() {
    let s = StringLiteral::lex(b"'''cpp\n    int x = 1;\n'''").unwrap();
    assert_eq!(s.codeblock_prefix(), b"cpp");

    let s = StringLiteral::lex(b"'''  lexer  \nbody\n'''").unwrap();
    assert_eq!(s.codeblock_prefix(), b"lexer");

    let s = StringLiteral::lex(b"'''no tag'''").unwrap();
    assert_eq!(s.codeblock_prefix(), b"no tag");

    let s = StringLiteral::lex(br#""plain""#).unwrap();
    assert_eq!(s.codeblock_prefix(), b"");
}

// Value computation

#[test]
fn plain_value_borrows_the_content() {
    let input = br#""Hello, World!""#;
    let literal = StringLiteral::lex(input).unwrap();
    let mut capture = Capture::default();
    let converter = InputConverter { input };
    let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);
    let value = literal.compute_value(&mut emitter);
    assert!(matches!(value, Cow::Borrowed(_)));
    assert_eq!(&*value, b"Hello, World!");
    assert!(capture.diagnostics.is_empty());
}

#[test]
fn newline_escape_expands() {
    let (literal, value, kinds) = compute(br#""Hello, \nWorld!""#);
    assert!(literal.needs_validation());
    assert_eq!(value, b"Hello, \nWorld!");
    assert_eq!(value.len(), 14);
    assert!(kinds.is_empty());
}

#[test]
fn hex_escape_produces_the_raw_byte() {
    let (_, value, kinds) = compute(br#""Hello,\xfa \nWorld!""#);
    assert_eq!(value, b"Hello,\xfa \nWorld!");
    assert!(kinds.is_empty());
}

#[test]
fn unicode_escape_encodes_utf8() {
    let (_, value, kinds) = compute(br#""\u{1f499}""#);
    assert_eq!(value, "\u{1f499}".as_bytes());
    assert!(kinds.is_empty());
}

#[test]
fn simple_escapes() {
    let (_, value, kinds) = compute(br#""\t\r\"\'\\""#);
    assert_eq!(value, b"\t\r\"'\\");
    assert!(kinds.is_empty());
}

#[test]
fn nul_escape_takes_one_octal_digit() {
    let (_, value, kinds) = compute(br#""a\07b""#);
    assert_eq!(value, b"a\x007b");
    assert!(kinds.is_empty());
}

#[test]
fn nul_escape_rejects_decimal_digits() {
    let (_, value, kinds) = compute(br#""Hello,\09 \nWorld!""#);
    assert_eq!(kinds, vec![DiagnosticKind::DecimalEscapeSequence]);
    assert!(!value.is_empty());
}

#[test]
fn octal_error_rendering() {
    let input = br#""Hello,\09 \nWorld!""#;
    let literal = StringLiteral::lex(input).unwrap();
    let mut out = Vec::new();
    {
        let mut consumer = StreamDiagnosticConsumer::new(&mut out);
        let converter = InputConverter { input };
        let mut emitter = DiagnosticEmitter::new(&converter, &mut consumer);
        let _ = literal.compute_value(&mut emitter);
    }
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "error: Invalid octal digit.",
            "  --> test.cn:1:9",
            r#" 1 | "Hello,\09 \nWorld!""#,
            r"   |          ^",
            r"   |          |",
            r"   |          Expected an octal digit, but got '9'",
        ]
    );
}

#[test]
fn unknown_escape_keeps_the_character() {
    let (_, value, kinds) = compute(br#""a\qb""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnknownEscapeSequence]);
    assert_eq!(value, b"aqb");
}

#[test]
fn hex_escape_error_recovery() {
    let (_, value, kinds) = compute(br#""a\xg0b""#);
    assert_eq!(kinds, vec![DiagnosticKind::HexadecimalEscapeNotValid]);
    // Recovery keeps the escape character and rescans the rest.
    assert_eq!(value, b"axg0b");

    let (_, _, kinds) = compute(br#""a\x1""#);
    assert_eq!(kinds, vec![DiagnosticKind::HexadecimalEscapeMissingDigits]);
}

#[test]
fn unicode_escape_error_kinds() {
    let (_, _, kinds) = compute(br#""\u12""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeMissingOpeningBrace]);

    let (_, _, kinds) = compute(br#""\u{12""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeMissingClosingBrace]);

    let (_, _, kinds) = compute(br#""\u{}""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeMissingBracedDigits]);

    let (_, _, kinds) = compute(br#""\u{12G4}""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeInvalidDigits]);

    let (_, _, kinds) = compute(br#""\u{1234567}""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeDigitsTooLarge]);

    let (_, _, kinds) = compute(br#""\u{D800}""#);
    assert_eq!(kinds, vec![DiagnosticKind::UnicodeEscapeSurrogate]);
}

#[test]
fn unicode_escape_too_large() {
    let input = br#""\u{11FFFF}""#;
    let literal = StringLiteral::lex(input).unwrap();
    let mut capture = Capture::default();
    {
        let converter = InputConverter { input };
        let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);
        let _ = literal.compute_value(&mut emitter);
    }

    assert_eq!(capture.diagnostics.len(), 1);
    let collection = &capture.diagnostics[0].collections[0];
    assert_eq!(collection.kind, DiagnosticKind::UnicodeEscapeTooLarge);
    let suggestions = &collection.messages[0].suggestions;
    assert_eq!(suggestions.len(), 1);
    assert_eq!(
        suggestions[0].message,
        "Unicode code points must be in the range 0x0 to 0x10FFFF."
    );
    // The span covers the six digits, relative to the digit position.
    assert!(suggestions[0].span.is_relative());
    assert_eq!(suggestions[0].span.size(), 6);
}

#[test]
fn raw_escapes_trigger_at_the_hash_level() {
    // `\n` in a one-hash raw string is literal text.
    let (_, value, kinds) = compute(br##"#"a\nb"#"##);
    assert_eq!(value, br"a\nb");
    assert!(kinds.is_empty());

    // `\#n` is the escape at hash level one.
    let (_, value, kinds) = compute(br##"#"a\#nb"#"##);
    assert_eq!(value, b"a\nb");
    assert!(kinds.is_empty());
}

#[test]
fn escaped_newline_joins_lines() {
    let (_, value, kinds) = compute(b"\"a\\\nb\"");
    assert_eq!(value, b"ab");
    assert!(kinds.is_empty());
}

#[test]
fn multi_line_value_strips_indent() {
    let (_, value, kinds) = compute(b"\"\n  Hello,\n  World!\n  \"");
    assert_eq!(value, b"\nHello,\nWorld!\n");
    assert!(kinds.is_empty());
}

#[test]
fn trailing_spaces_collapse_before_newlines() {
    let (_, value, kinds) = compute(b"\"\n  Hello,   \n  World!\n  \"");
    assert_eq!(value, b"\nHello,\nWorld!\n");
    assert!(kinds.is_empty());
}

#[test]
fn mismatched_indent_is_diagnosed() {
    let input = b"\"\n    Hello,\n  World!\n    \"";
    let literal = StringLiteral::lex(input).unwrap();
    let mut capture = Capture::default();
    let value = {
        let converter = InputConverter { input };
        let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);
        literal.compute_value(&mut emitter).into_owned()
    };

    assert_eq!(capture.diagnostics.len(), 1);
    let collection = &capture.diagnostics[0].collections[0];
    assert_eq!(collection.kind, DiagnosticKind::MismatchedIndentInString);
    assert_eq!(
        collection.messages[0].suggestions[0].message,
        "Expected at least '4' characters of indentation, but found '2'"
    );
    // The short line still contributes its text.
    assert_eq!(value, b"\nHello,\nWorld!\n");
}

#[test]
fn tabs_in_multi_line_strings_are_diagnosed() {
    let (_, _, kinds) = compute(b"\"\n  a\tb\n  \"");
    assert_eq!(
        kinds,
        vec![DiagnosticKind::InvalidHorizontalWhitespaceInString]
    );
}

#[test]
fn trailing_tabs_before_newline_collapse_silently() {
    let (_, value, kinds) = compute(b"\"\n  a\t\n  \"");
    assert_eq!(value, b"\na\n");
    assert!(kinds.is_empty());
}

#[test]
fn reflection_value_strips_indent_by_terminator_column() {
    let (literal, value, kinds) = compute(b"'''cpp\n    int x = 1;\n    '''");
    assert!(literal.is_reflection());
    assert_eq!(literal.codeblock_prefix(), b"cpp");
    assert_eq!(value, b"int x = 1;\n");
    assert!(kinds.is_empty());
}

#[test]
fn reflection_value_keeps_deeper_indentation() {
    let (_, value, kinds) = compute(b"'''cpp\n  if (x) {\n    y();\n  }\n  '''");
    assert_eq!(value, b"if (x) {\n  y();\n}\n");
    assert!(kinds.is_empty());
}

#[test]
fn content_before_terminator_is_diagnosed() {
    let (_, _, kinds) = compute(b"'''\nHello,\nWorld!'''");
    assert_eq!(kinds, vec![DiagnosticKind::ContentBeforeStringTerminator]);
}

#[test]
fn unterminated_value_is_empty() {
    let (_, value, _) = compute(br#""abc"#);
    assert_eq!(value, b"");
}

// Public unicode decode helpers

#[test]
fn decode_unicode_escape_into_buffer() {
    let input = br"\u{48}rest";
    let mut capture = Capture::default();
    let converter = InputConverter { input };
    let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);

    let mut buffer = Vec::new();
    let mut pos = 0usize;
    assert!(StringLiteral::decode_unicode_escape(
        &mut emitter,
        input,
        &mut pos,
        &mut buffer,
        true,
    ));
    assert_eq!(buffer, b"H");
    assert_eq!(&input[pos..], b"rest");
}

#[test]
fn unicode_escape_decoding_matches_utf8_encoding() {
    for cp in [
        0x0u32, 0x41, 0x7F, 0x80, 0x7FF, 0x800, 0xD7FF, 0xE000, 0xFFFD, 0x1F499, 0x10FFFF,
    ] {
        let input = format!("\"\\u{{{cp:X}}}\"");
        let (_, value, kinds) = compute(input.as_bytes());
        let expected = char::from_u32(cp).unwrap();
        assert_eq!(value, expected.to_string().as_bytes(), "U+{cp:X}");
        assert!(kinds.is_empty(), "U+{cp:X}");
    }
}

#[test]
fn decode_unicode_escape_to_char() {
    let input = br"\u{1F499}";
    let mut capture = Capture::default();
    let converter = InputConverter { input };
    let mut emitter = DiagnosticEmitter::new(&converter, &mut capture);

    let mut pos = 0usize;
    let decoded =
        StringLiteral::decode_unicode_escape_char(&mut emitter, input, &mut pos, true);
    assert_eq!(decoded, Some('\u{1F499}'));
    assert_eq!(pos, input.len());
}
