use super::*;
use crate::format::Formatter;
use crate::kind::DiagnosticKind;
use crate::{diag_args, Span};

fn location(filename: &str, line: &str, line_number: u32, column_number: u32) -> DiagnosticLocation {
    DiagnosticLocation {
        filename: filename.to_string(),
        line: line.to_string(),
        line_number,
        column_number,
        ..DiagnosticLocation::default()
    }
}

fn render_lines(diagnostic: Diagnostic) -> Vec<String> {
    let mut out = Vec::new();
    {
        let mut consumer = StreamDiagnosticConsumer::new(&mut out);
        consumer.consume(diagnostic);
    }
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn open_error_formatter() -> Formatter {
    Formatter::new(
        "cannot open file '{}' for reading: {}",
        diag_args!["std/std.cn", "No such file or directory"],
    )
}

#[test]
fn message_without_filename_prints_header_only() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::EmptyDigitSequence,
        location("", "", 1, 1),
        DiagnosticLevel::Error,
        open_error_formatter(),
    )
    .emit();

    assert_eq!(
        render_lines(diag),
        vec!["error: cannot open file 'std/std.cn' for reading: No such file or directory"]
    );
}

#[test]
fn filename_adds_locator_line() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::EmptyDigitSequence,
        location("std/std.cn", "", 1, 1),
        DiagnosticLevel::Error,
        open_error_formatter(),
    )
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: cannot open file 'std/std.cn' for reading: No such file or directory",
            "  --> std/std.cn:1:1",
        ]
    );
}

#[test]
fn suggestions_with_enough_space_staircase() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::EmptyDigitSequence,
        location(
            "std/std.cn",
            "auto out = get_stream(diagnostic.level, m_stream)",
            1,
            1,
        ),
        DiagnosticLevel::Error,
        open_error_formatter(),
    )
    .add_note("'auto' is not allowed in C++98 mode", Span::new(0, 4))
    .add_info("diagnostic", Span::new(11, 12))
    .add_error("llvm::raw_ostream&", Span::new(11, 15))
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: cannot open file 'std/std.cn' for reading: No such file or directory",
            "  --> std/std.cn:1:1",
            " 1 | auto out = get_stream(diagnostic.level, m_stream)",
            "   | ^~~~       ^~~~",
            "   | |         /|",
            "   | |        | diagnostic",
            "   | |        llvm::raw_ostream&",
            "   | 'auto' is not allowed in C++98 mode",
        ]
    );
}

#[test]
fn suggestions_without_space_fall_back_to_list() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::EmptyDigitSequence,
        location(
            "std/std.cn",
            "auto out = get_stream(diagnostic.level, m_stream)",
            1,
            1,
        ),
        DiagnosticLevel::Error,
        open_error_formatter(),
    )
    .add_note("'auto' is not allowed in C++98 mode", Span::new(0, 4))
    .add_info("diagnostic", Span::new(2, 12))
    .add_error("llvm::raw_ostream&", Span::new(2, 15))
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: cannot open file 'std/std.cn' for reading: No such file or directory",
            "  --> std/std.cn:1:1",
            " 1 | auto out = get_stream(diagnostic.level, m_stream)",
            "   | ^~^~~~~~~~~~~~~",
            "   | | |",
            "   | | |-llvm::raw_ostream&",
            "   | | |-diagnostic",
            "   | 'auto' is not allowed in C++98 mode",
        ]
    );
}

#[test]
fn multiple_messages_render_in_sequence() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::EmptyDigitSequence,
        location(
            "std/std.cn",
            "auto out = get_stream(diagnostic.level, m_stream)",
            1,
            1,
        ),
        DiagnosticLevel::Error,
        open_error_formatter(),
    )
    .add_note("'auto' is not allowed in C++98 mode", Span::new(0, 4))
    .add_info("diagnostic", Span::new(2, 12))
    .add_error("llvm::raw_ostream&", Span::new(2, 15))
    .next_child_section(DiagnosticLocation {
        filename: "std/std.cn".to_string(),
        line: "    auto out = get_stream(diagnostic.level, m_stream)".to_string(),
        line_number: 2,
        column_number: 4,
        length: 4,
    })
    .add_note("'auto' is not allowed in C++98 mode", Span::default())
    .add_info("diagnostic", Span::new(2 + 4, 12 + 4))
    .add_error("llvm::raw_ostream&", Span::new(2 + 4, 15 + 4))
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: cannot open file 'std/std.cn' for reading: No such file or directory",
            "  --> std/std.cn:1:1",
            " 1 | auto out = get_stream(diagnostic.level, m_stream)",
            "   | ^~^~~~~~~~~~~~~",
            "   | | |",
            "   | | |-llvm::raw_ostream&",
            "   | | |-diagnostic",
            "   | 'auto' is not allowed in C++98 mode",
            " 2 |     auto out = get_stream(diagnostic.level, m_stream)",
            "   |     ^~^~~~~~~~~~~~~",
            "   |     | |",
            "   |     | |-llvm::raw_ostream&",
            "   |     | |-diagnostic",
            "   |     'auto' is not allowed in C++98 mode",
        ]
    );
}

#[test]
fn insert_patch_shows_inserted_text() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::TestDiagnostic,
        location("main.cn", "let x = 10;", 1, 1),
        DiagnosticLevel::Error,
        Formatter::new("binding must be mutable", diag_args![]),
    )
    .add_insert_patch("make it mutable", "mut ", 4)
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: binding must be mutable",
            "  --> main.cn:1:1",
            " 1 | let mut x = 10;",
            "   |     ++++",
            "   |     |",
            "   |     make it mutable",
        ]
    );
}

#[test]
fn remove_patch_uses_dashes() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::TestDiagnostic,
        location("main.cn", "let x = 10;", 1, 1),
        DiagnosticLevel::Error,
        Formatter::new("initializer is not allowed here", diag_args![]),
    )
    .add_remove_patch("remove the initializer", Span::new(8, 10))
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: initializer is not allowed here",
            "  --> main.cn:1:1",
            " 1 | let x = 10;",
            "   |         --",
            "   |         |",
            "   |         remove the initializer",
        ]
    );
}

#[test]
fn contexts_print_after_excerpt() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::TestDiagnostic,
        location("main.cn", "", 1, 1),
        DiagnosticLevel::Error,
        Formatter::new("something failed", diag_args![]),
    )
    .add_context(DiagnosticLevel::Info, "remove the misplaced digit separator")
    .emit();

    assert_eq!(
        render_lines(diag),
        vec![
            "error: something failed",
            "  --> main.cn:1:1",
            "info: remove the misplaced digit separator",
        ]
    );
}

#[test]
fn consecutive_diagnostics_are_separated_by_blank_line() {
    fn simple(message: &'static str) -> Diagnostic {
        let mut diag = Diagnostic::new(DiagnosticLevel::Error);
        diag.build(
            DiagnosticKind::TestDiagnostic,
            DiagnosticLocation::default(),
            DiagnosticLevel::Error,
            Formatter::new(message, diag_args![]),
        )
        .emit();
        diag
    }

    let mut out = Vec::new();
    {
        let mut consumer = StreamDiagnosticConsumer::new(&mut out);
        consumer.consume(simple("first"));
        consumer.consume(simple("second"));
        consumer.reset();
        consumer.consume(simple("third"));
    }
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "error: first\n\nerror: second\nerror: third\n");
}

#[test]
fn colors_wrap_the_level_name() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Warning);
    diag.build(
        DiagnosticKind::TestDiagnosticWarning,
        location("main.cn", "", 1, 1),
        DiagnosticLevel::Warning,
        Formatter::new("colored", diag_args![]),
    )
    .emit();

    let mut out = Vec::new();
    {
        let mut consumer =
            StreamDiagnosticConsumer::with_color_mode(&mut out, ColorMode::Always, false);
        consumer.consume(diag);
    }
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\x1b[1;33mwarning"));
    assert!(text.contains("\x1b[0m"));
}

#[test]
fn color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn control_characters_are_escaped_in_the_excerpt() {
    let mut diag = Diagnostic::new(DiagnosticLevel::Error);
    diag.build(
        DiagnosticKind::TestDiagnostic,
        location("main.cn", "a\tb", 1, 0),
        DiagnosticLevel::Error,
        Formatter::new("tab in line", diag_args![]),
    )
    .add_error("here", Span::new(2, 3))
    .emit();

    let lines = render_lines(diag);
    assert_eq!(lines[2], " 1 | a\\tb");
    // The span over `b` is remapped one column right by the expanded tab.
    assert_eq!(lines[3], "   |    ^");
}

#[test]
fn error_tracking_consumer_remembers_errors() {
    fn leveled(level: DiagnosticLevel) -> Diagnostic {
        let mut diag = Diagnostic::new(level);
        diag.build(
            DiagnosticKind::TestDiagnostic,
            DiagnosticLocation::default(),
            level,
            Formatter::new("m", diag_args![]),
        )
        .emit();
        diag
    }

    let mut out = Vec::new();
    let mut stream = StreamDiagnosticConsumer::new(&mut out);
    let mut tracking = ErrorTrackingDiagnosticConsumer::new(&mut stream);

    tracking.consume(leveled(DiagnosticLevel::Warning));
    assert!(!tracking.seen_error());

    tracking.consume(leveled(DiagnosticLevel::Error));
    assert!(tracking.seen_error());

    tracking.consume(leveled(DiagnosticLevel::Info));
    assert!(tracking.seen_error());

    tracking.reset();
    assert!(!tracking.seen_error());
}
