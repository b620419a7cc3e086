use super::*;
use crate::emitter::{DiagnosticBase, DiagnosticConverter, DiagnosticEmitter};
use crate::{diag_args, diagnostic, DiagnosticKind, DiagnosticLevel, DiagnosticLocation};

#[derive(Default)]
struct BufferConsumer {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticConsumer for BufferConsumer {
    fn consume(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

struct PassThroughConverter;

impl DiagnosticConverter<DiagnosticLocation> for PassThroughConverter {
    fn convert_loc(
        &self,
        loc: DiagnosticLocation,
        _context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation {
        loc
    }
}

fn at(filename: &str, line: u32, column: u32) -> DiagnosticLocation {
    DiagnosticLocation {
        filename: filename.to_string(),
        line: "line".to_string(),
        line_number: line,
        column_number: column,
        ..DiagnosticLocation::default()
    }
}

#[test]
fn flush_orders_by_line_then_column() {
    diagnostic!(TestDiagnostic, Error, "{}");

    let mut buffer = BufferConsumer::default();
    {
        let mut sorting = SortingDiagnosticConsumer::new(&mut buffer);
        let converter = PassThroughConverter;
        let mut emitter = DiagnosticEmitter::new(&converter, &mut sorting);

        emitter.emit(at("f", 1, 1), &TestDiagnostic, diag_args!["M1"]);
        emitter.emit(at("f", 2, 1), &TestDiagnostic, diag_args!["M2"]);
        emitter.emit(at("f", 1, 3), &TestDiagnostic, diag_args!["M3"]);
        emitter.emit(at("f", 3, 4), &TestDiagnostic, diag_args!["M4"]);
        emitter.emit(at("f", 3, 2), &TestDiagnostic, diag_args!["M5"]);

        sorting.flush();
    }

    let expected = [
        (1u32, 1u32, "M1"),
        (1, 3, "M3"),
        (2, 1, "M2"),
        (3, 2, "M5"),
        (3, 4, "M4"),
    ];
    assert_eq!(buffer.diagnostics.len(), expected.len());
    for (diagnostic, (line, column, message)) in buffer.diagnostics.iter().zip(expected) {
        let collection = &diagnostic.collections[0];
        assert_eq!(collection.kind, DiagnosticKind::TestDiagnostic);
        assert_eq!(collection.level, DiagnosticLevel::Error);
        assert_eq!(collection.messages[0].location.line_number, line);
        assert_eq!(collection.messages[0].location.column_number, column);
        assert_eq!(collection.formatter.format(), message);
    }
}

#[test]
fn flush_orders_by_filename_first() {
    diagnostic!(TestDiagnostic, Error, "{}");

    let mut buffer = BufferConsumer::default();
    {
        let mut sorting = SortingDiagnosticConsumer::new(&mut buffer);
        let converter = PassThroughConverter;
        let mut emitter = DiagnosticEmitter::new(&converter, &mut sorting);

        emitter.emit(at("b", 1, 1), &TestDiagnostic, diag_args!["in b"]);
        emitter.emit(at("a", 9, 9), &TestDiagnostic, diag_args!["in a"]);

        sorting.flush();
    }

    assert_eq!(buffer.diagnostics[0].collections[0].formatter.format(), "in a");
    assert_eq!(buffer.diagnostics[1].collections[0].formatter.format(), "in b");
}

#[test]
fn sort_is_stable_for_equal_keys() {
    diagnostic!(TestDiagnostic, Error, "{}");

    let mut buffer = BufferConsumer::default();
    {
        let mut sorting = SortingDiagnosticConsumer::new(&mut buffer);
        let converter = PassThroughConverter;
        let mut emitter = DiagnosticEmitter::new(&converter, &mut sorting);

        emitter.emit(at("f", 1, 1), &TestDiagnostic, diag_args!["first"]);
        emitter.emit(at("f", 1, 1), &TestDiagnostic, diag_args!["second"]);
        emitter.emit(at("f", 1, 1), &TestDiagnostic, diag_args!["third"]);

        sorting.flush();
    }

    let messages: Vec<String> = buffer
        .diagnostics
        .iter()
        .map(|d| d.collections[0].formatter.format())
        .collect();
    assert_eq!(messages, ["first", "second", "third"]);
}

#[test]
fn flush_with_nothing_buffered_is_fine() {
    let mut buffer = BufferConsumer::default();
    let mut sorting = SortingDiagnosticConsumer::new(&mut buffer);
    sorting.flush();
}
