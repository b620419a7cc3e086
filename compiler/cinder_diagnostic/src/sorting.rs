//! Location-order sorting wrapper.

use crate::consumer::DiagnosticConsumer;
use crate::diagnostic::Diagnostic;

/// Buffers diagnostics and forwards them in `(filename, line, column)`
/// order on [`flush`](DiagnosticConsumer::flush); the sort is stable, so
/// diagnostics at the same position keep their emission order.
///
/// `flush` must be called exactly once before the consumer is dropped;
/// dropping an unflushed consumer fails fast in debug builds.
pub struct SortingDiagnosticConsumer<'c> {
    diagnostics: Vec<Diagnostic>,
    consumer: &'c mut dyn DiagnosticConsumer,
}

impl<'c> SortingDiagnosticConsumer<'c> {
    pub fn new(consumer: &'c mut dyn DiagnosticConsumer) -> Self {
        SortingDiagnosticConsumer {
            diagnostics: Vec::new(),
            consumer,
        }
    }
}

impl DiagnosticConsumer for SortingDiagnosticConsumer<'_> {
    fn consume(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn flush(&mut self) {
        self.diagnostics.sort_by(|lhs, rhs| {
            let lhs_loc = &lhs.collections[0].messages[0].location;
            let rhs_loc = &rhs.collections[0].messages[0].location;
            (&lhs_loc.filename, lhs_loc.line_number, lhs_loc.column_number).cmp(&(
                &rhs_loc.filename,
                rhs_loc.line_number,
                rhs_loc.column_number,
            ))
        });

        for diagnostic in self.diagnostics.drain(..) {
            self.consumer.consume(diagnostic);
        }
    }
}

impl Drop for SortingDiagnosticConsumer<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert!(self.diagnostics.is_empty(), "diagnostics not flushed");
        }
    }
}

#[cfg(test)]
mod tests;
