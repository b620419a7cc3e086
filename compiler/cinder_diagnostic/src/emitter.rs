//! Location-generic diagnostic emission.
//!
//! A [`DiagnosticEmitter`] pairs a [`DiagnosticConverter`], which turns an
//! abstract location (a byte offset, a token index, a filename) into a
//! concrete [`DiagnosticLocation`], with a [`DiagnosticConsumer`] that
//! receives the finished diagnostic. The [`DiagnosticBuilder`] accumulates
//! collections, suggestions, patches, and contexts, and ships everything on
//! `emit()`.
//!
//! Diagnostic bases are declared at the emitting site with [`diagnostic!`]:
//!
//! ```
//! use cinder_diagnostic::diagnostic;
//!
//! diagnostic!(InvalidDigit, Error, "Invalid digit '{0}' in {1} numeric literal");
//! assert_eq!(InvalidDigit.level, cinder_diagnostic::DiagnosticLevel::Error);
//! ```

use crate::consumer::DiagnosticConsumer;
use crate::diagnostic::{
    Diagnostic, DiagnosticCollection, DiagnosticContext, DiagnosticLevel, DiagnosticLocation,
    DiagnosticMessage, DiagnosticPatchKind, Suggestion,
};
use crate::format::Formatter;
use crate::kind::DiagnosticKind;
use crate::span::Span;
use std::borrow::Cow;

/// A diagnostic class: stable kind, default level, and format string.
///
/// Declared as a const at the emitting site via [`diagnostic!`] so the
/// message text lives next to the code that produces it.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticBase {
    pub kind: DiagnosticKind,
    pub level: DiagnosticLevel,
    pub format: &'static str,
}

/// Declare a [`DiagnosticBase`] const bound to its [`DiagnosticKind`].
#[macro_export]
macro_rules! diagnostic {
    ($name:ident, $level:ident, $format:literal) => {
        const $name: $crate::DiagnosticBase = $crate::DiagnosticBase {
            kind: $crate::DiagnosticKind::$name,
            level: $crate::DiagnosticLevel::$level,
            format: $format,
        };
    };
}

/// Maps an abstract location type to a concrete rendering location.
///
/// `context_fn` lets the converter attach a context collection to the
/// diagnostic being built (used for macro-expansion-like sites). The
/// callback must not be re-entered with the same location.
pub trait DiagnosticConverter<L> {
    fn convert_loc(
        &self,
        loc: L,
        context_fn: &mut dyn FnMut(DiagnosticLocation, &DiagnosticBase),
    ) -> DiagnosticLocation;
}

/// Builder-style emitter parameterized by a location type.
pub struct DiagnosticEmitter<'a, L> {
    converter: &'a dyn DiagnosticConverter<L>,
    consumer: &'a mut dyn DiagnosticConsumer,
}

impl<'a, L> DiagnosticEmitter<'a, L> {
    pub fn new<C: DiagnosticConverter<L>>(
        converter: &'a C,
        consumer: &'a mut dyn DiagnosticConsumer,
    ) -> Self {
        DiagnosticEmitter {
            converter,
            consumer,
        }
    }

    /// Emit a single-collection diagnostic.
    ///
    /// Must not be used with a `Note`-level base; notes attach to an
    /// existing diagnostic through [`DiagnosticBuilder::add_note`].
    pub fn emit(&mut self, loc: L, base: &DiagnosticBase, args: Vec<String>) {
        self.build(loc, base, args).emit();
    }

    /// Start a diagnostic for incremental construction.
    pub fn build(
        &mut self,
        loc: L,
        base: &DiagnosticBase,
        args: Vec<String>,
    ) -> DiagnosticBuilder<'_, 'a, L> {
        debug_assert!(
            base.level != DiagnosticLevel::Note,
            "Note messages must be added with add_note"
        );
        let mut builder = DiagnosticBuilder {
            emitter: self,
            diagnostic: Diagnostic::new(base.level),
            emitted: false,
        };
        builder.add_message(loc, base, Formatter::new(base.format, args));
        builder
    }
}

/// In-flight diagnostic; move-only, consumed by [`emit`](Self::emit).
///
/// Dropping a builder without emitting is a programming error: it fails
/// fast in debug builds and drops the diagnostic silently in release.
#[must_use]
pub struct DiagnosticBuilder<'e, 'a, L> {
    emitter: &'e mut DiagnosticEmitter<'a, L>,
    diagnostic: Diagnostic,
    emitted: bool,
}

impl<L> DiagnosticBuilder<'_, '_, L> {
    /// Append a `Note`-level collection.
    pub fn add_note(mut self, loc: L, base: &DiagnosticBase, args: Vec<String>) -> Self {
        debug_assert!(base.level == DiagnosticLevel::Note);
        self.add_message(loc, base, Formatter::new(base.format, args));
        self
    }

    /// Append an `Info`-level collection.
    pub fn add_info(mut self, loc: L, base: &DiagnosticBase, args: Vec<String>) -> Self {
        debug_assert!(base.level == DiagnosticLevel::Info);
        self.add_message(loc, base, Formatter::new(base.format, args));
        self
    }

    /// Append a `Warning`-level collection.
    pub fn add_warning(mut self, loc: L, base: &DiagnosticBase, args: Vec<String>) -> Self {
        debug_assert!(base.level == DiagnosticLevel::Warning);
        self.add_message(loc, base, Formatter::new(base.format, args));
        self
    }

    /// Append an `Error`-level collection.
    pub fn add_error(mut self, loc: L, base: &DiagnosticBase, args: Vec<String>) -> Self {
        debug_assert!(base.level == DiagnosticLevel::Error);
        self.add_message(loc, base, Formatter::new(base.format, args));
        self
    }

    pub fn add_error_suggestion(
        self,
        message: impl Into<Cow<'static, str>>,
        span: Span,
    ) -> Self {
        self.add_suggestion(DiagnosticLevel::Error, message, span)
    }

    pub fn add_warning_suggestion(
        self,
        message: impl Into<Cow<'static, str>>,
        span: Span,
    ) -> Self {
        self.add_suggestion(DiagnosticLevel::Warning, message, span)
    }

    pub fn add_note_suggestion(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Note, message, span)
    }

    pub fn add_info_suggestion(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Info, message, span)
    }

    /// Start a sibling message under the current collection.
    pub fn next_child_section(mut self, loc: L) -> Self {
        let location = self.convert(loc);
        let collection = self
            .diagnostic
            .collections
            .last_mut()
            .expect("cannot add a child location without a message");
        collection.messages.push(DiagnosticMessage {
            location,
            suggestions: Vec::new(),
        });
        self
    }

    pub fn add_child_error_context(self, message: impl Into<Cow<'static, str>>) -> Self {
        self.add_child_context(DiagnosticLevel::Error, message)
    }

    pub fn add_child_warning_context(self, message: impl Into<Cow<'static, str>>) -> Self {
        self.add_child_context(DiagnosticLevel::Warning, message)
    }

    pub fn add_child_note_context(self, message: impl Into<Cow<'static, str>>) -> Self {
        self.add_child_context(DiagnosticLevel::Note, message)
    }

    pub fn add_child_info_context(self, message: impl Into<Cow<'static, str>>) -> Self {
        self.add_child_context(DiagnosticLevel::Info, message)
    }

    /// Attach an insert patch at `pos`; the span is sized by the text.
    pub fn add_patch_insert(
        mut self,
        message: impl Into<Cow<'static, str>>,
        insert_text: impl Into<Cow<'static, str>>,
        pos: u32,
    ) -> Self {
        let insert_text = insert_text.into();
        let size = u32::try_from(insert_text.len()).unwrap_or(u32::MAX);
        self.push_suggestion(Suggestion {
            message: message.into(),
            span: Span::from_size(pos, size),
            level: DiagnosticLevel::Info,
            patch_kind: DiagnosticPatchKind::Insert,
            patch_content: insert_text,
        });
        self
    }

    /// Attach a remove patch over `span`.
    pub fn patch_remove(mut self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.push_suggestion(Suggestion {
            message: message.into(),
            span,
            level: DiagnosticLevel::Error,
            patch_kind: DiagnosticPatchKind::Remove,
            patch_content: Cow::Borrowed(""),
        });
        self
    }

    /// Override the length of the current message's location.
    pub fn set_span_length(mut self, length: u32) -> Self {
        self.current_message().location.length = length;
        self
    }

    /// Ship the diagnostic to the consumer.
    pub fn emit(mut self) {
        self.emitted = true;
        let diagnostic = std::mem::take(&mut self.diagnostic);
        self.emitter.consumer.consume(diagnostic);
    }

    fn add_suggestion(
        mut self,
        level: DiagnosticLevel,
        message: impl Into<Cow<'static, str>>,
        span: Span,
    ) -> Self {
        let message = message.into();
        self.push_suggestion(Suggestion::new(level, message, span));
        self
    }

    fn push_suggestion(&mut self, suggestion: Suggestion) {
        self.current_message().suggestions.push(suggestion);
    }

    fn current_message(&mut self) -> &mut DiagnosticMessage {
        self.diagnostic
            .collections
            .last_mut()
            .and_then(|collection| collection.messages.last_mut())
            .expect("cannot annotate a diagnostic without a message")
    }

    fn add_child_context(
        mut self,
        level: DiagnosticLevel,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let collection = self
            .diagnostic
            .collections
            .last_mut()
            .expect("cannot add a child message without a parent message");
        collection.contexts.push(DiagnosticContext {
            message: message.into(),
            level,
        });
        self
    }

    fn add_message(&mut self, loc: L, base: &DiagnosticBase, formatter: Formatter) {
        let location = self.convert(loc);
        self.diagnostic.collections.push(DiagnosticCollection {
            kind: base.kind,
            level: base.level,
            formatter,
            messages: vec![DiagnosticMessage {
                location,
                suggestions: Vec::new(),
            }],
            contexts: Vec::new(),
        });
    }

    /// Convert a location, collecting any context collections the converter
    /// produces ahead of the collection being built.
    fn convert(&mut self, loc: L) -> DiagnosticLocation {
        let mut context_collections = Vec::new();
        let location = self.emitter.converter.convert_loc(
            loc,
            &mut |context_loc: DiagnosticLocation, context_base: &DiagnosticBase| {
                context_collections.push(DiagnosticCollection {
                    kind: context_base.kind,
                    level: context_base.level,
                    formatter: Formatter::new(context_base.format, Vec::new()),
                    messages: vec![DiagnosticMessage {
                        location: context_loc,
                        suggestions: Vec::new(),
                    }],
                    contexts: Vec::new(),
                });
            },
        );
        self.diagnostic.collections.append(&mut context_collections);
        location
    }
}

impl<L> Drop for DiagnosticBuilder<'_, '_, L> {
    fn drop(&mut self) {
        if !self.emitted && !std::thread::panicking() {
            debug_assert!(false, "diagnostic builder dropped without emit()");
        }
    }
}
