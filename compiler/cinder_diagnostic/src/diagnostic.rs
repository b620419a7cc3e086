//! The diagnostic value model.
//!
//! A [`Diagnostic`] is a tree: collections of messages, each message at one
//! location with a list of annotated [`Suggestion`]s, and per-collection
//! footer [`DiagnosticContext`] lines. The model is consumer-agnostic; it
//! knows nothing about rendering.

use std::borrow::Cow;
use std::fmt;

use crate::format::Formatter;
use crate::kind::DiagnosticKind;
use crate::span::Span;

/// Severity of a diagnostic or suggestion.
///
/// Discriminant order is severity order: the numerically lower level is the
/// more severe one, which the renderer uses to break ties when spans
/// overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DiagnosticLevel {
    Error = 0,
    Warning,
    Note,
    Info,
}

impl DiagnosticLevel {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Note => "note",
            DiagnosticLevel::Info => "info",
        }
    }
}

/// A concrete position in a source file as rendered to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticLocation {
    pub filename: String,
    /// The full text of the source line, without its trailing newline.
    pub line: String,
    /// 1-based; 0 means unknown.
    pub line_number: u32,
    /// 1-based for display; converters producing span anchors use the raw
    /// column. 0 means unknown.
    pub column_number: u32,
    /// Byte length of the region the location covers.
    pub length: u32,
}

impl Default for DiagnosticLocation {
    fn default() -> Self {
        DiagnosticLocation {
            filename: String::new(),
            line: String::new(),
            line_number: 0,
            column_number: 0,
            length: 1,
        }
    }
}

impl DiagnosticLocation {
    /// Whether the locator line (`--> file:line:col`) should be printed.
    #[must_use]
    pub fn can_be_printed(&self) -> bool {
        !self.filename.trim().is_empty()
    }
}

impl fmt::Display for DiagnosticLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filename = self.filename.trim();
        if filename.is_empty() {
            return Ok(());
        }
        f.write_str(filename)?;
        if self.line_number > 0 {
            write!(f, ":{}", self.line_number)?;
            if self.column_number > 0 {
                write!(f, ":{}", self.column_number)?;
            }
        }
        Ok(())
    }
}

/// How a suggestion patches the source, if at all.
///
/// The discriminant order feeds the renderer's sort: higher values render
/// first among suggestions sharing a start column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DiagnosticPatchKind {
    #[default]
    None = 0,
    Remove,
    Insert,
}

/// A secondary annotation on a message: a span, a level, optional patch
/// content, and the text shown in the message column.
#[derive(Clone, Debug)]
pub struct Suggestion {
    pub message: Cow<'static, str>,
    pub span: Span,
    pub level: DiagnosticLevel,
    pub patch_kind: DiagnosticPatchKind,
    pub patch_content: Cow<'static, str>,
}

impl Suggestion {
    #[must_use]
    pub fn new(level: DiagnosticLevel, message: Cow<'static, str>, span: Span) -> Suggestion {
        Suggestion {
            message,
            span,
            level,
            patch_kind: DiagnosticPatchKind::None,
            patch_content: Cow::Borrowed(""),
        }
    }
}

/// A footer line printed after a collection's annotated excerpt.
#[derive(Clone, Debug)]
pub struct DiagnosticContext {
    pub message: Cow<'static, str>,
    pub level: DiagnosticLevel,
}

/// One annotated location within a collection.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticMessage {
    pub location: DiagnosticLocation,
    pub suggestions: Vec<Suggestion>,
}

/// A headed group of messages sharing one kind, level, and format string.
#[derive(Clone, Debug)]
pub struct DiagnosticCollection {
    pub kind: DiagnosticKind,
    pub level: DiagnosticLevel,
    pub formatter: Formatter,
    pub messages: Vec<DiagnosticMessage>,
    pub contexts: Vec<DiagnosticContext>,
}

/// A complete diagnostic, surfaced once to a consumer.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub collections: Vec<DiagnosticCollection>,
}

impl Default for Diagnostic {
    fn default() -> Self {
        Diagnostic {
            level: DiagnosticLevel::Error,
            collections: Vec::new(),
        }
    }
}

impl Diagnostic {
    #[must_use]
    pub fn new(level: DiagnosticLevel) -> Diagnostic {
        Diagnostic {
            level,
            collections: Vec::new(),
        }
    }

    /// Start a collection on this diagnostic directly, without an emitter.
    ///
    /// This is the low-level construction path; compiler code goes through
    /// `DiagnosticEmitter`, which resolves locations through a converter.
    #[must_use]
    pub fn build(
        &mut self,
        kind: DiagnosticKind,
        location: DiagnosticLocation,
        level: DiagnosticLevel,
        formatter: Formatter,
    ) -> DiagnosticCollectionBuilder<'_> {
        DiagnosticCollectionBuilder {
            diagnostic: self,
            collection: DiagnosticCollection {
                kind,
                level,
                formatter,
                messages: vec![DiagnosticMessage {
                    location,
                    suggestions: Vec::new(),
                }],
                contexts: Vec::new(),
            },
        }
    }
}

/// Builder for a single collection, appended on [`emit`](Self::emit).
#[must_use]
pub struct DiagnosticCollectionBuilder<'d> {
    diagnostic: &'d mut Diagnostic,
    collection: DiagnosticCollection,
}

impl<'d> DiagnosticCollectionBuilder<'d> {
    pub fn add_suggestion(
        mut self,
        level: DiagnosticLevel,
        message: impl Into<Cow<'static, str>>,
        span: Span,
    ) -> Self {
        let message = message.into();
        self.current_message()
            .suggestions
            .push(Suggestion::new(level, message, span));
        self
    }

    pub fn add_error(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Error, message, span)
    }

    pub fn add_warning(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Warning, message, span)
    }

    pub fn add_note(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Note, message, span)
    }

    pub fn add_info(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_suggestion(DiagnosticLevel::Info, message, span)
    }

    pub fn add_patch(
        mut self,
        message: impl Into<Cow<'static, str>>,
        patch_content: impl Into<Cow<'static, str>>,
        kind: DiagnosticPatchKind,
        span: Span,
    ) -> Self {
        let level = if kind == DiagnosticPatchKind::Insert {
            DiagnosticLevel::Info
        } else {
            DiagnosticLevel::Error
        };
        let suggestion = Suggestion {
            message: message.into(),
            span,
            level,
            patch_kind: kind,
            patch_content: patch_content.into(),
        };
        self.current_message().suggestions.push(suggestion);
        self
    }

    /// Insert patch: the span is sized by the inserted text.
    pub fn add_insert_patch(
        self,
        message: impl Into<Cow<'static, str>>,
        insert_text: impl Into<Cow<'static, str>>,
        pos: u32,
    ) -> Self {
        let insert_text = insert_text.into();
        let size = u32::try_from(insert_text.len()).unwrap_or(u32::MAX);
        self.add_patch(
            message,
            insert_text,
            DiagnosticPatchKind::Insert,
            Span::from_size(pos, size),
        )
    }

    pub fn add_remove_patch(self, message: impl Into<Cow<'static, str>>, span: Span) -> Self {
        self.add_patch(message, "", DiagnosticPatchKind::Remove, span)
    }

    /// Start a sibling message at a new location within this collection.
    pub fn next_child_section(mut self, location: DiagnosticLocation) -> Self {
        self.collection.messages.push(DiagnosticMessage {
            location,
            suggestions: Vec::new(),
        });
        self
    }

    pub fn add_context(
        mut self,
        level: DiagnosticLevel,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.collection.contexts.push(DiagnosticContext {
            message: message.into(),
            level,
        });
        self
    }

    /// Append the collection to the diagnostic.
    pub fn emit(self) {
        self.diagnostic.collections.push(self.collection);
    }

    fn current_message(&mut self) -> &mut DiagnosticMessage {
        self.collection
            .messages
            .last_mut()
            .expect("collection always holds at least one message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag_args;

    #[test]
    fn build_appends_collections_in_order() {
        let mut diag = Diagnostic::new(DiagnosticLevel::Error);
        diag.build(
            DiagnosticKind::TestDiagnostic,
            DiagnosticLocation::default(),
            DiagnosticLevel::Error,
            Formatter::new("first", diag_args![]),
        )
        .emit();
        diag.build(
            DiagnosticKind::TestDiagnosticNote,
            DiagnosticLocation::default(),
            DiagnosticLevel::Note,
            Formatter::new("second", diag_args![]),
        )
        .emit();

        assert_eq!(diag.collections.len(), 2);
        assert_eq!(diag.collections[0].formatter.format(), "first");
        assert_eq!(diag.collections[1].level, DiagnosticLevel::Note);
    }

    #[test]
    fn suggestions_attach_to_latest_message() {
        let mut diag = Diagnostic::new(DiagnosticLevel::Error);
        diag.build(
            DiagnosticKind::TestDiagnostic,
            DiagnosticLocation::default(),
            DiagnosticLevel::Error,
            Formatter::new("m", diag_args![]),
        )
        .add_note("first message note", Span::new(0, 4))
        .next_child_section(DiagnosticLocation::default())
        .add_error("second message error", Span::new(2, 3))
        .emit();

        let collection = &diag.collections[0];
        assert_eq!(collection.messages.len(), 2);
        assert_eq!(collection.messages[0].suggestions.len(), 1);
        assert_eq!(collection.messages[1].suggestions.len(), 1);
        assert_eq!(
            collection.messages[1].suggestions[0].level,
            DiagnosticLevel::Error
        );
    }

    #[test]
    fn insert_patch_span_matches_content_length() {
        let mut diag = Diagnostic::new(DiagnosticLevel::Error);
        diag.build(
            DiagnosticKind::TestDiagnostic,
            DiagnosticLocation::default(),
            DiagnosticLevel::Error,
            Formatter::new("m", diag_args![]),
        )
        .add_insert_patch("insert it", "abc", 7)
        .emit();

        let suggestion = &diag.collections[0].messages[0].suggestions[0];
        assert_eq!(suggestion.patch_kind, DiagnosticPatchKind::Insert);
        assert_eq!(suggestion.level, DiagnosticLevel::Info);
        assert_eq!(suggestion.span.start(), 7);
        assert_eq!(suggestion.span.size(), 3);
    }

    #[test]
    fn level_order_is_severity_order() {
        assert!(DiagnosticLevel::Error < DiagnosticLevel::Warning);
        assert!(DiagnosticLevel::Warning < DiagnosticLevel::Note);
        assert!(DiagnosticLevel::Note < DiagnosticLevel::Info);
    }

    #[test]
    fn location_display() {
        let loc = DiagnosticLocation {
            filename: "std/std.cn".to_string(),
            line_number: 3,
            column_number: 7,
            ..DiagnosticLocation::default()
        };
        assert_eq!(loc.to_string(), "std/std.cn:3:7");

        let no_col = DiagnosticLocation {
            filename: "std/std.cn".to_string(),
            line_number: 3,
            column_number: 0,
            ..DiagnosticLocation::default()
        };
        assert_eq!(no_col.to_string(), "std/std.cn:3");

        assert_eq!(DiagnosticLocation::default().to_string(), "");
        assert!(!DiagnosticLocation::default().can_be_printed());
    }
}
