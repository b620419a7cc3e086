//! Diagnostic engine for the Cinder compiler.
//!
//! The engine has three layers:
//!
//! - **Model** ([`diagnostic`], [`kind`], [`span`], [`format`]): a
//!   [`Diagnostic`] is a tree of message collections, each with a location,
//!   annotated suggestions (optionally carrying insert/remove patches), and
//!   footer contexts. Kinds form a stable taxonomy; messages format lazily
//!   through a [`Formatter`].
//! - **Emitter** ([`emitter`]): a builder API parameterized over a location
//!   type. A [`DiagnosticConverter`] maps locations to concrete
//!   file/line/column positions and may attach context collections while
//!   converting.
//! - **Consumers** ([`consumer`], [`sorting`]): the stream consumer lays out
//!   annotated source excerpts with colored spans, caret rows, and message
//!   columns; wrappers add error tracking and location-order sorting.
//!
//! Diagnostics are move-only values surfaced exactly once to a consumer;
//! buffering consumers may re-emit them later.

mod consumer;
mod diagnostic;
mod emitter;
mod format;
mod kind;
mod sorting;
mod span;

pub use consumer::{
    Color, ColorMode, DiagnosticConsumer, ErrorTrackingDiagnosticConsumer,
    StreamDiagnosticConsumer,
};
pub use diagnostic::{
    Diagnostic, DiagnosticCollection, DiagnosticContext, DiagnosticLevel, DiagnosticLocation,
    DiagnosticMessage, DiagnosticPatchKind, Suggestion,
};
pub use emitter::{DiagnosticBase, DiagnosticBuilder, DiagnosticConverter, DiagnosticEmitter};
pub use format::Formatter;
pub use kind::DiagnosticKind;
pub use sorting::SortingDiagnosticConsumer;
pub use span::Span;
