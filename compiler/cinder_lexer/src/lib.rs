//! Lexical analysis for the Cinder compiler front end.
//!
//! The crate covers the literal engines and the buffers around them:
//!
//! - [`char_set`]: code-point classification over precomputed bit tables.
//! - [`SourceBuffer`]: an owned in-memory copy of one source file, loaded
//!   through an injected [`Vfs`] or from stdin.
//! - [`NumericLiteral`]: recognition, validation, and value computation for
//!   integer and real literals (radix prefixes, digit separators,
//!   exponents).
//! - [`StringLiteral`]: single-line, multi-line, raw (hash-delimited),
//!   format, and reflection (code-block) strings with escape processing
//!   and indent stripping.
//! - [`TokenBuffer`]: packed tokens and lines over a source buffer, with
//!   interning references into the shared value stores and diagnostic
//!   location converters.
//!
//! The lexer recovers from every error: it emits a diagnostic, synthesizes
//! an `Error` token spanning the offending bytes, and keeps going. Literal
//! value computation produces a best-effort value even when diagnostics
//! were emitted, so downstream passes can continue.
//!
//! Diagnostic locations are byte offsets (`u32`) whose meaning is defined
//! by the converter in use: offsets into the slice handed to a literal
//! recognizer, or offsets into the whole source for the token buffer's
//! converters.

pub mod char_set;
mod numeric_literal;
mod source_buffer;
mod string_literal;
mod token_buffer;

use cinder_diagnostic::DiagnosticEmitter;

/// Emitter over byte offsets, the location currency of the lexer.
pub type LexerDiagnosticEmitter<'a> = DiagnosticEmitter<'a, u32>;

pub use numeric_literal::{NumericLiteral, NumericValue, Radix};
pub use source_buffer::{FileStat, OsFs, SourceBuffer, Vfs, VfsFile};
pub use string_literal::StringLiteral;
pub use token_buffer::{
    LineInfo, SourceBufferConverter, TokenBuffer, TokenDiagnosticConverter, TokenInfo,
    TokenPayload,
};
