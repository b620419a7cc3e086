//! Shared data model for the Cinder compiler front end.
//!
//! This crate provides the pieces every phase of the compiler touches but
//! none of them owns exclusively:
//!
//! - **Typed handles** ([`ids`]): 32-bit indices into value stores. `-1` is
//!   the universal invalid sentinel; distinct handle kinds are distinct
//!   types that never convert into each other.
//! - **Value stores** ([`value_store`]): append-only indexed collections for
//!   integers, reals, floats, and interned byte strings. Identifiers and
//!   string literals are two typed views over the same interning store.
//! - **Token kinds** ([`token_kind`]): the token vocabulary with a
//!   per-variant attribute table (spelling, keyword/bracket classification,
//!   expected parse-tree size).
//!
//! Stores and handles outlive any token buffer that references them; stores
//! never shrink during a compilation.

mod ids;
mod token_kind;
mod value_store;

pub use ids::{
    FloatId, IdentifierId, IntId, LineIndex, RealId, StringId, StringLiteralId, TokenIndex,
};
pub use token_kind::{TokenKind, KEYWORD_TOKENS};
pub use value_store::{Real, SharedValueStores, StringStore, ValueStore};
