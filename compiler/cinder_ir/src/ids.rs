//! Typed 32-bit handles into value stores and buffers.
//!
//! A handle is a signed 32-bit index; `-1` is the invalid sentinel. A handle
//! is valid when it is non-negative and less than the size of the store it
//! indexes — the store checks the upper bound, the type checks everything
//! else. Handle kinds share a representation but are nominally distinct:
//! an [`IntId`] never flows into an API expecting a [`RealId`].

use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// The invalid sentinel (`-1`).
            pub const INVALID: $name = $name(-1);

            /// Wrap a non-negative index.
            ///
            /// # Panics
            ///
            /// Panics if `index` does not fit in an `i32`.
            #[inline]
            #[must_use]
            pub fn new(index: usize) -> Self {
                let raw = i32::try_from(index).expect("handle index overflow");
                $name(raw)
            }

            /// Construct from a raw value; `-1` yields the invalid handle.
            #[inline]
            #[must_use]
            pub const fn from_raw(raw: i32) -> Self {
                $name(raw)
            }

            /// The raw signed value, `-1` when invalid.
            #[inline]
            #[must_use]
            pub const fn as_raw(self) -> i32 {
                self.0
            }

            /// Whether the handle is non-negative.
            #[inline]
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }

            /// The handle as a vector index.
            ///
            /// # Panics
            ///
            /// Panics if the handle is invalid.
            #[inline]
            #[must_use]
            pub fn index(self) -> usize {
                assert!(self.0 >= 0, concat!("invalid ", $label, " handle"));
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, "{}"), self.0)
                } else {
                    write!(f, concat!($label, "<invalid>"))
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "<invalid>")
                }
            }
        }
    };
}

define_id! {
    /// Handle into the arbitrary-precision integer store.
    IntId, "int"
}

define_id! {
    /// Handle into the real-number store (mantissa/exponent pairs).
    RealId, "real"
}

define_id! {
    /// Handle into the float store.
    FloatId, "float"
}

define_id! {
    /// Handle into the interning byte-string store.
    StringId, "string"
}

define_id! {
    /// Identifier view over the string store.
    ///
    /// Shares the numeric handle space with [`StringLiteralId`]: interning
    /// the same bytes through either view yields the same raw value.
    IdentifierId, "identifier"
}

define_id! {
    /// String-literal view over the string store.
    StringLiteralId, "string_literal"
}

define_id! {
    /// Index of a token within a token buffer.
    TokenIndex, "token"
}

define_id! {
    /// Index of a source line within a token buffer.
    LineIndex, "line"
}

impl LineIndex {
    /// The following line.
    #[inline]
    #[must_use]
    pub fn next(self) -> LineIndex {
        LineIndex::from_raw(self.as_raw() + 1)
    }

    /// The preceding line.
    ///
    /// # Panics
    ///
    /// Panics on the first line.
    #[inline]
    #[must_use]
    pub fn prev(self) -> LineIndex {
        assert!(self.as_raw() > 0, "line index underflow");
        LineIndex::from_raw(self.as_raw() - 1)
    }
}
