//! Append-only value stores indexed by typed handles.
//!
//! [`ValueStore`] is the plain indexed store; [`StringStore`] adds an
//! interning map so equal byte strings share a handle. The lexer is the
//! only writer during a compilation; everything downstream reads through
//! handles that stay valid for the lifetime of the store.

use std::fmt;
use std::marker::PhantomData;

use num_bigint::BigInt;
use rustc_hash::FxHashMap;

use crate::ids::{FloatId, IdentifierId, IntId, RealId, StringId, StringLiteralId};

/// A real-number literal value: `mantissa * base ^ exponent` where the base
/// is 10 for decimal literals and 2 for hex/binary/octal ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Real {
    pub mantissa: BigInt,
    pub exponent: BigInt,
    pub is_decimal: bool,
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}*{}^{}",
            self.mantissa,
            if self.is_decimal { 10 } else { 2 },
            self.exponent
        )
    }
}

/// Internal glue letting [`ValueStore`] mint and consume typed handles.
pub trait StoreId: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! impl_store_id {
    ($($id:ty),+) => {
        $(impl StoreId for $id {
            #[inline]
            fn from_index(index: usize) -> Self {
                Self::new(index)
            }

            #[inline]
            fn index(self) -> usize {
                self.index()
            }
        })+
    };
}

impl_store_id!(IntId, RealId, FloatId, StringId);

/// Append-only store of `T` values indexed by handle type `I`.
///
/// `add` is total; `get` is partial and panics on an invalid or
/// out-of-range handle.
#[derive(Clone, Debug)]
pub struct ValueStore<I, T> {
    values: Vec<T>,
    _marker: PhantomData<I>,
}

impl<I, T> Default for ValueStore<I, T> {
    fn default() -> Self {
        ValueStore {
            values: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl<I: StoreId, T> ValueStore<I, T> {
    #[must_use]
    pub fn new() -> Self {
        ValueStore {
            values: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Append a value, returning its new handle. O(1).
    pub fn add(&mut self, value: T) -> I {
        let id = I::from_index(self.values.len());
        self.values.push(value);
        id
    }

    /// Look up a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or past the end of the store.
    #[must_use]
    pub fn get(&self, id: I) -> &T {
        &self.values[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Interning store of byte strings.
///
/// Adding bytes that are already present returns the existing handle, so a
/// handle comparison is an equality comparison. Backs both the identifier
/// and the string-literal handle spaces.
#[derive(Clone, Debug, Default)]
pub struct StringStore {
    values: Vec<Box<[u8]>>,
    map: FxHashMap<Box<[u8]>, StringId>,
}

impl StringStore {
    #[must_use]
    pub fn new() -> Self {
        StringStore::default()
    }

    /// Intern a byte string, returning the existing handle for duplicates.
    pub fn add(&mut self, value: &[u8]) -> StringId {
        if let Some(&id) = self.map.get(value) {
            return id;
        }
        let id = StringId::new(self.values.len());
        let boxed: Box<[u8]> = value.into();
        self.values.push(boxed.clone());
        self.map.insert(boxed, id);
        id
    }

    /// Look up a handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid or past the end of the store.
    #[must_use]
    pub fn get(&self, id: StringId) -> &[u8] {
        &self.values[id.index()]
    }

    /// Find the handle for `value` without interning it.
    #[must_use]
    pub fn find(&self, value: &[u8]) -> StringId {
        self.map.get(value).copied().unwrap_or(StringId::INVALID)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
        self.map.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.map.clear();
    }
}

/// The value stores shared between the lexer and downstream passes.
///
/// Identifiers and string literals are two typed views over the same
/// interning store: inserting the same bytes through either view returns
/// the same numeric handle.
#[derive(Debug, Default)]
pub struct SharedValueStores {
    ints: ValueStore<IntId, BigInt>,
    reals: ValueStore<RealId, Real>,
    floats: ValueStore<FloatId, f64>,
    strings: StringStore,
}

impl SharedValueStores {
    #[must_use]
    pub fn new() -> Self {
        SharedValueStores::default()
    }

    pub fn ints(&self) -> &ValueStore<IntId, BigInt> {
        &self.ints
    }

    pub fn ints_mut(&mut self) -> &mut ValueStore<IntId, BigInt> {
        &mut self.ints
    }

    pub fn reals(&self) -> &ValueStore<RealId, Real> {
        &self.reals
    }

    pub fn reals_mut(&mut self) -> &mut ValueStore<RealId, Real> {
        &mut self.reals
    }

    pub fn floats(&self) -> &ValueStore<FloatId, f64> {
        &self.floats
    }

    pub fn floats_mut(&mut self) -> &mut ValueStore<FloatId, f64> {
        &mut self.floats
    }

    pub fn strings(&self) -> &StringStore {
        &self.strings
    }

    pub fn strings_mut(&mut self) -> &mut StringStore {
        &mut self.strings
    }

    /// Intern an identifier.
    pub fn add_identifier(&mut self, value: &[u8]) -> IdentifierId {
        IdentifierId::from_raw(self.strings.add(value).as_raw())
    }

    /// The bytes of an interned identifier.
    #[must_use]
    pub fn identifier(&self, id: IdentifierId) -> &[u8] {
        self.strings.get(StringId::from_raw(id.as_raw()))
    }

    /// Intern a computed string-literal value.
    pub fn add_string_literal(&mut self, value: &[u8]) -> StringLiteralId {
        StringLiteralId::from_raw(self.strings.add(value).as_raw())
    }

    /// The bytes of an interned string-literal value.
    #[must_use]
    pub fn string_literal(&self, id: StringLiteralId) -> &[u8] {
        self.strings.get(StringId::from_raw(id.as_raw()))
    }
}
