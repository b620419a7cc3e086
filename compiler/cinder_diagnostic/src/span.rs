//! Half-open byte ranges on a rendered source line.
//!
//! A span carries two extra pieces of rendering state:
//!
//! - `shift`: a cumulative column offset introduced by earlier inserted
//!   text, applied on top of `start` by every observer.
//! - `relative`: whether `start` is relative to the column of the message
//!   the span is attached to (resolved by the consumer before layout).

/// A half-open `[start, end)` range with a shift and a relative flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: u32,
    size: u32,
    shift: u32,
    relative: bool,
}

impl Span {
    /// Build from endpoints; an `end` before `start` yields an empty span.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Span {
        let size = if end > start { end - start } else { 0 };
        Span {
            start,
            size,
            shift: 0,
            relative: false,
        }
    }

    #[must_use]
    pub const fn from_size(start: u32, size: u32) -> Span {
        Span {
            start,
            size,
            shift: 0,
            relative: false,
        }
    }

    /// The shifted start column.
    #[must_use]
    pub const fn start(self) -> u32 {
        self.start + self.shift
    }

    /// One past the shifted last column.
    #[must_use]
    pub const fn end(self) -> u32 {
        self.start() + self.size
    }

    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.size == 0
    }

    /// Only the empty span anchored at column zero is considered invalid;
    /// an empty span elsewhere still marks a position.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        !(self.is_empty() && self.start() == 0)
    }

    /// Move the start by `offset`, clamping at zero. Folds the shift into
    /// the start and clears the relative flag.
    pub fn set_offset(&mut self, offset: i64) {
        let shifted = i64::from(self.start()) + offset;
        let new_start = u32::try_from(shifted.max(0)).unwrap_or(u32::MAX);
        *self = Span::from_size(new_start, self.size);
    }

    /// Whether `other` lies within `self` (inclusive bounds).
    #[must_use]
    pub const fn contains(self, other: Span) -> bool {
        self.start() <= other.start() && self.end() >= other.end()
    }

    /// Whether the two spans share no column.
    #[must_use]
    pub const fn outside_of(self, other: Span) -> bool {
        self.start() >= other.end() || self.end() <= other.start()
    }

    /// Split two possibly overlapping spans into non-overlapping pieces.
    ///
    /// Assumes `self` sorts before `other`. The second piece is the default
    /// (invalid) span when the inputs collapse into one range.
    #[must_use]
    pub fn split_if_intersect(self, other: Span) -> (Span, Span) {
        if self.is_empty() && self.start() == other.start() {
            return (other, Span::default());
        }

        if other.is_empty() && self.end() == other.end() {
            return (self, Span::default());
        }

        if self.outside_of(other) {
            return (self, other);
        }

        if self.contains(other) {
            return (self, Span::default());
        }

        if other.contains(self) {
            return (other, Span::default());
        }

        // |-----|
        //    |-----|
        if self.start() <= other.start() {
            return (self, Span::new(self.end(), other.end()));
        }

        //    |-----|
        // |-----|
        (
            Span::new(other.start(), self.start()),
            Span::new(self.start(), self.end()),
        )
    }

    #[must_use]
    pub const fn to_relative(self) -> Span {
        Span {
            relative: true,
            ..self
        }
    }

    #[must_use]
    pub const fn is_relative(self) -> bool {
        self.relative
    }

    #[must_use]
    pub const fn shift(self) -> u32 {
        self.shift
    }

    #[must_use]
    pub const fn with_shift(self, shift: u32) -> Span {
        Span { shift, ..self }
    }

    /// The span without its shift or relative flag.
    #[must_use]
    pub const fn raw(self) -> Span {
        Span {
            start: self.start,
            size: self.size,
            shift: 0,
            relative: false,
        }
    }
}
