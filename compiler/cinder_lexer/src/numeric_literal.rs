//! Numeric literal recognition, validation, and value computation.
//!
//! Recognition is permissive: starting from a digit it consumes digits,
//! letters, and underscores, one radix point followed by an alphanumeric,
//! the first lowercase letter after the radix point as a potential
//! exponent marker, and a single sign right after that marker. Validation
//! happens later in [`NumericLiteral::compute_value`], which checks the
//! radix alphabet, digit separator placement, and exponent spelling, and
//! produces an arbitrary-precision value.
//!
//! Diagnostic locations are byte offsets into the slice given to
//! [`NumericLiteral::lex`].

use std::fmt;

use cinder_diagnostic::{diag_args, diagnostic, Span};
use num_bigint::BigInt;

use crate::char_set;
use crate::char_set::ByteSet;
use crate::LexerDiagnosticEmitter;

/// The base of a numeric literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum Radix {
    Binary = 2,
    Octal = 8,
    Decimal = 10,
    Hexadecimal = 16,
}

impl Radix {
    #[must_use]
    pub fn value(self) -> u32 {
        self as u32
    }

    fn digit_set(self) -> &'static ByteSet {
        match self {
            Radix::Binary => &char_set::BINARY_DIGITS,
            Radix::Octal => &char_set::OCTAL_DIGITS,
            Radix::Decimal => &char_set::DECIMAL_DIGITS,
            Radix::Hexadecimal => &char_set::HEXADECIMAL_DIGITS,
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Radix::Binary => "binary",
            Radix::Octal => "octal",
            Radix::Decimal => "decimal",
            Radix::Hexadecimal => "hexadecimal",
        })
    }
}

/// The computed value of a numeric literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumericValue {
    /// An integer literal's cleaned mantissa.
    Int(BigInt),
    /// A real literal: `mantissa * base ^ exponent`, base 10 for decimal
    /// and 2 for the other radixes.
    Real {
        radix: Radix,
        mantissa: BigInt,
        exponent: BigInt,
    },
    /// Validation failed badly enough that no value makes sense.
    UnrecoverableError,
}

/// A recognized (not yet validated) numeric literal.
#[derive(Clone, Copy, Debug)]
pub struct NumericLiteral<'a> {
    source: &'a [u8],
    /// Offset of the radix point, or `source.len()` when absent.
    radix_point: usize,
    /// Offset of the exponent marker, or `source.len()` when absent.
    exponent: usize,
}

impl<'a> NumericLiteral<'a> {
    /// Recognize a numeric literal at the start of `input`.
    ///
    /// Returns `None` unless `input` begins with a decimal digit. The
    /// recognized extent is independent of validity; `compute_value`
    /// reports the problems.
    #[must_use]
    pub fn lex(input: &'a [u8]) -> Option<NumericLiteral<'a>> {
        if input.is_empty() || !char_set::is_digit(input[0]) {
            return None;
        }

        let mut seen_plus_minus = false;
        let mut seen_radix_point = false;
        let mut seen_potential_exponent = false;
        let mut radix_point = None;
        let mut exponent = None;

        let n = input.len();
        let mut i = 1;
        while i < n {
            let c = input[i];
            if char_set::is_alnum(c) || c == b'_' {
                if char_set::is_lower(c) && seen_radix_point && !seen_potential_exponent {
                    // 123.e2
                    //     ^
                    exponent = Some(i);
                    seen_potential_exponent = true;
                }
                i += 1;
                continue;
            }

            if c == b'.' && i + 1 != n && char_set::is_alnum(input[i + 1]) {
                if seen_radix_point {
                    break;
                }
                seen_radix_point = true;
                radix_point = Some(i);
                i += 1;
                continue;
            }

            if (c == b'-' || c == b'+')
                && seen_potential_exponent
                && exponent == Some(i - 1)
                && i + 1 != n
                && char_set::is_alnum(input[i + 1])
            {
                debug_assert!(!seen_plus_minus, "should only consume one + or -");
                seen_plus_minus = true;
                i += 1;
                continue;
            }

            break;
        }

        Some(NumericLiteral {
            source: &input[..i],
            radix_point: radix_point.unwrap_or(i),
            exponent: exponent.unwrap_or(i),
        })
    }

    /// The exact bytes of the literal.
    #[must_use]
    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Validate the literal and compute its value.
    ///
    /// Diagnostics go through `emitter`; non-fatal problems (misplaced
    /// separators, wrong exponent letter) still yield a value so
    /// downstream passes can continue.
    #[must_use]
    pub fn compute_value(&self, emitter: &mut LexerDiagnosticEmitter<'_>) -> NumericValue {
        let mut parser = Parser::new(emitter, self);
        if !parser.check() {
            return NumericValue::UnrecoverableError;
        }

        if parser.is_integer() {
            return NumericValue::Int(parser.mantissa());
        }

        NumericValue::Real {
            radix: parser.radix,
            mantissa: parser.mantissa(),
            exponent: parser.exponent(),
        }
    }
}

/// Parse a digit string in `radix`, dropping separators and the radix
/// point first when the caller saw any.
fn parse_int(source: &[u8], radix: Radix, needs_cleaning: bool) -> BigInt {
    let parsed = if needs_cleaning {
        let cleaned: Vec<u8> = source
            .iter()
            .copied()
            .filter(|&c| c != b'_' && c != b'.')
            .collect();
        BigInt::parse_bytes(&cleaned, radix.value())
    } else {
        BigInt::parse_bytes(source, radix.value())
    };
    debug_assert!(parsed.is_some(), "digits were validated before parsing");
    parsed.unwrap_or_default()
}

struct CheckDigitSequenceResult {
    ok: bool,
    has_digit_separators: bool,
}

/// Splits the literal into parts and validates each one.
struct Parser<'p, 'e, 'a> {
    emitter: &'p mut LexerDiagnosticEmitter<'e>,
    literal: &'p NumericLiteral<'a>,
    radix: Radix,
    int_part: &'a [u8],
    int_start: usize,
    frac_part: &'a [u8],
    frac_start: usize,
    exp_part: &'a [u8],
    exp_start: usize,
    mantissa_needs_cleaning: bool,
    exponent_needs_cleaning: bool,
    exponent_is_negative: bool,
}

impl<'p, 'e, 'a> Parser<'p, 'e, 'a> {
    fn new(
        emitter: &'p mut LexerDiagnosticEmitter<'e>,
        literal: &'p NumericLiteral<'a>,
    ) -> Parser<'p, 'e, 'a> {
        let source = literal.source;
        let n = source.len();

        let mut int_part = &source[..literal.radix_point];
        let mut int_start = 0;
        let radix = if int_part.starts_with(b"0x") {
            Radix::Hexadecimal
        } else if int_part.starts_with(b"0b") {
            Radix::Binary
        } else if int_part.starts_with(b"0o") {
            Radix::Octal
        } else {
            Radix::Decimal
        };
        if radix != Radix::Decimal {
            int_part = &int_part[2..];
            int_start = 2;
        }

        let frac_start = (literal.radix_point + 1).min(n);
        let frac_end = literal.exponent.clamp(frac_start, n);
        let frac_part = &source[frac_start..frac_end];

        let mut exp_start = (literal.exponent + 1).min(n);
        let mut exp_part = &source[exp_start..];
        let mut exponent_is_negative = false;
        if exp_part.first() == Some(&b'+') {
            exp_part = &exp_part[1..];
            exp_start += 1;
        } else if exp_part.first() == Some(&b'-') {
            exponent_is_negative = true;
            exp_part = &exp_part[1..];
            exp_start += 1;
        }

        Parser {
            emitter,
            literal,
            radix,
            int_part,
            int_start,
            frac_part,
            frac_start,
            exp_part,
            exp_start,
            mantissa_needs_cleaning: false,
            exponent_needs_cleaning: false,
            exponent_is_negative,
        }
    }

    fn is_integer(&self) -> bool {
        self.literal.radix_point == self.literal.source.len()
    }

    fn check(&mut self) -> bool {
        self.check_leading_zeros()
            && self.check_integer_part()
            && self.check_fractional_part()
            && self.check_exponent_part()
    }

    fn mantissa(&self) -> BigInt {
        let end = if self.is_integer() {
            self.int_start + self.int_part.len()
        } else {
            self.frac_start + self.frac_part.len()
        };
        let digits = &self.literal.source[self.int_start..end];
        parse_int(digits, self.radix, self.mantissa_needs_cleaning)
    }

    fn exponent(&self) -> BigInt {
        let mut exponent = BigInt::default();
        if !self.exp_part.is_empty() {
            exponent = parse_int(self.exp_part, Radix::Decimal, self.exponent_needs_cleaning);
        }

        if self.exponent_is_negative {
            exponent = -exponent;
        }

        let mut excess_exponent = self.frac_part.len();
        if self.radix == Radix::Hexadecimal {
            excess_exponent *= 4;
        }

        exponent - BigInt::from(excess_exponent)
    }

    fn check_digit_sequence(
        &mut self,
        source: &[u8],
        part_start: usize,
        radix: Radix,
        allow_digit_separators: bool,
    ) -> CheckDigitSequenceResult {
        let valid_digits = radix.digit_set();

        let mut num_digit_separators = 0usize;
        for (i, &c) in source.iter().enumerate() {
            if valid_digits.contains(c) {
                continue;
            }

            if c == b'_' {
                if !allow_digit_separators
                    || i == 0
                    || i + 1 == source.len()
                    || source[i - 1] == b'_'
                {
                    diagnostic!(
                        InvalidDigitSeparator,
                        Error,
                        "Misplaced digit separator in numeric literal."
                    );
                    self.emitter
                        .build(part_start as u32, &InvalidDigitSeparator, diag_args![])
                        .add_info_suggestion(
                            "Try removing the misplaced digit separator.",
                            Span::new(i as u32, i as u32 + 1).to_relative(),
                        )
                        .emit();
                }
                num_digit_separators += 1;
                continue;
            }

            diagnostic!(
                InvalidDigit,
                Error,
                "Invalid digit '{0}' in {1} numeric literal"
            );
            self.emitter
                .build((part_start + i) as u32, &InvalidDigit, diag_args![c as char, radix])
                .add_info_suggestion(
                    "Try removing the invalid digit.",
                    Span::new(0, 1).to_relative(),
                )
                .add_info_suggestion(
                    "Try using a valid digit.",
                    Span::new(0, 1).to_relative(),
                )
                .emit();
            return CheckDigitSequenceResult {
                ok: false,
                has_digit_separators: false,
            };
        }

        if num_digit_separators == source.len() {
            diagnostic!(
                EmptyDigitSequence,
                Error,
                "Empty digit sequence in numeric literal."
            );
            self.emitter
                .emit(part_start as u32, &EmptyDigitSequence, diag_args![]);
            return CheckDigitSequenceResult {
                ok: false,
                has_digit_separators: false,
            };
        }

        if num_digit_separators != 0 {
            self.check_digit_separator_position(source, part_start, radix, num_digit_separators);
        }

        CheckDigitSequenceResult {
            ok: true,
            has_digit_separators: num_digit_separators != 0,
        }
    }

    /// Enforce the per-radix separator stride, counted from the right and
    /// including the separator itself. Binary literals group freely.
    fn check_digit_separator_position(
        &mut self,
        source: &[u8],
        part_start: usize,
        radix: Radix,
        num_digit_separators: usize,
    ) {
        debug_assert_eq!(
            source.iter().filter(|&&c| c == b'_').count(),
            num_digit_separators,
            "num_digit_separators is incorrect"
        );

        let stride = match radix {
            Radix::Binary => return,
            Radix::Octal => 3usize,
            Radix::Decimal => 4,
            Radix::Hexadecimal => 5,
        };

        diagnostic!(
            IrregularDigitSeparators,
            Error,
            "Digit separators in {} number should appear every {} characters from the right."
        );

        let mut remaining_separators = num_digit_separators;
        let mut pos = source.len();
        while pos >= stride {
            pos -= stride;
            if source[pos] != b'_' {
                self.emitter
                    .build(
                        part_start as u32,
                        &IrregularDigitSeparators,
                        diag_args![radix, stride - 1],
                    )
                    .add_error_suggestion(
                        "Misplaced digit separator.",
                        Span::new(pos as u32, pos as u32 + 1).to_relative(),
                    )
                    .emit();
                return;
            }
            remaining_separators -= 1;
        }

        if remaining_separators != 0 {
            self.emitter
                .build(
                    part_start as u32,
                    &IrregularDigitSeparators,
                    diag_args![radix, stride - 1],
                )
                .add_child_info_context("Remove the misplaced digit separator.")
                .emit();
        }
    }

    fn check_leading_zeros(&mut self) -> bool {
        if self.radix == Radix::Decimal && self.int_part.starts_with(b"0") && self.int_part != b"0"
        {
            diagnostic!(
                UnknownBaseSpecifier,
                Error,
                "Unknown base specifier in numeric literal."
            );
            self.emitter
                .build(self.int_start as u32, &UnknownBaseSpecifier, diag_args![])
                .add_info_suggestion(
                    "Try removing the unknown base specifier.",
                    Span::new(0, 1).to_relative(),
                )
                .emit();
            return false;
        }
        true
    }

    fn check_integer_part(&mut self) -> bool {
        let result = self.check_digit_sequence(self.int_part, self.int_start, self.radix, true);
        self.mantissa_needs_cleaning |= result.has_digit_separators;
        result.ok
    }

    fn check_fractional_part(&mut self) -> bool {
        if self.is_integer() {
            return true;
        }

        if self.radix == Radix::Binary {
            diagnostic!(
                BinaryRealLiteral,
                Error,
                "Binary real number literals are not supported."
            );
            let span_end = 1 + self.frac_part.len() as u32;
            self.emitter
                .build(self.literal.radix_point as u32, &BinaryRealLiteral, diag_args![])
                .patch_remove(
                    "Try removing the binary fractional part.",
                    Span::new(0, span_end).to_relative(),
                )
                .emit();
            return false;
        }

        if self.radix == Radix::Octal {
            diagnostic!(
                OctalRealLiteral,
                Error,
                "Octal real number literals are not supported."
            );
            let span_end = 1 + self.frac_part.len() as u32;
            self.emitter
                .build(self.literal.radix_point as u32, &OctalRealLiteral, diag_args![])
                .patch_remove(
                    "Try removing the octal fractional part.",
                    Span::new(0, span_end).to_relative(),
                )
                .emit();
            return false;
        }

        // The real mantissa concatenates the integer and fractional
        // digits, so the radix point always gets cleaned away.
        self.mantissa_needs_cleaning = true;
        self.check_digit_sequence(self.frac_part, self.frac_start, self.radix, false)
            .ok
    }

    fn check_exponent_part(&mut self) -> bool {
        if self.literal.exponent == self.literal.source.len() {
            return true;
        }

        let expected_exponent_char = if self.radix == Radix::Decimal {
            b'e'
        } else {
            b'p'
        };
        let got = self.literal.source[self.literal.exponent];
        if got != expected_exponent_char {
            diagnostic!(
                WrongRealLiteralExponent,
                Error,
                "Expected '{0}' to introduce exponent."
            );
            let suggestion = format!(
                "Change '{}' to '{}'",
                got as char, expected_exponent_char as char
            );
            self.emitter
                .build(
                    self.literal.exponent as u32,
                    &WrongRealLiteralExponent,
                    diag_args![expected_exponent_char as char],
                )
                .add_error_suggestion(suggestion, Span::new(0, 1).to_relative())
                .emit();
        }

        let result =
            self.check_digit_sequence(self.exp_part, self.exp_start, Radix::Decimal, true);
        self.exponent_needs_cleaning |= result.has_digit_separators;
        result.ok
    }
}
