//! Deferred message formatting.
//!
//! Diagnostic bases carry `'static` format strings; arguments are rendered
//! to strings when the diagnostic is built and spliced in when a consumer
//! asks for the final text. `{}` consumes arguments left to right, `{N}`
//! picks by position, and `{{` / `}}` escape literal braces.

use std::borrow::Cow;

/// A format string paired with pre-rendered arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Formatter {
    format: Cow<'static, str>,
    args: Vec<String>,
}

impl Formatter {
    #[must_use]
    pub fn new(format: impl Into<Cow<'static, str>>, args: Vec<String>) -> Formatter {
        Formatter {
            format: format.into(),
            args,
        }
    }

    /// Splice the arguments into the format string.
    ///
    /// Placeholders without a matching argument render as empty text rather
    /// than failing; a diagnostic with a malformed format string is still
    /// worth showing.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = String::with_capacity(self.format.len());
        let mut next_arg = 0usize;
        let mut chars = self.format.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut index = String::new();
                    while let Some(&d) = chars.peek() {
                        if d == '}' {
                            break;
                        }
                        index.push(d);
                        chars.next();
                    }
                    chars.next();

                    let arg = if index.is_empty() {
                        let arg = self.args.get(next_arg);
                        next_arg += 1;
                        arg
                    } else {
                        index.parse::<usize>().ok().and_then(|i| self.args.get(i))
                    };
                    if let Some(arg) = arg {
                        out.push_str(arg);
                    }
                }
                _ => out.push(c),
            }
        }

        out
    }
}

/// Render arguments for [`Formatter::new`], e.g. `diag_args![c, radix]`.
#[macro_export]
macro_rules! diag_args {
    () => {
        ::std::vec::Vec::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$(::std::string::ToString::to_string(&$arg)),+]
    };
}
