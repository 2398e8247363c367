//! Cache-Control style directive lookups over raw, multi-valued header text.
//!
//! Values are scanned as bytes, never pre-split or validated as UTF-8. A
//! malformed directive is simply not found. When the same directive appears
//! more than once, the first well-formed occurrence wins and later ones are
//! ignored (no merging, no summing). That is intentional, not a bug.

use std::time::Duration;

use http::HeaderValue;

/// Returns true when any of `values` carries the directive `name`
/// (case-insensitive). A directive with an argument, such as
/// `no-cache="Set-Cookie"`, still matches by name.
pub fn find_directive<'a, I>(values: I, name: &str) -> bool
where
    I: IntoIterator<Item = &'a HeaderValue>,
{
    values
        .into_iter()
        .flat_map(|value| RawDirectives::new(value.as_bytes()))
        .any(|directive| directive.is(name))
}

/// Looks up `name=<digits>` across all of `values` and returns the first
/// well-formed occurrence as a number of seconds.
///
/// Only ASCII digits directly after the `=` are read; no sign, no decimal
/// point, no whitespace or quotes. An occurrence without `=` or without
/// digits counts as absent and the scan moves on. Values too large for a
/// `u64` saturate instead of failing.
pub fn find_directive_value<'a, I>(values: I, name: &str) -> Option<Duration>
where
    I: IntoIterator<Item = &'a HeaderValue>,
{
    values
        .into_iter()
        .flat_map(|value| RawDirectives::new(value.as_bytes()))
        .filter(|directive| directive.is(name))
        .find_map(|directive| directive.seconds())
        .map(Duration::from_secs)
}

/// Parses a run of leading ASCII digits, saturating at `u64::MAX`.
pub(crate) fn leading_seconds(bytes: &[u8]) -> Option<u64> {
    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    let seconds = bytes[..len].iter().fold(0u64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
    });
    Some(seconds)
}

/// One comma-separated entry: the token name and whatever follows it.
#[derive(Debug, Clone, Copy)]
struct RawDirective<'a> {
    name: &'a [u8],
    argument: &'a [u8],
}

impl RawDirective<'_> {
    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }

    fn seconds(&self) -> Option<u64> {
        let digits = self.argument.strip_prefix(b"=")?;
        leading_seconds(digits)
    }
}

struct RawDirectives<'a> {
    rest: &'a [u8],
}

impl<'a> RawDirectives<'a> {
    fn new(value: &'a [u8]) -> Self {
        Self { rest: value }
    }
}

impl<'a> Iterator for RawDirectives<'a> {
    type Item = RawDirective<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = self.rest.iter().position(|b| !is_separator(*b))?;
            let rest = &self.rest[start..];
            let (item, tail) = rest.split_at(entry_len(rest));
            self.rest = tail;

            let name_len = item
                .iter()
                .position(|b| !is_token_char(*b))
                .unwrap_or(item.len());
            if name_len == 0 {
                // no token before the argument, e.g. `=60` or `"x"`
                continue;
            }
            return Some(RawDirective {
                name: &item[..name_len],
                argument: &item[name_len..],
            });
        }
    }
}

/// Length of the entry up to the next comma that is not inside a quoted string.
fn entry_len(bytes: &[u8]) -> usize {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, byte) in bytes.iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_quotes => escaped = true,
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => return idx,
            _ => {}
        }
    }
    bytes.len()
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b',' | b' ' | b'\t')
}

// RFC 9110 tchar
fn is_token_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
