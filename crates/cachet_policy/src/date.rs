//! HTTP date parsing across the historical formats still seen on the wire.

use std::borrow::Cow;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// Canonical timestamp used for every date comparison in this crate.
pub type HttpDate = DateTime<Utc>;

#[derive(Debug, Clone, Copy)]
enum Zone {
    /// No offset in the text (or a literal `GMT`), read as UTC.
    Utc,
    /// Numeric offset such as `+0200`.
    Numeric,
}

#[derive(Debug, Clone, Copy)]
struct Layout {
    pattern: &'static str,
    zone: Zone,
    /// Four-digit year layouts must not swallow a two-digit year.
    full_year: bool,
}

const fn layout(pattern: &'static str, zone: Zone, full_year: bool) -> Layout {
    Layout {
        pattern,
        zone,
        full_year,
    }
}

/// Tried in order, first match wins.
const LAYOUTS: &[Layout] = &[
    // RFC 1123
    layout("%a, %d %b %Y %H:%M:%S GMT", Zone::Utc, true),
    layout("%a, %d %b %Y %H:%M:%S", Zone::Utc, true),
    layout("%d %b %Y %H:%M:%S GMT", Zone::Utc, true),
    layout("%d %b %Y %H:%M:%S", Zone::Utc, true),
    layout("%a, %d %b %y %H:%M:%S GMT", Zone::Utc, false),
    layout("%a, %d %b %y %H:%M:%S", Zone::Utc, false),
    layout("%d %b %y %H:%M:%S GMT", Zone::Utc, false),
    layout("%d %b %y %H:%M:%S", Zone::Utc, false),
    // RFC 850
    layout("%A, %d-%b-%y %H:%M:%S GMT", Zone::Utc, false),
    layout("%A, %d-%b-%y %H:%M:%S", Zone::Utc, false),
    // asctime
    layout("%a %b %d %H:%M:%S %Y", Zone::Utc, true),
    // RFC 5322 (the zone-less forms are already covered by RFC 1123 above)
    layout("%a, %d %b %Y %H:%M:%S %z", Zone::Numeric, true),
    layout("%d %b %Y %H:%M:%S %z", Zone::Numeric, true),
];

impl Layout {
    fn parse(&self, text: &str) -> Option<HttpDate> {
        let parsed = match self.zone {
            Zone::Utc => NaiveDateTime::parse_from_str(text, self.pattern)
                .ok()
                .map(|naive| Utc.from_utc_datetime(&naive)),
            Zone::Numeric => DateTime::parse_from_str(text, self.pattern)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
        }?;
        if self.full_year && parsed.year() < 1000 {
            return None;
        }
        Some(parsed)
    }
}

/// Parses an HTTP date. Returns `None` when no known layout matches, which
/// callers treat as "date unknown".
pub fn parse_http_date(text: &str) -> Option<HttpDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let text = upper_gmt(text);
    LAYOUTS.iter().find_map(|layout| layout.parse(&text))
}

/// Layouts spell the zone `GMT`; senders do not always.
fn upper_gmt(text: &str) -> Cow<'_, str> {
    match text.split_at_checked(text.len().saturating_sub(3)) {
        Some((head, zone)) if zone != "GMT" && zone.eq_ignore_ascii_case("GMT") => {
            Cow::Owned(format!("{head}GMT"))
        }
        _ => Cow::Borrowed(text),
    }
}

/// Parses the first value of a header, if it is readable text.
pub(crate) fn parse_header_date(value: Option<&http::HeaderValue>) -> Option<HttpDate> {
    value
        .and_then(|value| value.to_str().ok())
        .and_then(parse_http_date)
}

#[cfg(test)]
mod tests {
    use super::parse_http_date;
    use chrono::{TimeZone, Utc};

    fn reference() -> super::HttpDate {
        Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap()
    }

    #[test]
    fn parse_http_date_legacy_formats_agree() {
        for text in [
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-94 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
        ] {
            assert_eq!(parse_http_date(text), Some(reference()), "{text}");
        }
    }

    #[test]
    fn parse_http_date_rfc1123_variants() {
        for text in [
            "Sun, 06 Nov 1994 08:49:37",
            "06 Nov 1994 08:49:37 GMT",
            "6 Nov 1994 8:49:37",
            "Sun, 06 Nov 94 08:49:37 GMT",
            "06 Nov 94 08:49:37",
        ] {
            assert_eq!(parse_http_date(text), Some(reference()), "{text}");
        }
    }

    #[test]
    fn parse_http_date_numeric_zone() {
        assert_eq!(
            parse_http_date("Sun, 06 Nov 1994 10:49:37 +0200"),
            Some(reference())
        );
        assert_eq!(
            parse_http_date("06 Nov 1994 03:49:37 -0500"),
            Some(reference())
        );
    }

    #[test]
    fn parse_http_date_trims_surrounding_whitespace() {
        assert_eq!(
            parse_http_date("  Sun, 06 Nov 1994 08:49:37 GMT "),
            Some(reference())
        );
    }

    #[test]
    fn parse_http_date_ignores_case() {
        for text in [
            "sun, 06 nov 1994 08:49:37 gmt",
            "SUNDAY, 06-NOV-94 08:49:37 Gmt",
            "Sun, 06 Nov 1994 08:49:37 gMT",
        ] {
            assert_eq!(parse_http_date(text), Some(reference()), "{text}");
        }
    }

    #[test]
    fn parse_http_date_rejects_garbage() {
        for text in ["", "0", "-1", "yesterday", "Sun, 32 Nov 1994 08:49:37 GMT"] {
            assert_eq!(parse_http_date(text), None, "{text}");
        }
    }
}
