use std::time::Duration;

use http::header::AGE;
use http::{HeaderMap, Method, StatusCode};

use crate::context::PolicyContext;
use crate::date::HttpDate;
use crate::directive::leading_seconds;

/// Headers of a stored response plus the moment they were stored.
///
/// The body lives with the storage layer; freshness only needs this much.
#[derive(Clone, Debug)]
pub struct StoredEntry {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub stored_at: HttpDate,
}

impl StoredEntry {
    pub fn new(status: StatusCode, headers: HeaderMap, stored_at: HttpDate) -> Self {
        Self {
            status,
            headers,
            stored_at,
        }
    }

    /// `Age` header value carried by the stored response, digits only.
    pub fn upstream_age(&self) -> Duration {
        self.headers
            .get(AGE)
            .and_then(|value| leading_seconds(value.as_bytes().trim_ascii_start()))
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO)
    }

    /// Time spent in this cache plus the upstream `Age`. A clock that went
    /// backwards counts as zero residency.
    pub fn age_at(&self, now: HttpDate) -> Duration {
        let resident = (now - self.stored_at).to_std().unwrap_or(Duration::ZERO);
        resident.saturating_add(self.upstream_age())
    }

    /// Freshness input for serving this entry to a request with `request_headers`.
    pub fn freshness_context(
        &self,
        method: Method,
        request_headers: &HeaderMap,
        now: HttpDate,
    ) -> PolicyContext {
        PolicyContext::builder(method, now)
            .request_headers(request_headers)
            .response(self.status, &self.headers)
            .age(self.age_at(now))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::StoredEntry;
    use chrono::{TimeDelta, TimeZone, Utc};
    use http::{HeaderMap, HeaderValue, Method, StatusCode, header::AGE};
    use std::time::Duration;

    fn stored_at() -> super::HttpDate {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn entry_with_age(age: Option<&str>) -> StoredEntry {
        let mut headers = HeaderMap::new();
        if let Some(age) = age {
            headers.insert(AGE, HeaderValue::from_str(age).expect("valid value"));
        }
        StoredEntry::new(StatusCode::OK, headers, stored_at())
    }

    #[test]
    fn age_at_adds_residency_and_upstream_age() {
        let entry = entry_with_age(Some("40"));
        let now = stored_at() + TimeDelta::seconds(20);
        assert_eq!(entry.age_at(now), Duration::from_secs(60));
    }

    #[test]
    fn age_at_ignores_malformed_age_header() {
        let entry = entry_with_age(Some("soon"));
        let now = stored_at() + TimeDelta::seconds(5);
        assert_eq!(entry.age_at(now), Duration::from_secs(5));
    }

    #[test]
    fn age_at_clamps_clock_skew() {
        let entry = entry_with_age(None);
        let now = stored_at() - TimeDelta::seconds(30);
        assert_eq!(entry.age_at(now), Duration::ZERO);
    }

    #[test]
    fn freshness_context_carries_stored_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("cache-control", HeaderValue::from_static("public, max-age=10"));
        let entry = StoredEntry::new(StatusCode::OK, headers, stored_at());
        let now = stored_at() + TimeDelta::seconds(3);
        let ctx = entry.freshness_context(Method::GET, &HeaderMap::new(), now);
        assert_eq!(ctx.age(), Duration::from_secs(3));
        assert_eq!(ctx.response().max_age, Some(Duration::from_secs(10)));
        assert_eq!(ctx.response_time(), now);
    }
}
