//! Per-exchange evaluation input.
//!
//! Every header the decisions look at is parsed exactly once, when the
//! context is built, into the immutable [`RequestFacts`] / [`ResponseFacts`]
//! snapshots. Decisions never touch raw header text again.

use std::time::Duration;

use http::header::{
    AUTHORIZATION, CACHE_CONTROL, DATE, EXPIRES, HeaderName, PRAGMA, SET_COOKIE, VARY,
};
use http::{HeaderMap, Method, StatusCode};

use crate::date::{HttpDate, parse_header_date};
use crate::directive::{find_directive, find_directive_value};

/// What the decisions need to know about the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFacts {
    pub has_authorization: bool,
    /// A non-empty `Cache-Control` header was sent.
    pub cache_control_present: bool,
    pub no_cache: bool,
    pub no_store: bool,
    pub max_age: Option<Duration>,
    pub max_stale: Option<Duration>,
    pub min_fresh: Option<Duration>,
    pub pragma_no_cache: bool,
}

impl RequestFacts {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cache_control = || headers.get_all(CACHE_CONTROL);
        Self {
            has_authorization: has_non_empty(headers, &AUTHORIZATION),
            cache_control_present: has_non_empty(headers, &CACHE_CONTROL),
            no_cache: find_directive(cache_control(), "no-cache"),
            no_store: find_directive(cache_control(), "no-store"),
            max_age: find_directive_value(cache_control(), "max-age"),
            max_stale: find_directive_value(cache_control(), "max-stale"),
            min_fresh: find_directive_value(cache_control(), "min-fresh"),
            pragma_no_cache: find_directive(headers.get_all(PRAGMA), "no-cache"),
        }
    }
}

/// What the decisions need to know about the response, or about the stored
/// response when checking freshness of a cached entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFacts {
    pub public: bool,
    pub private: bool,
    pub no_store: bool,
    pub no_cache: bool,
    pub must_revalidate: bool,
    pub shared_max_age: Option<Duration>,
    pub max_age: Option<Duration>,
    pub has_set_cookie: bool,
    /// `Vary` is exactly the single token `*`.
    pub vary_wildcard: bool,
    pub date: Option<HttpDate>,
    pub expires: Option<HttpDate>,
}

impl ResponseFacts {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let cache_control = || headers.get_all(CACHE_CONTROL);
        Self {
            public: find_directive(cache_control(), "public"),
            private: find_directive(cache_control(), "private"),
            no_store: find_directive(cache_control(), "no-store"),
            no_cache: find_directive(cache_control(), "no-cache"),
            must_revalidate: find_directive(cache_control(), "must-revalidate"),
            shared_max_age: find_directive_value(cache_control(), "s-maxage"),
            max_age: find_directive_value(cache_control(), "max-age"),
            has_set_cookie: has_non_empty(headers, &SET_COOKIE),
            vary_wildcard: is_vary_wildcard(headers),
            date: parse_header_date(headers.get(DATE)),
            expires: parse_header_date(headers.get(EXPIRES)),
        }
    }
}

fn has_non_empty(headers: &HeaderMap, name: &HeaderName) -> bool {
    headers
        .get_all(name)
        .iter()
        .any(|value| !value.as_bytes().trim_ascii().is_empty())
}

fn is_vary_wildcard(headers: &HeaderMap) -> bool {
    let mut values = headers.get_all(VARY).iter();
    match (values.next(), values.next()) {
        (Some(value), None) => value.as_bytes().trim_ascii() == b"*",
        _ => false,
    }
}

/// Input to the three cache decisions, assembled once per exchange.
///
/// `response_time` is the single "now" of the evaluation. For freshness
/// checks the response side holds the cached entry's stored headers and
/// `age` is how long the entry has been cached (including any upstream
/// `Age`), as computed by the caller.
#[derive(Debug, Clone)]
pub struct PolicyContext {
    method: Method,
    status: StatusCode,
    response_time: HttpDate,
    age: Duration,
    request: RequestFacts,
    response: ResponseFacts,
}

impl PolicyContext {
    pub fn builder<'h>(method: Method, response_time: HttpDate) -> PolicyContextBuilder<'h> {
        PolicyContextBuilder {
            method,
            response_time,
            request_headers: None,
            status: StatusCode::OK,
            response_headers: None,
            age: Duration::ZERO,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn response_time(&self) -> HttpDate {
        self.response_time
    }

    pub fn age(&self) -> Duration {
        self.age
    }

    pub fn request(&self) -> &RequestFacts {
        &self.request
    }

    pub fn response(&self) -> &ResponseFacts {
        &self.response
    }
}

/// Collects borrowed header maps and parses them in [`build`](Self::build).
#[derive(Debug)]
pub struct PolicyContextBuilder<'h> {
    method: Method,
    response_time: HttpDate,
    request_headers: Option<&'h HeaderMap>,
    status: StatusCode,
    response_headers: Option<&'h HeaderMap>,
    age: Duration,
}

impl<'h> PolicyContextBuilder<'h> {
    pub fn request_headers(mut self, headers: &'h HeaderMap) -> Self {
        self.request_headers = Some(headers);
        self
    }

    /// Response status and headers; for freshness checks, the stored ones.
    pub fn response(mut self, status: StatusCode, headers: &'h HeaderMap) -> Self {
        self.status = status;
        self.response_headers = Some(headers);
        self
    }

    pub fn age(mut self, age: Duration) -> Self {
        self.age = age;
        self
    }

    pub fn build(self) -> PolicyContext {
        PolicyContext {
            method: self.method,
            status: self.status,
            response_time: self.response_time,
            age: self.age,
            request: self
                .request_headers
                .map(RequestFacts::from_headers)
                .unwrap_or_default(),
            response: self
                .response_headers
                .map(ResponseFacts::from_headers)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PolicyContext, RequestFacts, ResponseFacts};
    use chrono::{TimeZone, Utc};
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use std::time::Duration;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).expect("valid value"));
        }
        map
    }

    #[test]
    fn request_facts_collect_directives() {
        let facts = RequestFacts::from_headers(&headers(&[
            ("cache-control", "max-age=30, max-stale=5"),
            ("cache-control", "min-fresh=2, no-store"),
            ("pragma", "no-cache"),
            ("authorization", "Bearer abc"),
        ]));
        assert!(facts.has_authorization);
        assert!(facts.cache_control_present);
        assert!(facts.no_store);
        assert!(!facts.no_cache);
        assert!(facts.pragma_no_cache);
        assert_eq!(facts.max_age, Some(Duration::from_secs(30)));
        assert_eq!(facts.max_stale, Some(Duration::from_secs(5)));
        assert_eq!(facts.min_fresh, Some(Duration::from_secs(2)));
    }

    #[test]
    fn request_facts_empty_headers_count_as_absent() {
        let facts = RequestFacts::from_headers(&headers(&[
            ("cache-control", ""),
            ("authorization", " "),
        ]));
        assert!(!facts.cache_control_present);
        assert!(!facts.has_authorization);
    }

    #[test]
    fn response_facts_parse_dates_and_vary() {
        let facts = ResponseFacts::from_headers(&headers(&[
            ("cache-control", "public, s-maxage=10, must-revalidate"),
            ("date", "Sun, 06 Nov 1994 08:49:37 GMT"),
            ("expires", "not a date"),
            ("vary", " * "),
        ]));
        assert!(facts.public);
        assert!(facts.must_revalidate);
        assert_eq!(facts.shared_max_age, Some(Duration::from_secs(10)));
        assert_eq!(facts.max_age, None);
        assert_eq!(
            facts.date,
            Some(Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap())
        );
        assert_eq!(facts.expires, None);
        assert!(facts.vary_wildcard);
    }

    #[test]
    fn response_facts_vary_wildcard_needs_single_value() {
        let listed = ResponseFacts::from_headers(&headers(&[("vary", "*, accept")]));
        assert!(!listed.vary_wildcard);
        let repeated = ResponseFacts::from_headers(&headers(&[("vary", "*"), ("vary", "accept")]));
        assert!(!repeated.vary_wildcard);
    }

    #[test]
    fn builder_defaults_without_headers() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let ctx = PolicyContext::builder(Method::GET, now).build();
        assert_eq!(ctx.status(), StatusCode::OK);
        assert_eq!(ctx.age(), Duration::ZERO);
        assert_eq!(ctx.response_time(), now);
        assert_eq!(ctx.request(), &RequestFacts::default());
        assert_eq!(ctx.response(), &ResponseFacts::default());
    }
}
