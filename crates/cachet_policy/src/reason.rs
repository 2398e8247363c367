use std::fmt;

/// Which decision produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Request,
    Response,
    Freshness,
}

impl Check {
    pub fn as_str(&self) -> &'static str {
        match self {
            Check::Request => "request",
            Check::Response => "response",
            Check::Freshness => "freshness",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cache decision came out negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Request method is neither GET nor HEAD.
    MethodNotCacheable,
    /// Request carries `Authorization`.
    Authorization,
    /// Request `Cache-Control: no-cache`.
    RequestNoCache,
    /// Legacy `Pragma: no-cache` on the request.
    PragmaNoCache,
    /// Response `Cache-Control` lacks `public`.
    NotPublic,
    /// `no-store` on the request or the response.
    NoStore,
    /// Response `Cache-Control: no-cache`.
    ResponseNoCache,
    SetCookie,
    /// `Vary: *`.
    VaryWildcard,
    Private,
    /// Status other than 200.
    StatusNotOk,
    /// Age reached `s-maxage`.
    SharedMaxAgeExceeded,
    /// Age reached the effective `max-age` and no `max-stale` allowance covers it.
    MaxAgeExceeded,
    /// `max-stale` would have covered the entry but it is `must-revalidate`.
    MustRevalidate,
    /// Now is at or past `Expires`.
    Expired,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::MethodNotCacheable => "method_not_cacheable",
            Rejection::Authorization => "authorization",
            Rejection::RequestNoCache => "request_no_cache",
            Rejection::PragmaNoCache => "pragma_no_cache",
            Rejection::NotPublic => "not_public",
            Rejection::NoStore => "no_store",
            Rejection::ResponseNoCache => "response_no_cache",
            Rejection::SetCookie => "set_cookie",
            Rejection::VaryWildcard => "vary_wildcard",
            Rejection::Private => "private",
            Rejection::StatusNotOk => "status_not_ok",
            Rejection::SharedMaxAgeExceeded => "shared_max_age_exceeded",
            Rejection::MaxAgeExceeded => "max_age_exceeded",
            Rejection::MustRevalidate => "must_revalidate",
            Rejection::Expired => "expired",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
