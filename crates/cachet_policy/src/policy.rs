//! The three shared-cache decisions.
//!
//! Each check walks its rules in a fixed order and stops at the first one
//! that applies. Lower freshness tiers (`s-maxage` > `max-age` > `Expires`)
//! are consulted only when every higher tier is wholly absent, never when a
//! higher tier is present but not yet exceeded.

use std::time::Duration;

use cachet_config::{PolicyConfig, PragmaFallback};
use chrono::TimeDelta;
use http::StatusCode;

use crate::context::PolicyContext;
use crate::date::HttpDate;
use crate::observer::{Diagnostics, NoopObserver, PolicyObserver};
use crate::reason::{Check, Rejection};

/// Shared-cache policy evaluator.
///
/// Holds no per-exchange state: the same value can be used for any number of
/// exchanges, from any number of threads when the observer allows it.
#[derive(Debug, Clone, Default)]
pub struct CachePolicy<O = NoopObserver> {
    pragma_fallback: PragmaFallback,
    observer: O,
}

impl CachePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator for `config`, logging rejections through `tracing` when
    /// diagnostics are enabled.
    pub fn from_config(config: &PolicyConfig) -> CachePolicy<Diagnostics> {
        let observer = if config.diagnostics() {
            Diagnostics::Tracing
        } else {
            Diagnostics::Off
        };
        CachePolicy {
            pragma_fallback: config.pragma_fallback(),
            observer,
        }
    }
}

impl<O> CachePolicy<O> {
    pub fn with_pragma_fallback(mut self, pragma_fallback: PragmaFallback) -> Self {
        self.pragma_fallback = pragma_fallback;
        self
    }

    pub fn with_observer<P: PolicyObserver>(self, observer: P) -> CachePolicy<P> {
        CachePolicy {
            pragma_fallback: self.pragma_fallback,
            observer,
        }
    }

    pub fn pragma_fallback(&self) -> PragmaFallback {
        self.pragma_fallback
    }

    /// Why the request may not be answered from or stored in the cache.
    pub fn request_rejection(&self, ctx: &PolicyContext) -> Option<Rejection> {
        let method = ctx.method().as_str();
        if !method.eq_ignore_ascii_case("GET") && !method.eq_ignore_ascii_case("HEAD") {
            return Some(Rejection::MethodNotCacheable);
        }

        let request = ctx.request();
        if request.has_authorization {
            return Some(Rejection::Authorization);
        }
        if request.no_cache {
            return Some(Rejection::RequestNoCache);
        }

        let consult_pragma = match self.pragma_fallback {
            PragmaFallback::CacheControlAbsent => !request.cache_control_present,
            PragmaFallback::NoCacheMissing => true,
        };
        if consult_pragma && request.pragma_no_cache {
            return Some(Rejection::PragmaNoCache);
        }

        None
    }

    /// Why the response may not be stored.
    pub fn response_rejection(&self, ctx: &PolicyContext) -> Option<Rejection> {
        let response = ctx.response();
        if !response.public {
            return Some(Rejection::NotPublic);
        }
        if ctx.request().no_store || response.no_store {
            return Some(Rejection::NoStore);
        }
        if response.no_cache {
            return Some(Rejection::ResponseNoCache);
        }
        if response.has_set_cookie {
            return Some(Rejection::SetCookie);
        }
        if response.vary_wildcard {
            return Some(Rejection::VaryWildcard);
        }
        if response.private {
            return Some(Rejection::Private);
        }
        if ctx.status() != StatusCode::OK {
            return Some(Rejection::StatusNotOk);
        }

        store_time_rejection(ctx)
    }

    /// Why the cached entry may not be served without going to the origin.
    pub fn freshness_rejection(&self, ctx: &PolicyContext) -> Option<Rejection> {
        let request = ctx.request();
        let cached = ctx.response();

        let mut age = ctx.age();
        if let Some(min_fresh) = request.min_fresh {
            age = age.saturating_add(min_fresh);
        }

        if let Some(shared_max_age) = cached.shared_max_age {
            return (age >= shared_max_age).then_some(Rejection::SharedMaxAgeExceeded);
        }

        let lowest_max_age = match (request.max_age, cached.max_age) {
            (Some(requested), Some(stored)) => Some(requested.min(stored)),
            (requested, stored) => requested.or(stored),
        };
        if let Some(lowest_max_age) = lowest_max_age {
            if age < lowest_max_age {
                return None;
            }
            let staleness = age - lowest_max_age;
            return match request.max_stale {
                Some(max_stale) if staleness < max_stale => {
                    cached.must_revalidate.then_some(Rejection::MustRevalidate)
                }
                _ => Some(Rejection::MaxAgeExceeded),
            };
        }

        expired(cached.expires, ctx.response_time())
    }
}

impl<O: PolicyObserver> CachePolicy<O> {
    pub fn is_request_cacheable(&self, ctx: &PolicyContext) -> bool {
        self.decide(Check::Request, self.request_rejection(ctx))
    }

    pub fn is_response_cacheable(&self, ctx: &PolicyContext) -> bool {
        self.decide(Check::Response, self.response_rejection(ctx))
    }

    pub fn is_cached_entry_fresh(&self, ctx: &PolicyContext) -> bool {
        self.decide(Check::Freshness, self.freshness_rejection(ctx))
    }

    fn decide(&self, check: Check, rejection: Option<Rejection>) -> bool {
        match rejection {
            Some(reason) => {
                self.observer.rejected(check, reason);
                false
            }
            None => true,
        }
    }
}

fn store_time_rejection(ctx: &PolicyContext) -> Option<Rejection> {
    let response = ctx.response();
    let now = ctx.response_time();

    let Some(date) = response.date else {
        if response.shared_max_age.is_none() && response.max_age.is_none() {
            return expired(response.expires, now);
        }
        return None;
    };

    // negative when the origin clock runs ahead of ours
    let age = now - date;
    if let Some(shared_max_age) = response.shared_max_age {
        return (age >= delta(shared_max_age)).then_some(Rejection::SharedMaxAgeExceeded);
    }
    if let Some(max_age) = response.max_age {
        return (age >= delta(max_age)).then_some(Rejection::MaxAgeExceeded);
    }
    expired(response.expires, now)
}

fn expired(expires: Option<HttpDate>, now: HttpDate) -> Option<Rejection> {
    match expires {
        Some(expires) if now >= expires => Some(Rejection::Expired),
        _ => None,
    }
}

fn delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
