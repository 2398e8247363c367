//! Shared-cache policy decisions for HTTP exchanges.
//!
//! Given a [`PolicyContext`] built once per exchange, [`CachePolicy`] answers
//! three independent questions:
//!
//! - may this request use the cache ([`CachePolicy::is_request_cacheable`]),
//! - may this response be stored ([`CachePolicy::is_response_cacheable`]),
//! - may this stored entry still be served ([`CachePolicy::is_cached_entry_fresh`]).
//!
//! Malformed headers never fail a decision; a directive or date that cannot
//! be read is treated as absent. Rejection reasons are reported to an
//! optional [`PolicyObserver`] and never change the outcome.

mod context;
mod date;
mod directive;
mod entry;
mod observer;
mod policy;
mod reason;

pub use context::{PolicyContext, PolicyContextBuilder, RequestFacts, ResponseFacts};
pub use date::{HttpDate, parse_http_date};
pub use directive::{find_directive, find_directive_value};
pub use entry::StoredEntry;
pub use observer::{Diagnostics, NoopObserver, PolicyObserver, TracingObserver};
pub use policy::CachePolicy;
pub use reason::{Check, Rejection};

pub use cachet_config::PragmaFallback;
