//! Configuration for the cachet cache-policy engine.
//!
//! Loaded from an INI-style file (`cachet.conf`) through the `config` crate.
//! Every field has a default, so a missing file yields a usable config.

mod cachet;
mod error;
mod policy;
mod validation;

pub use cachet::CachetConfig;
pub use error::ConfigError;
pub use policy::{PolicyConfig, PragmaFallback};
pub use validation::{ConfigIssue, ConfigReport, validate};
