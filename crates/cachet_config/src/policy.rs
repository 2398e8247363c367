use std::{fmt, str::FromStr};

use serde::Deserialize;

/// When a request's legacy `Pragma: no-cache` is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PragmaFallback {
    /// Only when the request has no `Cache-Control` header at all.
    #[default]
    CacheControlAbsent,
    /// Whenever `Cache-Control` does not itself carry `no-cache`.
    NoCacheMissing,
}

impl PragmaFallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            PragmaFallback::CacheControlAbsent => "cache_control_absent",
            PragmaFallback::NoCacheMissing => "no_cache_missing",
        }
    }
}

impl FromStr for PragmaFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cache_control_absent" => Ok(PragmaFallback::CacheControlAbsent),
            "no_cache_missing" => Ok(PragmaFallback::NoCacheMissing),
            other => Err(format!("unknown pragma_fallback '{other}'")),
        }
    }
}

impl fmt::Display for PragmaFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =======================================================
// POLICY CONFIG + DEFAULTS
// =======================================================
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// `cache_control_absent` | `no_cache_missing`
    pub pragma_fallback: String,
    /// Wire the tracing observer into the evaluator.
    pub diagnostics: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            pragma_fallback: PragmaFallback::default().as_str().into(),
            diagnostics: true,
        }
    }
}

impl PolicyConfig {
    /// Parsed fallback mode; unknown values fall back to the default, use
    /// [`crate::validate`] to surface them.
    pub fn pragma_fallback(&self) -> PragmaFallback {
        self.pragma_fallback.parse().unwrap_or_default()
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    pub(crate) fn apply_defaults_from(&mut self, defaults: &PolicyConfig) {
        if self.pragma_fallback.trim().is_empty() {
            self.pragma_fallback = defaults.pragma_fallback.clone();
        }
    }
}
