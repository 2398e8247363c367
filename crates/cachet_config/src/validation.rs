use std::fmt;

use crate::{CachetConfig, PragmaFallback};

/// One problem with a single setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Dotted key, e.g. `policy.pragma_fallback`.
    pub setting: &'static str,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.setting, self.message)
    }
}

/// Validation output for a loaded cachet configuration.
#[derive(Debug, Default)]
pub struct ConfigReport {
    warnings: Vec<ConfigIssue>,
    errors: Vec<ConfigIssue>,
}

impl ConfigReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn warnings(&self) -> &[ConfigIssue] {
        &self.warnings
    }

    pub fn errors(&self) -> &[ConfigIssue] {
        &self.errors
    }

    /// Issues touching `setting`, errors first.
    pub fn for_setting<'r>(&'r self, setting: &'r str) -> impl Iterator<Item = &'r ConfigIssue> + 'r {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(move |issue| issue.setting == setting)
    }

    /// One line per issue, errors first: `error: policy.x: ...`.
    pub fn format(&self) -> String {
        let errors = self.errors.iter().map(|issue| ("error", issue));
        let warnings = self.warnings.iter().map(|issue| ("warning", issue));
        errors
            .chain(warnings)
            .map(|(level, issue)| format!("{level}: {issue}\n"))
            .collect()
    }

    fn warn(&mut self, setting: &'static str, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            setting,
            message: message.into(),
        });
    }

    fn error(&mut self, setting: &'static str, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            setting,
            message: message.into(),
        });
    }
}

/// Validate a cachet configuration and return a report of issues.
pub fn validate(cfg: &CachetConfig) -> ConfigReport {
    let mut report = ConfigReport::default();

    validate_policy(cfg, &mut report);

    report
}

const PRAGMA_FALLBACK: &str = "policy.pragma_fallback";
const DIAGNOSTICS: &str = "policy.diagnostics";

fn validate_policy(cfg: &CachetConfig, report: &mut ConfigReport) {
    let raw = cfg.policy.pragma_fallback.as_str();
    match raw.parse::<PragmaFallback>() {
        Ok(PragmaFallback::NoCacheMissing) => {
            report.warn(
                PRAGMA_FALLBACK,
                "no_cache_missing consults Pragma even when Cache-Control is present",
            );
        }
        Ok(PragmaFallback::CacheControlAbsent) => {}
        Err(_) => {
            report.error(
                PRAGMA_FALLBACK,
                format!("'{raw}' is not one of: cache_control_absent, no_cache_missing"),
            );
        }
    }

    if !cfg.policy.diagnostics {
        report.warn(DIAGNOSTICS, "off; rejection reasons will not be logged");
    }
}
