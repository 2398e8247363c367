use serde::Deserialize;
use tracing::warn;

use crate::validation::{ConfigReport, validate};
use crate::{ConfigError, PolicyConfig};

// =======================================================
// CACHET CONFIG — main config
// =======================================================
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CachetConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl CachetConfig {
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Validate the configuration and return a report of warnings and errors.
    pub fn validate(&self) -> ConfigReport {
        validate(self)
    }

    /// Reads `file_name` as INI. A missing file is not an error.
    pub fn from_file(file_name: &str) -> Result<Self, ConfigError> {
        let built = config::Config::builder()
            .add_source(config::File::new(file_name, config::FileFormat::Ini).required(false))
            .build()?;

        let mut cfg: CachetConfig = built.try_deserialize()?;

        cfg.apply_defaults();
        Ok(cfg)
    }

    /// Like [`from_file`](Self::from_file) but also fails on validation errors.
    pub fn load(file_name: &str) -> Result<Self, ConfigError> {
        let cfg = Self::from_file(file_name)?;
        let report = cfg.validate();
        if report.has_errors() {
            return Err(ConfigError::Invalid(report.format()));
        }
        Ok(cfg)
    }

    pub fn from_file_or_default(file_name: &str) -> Self {
        match Self::from_file(file_name) {
            Ok(cfg) => {
                let report = cfg.validate();
                if report.has_errors() {
                    warn!(
                        target: "cachet::config",
                        file = file_name,
                        report = %report.format(),
                        "Invalid config, using defaults"
                    );
                    CachetConfig::default()
                } else {
                    if !report.is_clean() {
                        warn!(
                            target: "cachet::config",
                            file = file_name,
                            report = %report.format(),
                            "Config warnings"
                        );
                    }
                    cfg
                }
            }
            Err(e) => {
                warn!(
                    target: "cachet::config",
                    file = file_name,
                    error = %e,
                    "Error reading config, using defaults"
                );
                CachetConfig::default()
            }
        }
    }

    fn apply_defaults(&mut self) {
        let def_policy = PolicyConfig::default();
        self.policy.apply_defaults_from(&def_policy);
    }
}

#[cfg(test)]
mod tests {
    use super::CachetConfig;
    use crate::{ConfigError, PragmaFallback};
    use std::path::PathBuf;

    fn write_conf(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cachet-{}-{name}.conf", std::process::id()));
        std::fs::write(&path, contents).expect("write temp config");
        path
    }

    #[test]
    fn from_file_missing_file_uses_defaults() {
        let cfg = CachetConfig::from_file("/nonexistent/cachet-missing.conf").expect("defaults");
        assert_eq!(cfg.policy().pragma_fallback(), PragmaFallback::CacheControlAbsent);
        assert!(cfg.policy().diagnostics());
    }

    #[test]
    fn from_file_reads_policy_section() {
        let path = write_conf(
            "policy",
            "[policy]\npragma_fallback = no_cache_missing\ndiagnostics = false\n",
        );
        let cfg = CachetConfig::from_file(path.to_str().unwrap()).expect("valid config");
        assert_eq!(cfg.policy().pragma_fallback(), PragmaFallback::NoCacheMissing);
        assert!(!cfg.policy().diagnostics());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_accepts_shipped_sample() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../cachet.conf");
        let cfg = CachetConfig::load(path).expect("sample config loads");
        assert_eq!(cfg.policy().pragma_fallback, "cache_control_absent");
        assert_eq!(cfg.policy().pragma_fallback(), PragmaFallback::CacheControlAbsent);
        assert!(cfg.policy().diagnostics());
        assert!(cfg.validate().is_clean());
    }

    #[test]
    fn load_rejects_invalid_values() {
        let path = write_conf("invalid", "[policy]\npragma_fallback = sometimes\n");
        let err = CachetConfig::load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let cfg = CachetConfig::from_file_or_default(path.to_str().unwrap());
        assert_eq!(cfg.policy().pragma_fallback, "cache_control_absent");
        let _ = std::fs::remove_file(path);
    }
}
