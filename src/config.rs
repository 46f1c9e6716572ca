//! Configuration for a measurement session.

use crate::result::Reduction;
use std::path::PathBuf;

/// Configuration for a [`Provisnr`](crate::Provisnr) session.
#[derive(Debug, Clone)]
pub struct ProvisnrConfig {
    /// Print runs and verdicts to stderr.
    pub verbose: bool,
    /// Write every comparison verdict as JSON into this directory.
    pub output_dir: Option<PathBuf>,
    /// How two runs are reduced into a verdict.
    pub reduction: Reduction,
}

impl Default for ProvisnrConfig {
    fn default() -> Self {
        Self {
            verbose: true,
            output_dir: None,
            reduction: Reduction::Strict,
        }
    }
}

impl ProvisnrConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from environment variables.
    ///
    /// Supported variables:
    /// - `PROVISNR_VERBOSE`: console output (default: true)
    /// - `PROVISNR_OUTPUT_DIR`: directory for JSON verdicts
    /// - `PROVISNR_COMPAT`: reduce results like provisnr 2.x (default: false)
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PROVISNR_VERBOSE") {
            cfg.verbose = is_truthy(&v);
        }
        if let Ok(v) = std::env::var("PROVISNR_OUTPUT_DIR") {
            if !v.is_empty() {
                cfg.output_dir = Some(PathBuf::from(v));
            }
        }
        if let Ok(v) = std::env::var("PROVISNR_COMPAT") {
            if is_truthy(&v) {
                cfg.reduction = Reduction::Compat;
            }
        }

        cfg
    }

    /// Set verbose output.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Set the output directory for JSON verdicts.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set the reduction strategy.
    pub fn reduction(mut self, reduction: Reduction) -> Self {
        self.reduction = reduction;
        self
    }
}

fn is_truthy(v: &str) -> bool {
    v != "0" && !v.eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_defaults_when_env_not_set() {
        let cfg = ProvisnrConfig::default();
        assert!(cfg.verbose);
        assert!(cfg.output_dir.is_none());
        assert_eq!(cfg.reduction, Reduction::Strict);
    }

    #[test]
    fn should_build_config_with_builder() {
        let cfg = ProvisnrConfig::new()
            .verbose(false)
            .output_dir("target/provisnr")
            .reduction(Reduction::Compat);

        assert!(!cfg.verbose);
        assert_eq!(cfg.output_dir, Some(PathBuf::from("target/provisnr")));
        assert_eq!(cfg.reduction, Reduction::Compat);
    }

    #[test]
    fn should_treat_zero_and_false_as_off() {
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
    }
}
