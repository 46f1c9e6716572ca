//! Pluggable reporters for runs and verdicts.

use crate::result::{ComparisonResult, RunResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Trait for result reporters.
pub trait Reporter: Send + Sync {
    /// Called before a unit of work starts its timed window.
    fn run_start(&self, _name: &str, _timeout: Duration) {}

    /// Called when a unit of work has finished its window.
    fn run_end(&self, _result: &RunResult) {}

    /// Called once both units of a comparison have run.
    fn comparison_end(&self, _result: &ComparisonResult) {}
}

/// Console reporter that prints results to stderr.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    fn format_verdict(result: &ComparisonResult) -> String {
        let names: Vec<&str> = result.iterations.keys().collect();
        if result.equally_fast {
            return format!("{} are equally fast", names.join(" and "));
        }

        let faster = &result.faster_function;
        let slower = names
            .iter()
            .find(|n| **n != faster.name)
            .copied()
            .unwrap_or_default();
        let lead = match faster.faster_in_percentage {
            Some(pct) => format!("{}%", pct),
            None => "infinitely".to_string(),
        };
        format!(
            "{} is {} faster than {} (+{} iterations)",
            faster.name, lead, slower, faster.faster_in_iterations
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn run_start(&self, name: &str, timeout: Duration) {
        eprint!("  {} ({}ms) ... ", name, timeout.as_millis());
        std::io::stderr().flush().ok();
    }

    fn run_end(&self, result: &RunResult) {
        eprintln!("{} iterations", result.iterations);
    }

    fn comparison_end(&self, result: &ComparisonResult) {
        eprintln!("  => {}", Self::format_verdict(result));
    }
}

/// JSON reporter that writes each verdict to its own file.
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File a verdict is written to, named after both units in the order
    /// they ran: `<a>_vs_<b>.json`.
    pub fn path_for(&self, result: &ComparisonResult) -> PathBuf {
        let stem: Vec<String> = result
            .iterations
            .keys()
            .map(|n| n.replace(['/', '\\'], "_"))
            .collect();
        self.output_dir.join(format!("{}.json", stem.join("_vs_")))
    }
}

impl Reporter for JsonReporter {
    fn comparison_end(&self, result: &ComparisonResult) {
        let path = self.path_for(result);
        if let Err(e) = write_json_result(&self.output_dir, &path, result) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write JSON verdict");
        }
    }
}

fn write_json_result(
    output_dir: &Path,
    path: &Path,
    result: &ComparisonResult,
) -> std::io::Result<()> {
    std::fs::create_dir_all(output_dir)?;
    result.save(path)?;
    tracing::debug!(path = %path.display(), "verdict written");
    Ok(())
}

/// Combines multiple reporters.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }

    pub fn push(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for MultiReporter {
    fn run_start(&self, name: &str, timeout: Duration) {
        for r in &self.reporters {
            r.run_start(name, timeout);
        }
    }

    fn run_end(&self, result: &RunResult) {
        for r in &self.reporters {
            r.run_end(result);
        }
    }

    fn comparison_end(&self, result: &ComparisonResult) {
        for r in &self.reporters {
            r.comparison_end(result);
        }
    }
}
