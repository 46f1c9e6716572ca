//! Run and comparison result types, and the reduction of two runs into a
//! verdict.

use crate::error::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;
use std::path::Path;

/// Outcome of one runner execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub name: String,
    pub iterations: u64,
}

impl RunResult {
    pub fn new(name: impl Into<String>, iterations: u64) -> Self {
        Self {
            name: name.into(),
            iterations,
        }
    }
}

/// The unit of work that completed more iterations.
///
/// Left at its default (empty name, zeros) when both were equally fast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FasterFunction {
    pub name: String,
    /// Lead over the slower unit in whole percent, truncated.
    ///
    /// `None` when the slower unit completed no iterations at all, since the
    /// ratio is undefined.
    pub faster_in_percentage: Option<u64>,
    /// Absolute lead in iterations.
    pub faster_in_iterations: u64,
}

/// Iteration counts of both units, keyed by name, in the order they ran.
///
/// Holds exactly two entries with distinct names. Serialized as a JSON
/// object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iterations([(String, u64); 2]);

impl Iterations {
    fn new(a: &RunResult, b: &RunResult) -> Result<Self> {
        if a.name == b.name {
            return Err(Error::DuplicateName(a.name.clone()));
        }
        Ok(Self([
            (a.name.clone(), a.iterations),
            (b.name.clone(), b.iterations),
        ]))
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, i)| *i)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(n, i)| (n.as_str(), *i))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<&str> for Iterations {
    type Output = u64;

    fn index(&self, name: &str) -> &u64 {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, i)| i)
            .unwrap_or_else(|| panic!("no iteration count for '{}'", name))
    }
}

impl Serialize for Iterations {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Iterations {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_map(IterationsVisitor)
    }
}

struct IterationsVisitor;

impl<'de> Visitor<'de> for IterationsVisitor {
    type Value = Iterations;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map of exactly two distinct names to iteration counts")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> std::result::Result<Iterations, M::Error> {
        let mut entries = Vec::with_capacity(2);
        while let Some((name, iterations)) = map.next_entry::<String, u64>()? {
            entries.push(RunResult::new(name, iterations));
        }
        if entries.len() != 2 {
            return Err(serde::de::Error::invalid_length(entries.len(), &self));
        }
        Iterations::new(&entries[0], &entries[1]).map_err(serde::de::Error::custom)
    }
}

/// Verdict of comparing two units of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub equally_fast: bool,
    pub iterations: Iterations,
    pub faster_function: FasterFunction,
}

impl ComparisonResult {
    /// Name of the faster unit, if there is one.
    pub fn winner(&self) -> Option<&str> {
        if self.equally_fast {
            None
        } else {
            Some(&self.faster_function.name)
        }
    }

    /// Load a comparison result from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Write this result as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// How two runs are reduced into a verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Whichever unit completed strictly more iterations is faster.
    #[default]
    Strict,
    /// Reproduces provisnr 2.x, which compared the first unit's count with
    /// itself: the first unit is never reported as faster, and a lead by the
    /// first unit comes out as a tie. The percentage is computed in floating
    /// point and then truncated, as 2.x did, so it can land one below the
    /// exact value (129 vs 100 gives 28).
    Compat,
}

impl Reduction {
    pub fn reduce(self, a: &RunResult, b: &RunResult) -> Result<ComparisonResult> {
        match self {
            Reduction::Strict => collect_results(a, b),
            Reduction::Compat => collect_results_compat(a, b),
        }
    }
}

/// Reduce two runs into a comparison verdict.
///
/// The unit with strictly more iterations is faster. The percentage lead is
/// `floor((faster - slower) / slower * 100)`, computed on integers.
///
/// Fails with [`Error::DuplicateName`] when both runs carry the same name.
pub fn collect_results(a: &RunResult, b: &RunResult) -> Result<ComparisonResult> {
    let ordered = if a.iterations > b.iterations {
        Some((a, b))
    } else if a.iterations < b.iterations {
        Some((b, a))
    } else {
        None
    };
    build(a, b, ordered, percentage_lead)
}

/// Reduce two runs the way provisnr 2.x did. See [`Reduction::Compat`].
pub fn collect_results_compat(a: &RunResult, b: &RunResult) -> Result<ComparisonResult> {
    #[allow(clippy::eq_op)]
    let ordered = if a.iterations > a.iterations {
        Some((a, b))
    } else if a.iterations < b.iterations {
        Some((b, a))
    } else {
        None
    };
    build(a, b, ordered, float_percentage_lead)
}

fn build(
    a: &RunResult,
    b: &RunResult,
    ordered: Option<(&RunResult, &RunResult)>,
    lead: fn(u64, u64) -> Option<u64>,
) -> Result<ComparisonResult> {
    let iterations = Iterations::new(a, b)?;

    Ok(match ordered {
        Some((faster, slower)) => ComparisonResult {
            equally_fast: false,
            iterations,
            faster_function: FasterFunction {
                name: faster.name.clone(),
                faster_in_percentage: lead(faster.iterations, slower.iterations),
                faster_in_iterations: faster.iterations - slower.iterations,
            },
        },
        None => ComparisonResult {
            equally_fast: true,
            iterations,
            faster_function: FasterFunction::default(),
        },
    })
}

fn percentage_lead(faster: u64, slower: u64) -> Option<u64> {
    if slower == 0 {
        return None;
    }
    let lead = u128::from(faster - slower) * 100 / u128::from(slower);
    Some(u64::try_from(lead).unwrap_or(u64::MAX))
}

fn float_percentage_lead(faster: u64, slower: u64) -> Option<u64> {
    if slower == 0 {
        return None;
    }
    Some(((faster - slower) as f64 / slower as f64 * 100.0) as u64)
}
