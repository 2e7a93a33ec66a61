use log::warn;

use crate::solver::errors::ConfigError;

/// How aggressively root derivations are explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Only radicals that land back on an integer are kept.
    #[default]
    Normal,
    /// Irrational radicals are kept as well.
    Deep,
    /// Deep, plus fourth roots of every positive integer value.
    Deeper,
}

impl SearchMode {
    pub(crate) fn admits_irrational_roots(self) -> bool {
        !matches!(self, SearchMode::Normal)
    }

    pub(crate) fn exhaustive_double_sqrt(self) -> bool {
        matches!(self, SearchMode::Deeper)
    }
}

/// Immutable tunables for one solve, built once at the edge. No thread
/// ever observes a mid-run change.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Tolerance below which a float counts as the nearby integer, and
    /// the quantum used to key non-integer reachable values.
    pub precision: f64,
    /// Candidates larger than this in magnitude are discarded.
    pub value_max_limit: f64,
    /// Candidates smaller than this in magnitude are discarded.
    pub value_min_limit: f64,
    /// Largest exponent tried for powers.
    pub power_limit: i64,
    /// Largest operand tried for factorials.
    pub factorial_limit: i64,
    /// Previous-generation size beyond which a pass runs one thread per
    /// generation pair.
    pub multithread_threshold: usize,
    /// Maximum number of digit copies tried.
    pub search_depth: usize,
    pub mode: SearchMode,
    /// Emit "Seed: s, Gn size: k" after each completed pass.
    pub trace: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            precision: 1e-8,
            value_max_limit: 1e12,
            value_min_limit: 1e-8,
            power_limit: 40,
            factorial_limit: 15,
            multithread_threshold: 10_000,
            search_depth: 20,
            mode: SearchMode::Normal,
            trace: false,
        }
    }
}

impl SolverConfig {
    /// # Errors
    ///
    /// Returns an error when any tunable is outside its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.precision > 0.0 && self.precision < 1.0) {
            warn!("rejecting precision {}", self.precision);
            return Err(ConfigError::PrecisionOutOfRange(self.precision));
        }
        if self.value_max_limit <= 0.0 {
            return Err(ConfigError::NonPositiveOption {
                name: "value-max-limit",
                value: self.value_max_limit,
            });
        }
        if self.value_min_limit <= 0.0 {
            return Err(ConfigError::NonPositiveOption {
                name: "value-min-limit",
                value: self.value_min_limit,
            });
        }
        if self.power_limit <= 0 {
            return Err(ConfigError::NonPositiveOption {
                name: "power-limit",
                value: self.power_limit as f64,
            });
        }
        if self.factorial_limit <= 0 {
            return Err(ConfigError::NonPositiveOption {
                name: "factorial-limit",
                value: self.factorial_limit as f64,
            });
        }
        if self.search_depth == 0 {
            return Err(ConfigError::ZeroSearchDepth);
        }
        Ok(())
    }
}
