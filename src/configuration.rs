//! Config for round generation
//!
//! This module provides the equipment counts of a session and the tuning knobs of the
//! assignment search.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override configuration values. All
//! values are optional. Unparsable values are ignored.
//!
//! - `ROTATION_RACKETS` — Number of rackets available (default: `8`)
//! - `ROTATION_COURTS` — Number of courts available (default: `2`)
//! - `ROTATION_ROTATION_CANDIDATES` — Court-rotation candidates tried per round (default: `15`)
//! - `ROTATION_SHUFFLED_CANDIDATES` — Shuffled candidates tried per round (default: `5`)
//! - `ROTATION_LOG` — Set to `"true"` to log to a file (default: `false`)

use anyhow::bail;

use crate::scoring::ScoringWeights;

/// Configuration for round generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) number_of_rackets: usize,
    pub(crate) number_of_courts: usize,
    pub(crate) rotation_candidates: usize,
    pub(crate) shuffled_candidates: usize,
    pub(crate) weights: ScoringWeights,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - 8 rackets and 2 courts.
    /// - 15 court-rotation candidates and 5 shuffled candidates per round.
    /// - Partnership, opponent and court weights of 10, 5 and 3.
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            number_of_rackets: 8,
            number_of_courts: 2,
            rotation_candidates: 15,
            shuffled_candidates: 5,
            weights: ScoringWeights::default(),
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables. Anything unset or
    /// unparsable keeps its default value.
    pub fn from_env() -> Self {
        fn get_env_usize(var: &str, default: usize) -> usize {
            std::env::var(var)
                .ok()
                .and_then(|val| val.trim().parse().ok())
                .unwrap_or(default)
        }

        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        let defaults = Self::new();
        Self {
            number_of_rackets: get_env_usize("ROTATION_RACKETS", defaults.number_of_rackets),
            number_of_courts: get_env_usize("ROTATION_COURTS", defaults.number_of_courts),
            rotation_candidates: get_env_usize(
                "ROTATION_ROTATION_CANDIDATES",
                defaults.rotation_candidates,
            ),
            shuffled_candidates: get_env_usize(
                "ROTATION_SHUFFLED_CANDIDATES",
                defaults.shuffled_candidates,
            ),
            weights: defaults.weights,
            log: get_env_flag("ROTATION_LOG", defaults.log),
        }
    }

    /// Set the number of rackets, which caps how many players can be on court at once.
    pub fn with_rackets(mut self, value: usize) -> Self {
        self.number_of_rackets = value;
        self
    }

    /// Set the number of courts.
    pub fn with_courts(mut self, value: usize) -> Self {
        self.number_of_courts = value;
        self
    }

    /// Set how many court-rotation candidates are scored per round.
    pub fn with_rotation_candidates(mut self, value: usize) -> Self {
        self.rotation_candidates = value;
        self
    }

    /// Set how many shuffled candidates are scored per round.
    pub fn with_shuffled_candidates(mut self, value: usize) -> Self {
        self.shuffled_candidates = value;
        self
    }

    /// Set the penalty weights of the assignment score.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Number of rackets.
    pub fn rackets(&self) -> usize {
        self.number_of_rackets
    }

    /// Number of courts.
    pub fn courts(&self) -> usize {
        self.number_of_courts
    }

    /// Whether logs should go to a file.
    pub fn log(&self) -> bool {
        self.log
    }

    /// Checks that a round can be generated with these settings.
    ///
    /// # Errors
    /// Returned when there are fewer than 2 rackets, no court, or no candidate to score.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.number_of_rackets < 2 {
            bail!(
                "At least 2 rackets are needed, got {}",
                self.number_of_rackets
            );
        }
        if self.number_of_courts < 1 {
            bail!("At least 1 court is needed");
        }
        if self.rotation_candidates + self.shuffled_candidates == 0 {
            bail!("The assignment search needs at least one candidate");
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
