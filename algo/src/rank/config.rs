/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::Parallel;
use crate::{Granularity, PageRankError};

/// Parameters of a PageRank computation.
///
/// The configuration is validated when it is passed to the
/// [engine](super::PageRank).
///
/// # Examples
///
/// ```
/// use linkrank::rank::Config;
///
/// let config = Config {
///     alpha: 0.9,
///     max_iter: Some(100),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// The damping factor α, in the open interval (0 . . 1).
    pub alpha: f64,
    /// The convergence threshold ε: the iteration stops when no rank changes
    /// by more than ε.
    pub threshold: f64,
    /// The number of worker threads of the [parallel strategy](Parallel).
    pub num_threads: usize,
    /// The maximum number of iterations, or `None` to iterate until
    /// convergence.
    pub max_iter: Option<usize>,
    /// The granularity of parallel tasks.
    pub granularity: Granularity,
}

impl Config {
    pub const DEFAULT_ALPHA: f64 = 0.85;
    pub const DEFAULT_THRESHOLD: f64 = 1E-6;

    /// Checks that the parameters are in range.
    pub fn validate(&self) -> Result<(), PageRankError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(PageRankError::InvalidDamping(self.alpha));
        }
        if self.threshold.is_nan() || self.threshold <= 0.0 {
            return Err(PageRankError::InvalidThreshold(self.threshold));
        }
        if self.num_threads == 0 {
            return Err(PageRankError::InvalidNumThreads);
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            threshold: Self::DEFAULT_THRESHOLD,
            num_threads: Parallel::DEFAULT_NUM_THREADS,
            max_iter: None,
            granularity: Granularity::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = Config::default();
        assert_eq!(config.alpha, 0.85);
        assert_eq!(config.threshold, 1E-6);
        assert_eq!(config.num_threads, 8);
        assert_eq!(config.max_iter, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        for alpha in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let config = Config {
                alpha,
                ..Config::default()
            };
            assert!(matches!(
                config.validate(),
                Err(PageRankError::InvalidDamping(_))
            ));
        }
        for threshold in [0.0, -1E-6, f64::NAN] {
            let config = Config {
                threshold,
                ..Config::default()
            };
            assert!(matches!(
                config.validate(),
                Err(PageRankError::InvalidThreshold(_))
            ));
        }
        let config = Config {
            num_threads: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PageRankError::InvalidNumThreads)
        ));
    }
}
