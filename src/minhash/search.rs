// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::error::ErrorKind;
use crate::minhash::DEFAULT_BOUND_MARGIN;
use crate::minhash::DEFAULT_MAX_K;
use crate::minhash::DEFAULT_MIN_K;
use crate::minhash::ExactBinomial;
use crate::minhash::QuantileSource;

/// Sentinel relative error reported when the binomial quantile collapses to
/// zero, which means no error bound is measurable at that sketch size.
pub const UNBOUNDED_ERROR: f64 = 1e9;

/// Relative error of the quantile-based similarity estimate at sketch size
/// `k`.
///
/// `level` is the one-sided confidence level for the upper tail of the
/// two-sided interval and `jaccard` acts as the binomial success
/// probability. Requires `jaccard > 0`; the returned value is
/// [`UNBOUNDED_ERROR`] when the quantile is zero and
/// `|n / (jaccard * k) - 1|` otherwise.
pub fn relative_error<Q: QuantileSource>(quantile: &Q, level: f64, k: u64, jaccard: f64) -> f64 {
    let n = quantile.binomial_quantile(level, k, jaccard);
    if n == 0 {
        UNBOUNDED_ERROR
    } else {
        (n as f64 / (jaccard * k as f64) - 1.0).abs()
    }
}

/// Statistical targets and search range for the sizing search.
///
/// `bound_margin` tightens the error target when deriving the upper limit of
/// the verification scan. The default of 0.75 is a heuristic carried over
/// from practice; it is configurable rather than fixed because no published
/// derivation pins it down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingConfig {
    /// The lowest Jaccard similarity the sketch must resolve, in `(0, 1]`.
    pub jaccard: f64,
    /// The largest tolerable relative error at that similarity.
    pub max_error: f64,
    /// The confidence that the error stays within `max_error`, in `(0, 1)`.
    pub confidence: f64,
    /// The smallest sketch size considered.
    pub min_k: u64,
    /// The largest acceptable sketch size.
    pub max_k: u64,
    /// Multiplier applied to `max_error` when deriving the scan limit.
    pub bound_margin: f64,
}

impl SizingConfig {
    /// Creates a config with the default search range and bound margin.
    pub fn new(jaccard: f64, max_error: f64, confidence: f64) -> Self {
        Self {
            jaccard,
            max_error,
            confidence,
            min_k: DEFAULT_MIN_K,
            max_k: DEFAULT_MAX_K,
            bound_margin: DEFAULT_BOUND_MARGIN,
        }
    }

    /// Restricts the search to sketch sizes in `[min_k, max_k]`.
    pub fn with_range(mut self, min_k: u64, max_k: u64) -> Self {
        self.min_k = min_k;
        self.max_k = max_k;
        self
    }

    /// Overrides the scan-limit margin.
    pub fn with_bound_margin(mut self, bound_margin: f64) -> Self {
        self.bound_margin = bound_margin;
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if !(self.jaccard > 0.0 && self.jaccard <= 1.0) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "jaccard must be in (0, 1]",
            )
            .with_context("jaccard", self.jaccard));
        }
        if !(self.max_error > 0.0 && self.max_error.is_finite()) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "max_error must be positive and finite",
            )
            .with_context("max_error", self.max_error));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "confidence must be in (0, 1)",
            )
            .with_context("confidence", self.confidence));
        }
        if self.min_k < 1 || self.min_k > self.max_k {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "sketch size range must satisfy 1 <= min_k <= max_k",
            )
            .with_context("min_k", self.min_k)
            .with_context("max_k", self.max_k));
        }
        if !(self.bound_margin > 0.0 && self.bound_margin < 1.0) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "bound_margin must be in (0, 1)",
            )
            .with_context("bound_margin", self.bound_margin));
        }
        Ok(())
    }
}

/// The outcome of a sizing search.
///
/// `error` is always the relative error actually evaluated at `k`. When the
/// target precision is unreachable anywhere in the configured range, `k` is
/// the range ceiling and `error` exceeds the configured `max_error`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KEstimate {
    /// The selected sketch size.
    pub k: u64,
    /// The relative error achieved at `k`.
    pub error: f64,
}

/// Searches for the smallest sketch size meeting a [`SizingConfig`].
///
/// The search treats the relative error over `k` as roughly decreasing but
/// not monotonic. A binary search produces a candidate lower bound; a
/// forward scan then verifies every size in a window above the candidate,
/// and any violation restarts the search just past the violating size. The
/// scan window doubles with the candidate but never exceeds a limit derived
/// from a tightened error target, so each restart makes strict forward
/// progress.
#[derive(Debug)]
pub struct SketchSizer<Q: QuantileSource = ExactBinomial> {
    config: SizingConfig,
    quantile: Q,
    // upper-tail level of the two-sided interval, 1 - (1 - confidence)/2
    level: f64,
}

impl SketchSizer<ExactBinomial> {
    /// Creates a sizer using exact binomial quantiles.
    ///
    /// Returns an error of kind `ConfigInvalid` when any config field is out
    /// of range.
    pub fn new(config: SizingConfig) -> Result<Self, Error> {
        Self::with_quantile_source(config, ExactBinomial)
    }
}

impl<Q: QuantileSource> SketchSizer<Q> {
    /// Creates a sizer using the provided quantile source.
    pub fn with_quantile_source(config: SizingConfig, quantile: Q) -> Result<Self, Error> {
        config.validate()?;
        let level = 1.0 - (1.0 - config.confidence) / 2.0;
        Ok(Self {
            config,
            quantile,
            level,
        })
    }

    /// Returns the config the sizer was built with.
    pub fn config(&self) -> &SizingConfig {
        &self.config
    }

    /// Finds the smallest sketch size whose relative error stays within the
    /// configured target, or the range ceiling when none does.
    pub fn find_k(&self) -> KEstimate {
        let max_k = self.config.max_k;
        let alpha = self.config.max_error;

        let error_at_ceiling = self.error_at(max_k);
        if error_at_ceiling > alpha {
            // Even the ceiling misses the target, so nothing below it can
            // be reported as satisfying the bound.
            return KEstimate {
                k: max_k,
                error: error_at_ceiling,
            };
        }

        let mut kn = self.find_bound(alpha);
        let scan_limit = self.find_bound(self.config.bound_margin * alpha);

        while kn != max_k {
            if self.error_at(kn) <= alpha {
                let upper = scan_limit.min(kn.saturating_mul(2));
                match self.first_violation(kn, upper) {
                    // The error surface dipped below alpha before kn and
                    // came back up inside the window: the candidate was a
                    // false minimum, resume past the violation.
                    Some(violation) => kn = violation + 1,
                    None => {
                        return KEstimate {
                            k: kn,
                            error: self.error_at(kn),
                        };
                    }
                }
            } else {
                kn += 1;
            }
        }

        KEstimate {
            k: max_k,
            error: self.error_at(max_k),
        }
    }

    /// Binary search for the smallest size whose error first drops to the
    /// tolerance, assuming the error is roughly decreasing in the probed
    /// range. The verification scan in `find_k` covers for the cases where
    /// that assumption fails.
    fn find_bound(&self, tolerance: f64) -> u64 {
        let mut lo = self.config.min_k;
        let mut hi = self.config.max_k;
        loop {
            let mid = lo + (hi - lo) / 2;
            if mid == lo {
                return mid;
            }
            if self.error_at(mid) <= tolerance {
                hi = mid;
            } else {
                lo = mid;
            }
        }
    }

    /// Returns the first size in `[from, to]` whose error exceeds the
    /// target, if any.
    fn first_violation(&self, from: u64, to: u64) -> Option<u64> {
        (from..=to).find(|&k| self.error_at(k) > self.config.max_error)
    }

    fn error_at(&self, k: u64) -> f64 {
        relative_error(&self.quantile, self.level, k, self.config.jaccard)
    }
}
