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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use minhash_k::error::ErrorKind;
use minhash_k::minhash::ExactBinomial;
use minhash_k::minhash::QuantileSource;
use minhash_k::minhash::SizingConfig;
use minhash_k::minhash::SketchSizer;
use minhash_k::minhash::UNBOUNDED_ERROR;
use minhash_k::minhash::relative_error;

const NUMERIC_NOISE_TOLERANCE: f64 = 1e-9;

fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64) {
    let delta = (actual - expected).abs();
    assert!(
        delta <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

#[test]
fn test_binomial_quantile_contract() {
    let quantile = ExactBinomial;
    // Binomial(4, 0.5): cdf(1) = 5/16, cdf(2) = 11/16.
    assert_eq!(quantile.binomial_quantile(0.5, 4, 0.5), 2);
    // Binomial(10, 0.5): cdf(7) = 0.9453, cdf(8) = 0.9893.
    assert_eq!(quantile.binomial_quantile(0.975, 10, 0.5), 8);
    // Binomial(10, 0.001): cdf(0) = 0.999^10 = 0.990 already covers 0.975.
    assert_eq!(quantile.binomial_quantile(0.975, 10, 0.001), 0);
}

#[test]
fn test_relative_error_value() {
    let e = relative_error(&ExactBinomial, 0.975, 10, 0.5);
    assert_approx_eq(e, 0.6, NUMERIC_NOISE_TOLERANCE);
}

#[test]
fn test_relative_error_zero_quantile_sentinel() {
    let e = relative_error(&ExactBinomial, 0.975, 10, 0.001);
    assert_eq!(e, UNBOUNDED_ERROR);
}

#[test]
fn test_result_stays_in_range() {
    for &(jaccard, max_error, confidence) in &[
        (0.5, 0.1, 0.95),
        (0.25, 0.2, 0.9),
        (0.9, 0.05, 0.99),
        (0.001, 0.5, 0.95),
    ] {
        let config = SizingConfig::new(jaccard, max_error, confidence).with_range(1, 100_000);
        let estimate = SketchSizer::new(config).unwrap().find_k();
        assert!(
            estimate.k >= 1 && estimate.k <= 100_000,
            "k {} out of range for jaccard {jaccard}",
            estimate.k
        );
    }
}

#[test]
fn test_looser_error_target_never_needs_more_samples() {
    for &(jaccard, confidence) in &[(0.5, 0.95), (0.25, 0.9)] {
        let mut previous_k = None;
        // Tightest target first; k must not increase as the target loosens.
        for &alpha in &[0.05, 0.1, 0.2] {
            let config = SizingConfig::new(jaccard, alpha, confidence);
            let estimate = SketchSizer::new(config).unwrap().find_k();
            if let Some(previous) = previous_k {
                assert!(
                    estimate.k <= previous,
                    "alpha {alpha} gave k {} above {} for jaccard {jaccard}",
                    estimate.k,
                    previous
                );
            }
            previous_k = Some(estimate.k);
        }
    }
}

#[test]
fn test_infeasible_target_reports_ceiling() {
    let config = SizingConfig::new(0.5, 1e-6, 0.95).with_range(1, 10);
    let estimate = SketchSizer::new(config).unwrap().find_k();
    assert_eq!(estimate.k, 10);
    assert!(estimate.error > 1e-6);
    // Quantile of Binomial(10, 0.5) at 0.975 is 8, so the ceiling error is
    // |8/5 - 1|.
    assert_approx_eq(estimate.error, 0.6, NUMERIC_NOISE_TOLERANCE);
}

#[test]
fn test_returned_k_is_minimal() {
    let config = SizingConfig::new(0.5, 0.1, 0.95).with_range(1, 1000);
    let estimate = SketchSizer::new(config).unwrap().find_k();
    let level = 1.0 - (1.0 - 0.95) / 2.0;
    assert!(relative_error(&ExactBinomial, level, estimate.k, 0.5) <= 0.1);
    assert_approx_eq(
        estimate.error,
        relative_error(&ExactBinomial, level, estimate.k, 0.5),
        NUMERIC_NOISE_TOLERANCE,
    );
    if estimate.k > 1 {
        assert!(relative_error(&ExactBinomial, level, estimate.k - 1, 0.5) > 0.1);
    }
}

#[test]
fn test_tiny_jaccard_engages_sentinel_without_failing() {
    // At small k the quantile collapses to zero and the sentinel keeps the
    // search total; the valid region only starts at large k.
    let config = SizingConfig::new(0.001, 0.5, 0.95).with_range(1, 50_000);
    let estimate = SketchSizer::new(config).unwrap().find_k();
    assert!(estimate.k >= 1000 && estimate.k <= 50_000);
    assert!(estimate.error <= 0.5);
}

#[test]
fn test_tiny_jaccard_small_range_hits_sentinel_ceiling() {
    // Every size up to the ceiling has a zero quantile, so the search must
    // come back with the ceiling and the sentinel error rather than failing
    // inside the quantile evaluation.
    let config = SizingConfig::new(0.001, 0.5, 0.95).with_range(1, 20);
    let estimate = SketchSizer::new(config).unwrap().find_k();
    assert_eq!(estimate.k, 20);
    assert_eq!(estimate.error, UNBOUNDED_ERROR);
}

#[test]
fn test_perfect_similarity_needs_one_sample() {
    let config = SizingConfig::new(1.0, 0.1, 0.95);
    let estimate = SketchSizer::new(config).unwrap().find_k();
    assert_eq!(estimate.k, 1);
    assert_approx_eq(estimate.error, 0.0, NUMERIC_NOISE_TOLERANCE);
}

#[test]
fn test_deterministic() {
    let config = SizingConfig::new(0.5, 0.1, 0.95);
    let first = SketchSizer::new(config).unwrap().find_k();
    let second = SketchSizer::new(config).unwrap().find_k();
    assert_eq!(first, second);
}

/// Quantile stub producing a non-monotonic relative-error surface when
/// paired with `jaccard = 1.0`, where the error reduces to `|n/k - 1|`:
/// sizes below 10 are unmeasurable, 10 and 11 sit just inside a 0.2 target,
/// 12 violates it, and everything above is exact.
struct SteppedQuantile;

impl QuantileSource for SteppedQuantile {
    fn binomial_quantile(&self, _p: f64, trials: u64, _rate: f64) -> u64 {
        match trials {
            0..=9 => 0,
            10 => 12,
            11 => 13,
            12 => 18,
            k => k,
        }
    }
}

#[test]
fn test_scan_restarts_past_non_monotonic_bump() {
    let config = SizingConfig::new(1.0, 0.2, 0.95).with_range(1, 40);
    let sizer = SketchSizer::with_quantile_source(config, SteppedQuantile).unwrap();
    let estimate = sizer.find_k();
    // 10 and 11 satisfy the target but 12 does not, so the scan must reject
    // the early candidates and settle past the bump.
    assert_eq!(estimate.k, 13);
    assert_eq!(estimate.error, 0.0);
}

#[test]
fn test_rejects_invalid_jaccard() {
    for &jaccard in &[0.0, -0.1, 1.5, f64::NAN] {
        let err = SketchSizer::new(SizingConfig::new(jaccard, 0.1, 0.95)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(format!("{err}"), contains_substring("jaccard"));
    }
}

#[test]
fn test_rejects_invalid_error_target() {
    for &max_error in &[0.0, -1.0, f64::INFINITY, f64::NAN] {
        let err = SketchSizer::new(SizingConfig::new(0.5, max_error, 0.95)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(format!("{err}"), contains_substring("max_error"));
    }
}

#[test]
fn test_rejects_invalid_confidence() {
    for &confidence in &[0.0, 1.0, -0.5, 2.0, f64::NAN] {
        let err = SketchSizer::new(SizingConfig::new(0.5, 0.1, confidence)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(format!("{err}"), contains_substring("confidence"));
    }
}

#[test]
fn test_rejects_invalid_range() {
    let err = SketchSizer::new(SizingConfig::new(0.5, 0.1, 0.95).with_range(0, 10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let err = SketchSizer::new(SizingConfig::new(0.5, 0.1, 0.95).with_range(100, 10)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(format!("{err}"), contains_substring("min_k"));
}

#[test]
fn test_rejects_invalid_bound_margin() {
    for &bound_margin in &[0.0, 1.0, -0.75, f64::NAN] {
        let err =
            SketchSizer::new(SizingConfig::new(0.5, 0.1, 0.95).with_bound_margin(bound_margin))
                .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_that!(format!("{err}"), contains_substring("bound_margin"));
    }
}
