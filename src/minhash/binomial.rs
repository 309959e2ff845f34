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

use statrs::distribution::Binomial;
use statrs::distribution::DiscreteCDF;

/// Source of binomial quantile (inverse-CDF) values for the sizing search.
///
/// Implementations must follow the standard inverse-CDF contract: the
/// returned value is the smallest integer `x` such that the cumulative
/// probability of a binomial distribution with `trials` trials and success
/// probability `rate`, evaluated at `x`, is at least `p`.
pub trait QuantileSource {
    /// Returns the binomial quantile for the given probability level.
    ///
    /// # Panics
    ///
    /// May panic if `rate` is outside `[0, 1]` or `p` is outside `(0, 1)`.
    fn binomial_quantile(&self, p: f64, trials: u64, rate: f64) -> u64;
}

/// Exact binomial quantile evaluation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactBinomial;

impl QuantileSource for ExactBinomial {
    fn binomial_quantile(&self, p: f64, trials: u64, rate: f64) -> u64 {
        let dist = Binomial::new(rate, trials).expect("rate must be in [0, 1]");
        // statrs's default inverse_cdf cannot represent a quantile that
        // collapses to zero (its internal bisection search unwraps None when
        // cdf(0) already covers p), so answer that case directly.
        if dist.cdf(0) >= p {
            return 0;
        }
        dist.inverse_cdf(p)
    }
}
