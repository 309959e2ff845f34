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

//! Minimal sketch-size search for MinHash similarity estimation.
//!
//! A MinHash estimate of a Jaccard similarity `j` from a sketch of size `k`
//! behaves like a binomial proportion over `k` trials with success
//! probability `j`. The upper tail of that distribution at a two-sided
//! confidence level bounds how far the measurement can stray from `j`, so
//! the smallest acceptable `k` can be found by searching over the binomial
//! quantile function. The relative-error surface over `k` is discrete and
//! not monotonic, which rules out a plain binary search; the search here
//! combines a coarse bound-finding binary search with a forward
//! verification scan that restarts the search past any violation it finds.
//!
//! # Usage
//!
//! ```rust
//! # use minhash_k::minhash::{SizingConfig, SketchSizer};
//! let config = SizingConfig::new(0.5, 0.1, 0.95).with_range(1, 100_000);
//! let sizer = SketchSizer::new(config).unwrap();
//! let estimate = sizer.find_k();
//! assert!(estimate.k >= 1 && estimate.k <= 100_000);
//! assert!(estimate.error <= 0.1);
//! ```
//!
//! An infeasible target is not an error. When no `k` up to the ceiling
//! reaches the requested precision, the search returns the ceiling together
//! with the error actually achieved there:
//!
//! ```rust
//! # use minhash_k::minhash::{SizingConfig, SketchSizer};
//! let config = SizingConfig::new(0.5, 1e-6, 0.95).with_range(1, 10);
//! let estimate = SketchSizer::new(config).unwrap().find_k();
//! assert_eq!(estimate.k, 10);
//! assert!(estimate.error > 1e-6);
//! ```

mod binomial;
mod search;

pub use self::binomial::ExactBinomial;
pub use self::binomial::QuantileSource;
pub use self::search::KEstimate;
pub use self::search::SizingConfig;
pub use self::search::SketchSizer;
pub use self::search::UNBOUNDED_ERROR;
pub use self::search::relative_error;

/// Default smallest sketch size considered by the search.
pub const DEFAULT_MIN_K: u64 = 1;
/// Default largest sketch size considered by the search.
pub const DEFAULT_MAX_K: u64 = 1_000_000;
/// Default multiplier applied to the error target when deriving the upper
/// limit of the verification scan.
pub const DEFAULT_BOUND_MARGIN: f64 = 0.75;
