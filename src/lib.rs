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

//! Sketch-size selection for MinHash Jaccard similarity estimation.
//!
//! A MinHash sketch with `k` samples measures the Jaccard similarity of two
//! sets as a binomial proportion over `k` trials. This crate answers the
//! sizing question: what is the smallest `k` such that a measurement near a
//! target similarity stays within a given relative error with a given
//! confidence? It performs no hashing and builds no sketches; the output is
//! a pair `(k, achieved_error)` for use when configuring a MinHash
//! implementation.
//!
//! # Usage
//!
//! ```rust
//! # use minhash_k::minhash::{SizingConfig, SketchSizer};
//! let config = SizingConfig::new(0.5, 0.1, 0.95);
//! let sizer = SketchSizer::new(config).unwrap();
//! let estimate = sizer.find_k();
//! assert!(estimate.error <= 0.1);
//! ```

pub mod error;
pub mod minhash;
