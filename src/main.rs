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

//! Command-line front end for the MinHash sketch-size search.

use std::process::ExitCode;

use clap::Parser;
use minhash_k::minhash::DEFAULT_BOUND_MARGIN;
use minhash_k::minhash::DEFAULT_MAX_K;
use minhash_k::minhash::DEFAULT_MIN_K;
use minhash_k::minhash::SizingConfig;
use minhash_k::minhash::SketchSizer;

/// Find an acceptable MinHash k given a desired error with desired
/// confidence at a particular Jaccard Index. Returns the k and the maximal
/// error at that k.
#[derive(Parser, Debug)]
#[command(name = "minhash-k")]
#[command(version)]
struct Args {
    /// The lowest Jaccard Index to measure. In (0, 1].
    #[arg(long)]
    jaccard: f64,

    /// The maximum error to tolerate at the Jaccard Index. 1 implies a
    /// measurement of 0 or twice the actual Jaccard Index.
    #[arg(long)]
    error: f64,

    /// The level of confidence the error at the Jaccard Index will be less
    /// than the maximum error.
    #[arg(long)]
    confidence: f64,

    /// The smallest k at which to begin the search.
    #[arg(long = "min_k", default_value_t = DEFAULT_MIN_K)]
    min_k: u64,

    /// The largest k which is acceptable.
    #[arg(long = "max_k", default_value_t = DEFAULT_MAX_K)]
    max_k: u64,

    /// Error-target multiplier used to derive the verification scan limit.
    #[arg(long = "bound_margin", default_value_t = DEFAULT_BOUND_MARGIN)]
    bound_margin: f64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = SizingConfig::new(args.jaccard, args.error, args.confidence)
        .with_range(args.min_k, args.max_k)
        .with_bound_margin(args.bound_margin);

    let sizer = match SketchSizer::new(config) {
        Ok(sizer) => sizer,
        Err(err) => {
            eprintln!("minhash-k: {err}");
            return ExitCode::FAILURE;
        }
    };

    let estimate = sizer.find_k();
    println!("MinHash k:\t{}", estimate.k);
    println!("Error at k:\t{}", estimate.error);
    ExitCode::SUCCESS
}
