/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

mod degrees;
pub use degrees::Degrees;

mod error;
pub use error::PageRankError;

mod granularity;
pub use granularity::Granularity;

pub mod graph;
pub mod random;
pub mod rank;

pub mod prelude {
    pub use crate::graph::{DenseGraph, LinkGraph};
    pub use crate::random::RandomLinks;
    pub use crate::rank::{Config, PageRank, Parallel, Sequential, State, Termination, pagerank};
    pub use crate::{Degrees, Granularity, PageRankError};
}
