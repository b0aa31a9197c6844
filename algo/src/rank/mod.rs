/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! PageRank computation.

mod config;
pub use config::*;

pub mod pagerank;
pub use pagerank::{Iteration, PageRank, State, Termination, pagerank};

pub mod strategy;
pub use strategy::{Check, Parallel, Sequential, Strategy};
