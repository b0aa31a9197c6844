/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graph::LinkGraph;
use dsi_progress_logger::{ProgressLog, no_logging};
use std::ops::Index;

/// The outdegrees of the nodes of a graph.
///
/// The table is computed once from a [`LinkGraph`] and never changes
/// afterwards. Nodes with outdegree zero are called _dangling_.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Degrees {
    degrees: Box<[usize]>,
    num_arcs: u64,
    num_dangling: usize,
}

impl Degrees {
    /// Computes the outdegrees of `graph`.
    pub fn new(graph: &impl LinkGraph) -> Self {
        Self::new_with_logging(graph, no_logging![])
    }

    /// Computes the outdegrees of `graph`, logging progress on `pl`.
    pub fn new_with_logging(graph: &impl LinkGraph, pl: &mut impl ProgressLog) -> Self {
        let n = graph.num_nodes();
        let mut degrees = Vec::with_capacity(n);
        let mut num_arcs = 0;
        let mut num_dangling = 0;

        pl.item_name("node");
        pl.expected_updates(Some(n));
        pl.start("Computing outdegrees...");
        for node in 0..n {
            let d = graph.outdegree(node);
            num_arcs += d as u64;
            if d == 0 {
                num_dangling += 1;
            }
            degrees.push(d);
            pl.light_update();
        }
        pl.done();

        Self {
            degrees: degrees.into_boxed_slice(),
            num_arcs,
            num_dangling,
        }
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Returns true if the table has no entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Returns the sum of all outdegrees.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    /// Returns the number of nodes with outdegree zero.
    #[inline(always)]
    pub fn num_dangling(&self) -> usize {
        self.num_dangling
    }

    /// Returns the outdegrees as a slice.
    #[inline(always)]
    pub fn as_slice(&self) -> &[usize] {
        &self.degrees
    }
}

impl Index<usize> for Degrees {
    type Output = usize;

    #[inline(always)]
    fn index(&self, node: usize) -> &usize {
        &self.degrees[node]
    }
}
