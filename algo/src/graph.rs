/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Link graphs.
//!
//! The rank engine accesses graphs only through the [`LinkGraph`] trait, which
//! exposes the number of nodes and, for each node, its successors and its
//! predecessors. The crate provides a dense implementation, [`DenseGraph`],
//! storing the adjacency matrix as a flat vector of booleans in row-major
//! order; other representations (e.g., adjacency lists) can be used by
//! implementing the trait.

use crate::PageRankError;

/// A directed graph with nodes numbered from 0 to
/// [`num_nodes`](LinkGraph::num_nodes) (excluded).
///
/// Self-loops are ordinary arcs. Implementations must be immutable while a
/// computation borrows them: the engine reads successors and predecessors from
/// several threads at the same time.
pub trait LinkGraph {
    /// Returns the number of nodes.
    fn num_nodes(&self) -> usize;

    /// Returns the successors of `node` in increasing order.
    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_;

    /// Returns the predecessors of `node` in increasing order.
    fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_;

    /// Returns the number of successors of `node`.
    fn outdegree(&self, node: usize) -> usize {
        self.successors(node).count()
    }

    /// Returns the number of arcs.
    fn num_arcs(&self) -> u64 {
        (0..self.num_nodes())
            .map(|node| self.outdegree(node) as u64)
            .sum()
    }
}

impl<G: LinkGraph + ?Sized> LinkGraph for &G {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        (**self).successors(node)
    }

    #[inline(always)]
    fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        (**self).predecessors(node)
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        (**self).outdegree(node)
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        (**self).num_arcs()
    }
}

/// A [`LinkGraph`] backed by a dense adjacency matrix.
///
/// Entry (*i*, *j*) is true if there is an arc from *i* to *j*. The matrix is
/// stored contiguously in row-major order, so enumerating successors scans a
/// row and enumerating predecessors scans a column. Memory usage is quadratic
/// in the number of nodes.
///
/// # Examples
///
/// ```
/// use linkrank::graph::{DenseGraph, LinkGraph};
///
/// let g = DenseGraph::from_arcs(3, [(0, 1), (0, 2), (1, 2), (2, 2)]).unwrap();
/// assert_eq!(g.num_arcs(), 4);
/// assert_eq!(g.successors(0).collect::<Vec<_>>(), vec![1, 2]);
/// assert_eq!(g.predecessors(2).collect::<Vec<_>>(), vec![0, 1, 2]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseGraph {
    num_nodes: usize,
    links: Box<[bool]>,
}

/// Returns the number of entries of an `n` × `n` matrix.
fn matrix_len(n: usize) -> Result<usize, PageRankError> {
    n.checked_mul(n)
        .ok_or(PageRankError::TooLarge { num_nodes: n })
}

impl DenseGraph {
    /// Creates a graph with `n` nodes and no arcs.
    ///
    /// # Panics
    ///
    /// Panics if `n` × `n` overflows a `usize`.
    pub fn empty(n: usize) -> Self {
        let len = matrix_len(n).unwrap_or_else(|err| panic!("{err}"));
        Self {
            num_nodes: n,
            links: vec![false; len].into_boxed_slice(),
        }
    }

    /// Creates a graph from the rows of an adjacency matrix.
    ///
    /// Returns [`PageRankError::NotSquare`] if some row has a length different
    /// from the number of rows, and [`PageRankError::TooLarge`] if the matrix
    /// cannot be represented.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self, PageRankError> {
        let n = rows.len();
        let mut links = Vec::with_capacity(matrix_len(n)?);
        for (row, entries) in rows.iter().enumerate() {
            let entries = entries.as_ref();
            if entries.len() != n {
                return Err(PageRankError::NotSquare {
                    row,
                    len: entries.len(),
                    num_nodes: n,
                });
            }
            links.extend_from_slice(entries);
        }
        Ok(Self {
            num_nodes: n,
            links: links.into_boxed_slice(),
        })
    }

    /// Creates a graph with `n` nodes from a list of arcs.
    ///
    /// Duplicate arcs are merged. Returns [`PageRankError::ArcOutOfBounds`] if
    /// an arc mentions a node greater than or equal to `n`, and
    /// [`PageRankError::TooLarge`] if the matrix cannot be represented.
    pub fn from_arcs(
        n: usize,
        arcs: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, PageRankError> {
        matrix_len(n)?;
        let mut g = Self::empty(n);
        for (src, dst) in arcs {
            if src >= n || dst >= n {
                return Err(PageRankError::ArcOutOfBounds {
                    src,
                    dst,
                    num_nodes: n,
                });
            }
            g.add_arc(src, dst);
        }
        Ok(g)
    }

    /// Adds an arc to the graph, returning true if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if one of the given nodes is greater than or equal to the number
    /// of nodes in the graph.
    pub fn add_arc(&mut self, src: usize, dst: usize) -> bool {
        let max = src.max(dst);
        assert!(
            max < self.num_nodes,
            "Node {} does not exist (the graph has {} nodes)",
            max,
            self.num_nodes
        );
        let entry = &mut self.links[src * self.num_nodes + dst];
        !std::mem::replace(entry, true)
    }

    /// Returns whether there is an arc from `src` to `dst`.
    #[inline(always)]
    pub fn has_arc(&self, src: usize, dst: usize) -> bool {
        self.links[src * self.num_nodes + dst]
    }

    /// Returns the row of the adjacency matrix associated with `node`.
    #[inline(always)]
    pub fn row(&self, node: usize) -> &[bool] {
        let start = node * self.num_nodes;
        &self.links[start..start + self.num_nodes]
    }
}

impl LinkGraph for DenseGraph {
    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(node)
            .iter()
            .enumerate()
            .filter_map(|(j, &arc)| arc.then_some(j))
    }

    fn predecessors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        let n = self.num_nodes;
        (0..n).filter(move |&j| self.links[j * n + node])
    }

    fn outdegree(&self, node: usize) -> usize {
        self.row(node).iter().filter(|&&arc| arc).count()
    }
}
