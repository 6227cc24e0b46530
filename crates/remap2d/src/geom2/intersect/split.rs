//! Partition of two overlapping curves into shared and own sub-edges.
//!
//! The placement pair of the second curve's oriented extremities `(nS, nE)`
//! against the first curve selects a recipe in `SPLIT_TABLE`. Each recipe
//! gives the shared portion to both outputs through one edge handle and marks
//! it `FullOn` once, so lengths and areas are never counted twice.

use super::Placement;
use crate::geom2::arena::Arena;
use crate::geom2::composed::ElementaryEdge;
use crate::geom2::edge::EdgeId;
use crate::geom2::error::GeomError;
use crate::geom2::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitRecipe {
    /// Colinear but only touching (or apart): nothing to split.
    Disjoint,
    InsideOutAfter,
    InsideInside,
    OutBeforeInside,
    OutBeforeOutAfter,
    StartEnd,
    StartOutAfter,
    InsideEnd,
    OutBeforeEnd,
    StartInside,
    InsideStart,
    EndInside,
}

use SplitRecipe as R;

/// Rows: placement of `nS`; columns: placement of `nE`; both indexed by
/// `Placement::index`.
pub(crate) const SPLIT_TABLE: [[Option<SplitRecipe>; 5]; 5] = [
    // nS = End
    [None, Some(R::EndInside), None, Some(R::Disjoint), Some(R::Disjoint)],
    // nS = Inside
    [
        Some(R::InsideEnd),
        Some(R::InsideInside),
        None,
        Some(R::InsideOutAfter),
        Some(R::InsideStart),
    ],
    // nS = OutBefore
    [
        Some(R::OutBeforeEnd),
        Some(R::OutBeforeInside),
        Some(R::Disjoint),
        Some(R::OutBeforeOutAfter),
        Some(R::Disjoint),
    ],
    // nS = OutAfter
    [None, None, None, Some(R::Disjoint), None],
    // nS = Start
    [
        Some(R::StartEnd),
        Some(R::StartInside),
        None,
        Some(R::StartOutAfter),
        None,
    ],
];

pub fn recipe_for(p_start: Placement, p_end: Placement) -> Result<SplitRecipe, GeomError> {
    SPLIT_TABLE[p_start.index()][p_end.index()].ok_or(GeomError::UnreachedSplitCode {
        code: p_start.combine(p_end),
    })
}

struct Splitter<'a> {
    arena: &'a mut Arena,
    e1: EdgeId,
    e2: EdgeId,
    ns: NodeId,
    ne: NodeId,
    dir: bool,
}

#[inline]
fn el(edge: EdgeId, direction: bool) -> ElementaryEdge {
    ElementaryEdge { edge, direction }
}

impl Splitter<'_> {
    #[inline]
    fn build(&mut self, a: NodeId, b: NodeId, direction: bool) -> EdgeId {
        self.arena.build_edge_lying_on(self.e1, a, b, direction)
    }

    /// Places `(a, b)` in a two-slot output ordered by `dir`.
    #[inline]
    fn pair(&self, first: ElementaryEdge, second: ElementaryEdge) -> Vec<ElementaryEdge> {
        if self.dir {
            vec![first, second]
        } else {
            vec![second, first]
        }
    }

    fn run(&mut self, recipe: SplitRecipe) -> Option<(Vec<ElementaryEdge>, Vec<ElementaryEdge>)> {
        let (e1, e2, ns, ne, dir) = (self.e1, self.e2, self.ns, self.ne, self.dir);
        let s1 = self.arena.edge(e1).start;
        let end1 = self.arena.edge(e1).end;
        match recipe {
            R::Disjoint => None,
            R::InsideOutAfter => {
                let head = self.build(s1, ns, true);
                let shared = self.build(ns, end1, true);
                self.arena.declare_edge_on(shared);
                let tail = self.build(end1, ne, dir);
                let out2 = self.pair(el(shared, dir), el(tail, true));
                Some((vec![el(head, true), el(shared, true)], out2))
            }
            R::InsideInside => {
                let s1_pos = self.arena.pos(s1);
                let g2 = self.arena.geom(e2);
                if !g2.is_in(g2.charact_value(s1_pos)) {
                    let head = self.build(s1, ns, true);
                    let tail = self.build(ne, end1, true);
                    self.arena.declare_edge_on(e2);
                    Some((
                        vec![el(head, true), el(e2, dir), el(tail, true)],
                        vec![el(e2, true)],
                    ))
                } else {
                    let first = self.build(s1, ne, true);
                    self.arena.declare_edge_on(first);
                    let middle = self.build(ne, ns, true);
                    let last = self.build(ns, end1, true);
                    self.arena.declare_edge_on(last);
                    let back = self.build(end1, s1, true);
                    let out1 = vec![el(first, true), el(middle, true), el(last, true)];
                    let out2 = if dir {
                        vec![el(last, dir), el(back, dir), el(first, dir)]
                    } else {
                        vec![el(first, dir), el(back, dir), el(last, dir)]
                    };
                    Some((out1, out2))
                }
            }
            R::OutBeforeInside => {
                let shared = self.build(s1, ne, true);
                let tail = self.build(ne, end1, true);
                let lead = self.build(ns, s1, dir);
                self.arena.declare_edge_on(shared);
                let out2 = self.pair(el(lead, true), el(shared, dir));
                Some((vec![el(shared, true), el(tail, true)], out2))
            }
            R::OutBeforeOutAfter => {
                let lead = self.build(ns, s1, dir);
                self.arena.declare_edge_on(e1);
                let trail = self.build(end1, ne, dir);
                let out2 = if dir {
                    vec![el(lead, true), el(e1, dir), el(trail, true)]
                } else {
                    vec![el(trail, true), el(e1, dir), el(lead, true)]
                };
                Some((vec![el(e1, true)], out2))
            }
            R::StartEnd => {
                self.arena.declare_edge_on(e1);
                Some((vec![el(e1, true)], vec![el(e1, dir)]))
            }
            R::StartOutAfter => {
                self.arena.declare_edge_on(e1);
                let trail = self.build(end1, ne, dir);
                let out2 = self.pair(el(e1, dir), el(trail, true));
                Some((vec![el(e1, true)], out2))
            }
            R::InsideEnd => {
                let head = self.build(s1, ns, true);
                self.arena.declare_edge_on(e2);
                Some((vec![el(head, true), el(e2, dir)], vec![el(e2, true)]))
            }
            R::OutBeforeEnd => {
                let lead = self.build(ns, s1, dir);
                self.arena.declare_edge_on(e1);
                let out2 = self.pair(el(lead, true), el(e1, dir));
                Some((vec![el(e1, true)], out2))
            }
            R::StartInside => {
                let tail = self.build(ne, end1, true);
                self.arena.declare_edge_on(e2);
                Some((vec![el(e2, dir), el(tail, true)], vec![el(e2, true)]))
            }
            R::InsideStart => {
                let shared = self.build(ns, end1, true);
                self.arena.declare_edge_on(shared);
                let head = self.build(s1, ns, true);
                let trail = self.build(end1, ne, dir);
                let out2 = self.pair(el(shared, dir), el(trail, true));
                Some((vec![el(head, true), el(shared, true)], out2))
            }
            R::EndInside => {
                let shared = self.build(s1, ne, true);
                self.arena.declare_edge_on(shared);
                let tail = self.build(ne, end1, true);
                let back = self.build(end1, s1, dir);
                let out2 = self.pair(el(back, true), el(shared, dir));
                Some((vec![el(shared, true), el(tail, true)], out2))
            }
        }
    }
}

/// Splits two overlapping edges. `ns`/`ne` are the extremities of `e2`
/// oriented along `e1` (`dir` tells whether that is `e2`'s own direction).
/// Returns `None` when the edges only touch.
#[allow(clippy::too_many_arguments)]
pub fn split_overlapped_edges(
    arena: &mut Arena,
    e1: EdgeId,
    e2: EdgeId,
    ns: NodeId,
    ne: NodeId,
    dir: bool,
    p_start: Placement,
    p_end: Placement,
) -> Result<Option<(Vec<ElementaryEdge>, Vec<ElementaryEdge>)>, GeomError> {
    let recipe = recipe_for(p_start, p_end)?;
    let mut splitter = Splitter {
        arena,
        e1,
        e2,
        ns,
        ne,
        dir,
    };
    Ok(splitter.run(recipe))
}
