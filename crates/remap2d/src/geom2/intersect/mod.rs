//! Pairwise edge intersection.
//!
//! Purpose
//! - Given two edges in the same arena, decide whether they cross, touch or
//!   overlap, merge coincident extremities, and return both edges cut at the
//!   shared points as chains of sub-edges.
//!
//! Why this design
//! - Intersectors only see `CurveGeom` value snapshots and report candidate
//!   points (`IntersectElement`). Every arena mutation (node merge, location
//!   declaration, sub-edge creation) happens in `Arena::intersect_with`, so
//!   the numeric code has no aliasing concerns.
//! - Dispatch is a closed enum over the supported kind pairs.

pub mod arc_arc;
pub mod arc_seg;
pub mod element;
pub mod seg_seg;
pub mod split;

use nalgebra::Vector2;
use std::cmp::Ordering;

use self::arc_arc::ArcArcIntersector;
use self::arc_seg::ArcSegIntersector;
use self::element::{IntersectElement, Limit};
use self::seg_seg::SegSegIntersector;
use super::arena::Arena;
use super::cfg::GeomCfg;
use super::composed::ElementaryEdge;
use super::curve::{Curve, CurveGeom};
use super::edge::EdgeId;
use super::error::GeomError;
use super::merge::MergePoints;
use super::node::NodeId;

/// Position of a point lying on the carrying curve of an edge, relative to
/// that edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    Start,
    End,
    Inside,
    OutBefore,
    OutAfter,
}

impl Placement {
    const OFFSET: u8 = 8;

    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Placement::End => 1,
            Placement::Inside => 2,
            Placement::OutBefore => 3,
            Placement::OutAfter => 4,
            Placement::Start => 5,
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.code() - 1) as usize
    }

    /// Single code for a `(start, end)` placement pair.
    #[inline]
    pub fn combine(self, end: Placement) -> u8 {
        self.code() * Self::OFFSET + end.code()
    }
}

/// Result of cutting two edges at their common points.
pub type SplitPair = (Vec<ElementaryEdge>, Vec<ElementaryEdge>);

#[derive(Clone, Copy, Debug)]
pub enum Intersector {
    SegSeg(SegSegIntersector),
    ArcArc(ArcArcIntersector),
    ArcSeg(ArcSegIntersector),
}

impl Intersector {
    /// Picks the intersector for the ordered pair `(g1, g2)`.
    pub fn new(g1: CurveGeom, g2: CurveGeom, cfg: &GeomCfg) -> Result<Self, GeomError> {
        use Curve::*;
        Ok(match (g1.curve, g2.curve) {
            (Line, Line) | (Line, InfiniteLine) | (InfiniteLine, Line) => {
                Intersector::SegSeg(SegSegIntersector::new(g1, g2, cfg))
            }
            (Arc(a1), Arc(a2)) => Intersector::ArcArc(ArcArcIntersector::new(g1, a1, g2, a2, cfg)),
            (Arc(a), Line) | (Arc(a), InfiniteLine) => {
                Intersector::ArcSeg(ArcSegIntersector::new(g1, a, g2, true, cfg))
            }
            (Line, Arc(a)) | (InfiniteLine, Arc(a)) => {
                Intersector::ArcSeg(ArcSegIntersector::new(g2, a, g1, false, cfg))
            }
            (InfiniteLine, InfiniteLine) => {
                return Err(GeomError::UnsupportedCurvePair {
                    first: g1.kind(),
                    second: g2.kind(),
                })
            }
        })
    }

    /// Returns `(obvious_no_intersection, overlapped)`.
    pub fn are_overlapped_or_only_colinears(&mut self) -> (bool, bool) {
        match self {
            Intersector::SegSeg(i) => i.are_overlapped_or_only_colinears(),
            Intersector::ArcArc(i) => i.are_overlapped_or_only_colinears(),
            Intersector::ArcSeg(i) => i.are_overlapped_or_only_colinears(),
        }
    }

    pub fn same_direction(&self) -> bool {
        match self {
            Intersector::SegSeg(i) => i.same_direction(),
            Intersector::ArcArc(i) => i.same_direction(),
            Intersector::ArcSeg(_) => true,
        }
    }

    /// Placements of the oriented extremities of the second curve on the
    /// first, for overlapped pairs.
    pub fn placements(
        &self,
        start: Vector2<f64>,
        end: Vector2<f64>,
        obvious_start: Option<Placement>,
        obvious_end: Option<Placement>,
    ) -> (Placement, Placement) {
        match self {
            Intersector::SegSeg(i) => (
                obvious_start.unwrap_or_else(|| i.placement(start)),
                obvious_end.unwrap_or_else(|| i.placement(end)),
            ),
            Intersector::ArcArc(i) => i.placements(start, end, obvious_start, obvious_end),
            // A line and an arc never overlap.
            Intersector::ArcSeg(_) => (Placement::OutBefore, Placement::OutBefore),
        }
    }

    /// Raw candidate points, in caller order. Must follow a call to
    /// `are_overlapped_or_only_colinears` that reported neither case.
    pub fn intersections(&self) -> Vec<IntersectElement> {
        match self {
            Intersector::SegSeg(i) => i.intersections(),
            Intersector::ArcArc(i) => i.intersections(),
            Intersector::ArcSeg(i) => i.intersections(),
        }
    }
}

impl Arena {
    /// Intersects `e1` with `e2`.
    ///
    /// Returns `Ok(None)` when the edges neither cross nor overlap. Otherwise
    /// returns both edges expressed as chains of sub-edges; shared portions
    /// are the same `EdgeId` in both chains and are marked `FullOn`. Merged
    /// extremities are recorded in `merge`.
    pub fn intersect_with(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        merge: &mut MergePoints,
        cfg: &GeomCfg,
    ) -> Result<Option<SplitPair>, GeomError> {
        let prec = cfg.precision;
        if self
            .edge(e1)
            .bounds
            .nearly_am_i_intersecting_with(&self.edge(e2).bounds, prec)
            .is_none()
        {
            return Ok(None);
        }
        let g1 = self.geom(e1);
        let g2 = self.geom(e2);
        let mut ix = Intersector::new(g1, g2, cfg)?;
        let (obvious_no, overlapped) = ix.are_overlapped_or_only_colinears();
        if overlapped {
            return self.intersect_overlapped(e1, e2, &ix, merge, prec);
        }
        if obvious_no {
            return Ok(None);
        }
        let elements = ix.intersections();
        let Some((nodes, order)) = self.keep_relevant_points(e1, e2, &g1, &g2, elements, merge, prec)
        else {
            return Ok(None);
        };
        if nodes.is_empty() {
            return Err(GeomError::EmptyIntersection);
        }

        let mut out1 = Vec::with_capacity(nodes.len() + 1);
        let mut last = self.edge(e1).start;
        for &n in &nodes {
            self.push_sub_edge(e1, last, n, &mut out1);
            last = n;
        }
        let end1 = self.edge(e1).end;
        self.push_sub_edge(e1, last, end1, &mut out1);

        let mut out2 = Vec::with_capacity(nodes.len() + 1);
        let mut last = self.edge(e2).start;
        let mut along2 = nodes;
        if !order {
            along2.reverse();
        }
        for n in along2 {
            self.push_sub_edge(e2, last, n, &mut out2);
            last = n;
        }
        let end2 = self.edge(e2).end;
        self.push_sub_edge(e2, last, end2, &mut out2);
        Ok(Some((out1, out2)))
    }

    /// Splits `e1` and `e2` as if they lay on a common curve. `Ok(None)`
    /// when they only touch or are apart.
    pub fn split_as_overlapped(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        merge: &mut MergePoints,
        cfg: &GeomCfg,
    ) -> Result<Option<SplitPair>, GeomError> {
        let mut ix = Intersector::new(self.geom(e1), self.geom(e2), cfg)?;
        let _ = ix.are_overlapped_or_only_colinears();
        self.intersect_overlapped(e1, e2, &ix, merge, cfg.precision)
    }

    /// Filters candidate points: merges coincident extremities, drops points
    /// outside either curve and materializes the others as nodes. Returns the
    /// kept nodes sorted along `e1` and whether they are also increasing
    /// along `e2`.
    #[allow(clippy::too_many_arguments)]
    fn keep_relevant_points(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        g1: &CurveGeom,
        g2: &CurveGeom,
        elements: Vec<IntersectElement>,
        merge: &mut MergePoints,
        prec: f64,
    ) -> Option<(Vec<NodeId>, bool)> {
        let mut kept: Vec<IntersectElement> = Vec::with_capacity(elements.len());
        for mut el in elements {
            if el.is_on_merged_extremity() {
                self.perform_merging(e1, e2, &el, merge, prec);
                continue;
            }
            let first = (self.edge(e1).start, self.edge(e1).end);
            let second = (self.edge(e2).start, self.edge(e2).end);
            match el.limit(g1, g2, first, second) {
                Limit::Alone => continue,
                Limit::On => {
                    if let Some(n) = el.node {
                        self.node_mut(n).loc = el.loc;
                    }
                    kept.push(el);
                }
                Limit::None => {
                    if !el.is_included_by_both(g1, g2) {
                        continue;
                    }
                    el.node = Some(self.add_node_with_loc(el.pos, el.loc));
                    kept.push(el);
                }
            }
        }
        if kept.is_empty() {
            return None;
        }
        let order = if kept.len() == 1 {
            true
        } else {
            kept.sort_by(|a, b| {
                if g1.is_lower(a.val1, b.val1, prec) {
                    Ordering::Less
                } else if g1.is_lower(b.val1, a.val1, prec) {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            });
            let (front, back) = (kept[0], kept[kept.len() - 1]);
            g2.is_lower(front.val2, back.val2, prec)
        };
        Some((kept.iter().filter_map(|el| el.node).collect(), order))
    }

    /// Replaces `e1`'s coincident extremity by `e2`'s node.
    fn perform_merging(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        el: &IntersectElement,
        merge: &mut MergePoints,
        prec: f64,
    ) {
        let (s2, end2) = (self.edge(e2).start, self.edge(e2).end);
        if el.start1 && el.start2 && self.change_start_node_with(e1, s2, prec) {
            self.node_mut(s2).declare_on_lim();
            merge.start1_on_start2();
        }
        if el.start1 && el.end2 && self.change_start_node_with(e1, end2, prec) {
            self.node_mut(end2).declare_on_lim();
            merge.start1_on_end2();
        }
        if el.end1 && el.start2 && self.change_end_node_with(e1, s2, prec) {
            self.node_mut(s2).declare_on_lim();
            merge.end1_on_start2();
        }
        if el.end1 && el.end2 && self.change_end_node_with(e1, end2, prec) {
            self.node_mut(end2).declare_on_lim();
            merge.end1_on_end2();
        }
    }

    /// Appends the part of `e` between `s` and `t`; the full edge is reused
    /// as is and degenerate pieces at an extremity are skipped.
    fn push_sub_edge(&mut self, e: EdgeId, s: NodeId, t: NodeId, out: &mut Vec<ElementaryEdge>) {
        let edge = *self.edge(e);
        if (s == edge.start && t == edge.start) || (s == edge.end && t == edge.end) {
            return;
        }
        let id = if s == edge.start && t == edge.end {
            e
        } else {
            self.build_edge_lying_on(e, s, t, true)
        };
        out.push(ElementaryEdge::new(id, true));
    }

    /// Placement of an extremity of `e2` that coincides with one of `e1`;
    /// `e1` then takes `n` as that extremity.
    fn obvious_placement(
        &mut self,
        e1: EdgeId,
        n: NodeId,
        merge: &mut MergePoints,
        prec: f64,
    ) -> Option<Placement> {
        let edge = *self.edge(e1);
        if self.node(n).is_equal(self.node(edge.start), prec) {
            if self.change_start_node_with(e1, n, prec) {
                merge.start1_replaced();
                self.node_mut(n).declare_on_lim();
            }
            return Some(Placement::Start);
        }
        if self.node(n).is_equal(self.node(edge.end), prec) {
            if self.change_end_node_with(e1, n, prec) {
                merge.end1_replaced();
                self.node_mut(n).declare_on_lim();
            }
            return Some(Placement::End);
        }
        None
    }

    fn intersect_overlapped(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        ix: &Intersector,
        merge: &mut MergePoints,
        prec: f64,
    ) -> Result<Option<SplitPair>, GeomError> {
        let dir = ix.same_direction();
        let edge2 = *self.edge(e2);
        let (ns, ne) = if dir {
            (edge2.start, edge2.end)
        } else {
            (edge2.end, edge2.start)
        };
        let obvious_start = self.obvious_placement(e1, ns, merge, prec);
        let obvious_end = self.obvious_placement(e1, ne, merge, prec);
        let (ps, pe) = ix.placements(self.pos(ns), self.pos(ne), obvious_start, obvious_end);
        split::split_overlapped_edges(self, e1, e2, ns, ne, dir, ps, pe)
    }
}

/// Points where `g2` crosses `g1` strictly inside both curves, or `None`
/// when the pair is obviously disjoint or overlapped. Works on snapshots
/// only; used by ray casting.
pub fn crossing_elements(
    g1: CurveGeom,
    g2: CurveGeom,
    cfg: &GeomCfg,
) -> Result<Option<Vec<IntersectElement>>, GeomError> {
    let mut ix = Intersector::new(g1, g2, cfg)?;
    let (obvious_no, overlapped) = ix.are_overlapped_or_only_colinears();
    if obvious_no || overlapped {
        return Ok(None);
    }
    Ok(Some(
        ix.intersections()
            .into_iter()
            .filter(|el| el.is_included_by_both(&g1, &g2))
            .collect(),
    ))
}
