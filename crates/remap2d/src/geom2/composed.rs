//! Chains of oriented edges.
//!
//! Purpose
//! - `ElementaryEdge` is an edge handle plus a traversal direction.
//! - `Chain` is an ordered list of elementary edges: a cell boundary when
//!   closed, a partial boundary while polygons are being rebuilt.
//!
//! Why this design
//! - Chains hold handles only; every quantity is read through the `Arena`
//!   passed to the method. Cloning a chain is cheap and shares its edges, so a
//!   split or a classification written on an edge is seen by every chain that
//!   references it.
//! - Normalization visits every distinct node and edge once, tracked by
//!   explicit `Vec<bool>` side tables rather than flags stored on the nodes.
//!
//! References
//! - Area and first moments by Green's theorem: `∮ -y dx` and `∮ (-xy, -y²/2) dx`.

use nalgebra::Vector2;
use std::collections::BTreeSet;
use std::f64::consts::PI;

use super::arena::Arena;
use super::bounds::{Bounds, Position};
use super::cfg::{GeomCfg, Robustness};
use super::curve::{CurveGeom, CurveKind};
use super::edge::{EdgeId, EdgeLoc};
use super::error::GeomError;
use super::intersect::crossing_elements;
use super::node::{NodeId, NodeLoc};
use super::num::slope_of;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementaryEdge {
    pub edge: EdgeId,
    /// False when the edge is traversed from its end to its start.
    pub direction: bool,
}

impl ElementaryEdge {
    #[inline]
    pub fn new(edge: EdgeId, direction: bool) -> Self {
        Self { edge, direction }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self {
            edge: self.edge,
            direction: !self.direction,
        }
    }
}

impl Arena {
    #[inline]
    pub fn el_start(&self, el: ElementaryEdge) -> NodeId {
        let e = self.edge(el.edge);
        if el.direction {
            e.start
        } else {
            e.end
        }
    }

    #[inline]
    pub fn el_end(&self, el: ElementaryEdge) -> NodeId {
        let e = self.edge(el.edge);
        if el.direction {
            e.end
        } else {
            e.start
        }
    }

    pub fn el_change_start_node_with(&mut self, el: ElementaryEdge, n: NodeId, prec: f64) -> bool {
        if el.direction {
            self.change_start_node_with(el.edge, n, prec)
        } else {
            self.change_end_node_with(el.edge, n, prec)
        }
    }

    pub fn el_change_end_node_with(&mut self, el: ElementaryEdge, n: NodeId, prec: f64) -> bool {
        if el.direction {
            self.change_end_node_with(el.edge, n, prec)
        } else {
            self.change_start_node_with(el.edge, n, prec)
        }
    }

    /// Signed `∫ -y dx` along the traversal direction.
    #[inline]
    pub fn el_area_of_zone(&self, el: ElementaryEdge) -> f64 {
        let a = self.geom(el.edge).area_of_zone();
        if el.direction {
            a
        } else {
            -a
        }
    }

    #[inline]
    pub fn el_barycenter_of_zone(&self, el: ElementaryEdge) -> Vector2<f64> {
        let b = self.geom(el.edge).barycenter_of_zone();
        if el.direction {
            b
        } else {
            -b
        }
    }

    /// Full location of `el` against `pol`, deduced from the previous
    /// element's location and the endpoint locations when possible, by ray
    /// casting otherwise. Only valid when `el` is entirely in, out or on.
    pub fn locate_fully(
        &mut self,
        el: ElementaryEdge,
        pol: &Chain,
        prec_loc: EdgeLoc,
        cfg: &GeomCfg,
    ) -> Result<EdgeLoc, GeomError> {
        let loc = self.edge_loc(el.edge);
        if loc != EdgeLoc::Unknown {
            return Ok(loc);
        }
        let start = self.node(self.el_start(el)).loc;
        let end = self.node(self.el_end(el)).loc;
        let crosses_at_start = start == NodeLoc::On;
        let keeps_at_start = matches!(start, NodeLoc::In | NodeLoc::OnTangent);
        match prec_loc {
            EdgeLoc::FullIn if crosses_at_start => self.declare_edge_out(el.edge),
            EdgeLoc::FullIn if keeps_at_start => self.declare_edge_in(el.edge),
            EdgeLoc::FullOut if crosses_at_start => self.declare_edge_in(el.edge),
            EdgeLoc::FullOut if keeps_at_start => self.declare_edge_out(el.edge),
            _ if start == NodeLoc::In || end == NodeLoc::In => self.declare_edge_in(el.edge),
            _ if start == NodeLoc::Out || end == NodeLoc::Out => self.declare_edge_out(el.edge),
            _ => return self.locate_absolute(el, pol, cfg),
        }
        Ok(self.edge_loc(el.edge))
    }

    /// Location of `el` from its representative point.
    pub fn locate_absolute(
        &mut self,
        el: ElementaryEdge,
        pol: &Chain,
        cfg: &GeomCfg,
    ) -> Result<EdgeLoc, GeomError> {
        let repr = self.geom(el.edge).representative();
        if pol.contains(repr, self, cfg)? {
            self.declare_edge_in(el.edge);
        } else {
            self.declare_edge_out(el.edge);
        }
        Ok(self.edge_loc(el.edge))
    }
}

/// Ordered chain of oriented edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
    pub elems: Vec<ElementaryEdge>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elems(elems: Vec<ElementaryEdge>) -> Self {
        Self { elems }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    #[inline]
    pub fn push(&mut self, el: ElementaryEdge) {
        self.elems.push(el);
    }

    pub fn push_edge(&mut self, edge: EdgeId, direction: bool) {
        self.elems.push(ElementaryEdge::new(edge, direction));
    }

    pub fn append(&mut self, other: Chain) {
        self.elems.extend(other.elems);
    }

    /// Reverses the traversal: order and every direction flag.
    pub fn reverse(&mut self) {
        self.elems.reverse();
        for el in self.elems.iter_mut() {
            el.direction = !el.direction;
        }
    }

    pub fn start_node(&self, arena: &Arena) -> Option<NodeId> {
        self.elems.first().map(|&el| arena.el_start(el))
    }

    pub fn end_node(&self, arena: &Arena) -> Option<NodeId> {
        self.elems.last().map(|&el| arena.el_end(el))
    }

    /// Closed by identity: the last end is the first start.
    pub fn completed(&self, arena: &Arena) -> bool {
        match (self.start_node(arena), self.end_node(arena)) {
            (Some(s), Some(e)) => s == e,
            _ => false,
        }
    }

    /// Signed area; positive for counterclockwise chains.
    pub fn area(&self, arena: &Arena) -> f64 {
        self.elems.iter().map(|&el| arena.el_area_of_zone(el)).sum()
    }

    pub fn perimeter(&self, arena: &Arena) -> f64 {
        self.elems.iter().map(|el| arena.edge_length(el.edge)).sum()
    }

    pub fn hydraulic_diameter(&self, arena: &Arena) -> f64 {
        4.0 * self.area(arena).abs() / self.perimeter(arena)
    }

    /// Area barycenter of a closed chain.
    pub fn barycenter(&self, arena: &Arena) -> Vector2<f64> {
        let mut bary = Vector2::zeros();
        let mut area = 0.0;
        for &el in &self.elems {
            bary += arena.el_barycenter_of_zone(el);
            area += arena.el_area_of_zone(el);
        }
        bary / area
    }

    /// Like `barycenter`, but a chain of one or two elements (a curve rather
    /// than a surface) gives the middle of its last curve.
    pub fn barycenter_general(&self, arena: &Arena) -> Result<Vector2<f64>, GeomError> {
        match self.elems.len() {
            0 => Err(GeomError::invalid("barycenter of an empty chain")),
            1 | 2 => Ok(arena.geom(self.elems[self.elems.len() - 1].edge).barycenter()),
            _ => Ok(self.barycenter(arena)),
        }
    }

    /// Length-weighted barycenter of the curves.
    pub fn curve_barycenter(&self, arena: &Arena) -> Vector2<f64> {
        let mut bary = Vector2::zeros();
        let mut weight = 0.0;
        for el in &self.elems {
            let g = arena.geom(el.edge);
            let w = g.length();
            bary += w * g.barycenter();
            weight += w;
        }
        bary / weight
    }

    pub fn bounds(&self, arena: &Arena) -> Bounds {
        let mut b = Bounds::prepare_for_aggregation();
        for el in &self.elems {
            b.aggregate(&arena.edge(el.edge).bounds);
        }
        b
    }

    pub fn all_nodes(&self, arena: &Arena) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        for el in &self.elems {
            let e = arena.edge(el.edge);
            out.insert(e.start);
            out.insert(e.end);
        }
        out
    }

    pub fn is_node_in(&self, n: NodeId, arena: &Arena) -> bool {
        self.elems.iter().any(|el| {
            let e = arena.edge(el.edge);
            e.start == n || e.end == n
        })
    }

    pub fn presence_of_on(&self, arena: &Arena) -> bool {
        self.elems
            .iter()
            .any(|el| arena.edge_loc(el.edge) == EdgeLoc::FullOn)
    }

    pub fn presence_of_quadratic_edge(&self, arena: &Arena) -> bool {
        self.elems
            .iter()
            .any(|el| arena.geom(el.edge).kind() == CurveKind::Arc)
    }

    pub fn init_locations(&self, arena: &mut Arena) {
        for el in &self.elems {
            arena.init_edge_locs(el.edge);
        }
    }

    /// Resets both chains and marks the edges they share as `FullOn`.
    pub fn init_locations_with_other(first: &Chain, other: &Chain, arena: &mut Arena) {
        let s1: BTreeSet<EdgeId> = first.elems.iter().map(|el| el.edge).collect();
        let s2: BTreeSet<EdgeId> = other.elems.iter().map(|el| el.edge).collect();
        first.init_locations(arena);
        other.init_locations(arena);
        for &e in s1.intersection(&s2) {
            arena.declare_edge_on(e);
        }
    }

    /// Total length of the edges this chain shares (by identity) with `other`.
    pub fn common_length_with(&self, other: &Chain, arena: &Arena) -> f64 {
        self.elems
            .iter()
            .filter(|el| other.elems.iter().any(|o| o.edge == el.edge))
            .map(|el| arena.edge_length(el.edge))
            .sum()
    }

    /// Length classified `FullIn` or `FullOn`.
    pub fn dispatch_perimeter(&self, arena: &Arena) -> f64 {
        self.elems
            .iter()
            .filter(|el| matches!(arena.edge_loc(el.edge), EdgeLoc::FullIn | EdgeLoc::FullOn))
            .map(|el| arena.edge_length(el.edge))
            .sum()
    }

    /// `(in_part, on_part)` lengths.
    pub fn dispatch_perimeter_excl(&self, arena: &Arena) -> (f64, f64) {
        let mut inside = 0.0;
        let mut common = 0.0;
        for el in &self.elems {
            match arena.edge_loc(el.edge) {
                EdgeLoc::FullIn => inside += arena.edge_length(el.edge),
                EdgeLoc::FullOn => common += arena.edge_length(el.edge),
                _ => {}
            }
        }
        (inside, common)
    }

    /// Point-in-chain test selected by `cfg.robustness`.
    pub fn contains(&self, p: Vector2<f64>, arena: &Arena, cfg: &GeomCfg) -> Result<bool, GeomError> {
        match cfg.robustness {
            Robustness::Strict => self.is_in_or_out(p, arena, cfg),
            Robustness::Tolerant => self.is_in_or_out2(p, arena, cfg),
        }
    }

    /// Ray-casting parity test; `p` is assumed to be strictly in or out.
    pub fn is_in_or_out(&self, p: Vector2<f64>, arena: &Arena, cfg: &GeomCfg) -> Result<bool, GeomError> {
        if self.bounds(arena).nearly_locate(p, cfg.precision) == Position::Out {
            return Ok(false);
        }
        let nodes = self.all_nodes(arena);
        let (reference, crossings) = self.ray_crossings(p, &nodes, arena, cfg)?;
        let mut inside = false;
        for (val, loc) in crossings {
            if val >= reference {
                break;
            }
            if loc == NodeLoc::On {
                inside = !inside;
            }
        }
        Ok(inside)
    }

    /// Tolerant variant of `is_in_or_out`: a point within `precision` of a
    /// chain node or of a crossing along the ray is inside.
    pub fn is_in_or_out2(&self, p: Vector2<f64>, arena: &Arena, cfg: &GeomCfg) -> Result<bool, GeomError> {
        let prec = cfg.precision;
        let nodes = self.all_nodes(arena);
        if nodes.iter().any(|&n| (arena.pos(n) - p).norm() < prec) {
            return Ok(true);
        }
        let (reference, crossings) = self.ray_crossings(p, &nodes, arena, cfg)?;
        let mut inside = false;
        for (val, loc) in crossings {
            if (val - reference).abs() < prec {
                return Ok(true);
            }
            if val >= reference {
                break;
            }
            if loc == NodeLoc::On {
                inside = !inside;
            }
        }
        Ok(inside)
    }

    /// Casts a ray from `p` through the widest angular gap between the
    /// directions to the chain nodes, so that it grazes no vertex. Returns
    /// the parameter of `p` on the ray and the sorted, deduplicated
    /// crossings.
    fn ray_crossings(
        &self,
        p: Vector2<f64>,
        nodes: &BTreeSet<NodeId>,
        arena: &Arena,
        cfg: &GeomCfg,
    ) -> Result<(f64, Vec<(f64, NodeLoc)>), GeomError> {
        let mut radial: Vec<f64> = nodes.iter().map(|&n| slope_of(arena.pos(n) - p)).collect();
        radial.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        radial.dedup();
        let mut slope = 0.0;
        let mut widest = f64::NEG_INFINITY;
        for (i, &cur) in radial.iter().enumerate() {
            let next = radial.get(i + 1).copied().unwrap_or(PI + radial[0]);
            if next - cur > widest {
                widest = next - cur;
                slope = cur + widest / 2.0;
            }
        }
        let ray = CurveGeom::infinite_line(p, slope);
        let reference = ray.charact_value(p);
        let mut crossings: Vec<(f64, NodeLoc)> = Vec::new();
        for el in &self.elems {
            if let Some(found) = crossing_elements(ray, arena.geom(el.edge), cfg)? {
                crossings.extend(found.into_iter().map(|x| (x.val1, x.loc)));
            }
        }
        crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        crossings.dedup_by(|a, b| a.0 == b.0);
        Ok((reference, crossings))
    }

    fn apply_on_nodes_and_edges(
        &self,
        arena: &mut Arena,
        node_seen: &mut Vec<bool>,
        edge_seen: &mut Vec<bool>,
        bary: Vector2<f64>,
        dim: f64,
        forward: bool,
    ) {
        node_seen.resize(arena.node_count(), false);
        edge_seen.resize(arena.edge_count(), false);
        for el in &self.elems {
            let e = *arena.edge(el.edge);
            for n in [e.start, e.end] {
                if !node_seen[n.0] {
                    node_seen[n.0] = true;
                    let node = arena.node_mut(n);
                    if forward {
                        node.apply_similarity(bary, dim);
                    } else {
                        node.unapply_similarity(bary, dim);
                    }
                }
            }
            if !edge_seen[el.edge.0] {
                edge_seen[el.edge.0] = true;
                let edge = arena.edge_mut(el.edge);
                if forward {
                    edge.curve.apply_similarity(bary, dim);
                    edge.bounds.apply_similarity(bary, dim);
                } else {
                    edge.curve.unapply_similarity(bary, dim);
                    edge.bounds.unapply_similarity(bary, dim);
                }
            }
        }
    }

    /// Maps this chain into its own unit frame. Returns the characteristic
    /// dimension and the barycenter of the bounding box used.
    pub fn normalize_me(&self, arena: &mut Arena) -> (f64, Vector2<f64>) {
        let b = self.bounds(arena);
        let (dim, bary) = (b.characteristic_dim(), b.barycenter());
        let (mut nodes, mut edges) = (Vec::new(), Vec::new());
        self.apply_on_nodes_and_edges(arena, &mut nodes, &mut edges, bary, dim, true);
        (dim, bary)
    }

    /// Maps both chains into the unit frame of their common bounding box.
    /// Nodes and edges shared by the two chains are transformed once.
    pub fn normalize(&self, other: &Chain, arena: &mut Arena) -> (f64, Vector2<f64>) {
        let mut b = self.bounds(arena);
        b.aggregate(&other.bounds(arena));
        let (dim, bary) = (b.characteristic_dim(), b.barycenter());
        let (mut nodes, mut edges) = (Vec::new(), Vec::new());
        self.apply_on_nodes_and_edges(arena, &mut nodes, &mut edges, bary, dim, true);
        other.apply_on_nodes_and_edges(arena, &mut nodes, &mut edges, bary, dim, true);
        (dim, bary)
    }

    /// Inverse of `normalize`.
    pub fn unnormalize(&self, other: &Chain, arena: &mut Arena, bary: Vector2<f64>, dim: f64) {
        let (mut nodes, mut edges) = (Vec::new(), Vec::new());
        self.apply_on_nodes_and_edges(arena, &mut nodes, &mut edges, bary, dim, false);
        other.apply_on_nodes_and_edges(arena, &mut nodes, &mut edges, bary, dim, false);
    }
}
