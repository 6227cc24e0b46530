//! Closed chains and the boolean operations between them.
//!
//! Purpose
//! - Build cell boundaries from corner points (straight or quadratic cells).
//! - Intersect two closed chains: split both at every common point, locate
//!   the split edges of one chain against the other, and rebuild the closed
//!   intersection polygons from the inner runs.
//!
//! Why this design
//! - All operations work on copies of the chains inside the caller's arena.
//!   Splitting shares sub-edges between the two copies, so locations written
//!   while rebuilding are visible to both; callers that reuse chains after an
//!   operation must call `init_locations`.
//! - Chains are indexed vectors. Each element of the second chain remembers
//!   from which index of the first chain its scan resumes after a split;
//!   later splices only happen at or after that index, so it stays valid.

use nalgebra::Vector2;

use super::arena::Arena;
use super::cfg::{GeomCfg, CLOSE_LOOP_FACTOR};
use super::composed::{Chain, ElementaryEdge};
use super::edge::EdgeLoc;
use super::error::GeomError;
use super::merge::MergePoints;
use super::node::{positions_equal, NodeId};

impl Chain {
    /// Straight-sided closed polygon through `points`.
    pub fn build_linear_polygon(arena: &mut Arena, points: &[Vector2<f64>]) -> Chain {
        let nodes: Vec<NodeId> = points.iter().map(|&p| arena.add_node(p)).collect();
        let n = nodes.len();
        let mut chain = Chain::new();
        for i in 0..n {
            let e = arena.add_line(nodes[i], nodes[(i + 1) % n]);
            chain.push_edge(e, true);
        }
        chain
    }

    /// Quadratic closed polygon: the first half of `points` are the corners,
    /// the second half the middles of the sides (side `i` joins corner `i` to
    /// corner `i + 1`). A side whose middle is aligned with its corners is a
    /// line.
    pub fn build_arc_circle_polygon(
        arena: &mut Arena,
        points: &[Vector2<f64>],
        cfg: &GeomCfg,
    ) -> Result<Chain, GeomError> {
        if points.len() % 2 != 0 {
            return Err(GeomError::invalid(format!(
                "quadratic polygon needs an even number of points, got {}",
                points.len()
            )));
        }
        let half = points.len() / 2;
        let corners: Vec<NodeId> = points[..half].iter().map(|&p| arena.add_node(p)).collect();
        let mut chain = Chain::new();
        for i in 0..half {
            let e = arena.add_edge_from_3_points(
                corners[i],
                points[i + half],
                corners[(i + 1) % half],
                cfg,
            );
            chain.push_edge(e, true);
        }
        Ok(chain)
    }

    /// Makes the first start the same node as the last end.
    pub fn close_me(&self, arena: &mut Arena, prec: f64) -> Result<(), GeomError> {
        let (Some(&first), Some(&last)) = (self.elems.first(), self.elems.last()) else {
            return Err(GeomError::NotClosed);
        };
        let end = arena.el_end(last);
        if arena.el_change_start_node_with(first, end, prec) {
            Ok(())
        } else {
            Err(GeomError::NotClosed)
        }
    }

    /// Moves the first element to the back.
    pub fn circular_permute(&mut self) {
        if self.elems.len() > 1 {
            self.elems.rotate_left(1);
        }
    }

    /// True when two edges of the chain cross or overlap (besides sharing
    /// extremities). Runs on a scratch copy of the arena.
    pub fn is_butterfly(&self, arena: &Arena, cfg: &GeomCfg) -> Result<bool, GeomError> {
        let mut scratch = arena.clone();
        for (i, a) in self.elems.iter().enumerate() {
            for b in &self.elems[i + 1..] {
                let mut merge = MergePoints::new();
                if scratch.intersect_with(a.edge, b.edge, &mut merge, cfg)?.is_some() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Closed polygons bounding `self ∩ other`.
    pub fn intersect_my_self_with(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<Vec<Chain>, GeomError> {
        let mut cpy_this = self.clone();
        let mut cpy_other = other.clone();
        Chain::split_polygons_each_other(&mut cpy_this, &mut cpy_other, arena, cfg)?;
        self.perform_locating_operation(&cpy_other, arena, cfg)?;
        other.build_intersection_polygons(&cpy_this, &cpy_other, arena, cfg)
    }

    /// Overlap area of two closed chains. Both chains are first mapped into
    /// the unit frame of their common bounding box (in place).
    pub fn intersect_with_abs(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<f64, GeomError> {
        let (fact, _) = self.normalize(other, arena);
        let polys = self.intersect_my_self_with(other, arena, cfg)?;
        let area: f64 = polys.iter().map(|p| p.area(arena).abs()).sum();
        Ok(area * fact * fact)
    }

    /// `intersect_with_abs` plus the barycenter of the overlap in the
    /// original frame (zero when the overlap is empty).
    pub fn intersect_with_abs_and_barycenter(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(f64, Vector2<f64>), GeomError> {
        let (fact, bb_bary) = self.normalize(other, arena);
        let polys = self.intersect_my_self_with(other, arena, cfg)?;
        let mut total = 0.0;
        let mut bary = Vector2::zeros();
        for p in &polys {
            let area = p.area(arena).abs();
            total += area;
            bary += p.barycenter(arena) * area;
        }
        if total > f64::MIN_POSITIVE {
            bary = bary / total * fact + bb_bary;
        }
        Ok((total * fact * fact, bary))
    }

    /// Overlap length of two curve chains. Segment cells are chains of two
    /// edges going back and forth, hence the final halving. The flag tells
    /// whether the overlap is a single such back and forth pair.
    pub fn intersect_with_abs_1d(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(f64, bool), GeomError> {
        let (fact, _) = self.normalize(other, arena);
        let mut cpy_this = self.clone();
        let mut cpy_other = other.clone();
        Chain::split_polygons_each_other(&mut cpy_this, &mut cpy_other, arena, cfg)?;
        self.perform_locating_operation(&cpy_other, arena, cfg)?;
        let zip = cpy_other.zip_consecutive_in_segments(arena);
        let same_ends = |a: ElementaryEdge, b: ElementaryEdge| {
            let (ga, gb) = (arena.geom(a.edge), arena.geom(b.edge));
            let eq = |a, b| positions_equal(a, b, cfg.precision);
            (eq(ga.start, gb.start) && eq(ga.end, gb.end))
                || (eq(ga.start, gb.end) && eq(ga.end, gb.start))
        };
        let is_colinear =
            zip.len() == 1 && zip[0].len() == 2 && same_ends(zip[0].elems[0], zip[0].elems[1]);
        let length: f64 = zip.iter().map(|z| z.perimeter(arena).abs()).sum();
        Ok((length * fact / 2.0, is_colinear))
    }

    /// `(this_only, other_only, common)` perimeter parts.
    pub fn intersect_for_perimeter(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(f64, f64, f64), GeomError> {
        let mut cpy_this = self.clone();
        let mut cpy_other = other.clone();
        Chain::split_polygons_each_other(&mut cpy_this, &mut cpy_other, arena, cfg)?;
        self.perform_locating_operation(&cpy_other, arena, cfg)?;
        other.perform_locating_operation(&cpy_this, arena, cfg)?;
        let (this_part, common1) = cpy_this.dispatch_perimeter_excl(arena);
        let (other_part, common2) = cpy_other.dispatch_perimeter_excl(arena);
        Ok((this_part, other_part, (common1 + common2) / 2.0))
    }

    /// Per-edge covered length (in or on the other chain) of both chains.
    /// Common parts are counted on both sides.
    pub fn intersect_for_perimeter_advanced(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(Vec<f64>, Vec<f64>), GeomError> {
        let mut pol_this = Vec::with_capacity(self.len());
        for &el in &self.elems {
            let mut single = Chain::from_elems(vec![el]);
            let mut cpy_other = other.clone();
            Chain::split_polygons_each_other(&mut single, &mut cpy_other, arena, cfg)?;
            other.perform_locating_operation(&single, arena, cfg)?;
            pol_this.push(single.dispatch_perimeter(arena));
        }
        let mut pol_other = Vec::with_capacity(other.len());
        for &el in &other.elems {
            let mut single = Chain::from_elems(vec![el]);
            let mut cpy_this = self.clone();
            Chain::split_polygons_each_other(&mut single, &mut cpy_this, arena, cfg)?;
            self.perform_locating_operation(&single, arena, cfg)?;
            pol_other.push(single.dispatch_perimeter(arena));
        }
        Ok((pol_this, pol_other))
    }

    /// Number of points the other chain creates on each edge of this one.
    pub fn intersect_for_point(
        &self,
        other: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<Vec<usize>, GeomError> {
        let mut out = Vec::with_capacity(self.len());
        for &el in &self.elems {
            let mut single = Chain::from_elems(vec![el]);
            let mut cpy_other = other.clone();
            Chain::split_polygons_each_other(&mut single, &mut cpy_other, arena, cfg)?;
            out.push(single.len().saturating_sub(1));
        }
        Ok(out)
    }

    /// Splits `pol1` and `pol2` at every common point so that each edge of
    /// `pol1` is entirely in, out or on `pol2` (and conversely). Returns the
    /// number of pairwise intersection tests.
    pub fn split_polygons_each_other(
        pol1: &mut Chain,
        pol2: &mut Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<usize, GeomError> {
        let prec = cfg.precision;
        let mut merge = MergePoints::new();
        let mut nb_tests = 0;
        let mut resume: Vec<Option<usize>> = vec![None; pol2.len()];
        let mut i2 = 0;
        while i2 < pol2.len() {
            let mut i1 = resume[i2].unwrap_or(0);
            while i1 < pol1.len() {
                let cur1 = pol1.elems[i1];
                let cur2 = pol2.elems[i2];
                merge.clear();
                nb_tests += 1;
                match arena.intersect_with(cur1.edge, cur2.edge, &mut merge, cfg)? {
                    Some((c1, c2)) => {
                        let mut c1 = Chain::from_elems(c1);
                        let mut c2 = Chain::from_elems(c2);
                        if !cur1.direction {
                            c1.reverse();
                        }
                        if !cur2.direction {
                            c2.reverse();
                        }
                        update_neighbours(arena, pol1, i1, &c1, prec);
                        update_neighbours(arena, pol2, i2, &c2, prec);
                        let n1 = c1.len();
                        let n2 = c2.len();
                        pol1.elems.splice(i1..=i1, c1.elems);
                        i1 += n1;
                        pol2.elems.splice(i2..=i2, c2.elems);
                        resume.splice(i2..=i2, std::iter::repeat(Some(i1)).take(n2));
                    }
                    None => {
                        update_neighbours(arena, pol1, i1, &Chain::from_elems(vec![cur1]), prec);
                        update_neighbours(arena, pol2, i2, &Chain::from_elems(vec![cur2]), prec);
                        i1 += 1;
                    }
                }
            }
            i2 += 1;
        }
        Ok(nb_tests)
    }

    /// Locates every edge of `pol2` against `self`, walking `pol2` in order
    /// so that each location can be deduced from the previous one.
    pub fn perform_locating_operation(
        &self,
        pol2: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(), GeomError> {
        let mut loc = EdgeLoc::FullOn;
        for &el in &pol2.elems {
            loc = arena.locate_fully(el, self, loc, cfg)?;
        }
        Ok(())
    }

    /// Rebuilds the closed intersection polygons from `pol1` (split) and
    /// `pol2` (split and located); `self` is `pol2` before splitting.
    pub fn build_intersection_polygons(
        &self,
        pol1: &Chain,
        pol2: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<Vec<Chain>, GeomError> {
        let zip = pol2.zip_consecutive_in_segments(arena);
        if !zip.is_empty() {
            return self.close_polygons(zip, pol1, arena, cfg);
        }
        // No part of pol2 is inside pol1: either the chains are apart or
        // pol1 lies entirely inside pol2.
        let mut ret = Vec::new();
        if let Some(&first) = pol1.elems.first() {
            if arena.locate_fully(first, self, EdgeLoc::FullOn, cfg)? == EdgeLoc::FullIn {
                ret.push(pol1.clone());
            }
        }
        Ok(ret)
    }

    /// Maximal circular runs of edges not located `FullOut`. A chain without
    /// any outside edge is returned whole; a chain entirely outside gives
    /// nothing.
    pub fn zip_consecutive_in_segments(&self, arena: &Arena) -> Vec<Chain> {
        let n = self.len();
        let is_out = |i: usize| arena.edge_loc(self.elems[i].edge) == EdgeLoc::FullOut;
        let outs = (0..n).filter(|&i| is_out(i)).count();
        if outs == n {
            return Vec::new();
        }
        if outs == 0 {
            return vec![self.clone()];
        }
        let prev = |i: usize| (i + n - 1) % n;
        // Start of the run ending at or before index 0.
        let mut start = 0;
        while is_out(start) {
            start = prev(start);
        }
        while !is_out(prev(start)) {
            start = prev(start);
        }
        let mut runs = Vec::new();
        let mut current = Chain::new();
        for k in 0..n {
            let i = (start + k) % n;
            if is_out(i) {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else {
                current.push(self.elems[i]);
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Completes each open run of `zip` with edges of `pol1` until it closes;
    /// `self` is `pol2` before splitting.
    fn close_polygons(
        &self,
        mut zip: Vec<Chain>,
        pol1: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<Vec<Chain>, GeomError> {
        let budget = CLOSE_LOOP_FACTOR
            * (zip.iter().map(Chain::len).sum::<usize>() + pol1.len() + 1);
        let mut results = Vec::new();
        let mut direction_known = false;
        let mut direction = true;
        let mut idx = 0;
        let mut steps = 0;
        while idx < zip.len() {
            steps += 1;
            if steps > budget {
                return Err(GeomError::NotClosed);
            }
            if zip[idx].completed(arena) {
                results.push(zip.remove(idx));
                direction_known = false;
                continue;
            }
            if !direction_known {
                let (chance, dir) = zip[idx].am_i_a_chance_to_be_completed_by(pol1, self, arena, cfg)?;
                if !chance {
                    zip.remove(idx);
                    continue;
                }
                direction = dir;
                direction_known = true;
            }
            let (head, rest) = zip.split_at_mut(idx + 1);
            let found = head[idx].fill_as_much_as_possible_with(pol1, rest, direction, arena)?;
            if let Some(j) = found {
                let next = zip.remove(idx + 1 + j);
                zip[idx].append(next);
            }
        }
        Ok(results)
    }

    /// Finds where this open run re-enters `pol1_split` and the direction in
    /// which `pol1_split` must be walked to close it. Returns `(false, _)`
    /// when the run cannot be part of the intersection.
    pub fn am_i_a_chance_to_be_completed_by(
        &self,
        pol1_split: &Chain,
        pol2_not_split: &Chain,
        arena: &mut Arena,
        cfg: &GeomCfg,
    ) -> Result<(bool, bool), GeomError> {
        let pos = self.reentry_in(pol1_split, arena)?;
        let cur = pol1_split.elems[pos];
        let Some(&last) = self.elems.last() else {
            return Err(GeomError::incompatible("empty run"));
        };
        if arena.edge_loc(last.edge) == EdgeLoc::FullOn {
            if last.edge == cur.edge {
                let n = pol1_split.len();
                let prev = pol1_split.elems[(pos + n - 1) % n];
                let repr = arena.geom(prev.edge).representative();
                Ok((pol2_not_split.contains(repr, arena, cfg)?, false))
            } else {
                let repr = arena.geom(cur.edge).representative();
                Ok((pol2_not_split.contains(repr, arena, cfg)?, true))
            }
        } else {
            let loc = arena.locate_absolute(cur, pol2_not_split, cfg)?;
            Ok((true, loc == EdgeLoc::FullIn))
        }
    }

    /// Index of the element of `pol1` starting at this run's end node.
    fn reentry_in(&self, pol1: &Chain, arena: &Arena) -> Result<usize, GeomError> {
        let n = self
            .end_node(arena)
            .ok_or_else(|| GeomError::incompatible("empty run"))?;
        pol1.elems
            .iter()
            .position(|&el| arena.el_start(el) == n)
            .ok_or_else(|| GeomError::incompatible("run end is not a node of the other polygon"))
    }

    /// Appends edges of `pol1` until the run closes (`None`) or reaches a
    /// node of another run of `others` (`Some(index in others)`).
    fn fill_as_much_as_possible_with(
        &mut self,
        pol1: &Chain,
        others: &[Chain],
        direction: bool,
        arena: &Arena,
    ) -> Result<Option<usize>, GeomError> {
        let n = pol1.len();
        let mut k = self.reentry_in(pol1, arena)?;
        if !direction {
            k = (k + n - 1) % n;
        }
        for _ in 0..n {
            let mut el = pol1.elems[k];
            if !direction {
                el = el.reversed();
            }
            self.push(el);
            let node = arena.el_end(el);
            k = if direction { (k + 1) % n } else { (k + n - 1) % n };
            if self.completed(arena) {
                return Ok(None);
            }
            if let Some(j) = others.iter().position(|c| c.is_node_in(node, arena)) {
                return Ok(Some(j));
            }
        }
        Err(GeomError::NotClosed)
    }
}

/// After `pol[i]` was cut into `replacement`, makes the previous element end
/// on the replacement's start and the next element start on its end.
fn update_neighbours(arena: &mut Arena, pol: &Chain, i: usize, replacement: &Chain, prec: f64) {
    let n = pol.len();
    if n < 2 {
        return;
    }
    let (Some(start), Some(end)) = (replacement.start_node(arena), replacement.end_node(arena)) else {
        return;
    };
    let prev: ElementaryEdge = pol.elems[(i + n - 1) % n];
    let next: ElementaryEdge = pol.elems[(i + 1) % n];
    arena.el_change_end_node_with(prev, start, prec);
    arena.el_change_start_node_with(next, end, prec);
}
