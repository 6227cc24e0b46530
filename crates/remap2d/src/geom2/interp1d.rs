//! 1-D overlap fractions between two abscissa distributions.

use nalgebra::Vector2;
use std::collections::BTreeMap;

use super::arena::Arena;
use super::cfg::GeomCfg;
use super::composed::Chain;
use super::error::GeomError;
use super::merge::MergePoints;

/// Common length of the intervals `[a0, a1]` and `[b0, b1]` computed with the
/// line overlap splitter. Zero when they only touch or are apart.
pub fn overlap_length_1d(
    a: (f64, f64),
    b: (f64, f64),
    cfg: &GeomCfg,
) -> Result<f64, GeomError> {
    let on_axis = |x: f64| Vector2::new(x, 0.0);
    let mut arena = Arena::with_capacity(4, 8);
    let (s1, t1) = (arena.add_node(on_axis(a.0)), arena.add_node(on_axis(a.1)));
    let (s2, t2) = (arena.add_node(on_axis(b.0)), arena.add_node(on_axis(b.1)));
    let e1 = arena.add_line(s1, t1);
    let e2 = arena.add_line(s2, t2);
    let mut merge = MergePoints::new();
    Ok(match arena.split_as_overlapped(e1, e2, &mut merge, cfg)? {
        Some((f1, f2)) => Chain::from_elems(f1).common_length_with(&Chain::from_elems(f2), &arena),
        None => 0.0,
    })
}

/// For sorted abscissas `d1` (intervals `i`) and `d2` (intervals `j`),
/// returns `out[i][j]` = length of `[d1[i], d1[i+1]] ∩ [d2[j], d2[j+1]]`
/// divided by the length of interval `i`. Only overlapping pairs are stored.
pub fn interpolate_1d_lin(
    d1: &[f64],
    d2: &[f64],
    cfg: &GeomCfg,
) -> Result<Vec<BTreeMap<usize, f64>>, GeomError> {
    let n1 = d1.len().saturating_sub(1);
    let n2 = d2.len().saturating_sub(1);
    let mut out = vec![BTreeMap::new(); n1];
    for i in 0..n1 {
        let Some(first) = d2.iter().skip(1).position(|&x| x >= d1[i]) else {
            continue;
        };
        for j in first..n2 {
            if d2[j] > d1[i + 1] {
                continue;
            }
            let common = overlap_length_1d((d1[i], d1[i + 1]), (d2[j], d2[j + 1]), cfg)?;
            if common > 0.0 {
                out[i].insert(j, common / (d1[i + 1] - d1[i]));
            }
        }
    }
    Ok(out)
}
