use super::*;
use crate::gen::{perturbed_grid, segment_mesh, GridCfg, ReplayToken};
use proptest::prelude::*;

fn close(a: &[f64], b: &[f64], tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
}

/// Two clockwise triangles splitting a square along its diagonal.
fn reference_source() -> Mesh {
    Mesh::new(
        2,
        vec![-0.3, -0.3, 0.7, -0.3, -0.3, 0.7, 0.7, 0.7],
        vec![
            Cell::new(CellKind::Tri3, vec![0, 3, 1]),
            Cell::new(CellKind::Tri3, vec![0, 2, 3]),
        ],
    )
    .unwrap()
}

/// Same square on a 2x2 grid, the lower right quad cut into two triangles.
fn reference_target() -> Mesh {
    Mesh::new(
        2,
        vec![
            -0.3, -0.3, 0.2, -0.3, 0.7, -0.3, -0.3, 0.2, 0.2, 0.2, 0.7, 0.2, -0.3, 0.7, 0.2, 0.7,
            0.7, 0.7,
        ],
        vec![
            Cell::new(CellKind::Quad4, vec![0, 3, 4, 1]),
            Cell::new(CellKind::Tri3, vec![1, 4, 2]),
            Cell::new(CellKind::Tri3, vec![4, 5, 2]),
            Cell::new(CellKind::Quad4, vec![6, 7, 4, 3]),
            Cell::new(CellKind::Quad4, vec![7, 8, 5, 4]),
        ],
    )
    .unwrap()
}

fn unit_square_triangles(x0: f64) -> Mesh {
    Mesh::new(
        2,
        vec![x0, 0.0, x0 + 1.0, 0.0, x0 + 1.0, 1.0, x0, 1.0],
        vec![
            Cell::new(CellKind::Tri3, vec![0, 1, 2]),
            Cell::new(CellKind::Tri3, vec![0, 2, 3]),
        ],
    )
    .unwrap()
}

fn square(x0: f64, y0: f64, side: f64) -> Mesh {
    Mesh::new(
        2,
        vec![x0, y0, x0 + side, y0, x0 + side, y0 + side, x0, y0 + side],
        vec![Cell::new(CellKind::Quad4, vec![0, 1, 2, 3])],
    )
    .unwrap()
}

#[test]
fn reference_matrix_and_transfers() {
    let (src, trg) = (reference_source(), reference_target());
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert_eq!(r.number_of_rows(), 5);
    assert_eq!(r.number_of_columns(), 2);
    let m = r.matrix();
    for &(t, s, v) in &[
        (0, 0, 0.125),
        (0, 1, 0.125),
        (1, 0, 0.125),
        (2, 0, 0.125),
        (3, 1, 0.25),
        (4, 0, 0.125),
        (4, 1, 0.125),
    ] {
        assert!((m.get(t, s).unwrap() - v).abs() < 1e-12, "({t},{s})");
    }
    assert!((m.sum() - 1.0).abs() < 1e-12);
    assert!(close(&r.sum_per_column(), &[0.5, 0.5], 1e-12));

    let values = [7.0, 8.0];
    r.set_nature(Nature::IntensiveMaximum);
    let out = r.transfer(&values, 1, 4.57).unwrap();
    assert!(close(&out, &[7.5, 7.0, 7.0, 8.0, 7.5], 1e-12));

    r.set_nature(Nature::ExtensiveConservation);
    let out = r.transfer(&values, 1, 4.57).unwrap();
    assert!(close(&out, &[3.75, 1.75, 1.75, 4.0, 3.75], 1e-12));

    r.set_nature(Nature::ExtensiveMaximum);
    let out = r.transfer(&values, 1, 4.57).unwrap();
    assert!(close(&out, &[3.75, 1.75, 1.75, 4.0, 3.75], 1e-12));

    r.set_nature(Nature::IntensiveConservation);
    let out = r.transfer(&values, 1, 4.57).unwrap();
    assert!(close(&out, &[7.5, 7.0, 7.0, 8.0, 7.5], 1e-12));
}

#[test]
fn reference_reverse_transfer() {
    let (src, trg) = (reference_source(), reference_target());
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    let field = Field::scalar(Nature::IntensiveMaximum, vec![7.0, 8.0, 9.0, 10.0, 11.0]);
    let back = r.reverse_transfer_field(&field, 4.57).unwrap();
    assert_eq!(back.nature, Nature::IntensiveMaximum);
    assert!(close(&back.values, &[8.75, 9.5], 1e-12));
    let t = r.reverse_matrix();
    assert_eq!(t.n_rows(), 2);
    assert_eq!(t.n_cols(), 5);
    assert!((t.get(1, 3).unwrap() - 0.25).abs() < 1e-12);
}

/// Eight triangles on the 3x3 node grid of the reference square.
fn reference_triangles() -> Mesh {
    Mesh::new(
        2,
        vec![
            -0.3, -0.3, 0.2, -0.3, 0.7, -0.3, -0.3, 0.2, 0.2, 0.2, 0.7, 0.2, -0.3, 0.7, 0.2, 0.7,
            0.7, 0.7,
        ],
        [
            [0, 3, 4],
            [0, 4, 1],
            [1, 4, 2],
            [4, 5, 2],
            [3, 6, 4],
            [6, 7, 4],
            [4, 7, 5],
            [7, 8, 5],
        ]
        .iter()
        .map(|n| Cell::new(CellKind::Tri3, n.to_vec()))
        .collect(),
    )
    .unwrap()
}

#[test]
fn node_values_onto_cells() {
    let (src, trg) = (reference_source(), reference_target());
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P1P0).unwrap();
    assert_eq!(r.discretization(), Discretization::P1P0);
    assert_eq!(r.number_of_rows(), 5);
    assert_eq!(r.number_of_columns(), 4);
    let third = 1.0 / 3.0;
    assert!(close(r.source_measures(), &[third, third / 2.0, third / 2.0, third], 1e-12));
    assert!(close(&r.sum_per_column(), r.source_measures(), 1e-12));
    assert!(close(&r.matrix().row_sums(), r.target_measures(), 1e-12));
    r.set_nature(Nature::IntensiveMaximum);
    let out = r.transfer(&[7.0, 8.0, 9.0, 10.0], 1, 4.57).unwrap();
    let expected = [7.0, 7.666666666666667, 8.666666666666666, 8.833333333333334, 10.0];
    assert!(close(&out, &expected, 1e-12), "{out:?}");
}

#[test]
fn cell_values_onto_nodes() {
    let (src, trg) = (reference_target(), reference_source());
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P1).unwrap();
    assert_eq!(r.number_of_rows(), 4);
    assert_eq!(r.number_of_columns(), 5);
    assert!(close(&r.matrix().row_sums(), r.target_measures(), 1e-12));
    r.set_nature(Nature::IntensiveMaximum);
    let out = r.transfer(&[7.0, 8.0, 9.0, 10.0, 11.0], 1, 4.57).unwrap();
    assert!(close(&out, &[7.5, 8.5, 10.0, 10.625], 1e-12), "{out:?}");
    // Uniform extensive values keep their total.
    r.set_nature(Nature::ExtensiveConservation);
    let out = r.transfer(&[1.0; 5], 1, 0.0).unwrap();
    assert!((out.iter().sum::<f64>() - 5.0).abs() < 1e-12);
}

#[test]
fn node_values_onto_nodes() {
    let (src, trg) = (reference_source(), reference_triangles());
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P1P1).unwrap();
    assert_eq!(r.number_of_rows(), 9);
    assert_eq!(r.number_of_columns(), 4);
    let m = r.matrix();
    assert_eq!(m.row(0).len(), 1);
    for &(t, s, v) in &[
        (0, 0, 0.08333333333333334),
        (4, 0, 0.1416666666666666),
        (4, 1, 0.025),
        (4, 2, 0.025),
        (4, 3, 0.1),
    ] {
        assert!((m.get(t, s).unwrap() - v).abs() < 1e-12, "({t},{s})");
    }
    assert!(close(&m.row_sums(), r.target_measures(), 1e-12));
    r.set_nature(Nature::IntensiveMaximum);
    let out = r.transfer(&[2.0; 4], 1, 0.0).unwrap();
    assert!(close(&out, &[2.0; 9], 1e-12));
}

#[test]
fn discretization_pairs() {
    for name in ["P0P0", "P0P1", "P1P0", "P1P1"] {
        let d: Discretization = name.parse().unwrap();
        assert_eq!(d.to_string(), name);
    }
    assert_eq!(
        "P2P0".parse::<Discretization>(),
        Err(RemapError::UnknownDiscretization { name: "P2P0".into() })
    );
    assert_eq!(Discretization::P1P0.source(), Support::Nodes);
    assert_eq!(Discretization::P1P0.target(), Support::Cells);

    let line = segment_mesh(2, 0.0, 1.0).unwrap();
    let mut r = Remapper::new();
    for d in [Discretization::P0P1, Discretization::P1P0, Discretization::P1P1] {
        assert!(matches!(
            r.prepare(&line, &line, d),
            Err(RemapError::UnsupportedDiscretization { method, .. }) if method == d
        ));
    }
    r.prepare(&line, &line, Discretization::P0P0).unwrap();

    let s = std::f64::consts::FRAC_1_SQRT_2;
    let disc = Mesh::new(
        2,
        vec![1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, -1.0, s, s, -s, s, -s, -s, s, -s],
        vec![Cell::new(CellKind::QPolygon, (0..8).collect())],
    )
    .unwrap();
    let big = square(-2.0, -2.0, 4.0);
    assert!(matches!(
        r.prepare(&disc, &big, Discretization::P1P0),
        Err(RemapError::UnsupportedDiscretization { .. })
    ));
    // Quadratic cells are fine on the cell side.
    r.prepare(&disc, &big, Discretization::P0P1).unwrap();
    assert_eq!(r.number_of_rows(), 4);
    let pi = std::f64::consts::PI;
    assert!((r.matrix().sum() - pi).abs() < 1e-10);
}

#[test]
fn signed_measures_follow_cell_orientation() {
    let (src, trg) = (reference_source(), reference_target());
    let mut r = Remapper::new();
    assert!(r.set_option_bool(options::MEASURE_ABS, false));
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert!(close(r.source_measures(), &[-0.5, -0.5], 1e-12));
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert!(close(r.source_measures(), &[0.5, 0.5], 1e-12));
    assert!(close(r.target_measures(), &[0.25, 0.125, 0.125, 0.25, 0.25], 1e-12));
}

#[test]
fn self_mapping_round_trip() {
    let mesh = unit_square_triangles(0.0);
    let mut r = Remapper::new();
    r.set_nature(Nature::IntensiveMaximum);
    r.prepare(&mesh, &mesh, Discretization::P0P0).unwrap();
    let out = r.transfer(&[1.0, 1.0], 1, -1.0).unwrap();
    assert!(close(&out, &[1.0, 1.0], 1e-12));
    let back = r.reverse_transfer(&out, 1, -1.0).unwrap();
    assert!(close(&back, &[1.0, 1.0], 1e-12));
    assert!((r.matrix().get(0, 0).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn disjoint_meshes_get_the_default() {
    let (src, trg) = (unit_square_triangles(0.0), unit_square_triangles(5.0));
    let mut r = Remapper::new();
    r.set_nature(Nature::IntensiveMaximum);
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert!(r.matrix().is_empty());
    assert_eq!(r.transfer(&[3.0, 4.0], 1, -1.0).unwrap(), vec![-1.0, -1.0]);
    assert_eq!(r.reverse_transfer(&[3.0, 4.0], 1, -1.0).unwrap(), vec![-1.0, -1.0]);
}

#[test]
fn partial_overlap_of_four_cells() {
    let src = perturbed_grid(
        GridCfg {
            nx: 2,
            ny: 2,
            size: nalgebra::Vector2::new(2.0, 2.0),
            jitter: 0.0,
            ..GridCfg::default()
        },
        ReplayToken::new(0),
    )
    .unwrap();
    let trg = square(0.5, 0.5, 1.0);
    let v = 3.0;
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert_eq!(r.matrix().row(0).len(), 4);
    for nature in [Nature::IntensiveMaximum, Nature::IntensiveConservation] {
        r.set_nature(nature);
        let out = r.transfer(&[v; 4], 1, -1.0).unwrap();
        assert!((out[0] - v).abs() < 1e-12, "{nature}");
    }
    // The target collects the whole extensive content of its four sources' overlaps.
    r.set_nature(Nature::ExtensiveConservation);
    let out = r.transfer(&[v; 4], 1, -1.0).unwrap();
    assert!((out[0] - 4.0 * v).abs() < 1e-12);
}

#[test]
fn partial_transfer_keeps_uncovered_values() {
    let src = square(0.0, 0.0, 1.0);
    let trg = Mesh::new(
        2,
        vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0, 4.0, 0.0, 5.0, 0.0, 5.0, 1.0, 4.0, 1.0],
        vec![
            Cell::new(CellKind::Quad4, vec![0, 1, 2, 3]),
            Cell::new(CellKind::Quad4, vec![4, 5, 6, 7]),
        ],
    )
    .unwrap();
    let mut r = Remapper::new();
    r.set_nature(Nature::IntensiveMaximum);
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    let mut out = vec![10.0, 20.0];
    r.partial_transfer(&[2.0], 1, &mut out).unwrap();
    assert!(close(&out, &[2.0, 20.0], 1e-12));
}

#[test]
fn multi_component_fields() {
    let mesh = unit_square_triangles(0.0);
    let mut r = Remapper::new();
    r.prepare(&mesh, &mesh, Discretization::P0P0).unwrap();
    let f = Field::new(Nature::IntensiveMaximum, 2, vec![1.0, 10.0, 2.0, 20.0]).unwrap();
    let out = r.transfer_field(&f, 0.0).unwrap();
    assert_eq!(out.n_components, 2);
    assert!(close(&out.values, &f.values, 1e-12));
    assert!(Field::new(Nature::IntensiveMaximum, 2, vec![1.0, 2.0, 3.0]).is_err());
}

#[test]
fn parallel_and_sequential_agree() {
    let cfg = GridCfg {
        nx: 3,
        ny: 3,
        jitter: 0.25,
        ..GridCfg::default()
    };
    let src = perturbed_grid(cfg, ReplayToken::new(11)).unwrap();
    let trg = perturbed_grid(GridCfg { triangles: true, ..cfg }, ReplayToken::new(12)).unwrap();
    let mut par = Remapper::new();
    par.prepare(&src, &trg, Discretization::P0P0).unwrap();
    let mut seq = Remapper::new();
    assert!(seq.set_option_bool(options::PARALLEL, false));
    seq.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert_eq!(par.matrix(), seq.matrix());
}

#[test]
fn caller_supplied_candidates() {
    let (src, trg) = (reference_source(), reference_target());
    let all: Vec<Vec<usize>> = vec![vec![0, 1]; trg.n_cells()];
    let mut r = Remapper::new();
    r.prepare_with_candidates(&src, &trg, Discretization::P0P0, &all).unwrap();
    assert!((r.matrix().sum() - 1.0).abs() < 1e-12);
    // Only source 1 considered for target 0.
    let mut some = all.clone();
    some[0] = vec![1];
    r.prepare_with_candidates(&src, &trg, Discretization::P0P0, &some).unwrap();
    assert_eq!(r.matrix().row(0).len(), 1);
    assert!(matches!(
        r.prepare_with_candidates(&src, &trg, Discretization::P0P0, &all[..2]),
        Err(RemapError::InvalidCandidates { .. })
    ));
    let bad = vec![vec![7]; trg.n_cells()];
    assert!(matches!(
        r.prepare_with_candidates(&src, &trg, Discretization::P0P0, &bad),
        Err(RemapError::InvalidCandidates { .. })
    ));
}

#[test]
fn quadratic_disc_inside_square() {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    let disc = Mesh::new(
        2,
        vec![
            1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, -1.0, s, s, -s, s, -s, -s, s, -s,
        ],
        vec![Cell::new(CellKind::QPolygon, (0..8).collect())],
    )
    .unwrap();
    let big = square(-2.0, -2.0, 4.0);
    let mut r = Remapper::new();
    r.prepare(&disc, &big, Discretization::P0P0).unwrap();
    let pi = std::f64::consts::PI;
    assert!((r.matrix().get(0, 0).unwrap() - pi).abs() < 1e-10);
    assert!((r.source_measures()[0] - pi).abs() < 1e-10);
    r.prepare(&big, &disc, Discretization::P0P0).unwrap();
    assert!((r.matrix().get(0, 0).unwrap() - pi).abs() < 1e-10);
}

#[test]
fn interval_meshes() {
    let src = segment_mesh(2, 0.0, 2.0).unwrap();
    let trg = Mesh::new(
        1,
        vec![0.5, 1.5],
        vec![Cell::new(CellKind::Seg2, vec![0, 1])],
    )
    .unwrap();
    let mut r = Remapper::new();
    r.set_nature(Nature::IntensiveMaximum);
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert!((r.matrix().get(0, 0).unwrap() - 0.5).abs() < 1e-12);
    assert!((r.matrix().get(0, 1).unwrap() - 0.5).abs() < 1e-12);
    let out = r.transfer(&[1.0, 3.0], 1, 0.0).unwrap();
    assert!((out[0] - 2.0).abs() < 1e-12);
}

#[test]
fn curve_meshes_in_the_plane() {
    let src = Mesh::new(
        2,
        vec![0.0, 0.0, 1.0, 0.0, 2.0, 0.0],
        vec![
            Cell::new(CellKind::Seg2, vec![0, 1]),
            Cell::new(CellKind::Seg2, vec![1, 2]),
        ],
    )
    .unwrap();
    let trg = Mesh::new(
        2,
        vec![0.5, 0.0, 1.5, 0.0],
        vec![Cell::new(CellKind::Seg2, vec![0, 1])],
    )
    .unwrap();
    let mut r = Remapper::new();
    r.prepare(&src, &trg, Discretization::P0P0).unwrap();
    assert!((r.matrix().get(0, 0).unwrap() - 0.5).abs() < 1e-12);
    assert!((r.matrix().get(0, 1).unwrap() - 0.5).abs() < 1e-12);
    assert!(close(r.target_measures(), &[1.0], 1e-12));
}

#[test]
fn engine_errors() {
    let plane = unit_square_triangles(0.0);
    let line = segment_mesh(2, 0.0, 1.0).unwrap();
    let mut r = Remapper::new();
    assert!(matches!(
        r.prepare(&plane, &line, Discretization::P0P0),
        Err(RemapError::IncoherentSpaceDim { source: 2, target: 1 })
    ));
    let curve = Mesh::new(2, vec![0.0, 0.0, 1.0, 0.0], vec![Cell::new(CellKind::Seg2, vec![0, 1])]).unwrap();
    assert!(matches!(
        r.prepare(&plane, &curve, Discretization::P0P0),
        Err(RemapError::NoInterpolation { .. })
    ));
    assert_eq!(r.transfer(&[1.0, 1.0], 1, 0.0), Err(RemapError::NotPrepared));
    r.prepare(&plane, &plane, Discretization::P0P0).unwrap();
    assert_eq!(r.transfer(&[1.0, 1.0], 1, 0.0), Err(RemapError::NoNature));
    r.set_nature(Nature::IntensiveMaximum);
    assert!(matches!(
        r.transfer(&[1.0], 1, 0.0),
        Err(RemapError::FieldMismatch { expected: 2, got: 1 })
    ));
    assert!(Mesh::new(2, vec![0.0, 0.0, 1.0], vec![]).is_err());
    assert!(Mesh::new(2, vec![0.0, 0.0], vec![Cell::new(CellKind::Tri3, vec![0, 0, 1])]).is_err());
    assert!(Mesh::new(2, vec![0.0; 8], vec![Cell::new(CellKind::Quad4, vec![0, 1, 2])]).is_err());
    assert!("Bogus".parse::<Nature>().is_err());
    assert_eq!(
        "ExtensiveConservation".parse::<Nature>().unwrap(),
        Nature::ExtensiveConservation
    );
}

#[test]
fn option_keys() {
    let mut o = RemapOptions::default();
    assert!(o.set_option_f64(options::PRECISION, 1e-10));
    assert_eq!(o.geom_cfg().precision, 1e-10);
    assert!(o.set_option_str(options::INTERSECTION_ROBUSTNESS, "Tolerant"));
    assert_eq!(o.geom_cfg().robustness, crate::geom2::Robustness::Tolerant);
    assert!(!o.set_option_str(options::INTERSECTION_ROBUSTNESS, "Loose"));
    assert!(o.set_option_usize(options::PRINT_LEVEL, 2));
    assert!(!o.set_option_f64("MedianPlane", 0.5));
    assert!(!o.set_option_bool(options::PRECISION, true));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn covered_rows_sum_to_target_measure(
        seed in 0u64..1000,
        n_src in 2usize..5,
        n_trg in 1usize..4,
        triangles in any::<bool>(),
    ) {
        let src = perturbed_grid(
            GridCfg { nx: n_src, ny: n_src, jitter: 0.25, ..GridCfg::default() },
            ReplayToken::new(seed),
        ).unwrap();
        let trg = perturbed_grid(
            GridCfg { nx: n_trg, ny: n_trg + 1, jitter: 0.25, triangles, ..GridCfg::default() },
            ReplayToken { seed, index: 1 },
        ).unwrap();
        let mut r = Remapper::new();
        r.prepare(&src, &trg, Discretization::P0P0).unwrap();
        let rows = r.matrix().row_sums();
        prop_assert!(close(&rows, r.target_measures(), 1e-10));
        prop_assert!(close(&r.sum_per_column(), r.source_measures(), 1e-10));
        // A uniform extensive field keeps its total.
        r.set_nature(Nature::ExtensiveConservation);
        let out = r.transfer(&vec![1.0; src.n_cells()], 1, 0.0).unwrap();
        prop_assert!((out.iter().sum::<f64>() - src.n_cells() as f64).abs() < 1e-9);
    }
}
