//! McCabe-Thiele 단 계산 회귀 테스트.
use distillation_toolbox::distillation::{
    compute_mccabe_thiele, ColumnSpec, Equilibrium, FeedLine, OperatingLine, Section,
    StageError, StageStepper, MAX_STAGES,
};

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{label} expected {expected:.6} got {actual:.6} (diff {diff:.2e}, tol {tol})"
    );
}

fn reference_spec() -> ColumnSpec {
    ColumnSpec {
        pa_vap: 179.2,
        pb_vap: 74.3,
        r_factor: 1.8,
        xf: 0.5,
        xd: 0.975,
        xb: 0.025,
        q: 0.5,
        nm: 0.75,
    }
}

#[test]
fn reference_column_converges() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    assert!(res.stage_count() < MAX_STAGES);
    assert!(
        res.feed_stage > 1 && res.feed_stage < res.stage_count(),
        "feed={} stages={}",
        res.feed_stage,
        res.stage_count()
    );
    assert!(res.xb_actual <= 0.025 + 1e-12, "xb_actual={}", res.xb_actual);
    assert_close("Rmin", res.min_reflux_ratio, 1.692_867, 1e-5);
    assert_close("R", res.reflux_ratio, 1.8 * res.min_reflux_ratio, 1e-12);
    assert_eq!(res.stage_count(), 17);
    assert_eq!(res.feed_stage, 9);
}

#[test]
fn default_column_matches_original_parameter_block() {
    let res = compute_mccabe_thiele(ColumnSpec::default()).expect("default column");
    assert_close("Rmin", res.min_reflux_ratio, 1.692_867, 1e-5);
    assert_eq!(res.stage_count(), 22);
    assert_eq!(res.feed_stage, 11);
}

#[test]
fn staircase_alternates_between_curve_and_operating_lines() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    let nm = res.spec.nm;
    let mut prev_x = res.spec.xd;
    let mut prev_y = res.spec.xd;
    for stage in &res.stages {
        assert_close("x_from", stage.x_from, prev_x, 1e-15);
        assert_close("y", stage.y, prev_y, 1e-15);
        assert!(stage.x_to < stage.x_from, "stage {} does not descend", stage.number);

        // 수평 이동은 출발 조작선 기준 유사평형 곡선에 닿는다
        let step_line = match stage.section {
            Section::Rectifying => &res.rectifying,
            Section::Stripping => &res.stripping,
        };
        let y_pseudo = res
            .equilibrium
            .y_murphree(stage.x_to, step_line.y_at(stage.x_to), nm);
        assert_close("pseudo-equilibrium", y_pseudo, stage.y, 1e-9);

        // 수직 이동은 현재 조작선에 닿는다
        let drop_line = if stage.number < res.feed_stage {
            &res.rectifying
        } else {
            &res.stripping
        };
        assert_close("operating line", stage.y_next, drop_line.y_at(stage.x_to), 1e-12);

        prev_x = stage.x_to;
        prev_y = stage.y_next;
    }
}

#[test]
fn feed_stage_is_first_stage_past_pivot() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    let feed = &res.stages[res.feed_stage - 1];
    assert!(feed.x_to <= res.pivot.0);
    assert!(res.stages[..res.feed_stage - 1]
        .iter()
        .all(|s| s.x_to > res.pivot.0));
}

#[test]
fn stripping_line_joins_bottoms_and_pivot() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    assert_close("L2(xb)", res.stripping.y_at(0.025), 0.025, 1e-12);
    assert_close("L2(pivot)", res.stripping.y_at(res.pivot.0), res.pivot.1, 1e-12);
    assert_close("L1(pivot)", res.rectifying.y_at(res.pivot.0), res.pivot.1, 1e-12);
    assert_close("L1(xd)", res.rectifying.y_at(0.975), 0.975, 1e-12);
}

#[test]
fn full_efficiency_needs_fewer_stages() {
    let partial = compute_mccabe_thiele(reference_spec()).expect("nm=0.75");
    let ideal = compute_mccabe_thiele(ColumnSpec {
        nm: 1.0,
        ..reference_spec()
    })
    .expect("nm=1");
    assert!(ideal.stage_count() < partial.stage_count());
    assert_eq!(ideal.stage_count(), 13);
}

#[test]
fn saturated_liquid_feed_uses_vertical_feed_line() {
    let res = compute_mccabe_thiele(ColumnSpec {
        q: 1.0,
        ..reference_spec()
    })
    .expect("q=1");
    assert_eq!(res.feed_line, FeedLine::Vertical { x: 0.5 });
    assert_eq!(res.pinch.0, 0.5);
    assert_eq!(res.pivot.0, 0.5);
    assert_close("Rmin", res.min_reflux_ratio, 1.295_758, 1e-5);
    assert!(res.feed_stage > 1 && res.feed_stage < res.stage_count());
    assert!(res.xb_actual <= 0.025);
}

#[test]
fn saturated_vapour_feed_has_horizontal_feed_line() {
    let res = compute_mccabe_thiele(ColumnSpec {
        q: 0.0,
        ..reference_spec()
    })
    .expect("q=0");
    assert_close("pivot y", res.pivot.1, 0.5, 1e-12);
    assert_close("pinch y", res.pinch.1, 0.5, 1e-12);
}

#[test]
fn near_minimum_reflux_needs_many_stages() {
    let normal = compute_mccabe_thiele(reference_spec()).expect("R=1.8Rmin");
    let tight = compute_mccabe_thiele(ColumnSpec {
        r_factor: 1.001,
        ..reference_spec()
    })
    .expect("R=1.001Rmin");
    assert!(tight.stage_count() > 2 * normal.stage_count());
    assert!(tight.stage_count() < MAX_STAGES);
}

#[test]
fn reflux_at_pinch_does_not_converge() {
    let err = compute_mccabe_thiele(ColumnSpec {
        r_factor: 1.000_000_001,
        ..reference_spec()
    })
    .expect_err("pinched column");
    assert!(matches!(err, StageError::NonConvergence { .. }), "{err:?}");
}

#[test]
fn stepper_stalls_when_line_meets_curve_at_start() {
    // α = 1: 평형곡선이 대각선이므로 (xd, xd)에서 조작선과 만난다
    let eq = Equilibrium::new(1.0);
    let line = OperatingLine::rectifying(3.0, 0.9);
    for nm in [1.0, 0.5] {
        let mut stepper = StageStepper::new(eq, line, line, 0.5, 0.9, nm);
        let err = stepper.step().expect_err("no leftward move");
        match err {
            StageError::NonConvergence { stages, last_x } => {
                assert_eq!(stages, 0, "nm={nm}");
                assert_close("last_x", last_x, 0.9, 1e-12);
            }
            other => panic!("nm={nm}: unexpected {other:?}"),
        }
        assert_eq!(stepper.section(), Section::Rectifying);
    }
}

#[test]
fn reflux_factor_below_one_is_rejected() {
    let err = compute_mccabe_thiele(ColumnSpec {
        r_factor: 0.5,
        ..reference_spec()
    })
    .expect_err("R_factor=0.5");
    assert!(matches!(err, StageError::InvalidReflux { .. }), "{err:?}");

    let err = compute_mccabe_thiele(ColumnSpec {
        r_factor: 1.0,
        ..reference_spec()
    })
    .expect_err("R_factor=1");
    assert!(matches!(err, StageError::InvalidReflux { .. }), "{err:?}");
}

#[test]
fn misordered_compositions_are_rejected() {
    let err = compute_mccabe_thiele(ColumnSpec {
        xb: 0.6,
        ..reference_spec()
    })
    .expect_err("xb > xf");
    assert_eq!(
        err,
        StageError::InvalidComposition {
            xb: 0.6,
            xf: 0.5,
            xd: 0.975
        }
    );

    for spec in [
        ColumnSpec { xd: 0.4, ..reference_spec() },
        ColumnSpec { xd: 1.0, ..reference_spec() },
        ColumnSpec { xb: 0.0, ..reference_spec() },
    ] {
        let err = compute_mccabe_thiele(spec).expect_err("bad composition");
        assert!(matches!(err, StageError::InvalidComposition { .. }), "{err:?}");
    }
}

#[test]
fn efficiency_outside_unit_interval_is_rejected() {
    for nm in [0.0, -0.2, 1.2] {
        let err = compute_mccabe_thiele(ColumnSpec {
            nm,
            ..reference_spec()
        })
        .expect_err("bad efficiency");
        assert_eq!(err, StageError::InvalidEfficiency { nm });
    }
}

#[test]
fn non_positive_vapour_pressure_is_rejected() {
    let err = compute_mccabe_thiele(ColumnSpec {
        pb_vap: 0.0,
        ..reference_spec()
    })
    .expect_err("Pb=0");
    assert!(matches!(err, StageError::InvalidVapourPressure { .. }));
}

#[test]
fn heavier_component_listed_first_has_no_positive_rmin() {
    let err = compute_mccabe_thiele(ColumnSpec {
        pa_vap: 74.3,
        pb_vap: 179.2,
        ..reference_spec()
    })
    .expect_err("alpha < 1");
    assert!(matches!(err, StageError::InvalidReflux { .. }), "{err:?}");
}

#[test]
fn non_finite_input_is_rejected() {
    let err = compute_mccabe_thiele(ColumnSpec {
        q: f64::NAN,
        ..reference_spec()
    })
    .expect_err("NaN q");
    assert!(matches!(err, StageError::NonFiniteInput { name: "q", .. }));
}

#[test]
fn min_reflux_line_passes_through_pinch() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    let line = res.min_reflux_line();
    assert_close("pinch", line.y_at(res.pinch.0), res.pinch.1, 1e-12);
}

#[test]
fn murphree_curve_sits_between_operating_lines_and_equilibrium() {
    let res = compute_mccabe_thiele(reference_spec()).expect("reference column");
    for (x, y) in res.murphree_curve(50) {
        let y_op = res.operating_line_at(x).y_at(x);
        assert!(y >= y_op - 1e-12 && y <= res.equilibrium.y_eq(x) + 1e-12, "x={x}");
    }
}
