use sia::{
    best_and_worst, error_of, evaluate_batch, scan, to_polar, to_vector, AstigmatismMeasurement,
    BatchEvaluator, CalculatorConfig, CaseInput, Cell, Error, Eye, RawRow, RowFault,
    DEFAULT_CANDIDATES,
};

const TOL: f64 = 1e-6;

fn axis_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}

#[test]
fn round_trip_over_a_grid() {
    for step_m in 0..=20 {
        let magnitude = step_m as f64 * 0.25;
        for step_a in 0..36 {
            let axis = step_a as f64 * 5.0;
            let back = to_polar(to_vector(magnitude, axis));
            assert!((back.magnitude - magnitude).abs() < TOL);
            if magnitude > 0.0 {
                assert!(axis_distance(back.axis, axis) < TOL, "{magnitude}@{axis}");
            }
        }
    }
}

#[test]
fn norm_is_preserved_for_any_sign() {
    for magnitude in [-3.0, -0.5, 0.0, 0.5, 3.0] {
        for axis in [0.0, 22.5, 67.5, 91.0, 170.0] {
            let v = to_vector(magnitude, axis);
            assert!((v.norm() - magnitude.abs()).abs() < TOL);
        }
    }
}

#[test]
fn zero_error_identity_and_symmetry() {
    let a = AstigmatismMeasurement::new(0.62, 14.0);
    let b = AstigmatismMeasurement::new(0.18, 101.0);
    assert!(error_of(a, a).magnitude < TOL);
    assert!((error_of(a, b).magnitude - error_of(b, a).magnitude).abs() < TOL);
}

#[test]
fn axis_periodicity() {
    for axis in [0.0, 45.0, 90.0, 135.0] {
        let a = AstigmatismMeasurement {
            magnitude: 0.4,
            axis,
        };
        let b = AstigmatismMeasurement {
            magnitude: 0.4,
            axis: axis + 180.0,
        };
        assert!(error_of(a, b).magnitude < TOL);
    }
}

#[test]
fn stable_tie_break_prefers_first_minimum() {
    let actual = AstigmatismMeasurement::new(0.2, 90.0);
    let table = scan(actual, 90.0, &[0.2, 0.1, 0.2]);
    let extremes = best_and_worst(&table).unwrap();
    assert_eq!(extremes.best.index, 0);
    assert_eq!(extremes.best.candidate.assumed_magnitude, 0.2);
}

#[test]
fn vertical_incision_scan_scenario() {
    let case = CaseInput::new(90.0, AstigmatismMeasurement::new(0.20, 90.0), 0.0);
    let report = case.scan(&DEFAULT_CANDIDATES, 4).unwrap();

    let errors: Vec<f64> = report.table.iter().map(|c| c.error).collect();
    assert_eq!(errors, vec![0.2, 0.1, 0.0, 0.1, 0.2, 0.3]);

    assert_eq!(report.best().assumed_magnitude, 0.2);
    assert_eq!(report.worst().assumed_magnitude, 0.5);
}

#[test]
fn empty_candidate_set_is_reported() {
    let case = CaseInput::new(90.0, AstigmatismMeasurement::new(0.2, 90.0), 0.0);
    assert_eq!(case.scan(&[], 4).unwrap_err(), Error::EmptyCandidateSet);
}

#[test]
fn left_eye_case_matches_mirrored_right_eye_case() {
    let left = CaseInput::new(30.0, AstigmatismMeasurement::new(0.35, 60.0), 0.3).with_eye(Eye::Left);
    let right = CaseInput::new(150.0, AstigmatismMeasurement::new(0.35, 120.0), 0.3);

    let l = left.evaluate();
    let r = right.evaluate();
    assert!((l.magnitude - r.magnitude).abs() < TOL);
    assert!(axis_distance(l.axis, r.axis) < TOL);
}

#[test]
fn batch_isolation_scenario() {
    let rows = vec![
        RawRow::numeric(90.0, 0.2, 90.0),
        RawRow {
            actual_magnitude: Some(Cell::Text("0.2D".to_string())),
            ..RawRow::numeric(90.0, 0.2, 90.0)
        },
        RawRow::numeric(45.0, 0.3, 45.0),
    ];

    let outcome = evaluate_batch(&rows, &DEFAULT_CANDIDATES).unwrap();
    assert_eq!(outcome.rows.len(), 3);
    assert_eq!(outcome.rows[0].as_ref().unwrap().best().assumed_magnitude, 0.2);
    assert_eq!(outcome.rows[2].as_ref().unwrap().best().assumed_magnitude, 0.3);

    let failure = outcome.rows[1].as_ref().unwrap_err();
    assert_eq!(failure.index, 1);
    assert!(matches!(
        failure.fault,
        RowFault::NotNumeric {
            field: "actual_magnitude",
            ..
        }
    ));
}

#[test]
fn configured_precision_applies_to_batch() {
    let evaluator = BatchEvaluator::new(CalculatorConfig {
        candidates: vec![0.0],
        precision: 2,
        ..Default::default()
    })
    .unwrap();

    let rows = vec![RawRow::numeric(0.0, 0.123456, 0.0)];
    let outcome = evaluator.evaluate(&rows);
    assert_eq!(outcome.rows[0].as_ref().unwrap().best().error, 0.12);
}
