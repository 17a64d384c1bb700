use super::*;
use crate::error::Error;
use crate::scan::DEFAULT_CANDIDATES;

fn three_rows_with_bad_middle() -> Vec<RawRow> {
    vec![
        RawRow::numeric(90.0, 0.2, 90.0),
        RawRow {
            actual_magnitude: Some(Cell::from("n/a")),
            ..RawRow::numeric(90.0, 0.0, 90.0)
        },
        RawRow::numeric(180.0, 0.5, 90.0),
    ]
}

#[test]
fn test_parse_numeric_row() {
    let case = RawRow::numeric(90.0, 0.2, 80.0).parse(0, 0.5).unwrap();
    assert_eq!(case.incision_axis, 90.0);
    assert_eq!(case.actual, AstigmatismMeasurement::new(0.2, 80.0));
    assert_eq!(case.assumed_magnitude, 0.5);
    assert_eq!(case.expected_axis, None);
    assert_eq!(case.eye, Eye::Right);
}

#[test]
fn test_parse_numeric_text_cells() {
    let row = RawRow {
        incision_axis: Some(" 150 ".into()),
        actual_magnitude: Some("0.5".into()),
        actual_axis: Some("30".into()),
        assumed_magnitude: Some("0.3".into()),
        eye: Some("LE".into()),
        ..Default::default()
    };
    let case = row.parse(0, 0.5).unwrap();
    assert_eq!(case.incision_axis, 150.0);
    assert_eq!(case.assumed_magnitude, 0.3);
    assert_eq!(case.eye, Eye::Left);
}

#[test]
fn test_parse_blank_assumed_uses_default() {
    let row = RawRow::numeric(90.0, 0.2, 90.0).with_assumed_magnitude("  ");
    let case = row.parse(0, 0.25).unwrap();
    assert_eq!(case.assumed_magnitude, 0.25);
}

#[test]
fn test_parse_missing_field() {
    let row = RawRow {
        actual_axis: None,
        ..RawRow::numeric(90.0, 0.2, 90.0)
    };
    let err = row.parse(4, 0.5).unwrap_err();
    assert_eq!(err.index, 4);
    assert_eq!(
        err.fault,
        RowFault::Missing {
            field: "actual_axis"
        }
    );
}

#[test]
fn test_parse_non_numeric_field() {
    let err = three_rows_with_bad_middle()[1].parse(1, 0.5).unwrap_err();
    assert_eq!(
        err.fault,
        RowFault::NotNumeric {
            field: "actual_magnitude",
            text: "n/a".to_string()
        }
    );
}

#[test]
fn test_parse_out_of_domain_field() {
    let err = RawRow::numeric(200.0, 0.2, 90.0).parse(0, 0.5).unwrap_err();
    assert!(matches!(
        err.fault,
        RowFault::OutOfDomain {
            field: "incision_axis",
            ..
        }
    ));

    let err = RawRow::numeric(90.0, -0.2, 90.0).parse(0, 0.5).unwrap_err();
    assert!(matches!(
        err.fault,
        RowFault::OutOfDomain {
            field: "actual_magnitude",
            ..
        }
    ));
}

#[test]
fn test_parse_unrecognized_eye() {
    let err = RawRow::numeric(90.0, 0.2, 90.0)
        .with_eye("both")
        .parse(0, 0.5)
        .unwrap_err();
    assert!(matches!(err.fault, RowFault::Unrecognized { field: "eye", .. }));
}

#[test]
fn test_batch_isolates_bad_row() {
    let outcome = evaluate_batch(&three_rows_with_bad_middle(), &DEFAULT_CANDIDATES).unwrap();

    assert_eq!(outcome.len(), 3);
    assert!(!outcome.cancelled);
    assert!(outcome.rows[0].is_ok());
    assert!(outcome.rows[2].is_ok());

    let err = outcome.rows[1].as_ref().unwrap_err();
    assert_eq!(err.index, 1);
    assert!(matches!(err.fault, RowFault::NotNumeric { .. }));

    let successes: Vec<usize> = outcome.successes().map(|(index, _)| index).collect();
    assert_eq!(successes, vec![0, 2]);
    assert_eq!(outcome.failures().count(), 1);
}

#[test]
fn test_batch_rows_match_single_case_scans() {
    let rows = three_rows_with_bad_middle();
    let outcome = evaluate_batch(&rows, &DEFAULT_CANDIDATES).unwrap();

    let first = outcome.rows[0].as_ref().unwrap();
    assert_eq!(first.best().assumed_magnitude, 0.2);
    assert_eq!(first.best().error, 0.0);

    // Incision at 180° is orthogonal to an actual flattening at 90°.
    let third = outcome.rows[2].as_ref().unwrap();
    assert_eq!(third.best().assumed_magnitude, 0.0);
    assert_eq!(third.best().error, 0.5);
    assert_eq!(third.worst().assumed_magnitude, 0.5);
    assert_eq!(third.worst().error, 1.0);
}

#[test]
fn test_batch_rejects_empty_candidates() {
    let result = evaluate_batch(&three_rows_with_bad_middle(), &[]);
    assert_eq!(result.unwrap_err(), Error::EmptyCandidateSet);
}

#[test]
fn test_empty_batch() {
    let outcome = evaluate_batch(&[], &DEFAULT_CANDIDATES).unwrap();
    assert!(outcome.is_empty());
    assert!(!outcome.cancelled);
}

#[test]
fn test_parallel_matches_sequential() {
    let rows: Vec<RawRow> = (0..50)
        .map(|i| {
            if i % 7 == 3 {
                RawRow::numeric(90.0, 0.2, 90.0).with_expected_axis("x")
            } else {
                RawRow::numeric((i * 13 % 180) as f64, 0.01 * i as f64, (i * 29 % 180) as f64)
            }
        })
        .collect();

    let evaluator = BatchEvaluator::new(CalculatorConfig {
        max_concurrent_rows: 4,
        ..Default::default()
    })
    .unwrap();

    let sequential = evaluator.evaluate_with(&rows, &DEFAULT_CANDIDATES).unwrap();
    let parallel = evaluator.evaluate_parallel(&rows, &DEFAULT_CANDIDATES).unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(parallel.failures().count(), 7);
}

#[test]
fn test_cancelled_batch_returns_empty_prefix() {
    let token = CancelToken::new();
    token.cancel();
    let evaluator = BatchEvaluator::default().with_cancel_token(token);

    let outcome = evaluator.evaluate(&three_rows_with_bad_middle());
    assert!(outcome.cancelled);
    assert!(outcome.is_empty());

    let outcome = evaluator
        .evaluate_parallel(&three_rows_with_bad_middle(), &DEFAULT_CANDIDATES)
        .unwrap();
    assert!(outcome.cancelled);
    assert!(outcome.is_empty());
}

#[test]
fn test_batch_errors_default_assumed() {
    let rows = vec![
        RawRow::numeric(180.0, 0.5, 180.0),
        RawRow::numeric(180.0, 0.5, 180.0).with_assumed_magnitude(0.2),
        RawRow::numeric(180.0, 0.5, 90.0),
        RawRow {
            incision_axis: None,
            ..RawRow::numeric(180.0, 0.5, 90.0)
        },
    ];
    let outcome = evaluate_batch_errors(&rows, 0.5);

    assert_eq!(outcome.rows[0], Ok(0.0));
    assert_eq!(outcome.rows[1], Ok(0.3));
    assert_eq!(outcome.rows[2], Ok(1.0));
    assert!(outcome.rows[3].is_err());
}

#[test]
fn test_batch_file_from_yaml_with_template_headers() {
    let yaml = r#"
candidates: [0.0, 0.25, 0.5]
rows:
  - Incision Axis: 180
    Actual SIA Magnitude: 0.5
    Actual SIA Axis: 90
    Assumed SIA Magnitude: 0.5
  - incision_axis: 90
    actual_magnitude: abc
    actual_axis: 90
  - incision_axis: 90
    actual_magnitude: 0.25
    actual_axis: 90
    eye: LE
"#;
    let file: BatchFile = serde_yml::from_str(yaml).unwrap();
    assert_eq!(file.candidates, Some(vec![0.0, 0.25, 0.5]));
    assert_eq!(file.rows.len(), 3);
    assert_eq!(file.rows[0].incision_axis, Some(Cell::Number(180.0)));

    let outcome = evaluate_batch(&file.rows, file.candidates.as_deref().unwrap()).unwrap();
    assert!(outcome.rows[0].is_ok());
    assert!(outcome.rows[1].is_err());
    let third = outcome.rows[2].as_ref().unwrap();
    assert_eq!(third.best().assumed_magnitude, 0.25);
}

#[test]
fn test_batch_file_from_toml() {
    let text = r#"
[[rows]]
incision_axis = 90
actual_magnitude = 0.2
actual_axis = 90

[[rows]]
incision_axis = 90
actual_magnitude = "0.4"
actual_axis = 90
expected_axis = 90
"#;
    let file: BatchFile = toml::from_str(text).unwrap();
    assert_eq!(file.candidates, None);
    let outcome = BatchEvaluator::default().evaluate(&file.rows);
    assert_eq!(outcome.successes().count(), 2);
    assert_eq!(outcome.rows[1].as_ref().unwrap().best().assumed_magnitude, 0.4);
}

#[test]
fn test_batch_file_with_boolean_cell_fails_only_that_row() {
    let yaml = r#"
rows:
  - incision_axis: 90
    actual_magnitude: 0.2
    actual_axis: 90
  - incision_axis: 90
    actual_magnitude: true
    actual_axis: 90
  - incision_axis: 180
    actual_magnitude: 0.5
    actual_axis: 90
"#;
    let file: BatchFile = serde_yml::from_str(yaml).unwrap();
    assert_eq!(file.rows.len(), 3);
    assert_eq!(
        file.rows[1].actual_magnitude,
        Some(Cell::Other(serde_json::Value::Bool(true)))
    );

    let outcome = BatchEvaluator::default().evaluate(&file.rows);
    assert_eq!(outcome.len(), 3);
    assert!(outcome.rows[0].is_ok());
    assert!(outcome.rows[2].is_ok());
    assert_eq!(
        outcome.rows[1],
        Err(RowError {
            index: 1,
            fault: RowFault::NotNumeric {
                field: "actual_magnitude",
                text: "true".to_string(),
            },
        })
    );
}

#[test]
fn test_batch_file_with_list_and_map_cells_from_json() {
    let json = r#"{"rows": [
        {"incision_axis": 90, "actual_magnitude": [0.2], "actual_axis": 90},
        {"incision_axis": 90, "actual_magnitude": 0.2, "actual_axis": 90, "eye": {"side": "LE"}},
        {"incision_axis": 90, "actual_magnitude": 0.2, "actual_axis": 90}
    ]}"#;
    let file: BatchFile = serde_json::from_str(json).unwrap();

    let outcome = BatchEvaluator::default().evaluate(&file.rows);
    assert!(matches!(
        &outcome.rows[0],
        Err(RowError {
            index: 0,
            fault: RowFault::NotNumeric {
                field: "actual_magnitude",
                ..
            },
        })
    ));
    assert!(matches!(
        &outcome.rows[1],
        Err(RowError {
            index: 1,
            fault: RowFault::Unrecognized { field: "eye", .. },
        })
    ));
    assert!(outcome.rows[2].is_ok());
}
