use chisq::{load_table, Analysis, Cell, Config, Error, ExpectedModel, Table, Warning};

fn analyse(input: &str, config: &Config) -> (Table, Analysis) {
    let table = load_table(input.as_bytes(), config).unwrap();
    let analysis = Analysis::run(&table, config).unwrap();
    (table, analysis)
}

fn close(actual: f64, wanted: f64) -> bool {
    (actual - wanted).abs() < 1e-4
}

const TWO_BY_TWO: &str = "A X 10\nA Y 20\nB X 30\nB Y 40\n";

#[test]
fn independence_two_by_two() {
    let (table, analysis) = analyse(TWO_BY_TWO, &Config::default());

    assert_eq!(analysis.marginals.grand_total(), 100);
    assert_eq!(analysis.marginals.axis_totals(0), [30, 70]);
    assert_eq!(analysis.marginals.axis_totals(1), [40, 60]);

    for (labels, wanted) in &[
        (["A", "X"], 12.0),
        (["A", "Y"], 18.0),
        (["B", "X"], 28.0),
        (["B", "Y"], 42.0),
    ] {
        let cell = table.cell(labels).unwrap();
        assert!(close(analysis.expected.get(&cell).unwrap(), *wanted));
    }

    let statistic = &analysis.statistic;
    assert!(close(statistic.chi_squared, 0.79365));
    assert_eq!(statistic.degrees_of_freedom, 1);
    assert!(!statistic.yates_corrected);
    assert!(statistic.warnings().is_empty());
}

#[test]
fn yates_two_by_two() {
    let config = Config {
        yates: true,
        ..Config::default()
    };
    let (_, analysis) = analyse(TWO_BY_TWO, &config);
    assert!(analysis.statistic.yates_corrected);
    assert!(close(analysis.statistic.chi_squared, 0.44643));
}

#[test]
fn yates_ignored_with_two_degrees_of_freedom() {
    let input = "A X 10\nA Y 20\nA Z 5\nB X 30\nB Y 40\nB Z 15\n";
    let plain = analyse(input, &Config::default()).1.statistic;
    let config = Config {
        yates: true,
        ..Config::default()
    };
    let requested = analyse(input, &config).1.statistic;

    assert_eq!(requested.degrees_of_freedom, 2);
    assert!(!requested.yates_corrected);
    assert_eq!(requested.chi_squared, plain.chi_squared);
}

#[test]
fn yates_follows_dof_override() {
    let config = Config {
        yates: true,
        dof_override: Some(3),
        ..Config::default()
    };
    let (_, analysis) = analyse(TWO_BY_TWO, &config);
    assert_eq!(analysis.statistic.degrees_of_freedom, 3);
    assert!(!analysis.statistic.yates_corrected);
    assert!(close(analysis.statistic.chi_squared, 0.79365));
}

#[test]
fn supplied_expecteds_ignore_marginals() {
    let config = Config {
        model: ExpectedModel::Supplied,
        ..Config::default()
    };
    let (_, analysis) = analyse("A X 10 8\nA Y 20 22\n", &config);
    assert!(close(analysis.statistic.chi_squared, 0.5 + 4.0 / 22.0));
}

#[test]
fn supplied_zero_expectation_is_excluded() {
    let config = Config {
        model: ExpectedModel::Supplied,
        ..Config::default()
    };
    let (_, analysis) = analyse("A X 10 8\nA Y 20 0\n", &config);
    let statistic = &analysis.statistic;
    assert!(close(statistic.chi_squared, 0.5));
    assert_eq!(statistic.diagnostics.excluded_zero_expected, 1);
    assert!(matches!(
        statistic.warnings()[0],
        Warning::ZeroExpected { cells: 1, .. }
    ));
}

#[test]
fn first_row_reference() {
    let config = Config {
        model: ExpectedModel::FirstRowReference,
        ..Config::default()
    };
    let (table, analysis) = analyse("A X 10\nA Y 20\nB X 30\nB Y 30\n", &config);

    // The reference row is its own expectation.
    for col in &["X", "Y"] {
        let cell = table.cell(&["A", *col]).unwrap();
        assert_eq!(
            analysis.expected.get(&cell),
            Some(table.count(&cell) as f64)
        );
    }
    assert_eq!(
        analysis.expected.get(&table.cell(&["B", "X"]).unwrap()),
        Some(20.0)
    );
    assert!(close(analysis.statistic.chi_squared, 5.0 + 2.5));
}

#[test]
fn first_row_reference_needs_two_axes() {
    let config = Config {
        axes: 3,
        model: ExpectedModel::FirstRowReference,
        ..Config::default()
    };
    assert!(matches!(
        load_table("a b c 1\n".as_bytes(), &config).and_then(|table| Analysis::run(&table, &config)),
        Err(Error::UnsupportedModel { axes: 3, .. })
    ));
}

#[test]
fn empty_row_is_left_out() {
    let input = "A X 0\nA Y 0\nB X 5\nB Y 7\nC X 3\nC Y 2\n";
    let (table, analysis) = analyse(input, &Config::default());

    assert_eq!(table.labels(0).len(), 3);
    assert_eq!(analysis.marginals.populated(0), 2);
    assert_eq!(analysis.statistic.degrees_of_freedom, 1);
    assert_eq!(analysis.statistic.cells().len(), 4);
    assert!(analysis
        .statistic
        .cells()
        .iter()
        .all(|cell| cell.cell[0] != 0));
    assert_eq!(analysis.statistic.diagnostics.excluded_zero_expected, 0);
}

#[test]
fn small_expectations_warn() {
    let input = "A X 1\nA Y 2\nB X 3\nB Y 1\n";
    let (_, analysis) = analyse(input, &Config::default());
    let warnings = analysis.statistic.warnings();
    assert_eq!(
        warnings,
        [Warning::SmallExpected {
            cells: 4,
            considered: 4
        }]
    );
}

#[test]
fn later_records_overwrite() {
    let (table, analysis) = analyse("A X 99\nA Y 20\nB X 30\nB Y 40\nA X 10\n", &Config::default());
    assert_eq!(table.count(&Cell::new(&[0, 0])), 10);
    assert!(close(analysis.statistic.chi_squared, 0.79365));
}

#[test]
fn three_way_independent_table() {
    // Counts are products of per-axis weights, so independence fits exactly.
    let mut input = String::new();
    for (row, r) in &[("r0", 1), ("r1", 2)] {
        for (col, c) in &[("c0", 1), ("c1", 3)] {
            for (plane, p) in &[("p0", 2), ("p1", 1)] {
                input += &format!("{} {} {} {}\n", row, col, plane, r * c * p);
            }
        }
    }
    let config = Config {
        axes: 3,
        ..Config::default()
    };
    let (table, analysis) = analyse(&input, &config);

    assert_eq!(analysis.marginals.grand_total(), 36);
    assert_eq!(analysis.statistic.degrees_of_freedom, 1);
    assert!(analysis.statistic.chi_squared.abs() < 1e-9);
    assert!((analysis.expected.total() - 36.0).abs() < 1e-9);

    let cell = table.cell(&["r1", "c1", "p0"]).unwrap();
    assert!(close(analysis.expected.get(&cell).unwrap(), 12.0));
}

#[test]
fn three_way_pairwise_differs_from_independence() {
    let input = "r0 c0 p0 5\nr0 c1 p0 1\nr1 c0 p1 2\nr1 c1 p1 6\nr0 c0 p1 3\nr1 c1 p0 4\n";
    let independence = Config {
        axes: 3,
        ..Config::default()
    };
    let pairwise = Config {
        model: ExpectedModel::PairwiseIndependence,
        ..independence.clone()
    };
    let a = analyse(input, &independence).1.statistic;
    let b = analyse(input, &pairwise).1.statistic;
    assert_eq!(a.degrees_of_freedom, b.degrees_of_freedom);
    assert!(a.chi_squared != b.chi_squared);
}

#[test]
fn repeated_runs_are_identical() {
    let input = "A X 10\nB Y 4\nA Z 7\nC X 1\nB X 9\nC Z 12\n";
    let config = Config::default();
    let table = load_table(input.as_bytes(), &config).unwrap();
    let first = Analysis::run(&table, &config).unwrap();
    let second = Analysis::run(&table, &config).unwrap();
    assert_eq!(first.statistic, second.statistic);
    assert_eq!(first.expected, second.expected);
}

#[test]
fn independence_expectations_sum_to_grand_total() {
    let input = "A X 10\nB Y 4\nA Z 7\nC X 1\nB X 9\nC Z 12\nC Y 3\n";
    let (_, analysis) = analyse(input, &Config::default());
    let grand = analysis.marginals.grand_total() as f64;
    assert!((analysis.expected.total() - grand).abs() < 1e-9);
}

fn two_by_five(columns: &[u64]) -> String {
    // The second row is double the first, so independence reproduces every count exactly.
    let mut input = String::new();
    for (col, count) in columns.iter().enumerate() {
        input += &format!("A c{} {}\nB c{} {}\n", col, count, col, 2 * count);
    }
    input
}

#[test]
fn small_expectation_threshold_on_ten_cells() {
    let (_, three) = analyse(&two_by_five(&[2, 3, 10, 10, 10]), &Config::default());
    let diagnostics = three.statistic.diagnostics;
    assert_eq!(diagnostics.cells_considered, 10);
    assert_eq!(diagnostics.small_expected, 3);
    assert_eq!(
        three.statistic.warnings(),
        [Warning::SmallExpected {
            cells: 3,
            considered: 10
        }]
    );

    let (_, two) = analyse(&two_by_five(&[2, 10, 10, 10, 10]), &Config::default());
    assert_eq!(two.statistic.diagnostics.cells_considered, 10);
    assert_eq!(two.statistic.diagnostics.small_expected, 2);
    assert!(two.statistic.warnings().is_empty());
}

#[test]
fn supplied_expecteds_do_not_follow_counts() {
    let config = Config {
        model: ExpectedModel::Supplied,
        ..Config::default()
    };
    let (_, before) = analyse("A X 10 8\nA Y 20 22\nB X 5 9\nB Y 7 6\n", &config);
    let (_, after) = analyse("A X 40 8\nA Y 1 22\nB X 9 9\nB Y 30 6\n", &config);

    assert_eq!(before.expected, after.expected);
    assert!(after.marginals.grand_total() != before.marginals.grand_total());
    assert!(close(
        after.statistic.chi_squared,
        32.0 * 32.0 / 8.0 + 21.0 * 21.0 / 22.0 + 0.0 + 24.0 * 24.0 / 6.0
    ));
}

#[test]
fn overflowing_counts_are_an_error() {
    let config = Config::default();
    let table = load_table(
        "A X 18446744073709551615\nA Y 1\nB X 1\nB Y 1\n".as_bytes(),
        &config,
    )
    .unwrap();
    assert!(matches!(
        Analysis::run(&table, &config),
        Err(Error::CountOverflow)
    ));
}
