use crate::expected::ExpectedTable;
use crate::marginals::Marginals;
use crate::table::{Cell, Table};
use std::fmt;

/// Expected values at or below this are treated as zero and the cell is left out of the sum.
pub const NEAR_ZERO: f64 = 1e-21;

/// Cells expecting fewer observations than this count towards the small-expectation warning.
pub const SMALL_EXPECTED: f64 = 5.0;

/// The fraction of small-expectation cells above which the chi-squared approximation is suspect.
pub const SMALL_EXPECTED_FRACTION: f64 = 0.25;

/// One cell that passed the marginal-total check, as it entered the statistic.
#[derive(Clone, Debug, PartialEq)]
pub struct CellContribution {
    /// Position of the cell.
    pub cell: Cell,
    /// The observed count.
    pub observed: u64,
    /// The expected count, or `None` if it was unavailable.
    pub expected: Option<f64>,
    /// What this cell added to the statistic.
    pub contribution: f64,
}

/// Counters describing how well the chi-squared approximation applies to a table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Diagnostics {
    /// Cells skipped because their expectation was unavailable or no more than [`NEAR_ZERO`].
    pub excluded_zero_expected: usize,
    /// Included cells whose expectation was below [`SMALL_EXPECTED`].
    pub small_expected: usize,
    /// The number of cells spanned by the populated labels of every axis.
    pub cells_considered: usize,
}

/// An advisory condition about the validity of a chi-squared result. Warnings never change the
/// statistic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Warning {
    /// Some cells had no usable expectation and were left out.
    ZeroExpected {
        /// How many cells.
        cells: usize,
        /// The threshold at or below which an expectation counts as zero.
        threshold: f64,
    },
    /// Too many cells expected fewer than [`SMALL_EXPECTED`] observations.
    SmallExpected {
        /// How many cells.
        cells: usize,
        /// Out of how many.
        considered: usize,
    },
}

impl Diagnostics {
    /// Turns the counters into warnings.
    ///
    /// ```
    /// use chisq::{Diagnostics, Warning};
    ///
    /// let fine = Diagnostics { excluded_zero_expected: 0, small_expected: 2, cells_considered: 10 };
    /// assert!(fine.warnings().is_empty());
    ///
    /// let sparse = Diagnostics { excluded_zero_expected: 0, small_expected: 3, cells_considered: 10 };
    /// assert_eq!(
    ///     sparse.warnings(),
    ///     [Warning::SmallExpected { cells: 3, considered: 10 }]
    /// );
    /// ```
    pub fn warnings(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();
        if self.excluded_zero_expected > 0 {
            warnings.push(Warning::ZeroExpected {
                cells: self.excluded_zero_expected,
                threshold: NEAR_ZERO,
            });
        }
        if self.cells_considered > 0
            && self.small_expected as f64 / self.cells_considered as f64 > SMALL_EXPECTED_FRACTION
        {
            warnings.push(Warning::SmallExpected {
                cells: self.small_expected,
                considered: self.cells_considered,
            });
        }
        warnings
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ZeroExpected { cells, threshold } => write!(
                f,
                "{} cell(s) with an expected value of {:e} or less were excluded",
                cells, threshold
            ),
            Warning::SmallExpected { cells, considered } => write!(
                f,
                "{} of {} cells ({:.1}%) have an expected value below {}; more than {}% makes the \
                 chi-squared approximation unreliable",
                cells,
                considered,
                100.0 * *cells as f64 / *considered as f64,
                SMALL_EXPECTED,
                100.0 * SMALL_EXPECTED_FRACTION
            ),
        }
    }
}

/// Pearson's chi-squared statistic for one table, with its degrees of freedom.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Statistic {
    /// The statistic itself.
    pub chi_squared: f64,
    /// Degrees of freedom, either computed from the populated labels or overridden.
    pub degrees_of_freedom: usize,
    /// Whether Yates' continuity correction was applied.
    pub yates_corrected: bool,
    /// Validity counters.
    pub diagnostics: Diagnostics,
    cells: Vec<CellContribution>,
}

impl Statistic {
    /// Sums `(O - E)^2 / E` over every cell whose partial totals are all non-zero and whose
    /// expectation exceeds [`NEAR_ZERO`].
    ///
    /// The degrees of freedom come from `marginals` unless `dof_override` is given. Yates'
    /// correction, `(|O - E| - 0.5)^2 / E`, is only applied when it was asked for, the table is
    /// two-way, and the effective degrees of freedom are exactly one; otherwise the request is
    /// ignored.
    ///
    /// ```
    /// use chisq::{ExpectedModel, ExpectedTable, Marginals, Statistic, Table};
    ///
    /// let mut table = Table::new(2, 10);
    /// table
    ///     .add_record(&["A", "X"], 10, None)?
    ///     .add_record(&["A", "Y"], 20, None)?
    ///     .add_record(&["B", "X"], 30, None)?
    ///     .add_record(&["B", "Y"], 40, None)?;
    /// let marginals = Marginals::new(&table)?;
    /// let expected = ExpectedTable::compute(ExpectedModel::Independence, &table, &marginals)?;
    ///
    /// let plain = Statistic::compute(&table, &marginals, &expected, false, None);
    /// assert_eq!(plain.degrees_of_freedom, 1);
    /// assert!((plain.chi_squared - 0.79365).abs() < 1e-4);
    ///
    /// let corrected = Statistic::compute(&table, &marginals, &expected, true, None);
    /// assert!(corrected.yates_corrected);
    /// assert!((corrected.chi_squared - 0.44643).abs() < 1e-4);
    /// # Ok::<(), chisq::Error>(())
    /// ```
    pub fn compute(
        table: &Table,
        marginals: &Marginals,
        expected: &ExpectedTable,
        yates: bool,
        dof_override: Option<usize>,
    ) -> Statistic {
        // The correction rule depends on this, so settle it before touching any cell.
        let degrees_of_freedom = dof_override.unwrap_or_else(|| marginals.degrees_of_freedom());
        let yates_corrected = yates && table.axes() == 2 && degrees_of_freedom == 1;
        if yates && !yates_corrected {
            log::debug!(
                "not applying Yates' correction with {} degrees of freedom",
                degrees_of_freedom
            );
        }

        let mut chi_squared = 0.0;
        let mut diagnostics = Diagnostics {
            cells_considered: marginals.populated_cells(),
            ..Diagnostics::default()
        };
        let mut cells = Vec::new();

        for cell in marginals.shape().cells() {
            if !marginals.supports(&cell) {
                continue;
            }
            let observed = table.count(&cell);
            let expectation = expected.get(&cell);
            let contribution = match expectation {
                Some(e) if e > NEAR_ZERO => {
                    if e < SMALL_EXPECTED {
                        diagnostics.small_expected += 1;
                    }
                    let mut deviation = (observed as f64 - e).abs();
                    if yates_corrected {
                        deviation -= 0.5;
                    }
                    deviation * deviation / e
                }
                _ => {
                    diagnostics.excluded_zero_expected += 1;
                    0.0
                }
            };
            chi_squared += contribution;
            cells.push(CellContribution {
                cell,
                observed,
                expected: expectation,
                contribution,
            });
        }

        Statistic {
            chi_squared,
            degrees_of_freedom,
            yates_corrected,
            diagnostics,
            cells,
        }
    }

    /// Every cell that passed the marginal-total check, in row-major order, including those
    /// excluded for a near-zero expectation.
    pub fn cells(&self) -> &[CellContribution] {
        &self.cells
    }

    /// Warnings about the validity of this result.
    pub fn warnings(&self) -> Vec<Warning> {
        self.diagnostics.warnings()
    }
}
