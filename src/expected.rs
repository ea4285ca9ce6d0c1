use crate::error::{Error, Result};
use crate::marginals::Marginals;
use crate::table::{Cell, Shape, Table};
use std::fmt;

/// Where the expected count for each cell comes from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpectedModel {
    /// Every axis is independent of the others: the product of the cell's axis totals, divided by
    /// the grand total once for each axis beyond the first.
    Independence,

    /// The earlier three-way generalisation: the product of the cell's partial totals (the totals
    /// over each single axis) divided by `N^(axes - 1)`. For a two-way table this is identical to
    /// [`ExpectedModel::Independence`]. It is not a maximum-likelihood estimate for three-way
    /// tables, so prefer `Independence` unless you need to reproduce old results.
    PairwiseIndependence,

    /// Expected values were supplied alongside each observed count.
    Supplied,

    /// The first row is the reference distribution. Every row's expected counts are the first
    /// row's observed counts, scaled by the ratio of that row's total to the first row's total.
    /// Two-way tables only.
    FirstRowReference,
}

impl ExpectedModel {
    fn name(self) -> &'static str {
        match self {
            ExpectedModel::Independence => "the independence model",
            ExpectedModel::PairwiseIndependence => "the pairwise independence model",
            ExpectedModel::Supplied => "supplied expected values",
            ExpectedModel::FirstRowReference => "the first-row reference model",
        }
    }

    /// Checks that this model can be used with a table of `axes` axes.
    pub fn check_axes(self, axes: usize) -> Result<()> {
        if self == ExpectedModel::FirstRowReference && axes != 2 {
            return Err(Error::UnsupportedModel {
                model: self.name(),
                axes,
            });
        }
        Ok(())
    }
}

impl Default for ExpectedModel {
    fn default() -> Self {
        ExpectedModel::Independence
    }
}

impl fmt::Display for ExpectedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dense table of expected counts with the same shape as the observed table.
///
/// A cell whose expected value could not be computed (the reference row has no observations) is
/// `None`; the statistic treats it like a zero expectation.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedTable {
    shape: Shape,
    values: Vec<Option<f64>>,
}

impl ExpectedTable {
    /// Computes expected counts for every cell of `table` under `model`.
    ///
    /// `marginals` must have been computed from the same, finished table. The result depends only
    /// on its inputs, so calling this twice gives identical tables.
    ///
    /// ```
    /// use chisq::{Cell, ExpectedModel, ExpectedTable, Marginals, Table};
    ///
    /// let mut table = Table::new(2, 10);
    /// table
    ///     .add_record(&["A", "X"], 10, None)?
    ///     .add_record(&["A", "Y"], 20, None)?
    ///     .add_record(&["B", "X"], 30, None)?
    ///     .add_record(&["B", "Y"], 40, None)?;
    /// let marginals = Marginals::new(&table)?;
    ///
    /// let expected = ExpectedTable::compute(ExpectedModel::Independence, &table, &marginals)?;
    /// assert_eq!(expected.get(&Cell::new(&[0, 0])), Some(12.0));
    /// assert_eq!(expected.get(&Cell::new(&[1, 1])), Some(42.0));
    /// # Ok::<(), chisq::Error>(())
    /// ```
    pub fn compute(model: ExpectedModel, table: &Table, marginals: &Marginals) -> Result<Self> {
        model.check_axes(table.axes())?;
        let shape = marginals.shape().clone();
        let axes = shape.axes();
        let denominator = (marginals.grand_total() as f64).powi(axes as i32 - 1);
        log::debug!("computing {} over {:?}", model, shape);

        let values = shape
            .cells()
            .map(|cell| match model {
                ExpectedModel::Independence => Some(scaled_product(
                    (0..axes).map(|axis| marginals.axis_total(axis, &cell)),
                    denominator,
                )),
                ExpectedModel::PairwiseIndependence => Some(scaled_product(
                    (0..axes).map(|axis| marginals.partial_total(axis, &cell)),
                    denominator,
                )),
                ExpectedModel::Supplied => Some(table.supplied_expected(&cell)),
                ExpectedModel::FirstRowReference => first_row_reference(table, marginals, &cell),
            })
            .collect();

        Ok(ExpectedTable { shape, values })
    }

    /// The expected count for `cell`, or `None` if it is unavailable.
    pub fn get(&self, cell: &Cell) -> Option<f64> {
        self.values[self.shape.offset(cell)]
    }

    /// The shape of this table.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Sums every available expected count.
    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

/// Multiplies marginal totals together and divides by `denominator`. A zero total anywhere means
/// the cell can't be estimated, which comes out as an expectation of zero.
fn scaled_product<I: Iterator<Item = u64>>(totals: I, denominator: f64) -> f64 {
    let mut product = 1.0;
    for total in totals {
        if total == 0 {
            return 0.0;
        }
        product *= total as f64;
    }
    product / denominator
}

fn first_row_reference(table: &Table, marginals: &Marginals, cell: &Cell) -> Option<f64> {
    let baseline_total = marginals.axis_totals(0).first().copied().unwrap_or(0);
    if baseline_total == 0 {
        return None;
    }
    let baseline = table.count(&Cell::new(&[0, cell[1]])) as f64;
    let row_total = marginals.axis_total(0, cell) as f64;
    Some(baseline * row_total / baseline_total as f64)
}
