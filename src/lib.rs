#![warn(missing_docs)]
#![doc(test(no_crate_inject))]
#![doc(test(attr(deny(unused, future_incompatible))))]

//! This crate computes [Pearson's chi-squared statistic][chi2] for two-way (row × column) and
//! three-way (row × column × plane) contingency tables built from labelled observations.
//!
//! [chi2]: https://en.wikipedia.org/wiki/Pearson%27s_chi-squared_test
//!
//! Input is a list of records of the form `label1 label2 [label3] count [expected]`. Labels are
//! interned per axis in the order they are first seen, and the table grows to fit however many
//! labels actually occur, up to a configurable limit.
//!
//! Expected counts come from one of the models in [`ExpectedModel`]: independence of the axes
//! (the default), pairwise independence for three-way tables, values supplied with the records,
//! or the first row taken as a reference distribution. A cell only contributes to the statistic
//! if none of its partial totals is zero and its expectation is above [`NEAR_ZERO`]. Alongside
//! the statistic, [`Diagnostics`] count the cells that were left out and the cells with small
//! expectations, since too many of the latter make the chi-squared approximation unreliable.
//!
//! ```
//! use chisq::{load_table, Analysis, Config};
//!
//! let input = "A X 10\nA Y 20\nB X 30\nB Y 40\n";
//! let config = Config::default();
//! let table = load_table(input.as_bytes(), &config)?;
//! let analysis = Analysis::run(&table, &config)?;
//!
//! assert_eq!(analysis.statistic.degrees_of_freedom, 1);
//! assert!((analysis.statistic.chi_squared - 0.79365).abs() < 1e-4);
//! assert!(analysis.statistic.warnings().is_empty());
//! # Ok::<(), chisq::Error>(())
//! ```

mod error;
mod expected;
mod input;
mod labels;
mod marginals;
pub mod significance;
mod statistic;
mod table;

pub use error::{Error, Result};
pub use expected::{ExpectedModel, ExpectedTable};
pub use input::{load_table, MalformedPolicy, Record};
pub use labels::Labels;
pub use marginals::Marginals;
pub use statistic::{
    CellContribution, Diagnostics, Statistic, Warning, NEAR_ZERO, SMALL_EXPECTED,
    SMALL_EXPECTED_FRACTION,
};
pub use table::{Cell, Cells, Observation, Shape, Table};

/// The default limit on distinct labels per axis.
pub const DEFAULT_MAX_LABELS: usize = 2000;

/// Everything that controls how a table is read and evaluated.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of axes: 2 or 3.
    pub axes: usize,
    /// Request Yates' continuity correction. It is only applied to two-way tables with one
    /// degree of freedom.
    pub yates: bool,
    /// Where expected counts come from.
    pub model: ExpectedModel,
    /// Limit on the number of distinct labels on any one axis.
    pub max_labels: usize,
    /// What to do with lines that can't be parsed.
    pub malformed: MalformedPolicy,
    /// Use this many degrees of freedom instead of computing them from the table.
    pub dof_override: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            axes: 2,
            yates: false,
            model: ExpectedModel::default(),
            max_labels: DEFAULT_MAX_LABELS,
            malformed: MalformedPolicy::default(),
            dof_override: None,
        }
    }
}

impl Config {
    /// Rejects combinations that can't be evaluated, before any input is read.
    ///
    /// ```
    /// use chisq::{Config, ExpectedModel};
    ///
    /// assert!(Config::default().validate().is_ok());
    ///
    /// let three_way_reference = Config {
    ///     axes: 3,
    ///     model: ExpectedModel::FirstRowReference,
    ///     ..Config::default()
    /// };
    /// assert!(three_way_reference.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.axes != 2 && self.axes != 3 {
            return Err(Error::InvalidArgument(format!(
                "tables must have 2 or 3 axes, not {}",
                self.axes
            )));
        }
        if self.max_labels == 0 {
            return Err(Error::InvalidArgument(
                "the label limit must be at least 1".to_string(),
            ));
        }
        if self.yates && self.axes != 2 {
            return Err(Error::UnsupportedModel {
                model: "Yates' correction",
                axes: self.axes,
            });
        }
        self.model.check_axes(self.axes)
    }
}

/// The full evaluation of one table: its totals, its expected counts and the resulting
/// statistic.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// Totals over the observed counts.
    pub marginals: Marginals,
    /// Expected counts under the configured model.
    pub expected: ExpectedTable,
    /// The chi-squared statistic and its diagnostics.
    pub statistic: Statistic,
}

impl Analysis {
    /// Evaluates a finished table.
    ///
    /// This is deterministic: the same table and configuration always give the same result.
    pub fn run(table: &Table, config: &Config) -> Result<Analysis> {
        config.validate()?;
        if table.axes() != config.axes {
            return Err(Error::WrongArity {
                expected: config.axes,
                found: table.axes(),
            });
        }

        let marginals = Marginals::new(table)?;
        log::debug!(
            "{} observations over {:?}",
            marginals.grand_total(),
            marginals.shape()
        );
        let expected = ExpectedTable::compute(config.model, table, &marginals)?;
        let statistic = Statistic::compute(
            table,
            &marginals,
            &expected,
            config.yates,
            config.dof_override,
        );

        Ok(Analysis {
            marginals,
            expected,
            statistic,
        })
    }
}
