use chisq::{Config, ExpectedModel, MalformedPolicy, DEFAULT_MAX_LABELS};
use clap::Parser;
use std::path::PathBuf;

/// Pearson's chi-squared test over a two-way or three-way contingency table.
///
/// Each input line has the form `item1 item2 [item3] count [expected]`.
#[derive(Parser, Debug)]
#[command(name = "chisq", version, about)]
pub struct Args {
    /// Input file (standard input if omitted)
    pub input: Option<PathBuf>,

    /// Output file (standard output if omitted)
    pub output: Option<PathBuf>,

    /// Display the observed matrix and the observed and expected value of every cell
    #[arg(short, long)]
    pub display: bool,

    /// Apply Yates' continuity correction (two-way tables with one degree of freedom)
    #[arg(short, long)]
    pub yates: bool,

    /// Read an expected value after each count
    #[arg(short = 'e', long, conflicts_with_all = ["first_reference", "pairwise"])]
    pub expecteds: bool,

    /// Use the first dataset's observed counts as the expected distribution
    #[arg(short = 'f', long, conflicts_with = "pairwise")]
    pub first_reference: bool,

    /// Use pairwise totals for three-way expected values
    #[arg(short = 'p', long)]
    pub pairwise: bool,

    /// Three-way table: each line has three items
    #[arg(short = '3', long)]
    pub three_way: bool,

    /// Also print the significance level of the statistic
    #[arg(short, long)]
    pub significance: bool,

    /// Skip malformed lines instead of stopping
    #[arg(long)]
    pub lenient: bool,

    /// Maximum number of distinct items per column
    #[arg(long, default_value_t = DEFAULT_MAX_LABELS)]
    pub max_labels: usize,

    /// Use this many degrees of freedom instead of computing them
    #[arg(long)]
    pub dof: Option<usize>,
}

impl Args {
    /// Translates the flags into the library configuration.
    pub fn config(&self) -> Config {
        let model = if self.expecteds {
            ExpectedModel::Supplied
        } else if self.first_reference {
            ExpectedModel::FirstRowReference
        } else if self.pairwise {
            ExpectedModel::PairwiseIndependence
        } else {
            ExpectedModel::Independence
        };
        Config {
            axes: if self.three_way { 3 } else { 2 },
            yates: self.yates,
            model,
            max_labels: self.max_labels,
            malformed: if self.lenient {
                MalformedPolicy::Skip
            } else {
                MalformedPolicy::Abort
            },
            dof_override: self.dof,
        }
    }
}
