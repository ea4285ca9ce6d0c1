use crate::error::{Error, Result};
use crate::expected::ExpectedModel;
use crate::table::Table;
use crate::Config;
use smallvec::SmallVec;
use std::io;

/// What to do with an input line that can't be parsed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MalformedPolicy {
    /// Stop reading and report the line.
    Abort,
    /// Log a warning and carry on with the next line.
    Skip,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        MalformedPolicy::Abort
    }
}

/// One parsed input line: `label1 label2 [label3] count [expected]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<'a> {
    /// One label per axis.
    pub labels: SmallVec<[&'a str; 3]>,
    /// The observed count.
    pub count: u64,
    /// The supplied expected value, present only when supplied expecteds were asked for.
    pub expected: Option<f64>,
}

impl<'a> Record<'a> {
    /// Splits a line on whitespace and checks that it has the right fields.
    ///
    /// The line must hold exactly `axes` labels followed by a non-negative integer count, and then
    /// a non-negative expected value if `with_expected` is set. Returns `Ok(None)` for a blank
    /// line.
    ///
    /// ```
    /// use chisq::Record;
    ///
    /// let record = Record::parse("A  X\t10 8.5", 2, true).unwrap().unwrap();
    /// assert_eq!(record.labels.as_slice(), ["A", "X"]);
    /// assert_eq!(record.count, 10);
    /// assert_eq!(record.expected, Some(8.5));
    ///
    /// assert!(Record::parse("   ", 2, false).unwrap().is_none());
    /// assert!(Record::parse("A X ten", 2, false).is_err());
    /// ```
    pub fn parse(
        line: &'a str,
        axes: usize,
        with_expected: bool,
    ) -> std::result::Result<Option<Self>, String> {
        let fields: SmallVec<[&str; 5]> = line.split_whitespace().collect();
        if fields.is_empty() {
            return Ok(None);
        }

        let wanted = axes + 1 + with_expected as usize;
        if fields.len() != wanted {
            return Err(format!(
                "expected {} fields but found {}",
                wanted,
                fields.len()
            ));
        }

        let count = fields[axes]
            .parse::<u64>()
            .map_err(|_| format!("count `{}` is not a non-negative integer", fields[axes]))?;

        let expected = if with_expected {
            let field = fields[axes + 1];
            match field.parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
                _ => {
                    return Err(format!(
                        "expected value `{}` is not a non-negative number",
                        field
                    ))
                }
            }
        } else {
            None
        };

        Ok(Some(Record {
            labels: SmallVec::from_slice(&fields[..axes]),
            count,
            expected,
        }))
    }
}

/// Reads every record from `input` into a new table shaped by `config`.
///
/// Malformed lines are handled according to `config.malformed`. Running out of room for labels
/// on any axis always stops the load, since a table missing some of its labels can't produce a
/// meaningful statistic.
///
/// ```
/// use chisq::{load_table, Config};
///
/// let input = "A X 10\nA Y 20\n\nB X 30\nB Y 40\n";
/// let table = load_table(input.as_bytes(), &Config::default())?;
/// assert_eq!(table.labels(0).len(), 2);
/// assert_eq!(table.labels(1).len(), 2);
/// # Ok::<(), chisq::Error>(())
/// ```
pub fn load_table<R: io::BufRead>(input: R, config: &Config) -> Result<Table> {
    let with_expected = config.model == ExpectedModel::Supplied;
    let mut table = Table::new(config.axes, config.max_labels);

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let number = number + 1;
        let parsed = Record::parse(&line, config.axes, with_expected);
        match parsed {
            Ok(Some(record)) => {
                table.add_record(&record.labels, record.count, record.expected)?;
            }
            Ok(None) => {}
            Err(reason) => match config.malformed {
                MalformedPolicy::Abort => {
                    return Err(Error::MalformedRecord {
                        line: number,
                        reason,
                    })
                }
                MalformedPolicy::Skip => log::warn!("skipping line {}: {}", number, reason),
            },
        }
    }

    table.shrink_to_fit();
    log::debug!("loaded table with shape {:?}", table.shape());
    Ok(table)
}
