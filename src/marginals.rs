use crate::error::{Error, Result};
use crate::table::{Cell, Shape, Table};
use smallvec::SmallVec;

/// Totals derived from a finished [`Table`].
///
/// Two kinds of totals are kept for every axis:
///
/// - the *axis total* for an index on that axis, summing over every other axis (row totals,
///   column totals, plane totals);
/// - the *partial total* that sums over only that axis, indexed by the positions on the remaining
///   axes. For a three-way table these are the pairwise totals; for a two-way table, summing over
///   rows gives the column totals and vice versa.
///
/// Nothing here is cached on the table; build a fresh `Marginals` after the table is complete.
#[derive(Clone, Debug)]
pub struct Marginals {
    shape: Shape,
    grand_total: u64,
    axis_totals: SmallVec<[Vec<u64>; 3]>,
    partial_totals: SmallVec<[(Shape, Vec<u64>); 3]>,
}

impl Marginals {
    /// Sums up the observed counts of `table`.
    ///
    /// This takes time proportional to the number of cells that were written, not the size of the
    /// dense table. Fails with [`Error::CountOverflow`] if any total doesn't fit in a `u64`.
    ///
    /// ```
    /// use chisq::{Marginals, Table};
    ///
    /// let mut table = Table::new(2, 10);
    /// table
    ///     .add_record(&["A", "X"], 10, None)?
    ///     .add_record(&["A", "Y"], 20, None)?
    ///     .add_record(&["B", "X"], 30, None)?
    ///     .add_record(&["B", "Y"], 40, None)?;
    ///
    /// let marginals = Marginals::new(&table)?;
    /// assert_eq!(marginals.grand_total(), 100);
    /// assert_eq!(marginals.axis_totals(0), [30, 70]);
    /// assert_eq!(marginals.axis_totals(1), [40, 60]);
    /// # Ok::<(), chisq::Error>(())
    /// ```
    pub fn new(table: &Table) -> Result<Self> {
        let shape = table.shape();
        let mut axis_totals: SmallVec<[Vec<u64>; 3]> = (0..shape.axes())
            .map(|axis| vec![0; shape.dim(axis)])
            .collect();
        let mut partial_totals: SmallVec<[(Shape, Vec<u64>); 3]> = (0..shape.axes())
            .map(|axis| {
                let reduced = shape.without(axis);
                let totals = vec![0; reduced.len()];
                (reduced, totals)
            })
            .collect();
        let mut grand_total = 0;

        for (cell, observation) in table.observations() {
            let count = observation.count;
            accumulate(&mut grand_total, count)?;
            for (axis, index) in cell.iter().enumerate() {
                accumulate(&mut axis_totals[axis][*index], count)?;
                let (reduced, totals) = &mut partial_totals[axis];
                accumulate(&mut totals[reduced.offset(&cell.without(axis))], count)?;
            }
        }

        Ok(Marginals {
            shape,
            grand_total,
            axis_totals,
            partial_totals,
        })
    }

    /// The shape of the table these totals were computed from.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// The total number of observations in the table.
    pub fn grand_total(&self) -> u64 {
        self.grand_total
    }

    /// Totals for each index along `axis`, summed over all other axes.
    pub fn axis_totals(&self, axis: usize) -> &[u64] {
        &self.axis_totals[axis]
    }

    /// The total for `cell`'s index along `axis`.
    pub fn axis_total(&self, axis: usize, cell: &Cell) -> u64 {
        self.axis_totals[axis][cell[axis]]
    }

    /// The total over `axis` at `cell`'s position on every other axis.
    pub fn partial_total(&self, axis: usize, cell: &Cell) -> u64 {
        let (reduced, totals) = &self.partial_totals[axis];
        totals[reduced.offset(&cell.without(axis))]
    }

    /// The number of indices along `axis` whose total is non-zero.
    pub fn populated(&self, axis: usize) -> usize {
        self.axis_totals[axis]
            .iter()
            .filter(|&&total| total != 0)
            .count()
    }

    /// The number of cells spanned by the populated indices of every axis.
    pub fn populated_cells(&self) -> usize {
        (0..self.shape.axes())
            .map(|axis| self.populated(axis))
            .product()
    }

    /// Returns `true` if no partial total through `cell` is zero. Only such cells take part in
    /// the statistic.
    ///
    /// For a two-way table that means the cell's row and column both have observations.
    pub fn supports(&self, cell: &Cell) -> bool {
        (0..self.shape.axes()).all(|axis| self.partial_total(axis, cell) != 0)
    }

    /// Degrees of freedom of the independence hypothesis: the product over all axes of one less
    /// than the number of populated indices.
    ///
    /// An axis with nothing populated yields zero rather than a negative count.
    pub fn degrees_of_freedom(&self) -> usize {
        (0..self.shape.axes())
            .map(|axis| self.populated(axis).saturating_sub(1))
            .product()
    }
}

fn accumulate(total: &mut u64, count: u64) -> Result<()> {
    *total = total.checked_add(count).ok_or(Error::CountOverflow)?;
    Ok(())
}
