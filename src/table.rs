use crate::error::{Error, Result};
use crate::labels::Labels;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::ops::Deref;

/// The position of one cell in a table: one label index per axis.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Cell(SmallVec<[usize; 3]>);

impl Cell {
    /// Creates a cell from its per-axis indices.
    pub fn new(indices: &[usize]) -> Self {
        Cell(SmallVec::from_slice(indices))
    }

    /// Returns the same position with one axis removed.
    ///
    /// ```
    /// use chisq::Cell;
    ///
    /// assert_eq!(Cell::new(&[4, 5, 6]).without(1), Cell::new(&[4, 6]));
    /// ```
    pub fn without(&self, axis: usize) -> Cell {
        let mut reduced = SmallVec::with_capacity(self.0.len().saturating_sub(1));
        reduced.extend_from_slice(&self.0[..axis]);
        reduced.extend_from_slice(&self.0[axis + 1..]);
        Cell(reduced)
    }
}

impl Deref for Cell {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cell").field(&&self.0[..]).finish()
    }
}

impl iter::FromIterator<usize> for Cell {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Cell(SmallVec::from_iter(iter))
    }
}

/// The extent of a dense table: how many indices each axis has.
///
/// Dense tables derived from a [`Table`] are laid out in row-major order, with the last axis
/// varying fastest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Shape(SmallVec<[usize; 3]>);

impl Shape {
    /// Creates a shape from per-axis lengths.
    pub fn new(dims: &[usize]) -> Self {
        Shape(SmallVec::from_slice(dims))
    }

    /// The number of axes.
    pub fn axes(&self) -> usize {
        self.0.len()
    }

    /// The length of one axis.
    pub fn dim(&self, axis: usize) -> usize {
        self.0[axis]
    }

    /// The total number of cells, which is zero if any axis is empty.
    pub fn len(&self) -> usize {
        self.0.iter().product()
    }

    /// Returns `true` if the shape contains no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same shape with one axis removed.
    pub fn without(&self, axis: usize) -> Shape {
        let mut reduced = self.0.clone();
        reduced.remove(axis);
        Shape(reduced)
    }

    /// Converts a cell position to its row-major offset.
    ///
    /// ```
    /// use chisq::{Cell, Shape};
    ///
    /// let shape = Shape::new(&[2, 3, 4]);
    /// assert_eq!(shape.offset(&Cell::new(&[0, 0, 0])), 0);
    /// assert_eq!(shape.offset(&Cell::new(&[0, 0, 3])), 3);
    /// assert_eq!(shape.offset(&Cell::new(&[1, 2, 3])), 23);
    /// ```
    pub fn offset(&self, cell: &[usize]) -> usize {
        debug_assert_eq!(cell.len(), self.0.len());
        cell.iter()
            .zip(self.0.iter())
            .fold(0, |offset, (index, dim)| {
                debug_assert!(index < dim);
                offset * dim + index
            })
    }

    /// Iterates over every cell in row-major order.
    ///
    /// ```
    /// use chisq::{Cell, Shape};
    ///
    /// let cells: Vec<Cell> = Shape::new(&[2, 2]).cells().collect();
    /// assert_eq!(cells, [
    ///     Cell::new(&[0, 0]),
    ///     Cell::new(&[0, 1]),
    ///     Cell::new(&[1, 0]),
    ///     Cell::new(&[1, 1]),
    /// ]);
    /// ```
    pub fn cells(&self) -> Cells {
        let next = if self.is_empty() {
            None
        } else {
            Some(Cell(SmallVec::from_elem(0, self.0.len())))
        };
        Cells {
            dims: self.0.clone(),
            next,
        }
    }
}

/// Iterator returned by [`Shape::cells`].
pub struct Cells {
    dims: SmallVec<[usize; 3]>,
    next: Option<Cell>,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        let current = self.next.take()?;
        let mut following = current.clone();
        for axis in (0..self.dims.len()).rev() {
            following.0[axis] += 1;
            if following.0[axis] < self.dims[axis] {
                self.next = Some(following);
                break;
            }
            following.0[axis] = 0;
        }
        Some(current)
    }
}

/// An observation recorded for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// The observed count.
    pub count: u64,
    /// An externally supplied expected value, if the record carried one.
    pub expected: Option<f64>,
}

/// A contingency table of observed counts, cross-classified by two or three labelled axes.
///
/// Labels are interned per axis as records arrive, so the table only ever spans the labels it has
/// actually seen. Cells are stored sparsely and any cell that was never written reads as zero.
///
/// Writing the same label tuple twice replaces the earlier observation rather than adding to it.
/// That's surprising if you think of each line as a tally, but the input format is "one count per
/// cell", and a later line is treated as a revision of the earlier one.
pub struct Table {
    axes: SmallVec<[Labels; 3]>,
    cells: HashMap<Cell, Observation>,
}

impl Table {
    /// Creates an empty table with `axes` axes, each limited to `max_labels` distinct labels.
    pub fn new(axes: usize, max_labels: usize) -> Self {
        Table {
            axes: (0..axes).map(|axis| Labels::new(axis, max_labels)).collect(),
            cells: HashMap::new(),
        }
    }

    /// The number of axes: 2 for a row × column table, 3 when there are also planes.
    pub fn axes(&self) -> usize {
        self.axes.len()
    }

    /// The labels seen so far along one axis.
    pub fn labels(&self, axis: usize) -> &Labels {
        &self.axes[axis]
    }

    /// The extent of the table: the number of distinct labels seen on each axis.
    pub fn shape(&self) -> Shape {
        Shape(self.axes.iter().map(Labels::len).collect())
    }

    /// Interns one label on one axis.
    pub fn intern(&mut self, axis: usize, label: &str) -> Result<usize> {
        self.axes[axis].intern(label)
    }

    /// Records an observation for the cell named by `labels`, replacing any earlier observation
    /// for the same cell.
    ///
    /// ```
    /// use chisq::Table;
    ///
    /// let mut table = Table::new(2, 100);
    /// table.add_record(&["A", "X"], 10, None)?;
    /// table.add_record(&["A", "Y"], 20, None)?;
    /// table.add_record(&["A", "X"], 15, None)?;
    ///
    /// let cell = table.cell(&["A", "X"]).unwrap();
    /// assert_eq!(table.count(&cell), 15);
    /// assert_eq!(table.labels(1).len(), 2);
    /// # Ok::<(), chisq::Error>(())
    /// ```
    pub fn add_record(
        &mut self,
        labels: &[&str],
        count: u64,
        expected: Option<f64>,
    ) -> Result<&mut Self> {
        if labels.len() != self.axes.len() {
            return Err(Error::WrongArity {
                expected: self.axes.len(),
                found: labels.len(),
            });
        }
        let mut indices = SmallVec::<[usize; 3]>::new();
        for (axis, label) in labels.iter().enumerate() {
            indices.push(self.intern(axis, label)?);
        }
        self.cells
            .insert(Cell(indices), Observation { count, expected });
        Ok(self)
    }

    /// Finds the cell for a label tuple, if every label has been seen on its axis.
    pub fn cell(&self, labels: &[&str]) -> Option<Cell> {
        if labels.len() != self.axes.len() {
            return None;
        }
        labels
            .iter()
            .zip(self.axes.iter())
            .map(|(label, axis)| axis.index_of(label))
            .collect::<Option<SmallVec<_>>>()
            .map(Cell)
    }

    /// The observed count for a cell, or zero if it was never written.
    pub fn count(&self, cell: &Cell) -> u64 {
        self.cells.get(cell).map_or(0, |observation| observation.count)
    }

    /// The supplied expected value for a cell, or zero if none was supplied.
    pub fn supplied_expected(&self, cell: &Cell) -> f64 {
        self.cells
            .get(cell)
            .and_then(|observation| observation.expected)
            .unwrap_or(0.0)
    }

    /// Iterates over the cells that have been written, in no particular order.
    pub fn observations(&self) -> impl Iterator<Item = (&Cell, &Observation)> {
        self.cells.iter()
    }

    /// Returns the labels naming a cell, one per axis.
    pub fn cell_labels(&self, cell: &Cell) -> SmallVec<[&str; 3]> {
        cell.iter()
            .zip(self.axes.iter())
            .map(|(index, axis)| axis.get(*index).unwrap_or("?"))
            .collect()
    }

    /// Shrinks the sparse storage as much as possible.
    ///
    /// Worth calling once all records have been added and before computing anything.
    pub fn shrink_to_fit(&mut self) {
        self.cells.shrink_to_fit();
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.cells
                    .iter()
                    .map(|(cell, observation)| (self.cell_labels(cell), observation.count)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_of_three_axes() {
        let shape = Shape::new(&[2, 1, 3]);
        let cells: Vec<Cell> = shape.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(&[0, 0, 0]));
        assert_eq!(cells[2], Cell::new(&[0, 0, 2]));
        assert_eq!(cells[3], Cell::new(&[1, 0, 0]));
        for (offset, cell) in cells.iter().enumerate() {
            assert_eq!(shape.offset(cell), offset);
        }
    }

    #[test]
    fn empty_shape_has_no_cells() {
        assert_eq!(Shape::new(&[3, 0]).cells().count(), 0);
        assert_eq!(Shape::new(&[0, 0, 0]).len(), 0);
    }

    #[test]
    fn shape_follows_labels() {
        let mut table = Table::new(3, 10);
        table.add_record(&["r1", "c1", "p1"], 1, None).unwrap();
        table.add_record(&["r2", "c1", "p2"], 2, None).unwrap();
        table.add_record(&["r2", "c2", "p2"], 3, None).unwrap();
        assert_eq!(table.shape(), Shape::new(&[2, 2, 2]));
        assert_eq!(table.count(&Cell::new(&[0, 1, 0])), 0);
        assert_eq!(table.count(&Cell::new(&[1, 1, 1])), 3);
    }

    #[test]
    fn axes_intern_independently() {
        let mut table = Table::new(2, 10);
        table.add_record(&["X", "A"], 1, None).unwrap();
        table.add_record(&["A", "X"], 2, None).unwrap();
        assert_eq!(table.labels(0).index_of("A"), Some(1));
        assert_eq!(table.labels(1).index_of("A"), Some(0));
        assert_eq!(table.cell_labels(&Cell::new(&[1, 1])).as_slice(), ["A", "X"]);
    }

    #[test]
    fn duplicate_records_overwrite() {
        let mut table = Table::new(2, 10);
        table.add_record(&["A", "X"], 10, Some(8.0)).unwrap();
        table.add_record(&["A", "X"], 4, Some(3.5)).unwrap();
        let cell = table.cell(&["A", "X"]).unwrap();
        assert_eq!(table.count(&cell), 4);
        assert_eq!(table.supplied_expected(&cell), 3.5);
        assert_eq!(table.observations().count(), 1);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let mut table = Table::new(3, 10);
        match table.add_record(&["A", "X"], 1, None) {
            Err(Error::WrongArity {
                expected: 3,
                found: 2,
            }) => {}
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn capacity_aborts_record() {
        let mut table = Table::new(2, 2);
        table.add_record(&["A", "X"], 1, None).unwrap();
        table.add_record(&["B", "X"], 1, None).unwrap();
        assert!(matches!(
            table.add_record(&["C", "X"], 1, None),
            Err(Error::CapacityExceeded { axis: 0, limit: 2 })
        ));
    }
}
