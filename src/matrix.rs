//! Dense row-major matrices over encrypted (or plain) cells.
//!
//! [`Matrix`] itself only stores cells; arithmetic is available once the
//! cell type implements [`MatrixCell`]. Output cells of `add`, `subtract`
//! and the products are independent of each other and are computed on the
//! rayon pool when the `parallel` feature is enabled.
use crate::errors::{EvalError, EvalResult};

/// Ring operations a matrix needs from its cells.
pub trait MatrixCell: Clone + Send + Sync {
    fn add(&self, rhs: &Self) -> EvalResult<Self>;
    fn subtract(&self, rhs: &Self) -> EvalResult<Self>;
    fn multiply(&self, rhs: &Self) -> EvalResult<Self>;
    fn negate(&self) -> Self;
}

impl MatrixCell for i64 {
    fn add(&self, rhs: &Self) -> EvalResult<Self> {
        Ok(self + rhs)
    }

    fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        Ok(self - rhs)
    }

    fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        Ok(self * rhs)
    }

    fn negate(&self) -> Self {
        -self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<C> {
    rows: usize,
    cols: usize,
    cells: Vec<C>,
}

fn check_dims(operation: &'static str, rows: usize, cols: usize) -> EvalResult<()> {
    if rows == 0 || cols == 0 {
        return Err(EvalError::InvalidShape {
            operation,
            rows,
            cols,
        });
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn collect_cells<C, F>(count: usize, cell: F) -> EvalResult<Vec<C>>
where
    C: Send,
    F: Fn(usize) -> EvalResult<C> + Send + Sync,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(cell).collect()
}

#[cfg(not(feature = "parallel"))]
fn collect_cells<C, F>(count: usize, cell: F) -> EvalResult<Vec<C>>
where
    C: Send,
    F: Fn(usize) -> EvalResult<C> + Send + Sync,
{
    (0..count).map(cell).collect()
}

impl<C: Clone> Matrix<C> {
    /// A `rows × cols` matrix filled by calling `zero` once per cell.
    pub fn new(rows: usize, cols: usize, mut zero: impl FnMut() -> C) -> EvalResult<Self> {
        check_dims("new", rows, cols)?;
        let cells = (0..rows * cols).map(|_| zero()).collect();
        Ok(Self { rows, cols, cells })
    }

    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut cell: impl FnMut(usize, usize) -> C,
    ) -> EvalResult<Self> {
        Self::try_from_fn(rows, cols, |i, j| Ok(cell(i, j)))
    }

    pub fn try_from_fn(
        rows: usize,
        cols: usize,
        mut cell: impl FnMut(usize, usize) -> EvalResult<C>,
    ) -> EvalResult<Self> {
        check_dims("try_from_fn", rows, cols)?;
        let mut cells = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                cells.push(cell(i, j)?);
            }
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn from_rows(rows: Vec<Vec<C>>) -> EvalResult<Self> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        check_dims("from_rows", row_count, cols)?;

        let mut cells = Vec::with_capacity(row_count * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(EvalError::ShapeMismatch {
                    operation: "from_rows",
                    left: (i, cols),
                    right: (i, row.len()),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols,
            cells,
        })
    }

    /// Square matrix with `one` on the diagonal and `zero` elsewhere.
    pub fn identity(order: usize, zero: C, one: C) -> EvalResult<Self> {
        Self::from_fn(order, order, |i, j| {
            if i == j { one.clone() } else { zero.clone() }
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    fn index(&self, row: usize, col: usize) -> EvalResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(EvalError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    // Callers guarantee `row < rows` and `col < cols`
    fn at(&self, row: usize, col: usize) -> &C {
        &self.cells[row * self.cols + col]
    }

    pub fn get(&self, row: usize, col: usize) -> EvalResult<&C> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: C) -> EvalResult<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Row-major iterator over the cells.
    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.cells.iter()
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[C]> {
        self.cells.chunks(self.cols)
    }

    pub fn transpose(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                cells.push(self.at(i, j).clone());
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    pub fn map<D>(&self, f: impl FnMut(&C) -> D) -> Matrix<D> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn try_map<D>(&self, f: impl FnMut(&C) -> EvalResult<D>) -> EvalResult<Matrix<D>> {
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect::<EvalResult<_>>()?,
        })
    }

    /// The matrix with `row` and `col` removed.
    pub fn minor(&self, row: usize, col: usize) -> EvalResult<Self> {
        self.index(row, col)?;
        check_dims("minor", self.rows - 1, self.cols - 1)?;
        let mut cells = Vec::with_capacity((self.rows - 1) * (self.cols - 1));
        for i in (0..self.rows).filter(|&i| i != row) {
            for j in (0..self.cols).filter(|&j| j != col) {
                cells.push(self.at(i, j).clone());
            }
        }
        Ok(Self {
            rows: self.rows - 1,
            cols: self.cols - 1,
            cells,
        })
    }
}

impl<C: MatrixCell> Matrix<C> {
    fn check_same_shape(&self, rhs: &Self, operation: &'static str) -> EvalResult<()> {
        if self.shape() != rhs.shape() {
            return Err(EvalError::ShapeMismatch {
                operation,
                left: self.shape(),
                right: rhs.shape(),
            });
        }
        Ok(())
    }

    fn check_square(&self, operation: &'static str) -> EvalResult<()> {
        if !self.is_square() {
            return Err(EvalError::InvalidShape {
                operation,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    pub fn add(&self, rhs: &Self) -> EvalResult<Self> {
        self.check_same_shape(rhs, "add")?;
        let cells = collect_cells(self.cells.len(), |idx| self.cells[idx].add(&rhs.cells[idx]))?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    pub fn subtract(&self, rhs: &Self) -> EvalResult<Self> {
        self.check_same_shape(rhs, "subtract")?;
        let cells = collect_cells(self.cells.len(), |idx| {
            self.cells[idx].subtract(&rhs.cells[idx])
        })?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    pub fn negate(&self) -> Self {
        self.map(|cell| cell.negate())
    }

    pub fn multiply(&self, rhs: &Self) -> EvalResult<Self> {
        self.multiply_with(rhs, |a, b| a.multiply(b))
    }

    /// Matrix product with a caller-supplied inner term:
    /// cell `(i, k)` is `Σ_j inner(self[i, j], rhs[j, k])`.
    pub fn multiply_with<F>(&self, rhs: &Self, inner: F) -> EvalResult<Self>
    where
        F: Fn(&C, &C) -> EvalResult<C> + Send + Sync,
    {
        if self.cols != rhs.rows {
            return Err(EvalError::ShapeMismatch {
                operation: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let (rows, cols) = (self.rows, rhs.cols);
        let cells = collect_cells(rows * cols, |idx| {
            let (i, k) = (idx / cols, idx % cols);
            let mut acc = inner(self.at(i, 0), rhs.at(0, k))?;
            for j in 1..self.cols {
                acc = acc.add(&inner(self.at(i, j), rhs.at(j, k))?)?;
            }
            Ok(acc)
        })?;
        Ok(Self { rows, cols, cells })
    }

    /// Signed minor `(-1)^(row + col) · det(minor(row, col))`.
    pub fn cofactor(&self, row: usize, col: usize) -> EvalResult<C> {
        self.check_square("cofactor")?;
        let det = self.minor(row, col)?.determinant()?;
        Ok(if (row + col) % 2 == 0 { det } else { det.negate() })
    }

    /// Matrix of all cofactors; needs a square matrix of order 2 or more.
    pub fn cofactor_matrix(&self) -> EvalResult<Self> {
        self.check_square("cofactor_matrix")?;
        check_dims("cofactor_matrix", self.rows - 1, self.cols - 1)?;
        let cells = collect_cells(self.cells.len(), |idx| {
            self.cofactor(idx / self.cols, idx % self.cols)
        })?;
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    /// Transposed cofactor matrix; `A · adj(A) = det(A) · I`.
    pub fn adjugate(&self) -> EvalResult<Self> {
        Ok(self.cofactor_matrix()?.transpose())
    }

    /// Laplace expansion along the first row.
    pub fn determinant(&self) -> EvalResult<C> {
        self.check_square("determinant")?;
        if self.rows == 1 {
            return Ok(self.cells[0].clone());
        }
        let mut acc = self.at(0, 0).multiply(&self.cofactor(0, 0)?)?;
        for j in 1..self.cols {
            acc = acc.add(&self.at(0, j).multiply(&self.cofactor(0, j)?)?)?;
        }
        Ok(acc)
    }

    /// First-row expansion against an already computed cofactor matrix.
    pub fn determinant_with_cofactors(&self, cofactors: &Self) -> EvalResult<C> {
        self.check_square("determinant")?;
        self.check_same_shape(cofactors, "determinant")?;
        let mut acc = self.at(0, 0).multiply(cofactors.at(0, 0))?;
        for j in 1..self.cols {
            acc = acc.add(&self.at(0, j).multiply(cofactors.at(0, j))?)?;
        }
        Ok(acc)
    }
}
