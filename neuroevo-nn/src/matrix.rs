//! Dense two-dimensional matrices of `f64`.
use crate::errors::{Error, Operation, Result};

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A dense, row-major `rows × cols` matrix.
///
/// Matrices always have at least one row and one column.
/// Arithmetic never modifies its operands; every operation
/// returns a new matrix built with [`map`].
///
/// [`map`]: Matrix::map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Returns a zero-valued `rows × cols` matrix.
    ///
    /// # Panics
    /// Panics if either dimension is 0.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let m = Matrix::new(2, 3);
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.get(1, 2), 0.0);
    /// ```
    pub fn new(rows: usize, cols: usize) -> Matrix {
        assert!(
            rows > 0 && cols > 0,
            "matrix dimensions must be non-zero, got {}x{}",
            rows,
            cols
        );
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from its rows.
    ///
    /// # Errors
    /// Returns an error if there are no rows, a row
    /// is empty, or the rows differ in length.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m.get(1, 0), 3.0);
    ///
    /// assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = rows
            .first()
            .map(Vec::len)
            .ok_or_else(|| Error::Parse("matrix has no rows".into()))?;
        if cols == 0 {
            return Err(Error::Parse("matrix row is empty".into()));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != cols) {
            return Err(Error::Parse(format!(
                "matrix rows differ in length: expected {} values, found {}",
                cols,
                row.len()
            )));
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Returns a column vector holding `values`.
    ///
    /// # Panics
    /// Panics if `values` is empty.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let v = Matrix::column(&[1.0, 2.0, 3.0]);
    /// assert_eq!(v.shape(), (3, 1));
    /// assert_eq!(v.get(2, 0), 3.0);
    /// ```
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::new(values.len(), 1).map(|_, i, _| values[i])
    }

    /// Returns the value at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    /// Sets the value at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let index = self.index(i, j);
        self.data[index] = value;
    }

    fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.cols,
            "position ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        i * self.cols + j
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns all values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Returns a matrix of the same shape holding
    /// `function(value, row, col)` for every cell.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let m = Matrix::new(2, 2).map(|_, i, j| (i * 2 + j) as f64);
    /// assert_eq!(m.values(), &[0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn map<F>(&self, mut function: F) -> Matrix
    where
        F: FnMut(f64, usize, usize) -> f64,
    {
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(index, value)| function(*value, index / self.cols, index % self.cols))
            .collect();
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    /// Returns the element-wise sum of two matrices.
    ///
    /// # Errors
    /// Returns an error if the shapes differ.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let a = Matrix::column(&[1.0, 2.0]);
    /// let b = Matrix::column(&[0.5, -2.0]);
    /// assert_eq!(a.add(&b).unwrap(), Matrix::column(&[1.5, 0.0]));
    ///
    /// assert!(a.add(&Matrix::new(1, 2)).is_err());
    /// ```
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        if self.shape() != other.shape() {
            return Err(self.mismatch(Operation::Addition, other));
        }
        Ok(self.map(|x, i, j| x + other.get(i, j)))
    }

    /// Returns the matrix product `self × other`,
    /// of shape `(self.rows, other.cols)`.
    ///
    /// # Errors
    /// Returns an error if `self.cols != other.rows`.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// let v = Matrix::column(&[1.0, -1.0]);
    /// assert_eq!(a.multiply(&v).unwrap(), Matrix::column(&[-1.0, -1.0]));
    ///
    /// assert!(v.multiply(&a).is_err());
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(self.mismatch(Operation::Multiplication, other));
        }
        Ok(Matrix::new(self.rows, other.cols)
            .map(|_, i, j| (0..self.cols).map(|k| self.get(i, k) * other.get(k, j)).sum()))
    }

    fn mismatch(&self, operation: Operation, other: &Matrix) -> Error {
        Error::DimensionMismatch {
            operation,
            left: self.shape(),
            right: other.shape(),
        }
    }
}

impl fmt::Display for Matrix {
    /// Writes the matrix as `[[a, b], [c, d]]`, one
    /// bracketed group per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.data.chunks(self.cols).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", value)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl FromStr for Matrix {
    type Err = Error;

    /// Parses a matrix from its text form. Every innermost
    /// bracketed group is read as one row; anything outside
    /// those groups is ignored.
    ///
    /// # Examples
    /// ```
    /// use neuroevo_nn::Matrix;
    ///
    /// let m: Matrix = "[[1.0, 2.5], [-3.0, 4e-3]]".parse().unwrap();
    /// assert_eq!(m.shape(), (2, 2));
    /// assert_eq!(m.get(1, 1), 0.004);
    ///
    /// assert_eq!(m.to_string().parse::<Matrix>().unwrap(), m);
    /// assert!("[[1.0, 2.0], [3.0]]".parse::<Matrix>().is_err());
    /// assert!("[[1.0, x]]".parse::<Matrix>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Matrix> {
        let rows = innermost_groups(s, '[', ']')
            .into_iter()
            .map(parse_row)
            .collect::<Result<Vec<_>>>()?;
        Matrix::from_rows(rows)
    }
}

fn parse_row(group: &str) -> Result<Vec<f64>> {
    if group.trim().is_empty() {
        return Err(Error::Parse("matrix row is empty".into()));
    }
    group
        .split(',')
        .map(str::trim)
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| Error::Parse(format!("invalid matrix value {:?}", token)))
        })
        .collect()
}

/// Returns the contents of every `open ... close` group
/// which contains no further `open` delimiter, in order.
pub(crate) fn innermost_groups(s: &str, open: char, close: char) -> Vec<&str> {
    let mut groups = vec![];
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c == open {
            start = Some(i + c.len_utf8());
        } else if c == close {
            if let Some(start) = start.take() {
                groups.push(&s[start..i]);
            }
        }
    }
    groups
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = Error;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(matrix: Matrix) -> Vec<Vec<f64>> {
        matrix.data.chunks(matrix.cols).map(<[f64]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, -2.0, 3.5], vec![0.25, 0.0, -1e-9]]).unwrap()
    }

    #[test]
    fn add_is_element_wise() {
        let a = sample();
        let b = a.map(|x, i, j| x * 3.0 + (i + j) as f64);
        let sum = a.add(&b).unwrap();
        for i in 0..a.rows() {
            for j in 0..a.cols() {
                assert_eq!(sum.get(i, j), a.get(i, j) + b.get(i, j));
            }
        }
    }

    #[test]
    fn add_shape_mismatch() {
        assert_eq!(
            sample().add(&Matrix::new(3, 2)),
            Err(Error::DimensionMismatch {
                operation: Operation::Addition,
                left: (2, 3),
                right: (3, 2)
            })
        );
    }

    #[test]
    fn multiply_shape_and_values() {
        let a = sample();
        let b = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, -1.0]]).unwrap();
        let product = a.multiply(&b).unwrap();
        assert_eq!(product.shape(), (2, 2));
        assert_eq!(product.get(0, 0), 1.0 + 7.0);
        assert_eq!(product.get(0, 1), -2.0 - 3.5);
        assert_eq!(product.get(1, 0), 0.25 - 2e-9);
        assert_eq!(product.get(1, 1), 0.0 + 1e-9);
    }

    #[test]
    fn multiply_by_identity() {
        let identity = Matrix::new(3, 3).map(|_, i, j| if i == j { 1.0 } else { 0.0 });
        assert_eq!(sample().multiply(&identity).unwrap(), sample());
    }

    #[test]
    fn multiply_shape_mismatch() {
        assert_eq!(
            sample().multiply(&sample()),
            Err(Error::DimensionMismatch {
                operation: Operation::Multiplication,
                left: (2, 3),
                right: (2, 3)
            })
        );
    }

    #[test]
    fn operations_leave_operands_untouched() {
        let a = sample();
        let b = a.clone();
        let _ = a.add(&b).unwrap();
        let _ = a.map(|x, _, _| x * 10.0);
        assert_eq!(a, sample());
        assert_eq!(b, sample());
    }

    #[test]
    #[should_panic]
    fn zero_dimension() {
        Matrix::new(0, 3);
    }

    #[test]
    fn display() {
        assert_eq!(
            Matrix::from_rows(vec![vec![1.0, 2.5], vec![-3.0, 0.0]])
                .unwrap()
                .to_string(),
            "[[1.0, 2.5], [-3.0, 0.0]]"
        );
    }

    #[test]
    fn text_round_trip() {
        let m = sample().map(|x, i, j| x / 3.0 + (i * j) as f64 * std::f64::consts::PI);
        assert_eq!(m.to_string().parse::<Matrix>().unwrap(), m);
    }

    #[test]
    fn parse_without_outer_brackets() {
        let m: Matrix = "[1, 2][3, 4]".parse().unwrap();
        assert_eq!(m.values(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.shape(), (2, 2));
    }

    #[test]
    fn parse_errors() {
        for text in ["", "[]", "[[]]", "[[1, 2], [3]]", "[[1, abc]]", "[[1,, 2]]"] {
            assert!(
                matches!(text.parse::<Matrix>(), Err(Error::Parse(_))),
                "{:?} parsed",
                text
            );
        }
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(serde_json::from_str::<Matrix>(&json).unwrap(), sample());
        assert!(serde_json::from_str::<Matrix>("[[1.0],[2.0,3.0]]").is_err());
    }
}
