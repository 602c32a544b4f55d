use crate::error::{Error, Result};

use itertools::Itertools;
use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

/// Largest distance of a nonzero entry below (`lower`) and above (`upper`)
/// the diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bandwidth {
  pub lower: usize,
  pub upper: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixStructure {
  Diagonal,
  Bidiagonal,
  Tridiagonal,
  UpperHessenberg,
  LowerHessenberg,
  Banded,
  Dense,
}
impl std::fmt::Display for MatrixStructure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      Self::Diagonal => "Diagonal",
      Self::Bidiagonal => "BiDiagonal",
      Self::Tridiagonal => "Tridiagonal",
      Self::UpperHessenberg => "Upper Hessenberg",
      Self::LowerHessenberg => "Lower Hessenberg",
      Self::Banded => "Banded",
      Self::Dense => "Dense",
    };
    f.write_str(name)
  }
}

/// Dense global stiffness matrix indexed by interior node ids.
#[derive(Debug, Clone, PartialEq)]
pub struct StiffnessMatrix {
  matrix: na::DMatrix<f64>,
}

impl StiffnessMatrix {
  pub fn zeros(dim: usize) -> Self {
    Self {
      matrix: na::DMatrix::zeros(dim, dim),
    }
  }

  pub fn dim(&self) -> usize {
    self.matrix.nrows()
  }
  pub fn as_matrix(&self) -> &na::DMatrix<f64> {
    &self.matrix
  }
  pub fn into_inner(self) -> na::DMatrix<f64> {
    self.matrix
  }

  pub fn get(&self, i: usize, j: usize) -> Result<f64> {
    let n = self.dim();
    if i >= n {
      return Err(Error::out_of_range("row", i, n));
    }
    if j >= n {
      return Err(Error::out_of_range("column", j, n));
    }
    Ok(self.matrix[(i, j)])
  }

  pub(crate) fn add(&mut self, i: usize, j: usize, v: f64) {
    self.matrix[(i, j)] += v;
  }

  pub fn nnz(&self) -> usize {
    self.matrix.iter().filter(|&&v| v != 0.0).count()
  }

  pub fn is_symmetric(&self, tol: f64) -> bool {
    let n = self.dim();
    (0..n)
      .tuple_combinations()
      .all(|(i, j)| (self.matrix[(i, j)] - self.matrix[(j, i)]).abs() <= tol)
  }

  pub fn bandwidth(&self) -> Bandwidth {
    let mut bandwidth = Bandwidth { lower: 0, upper: 0 };
    for (j, col) in self.matrix.column_iter().enumerate() {
      for (i, &v) in col.iter().enumerate() {
        if v == 0.0 {
          continue;
        }
        if i > j {
          bandwidth.lower = bandwidth.lower.max(i - j);
        } else {
          bandwidth.upper = bandwidth.upper.max(j - i);
        }
      }
    }
    bandwidth
  }

  pub fn structure(&self) -> MatrixStructure {
    let n = self.dim();
    let Bandwidth { lower, upper } = self.bandwidth();
    match (lower, upper) {
      (0, 0) => MatrixStructure::Diagonal,
      (1, 0) | (0, 1) => MatrixStructure::Bidiagonal,
      (1, 1) => MatrixStructure::Tridiagonal,
      _ if lower + 1 >= n && upper + 1 >= n => MatrixStructure::Dense,
      (1, _) => MatrixStructure::UpperHessenberg,
      (_, 1) => MatrixStructure::LowerHessenberg,
      _ => MatrixStructure::Banded,
    }
  }

  pub fn to_csr(&self) -> nas::CsrMatrix<f64> {
    nas::CsrMatrix::from(&self.matrix)
  }

  /// Writes one row per line with space separated entries.
  pub fn write_text(&self, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in self.matrix.row_iter() {
      writeln!(writer, "{}", row.iter().join(" "))?;
    }
    writer.flush()?;
    Ok(())
  }
}

impl From<na::DMatrix<f64>> for StiffnessMatrix {
  fn from(matrix: na::DMatrix<f64>) -> Self {
    assert!(matrix.is_square());
    Self { matrix }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn from_diagonals(n: usize, offsets: &[isize]) -> StiffnessMatrix {
    let mut m = na::DMatrix::zeros(n, n);
    for i in 0..n {
      for &o in offsets {
        let j = i as isize + o;
        if (0..n as isize).contains(&j) {
          m[(i, j as usize)] = 1.0;
        }
      }
    }
    m.into()
  }

  #[test]
  fn structure_classification() {
    assert_eq!(from_diagonals(5, &[0]).structure(), MatrixStructure::Diagonal);
    assert_eq!(from_diagonals(5, &[0, 1]).structure(), MatrixStructure::Bidiagonal);
    assert_eq!(from_diagonals(5, &[-1, 0, 1]).structure(), MatrixStructure::Tridiagonal);
    assert_eq!(
      from_diagonals(5, &[-1, 0, 1, 2]).structure(),
      MatrixStructure::UpperHessenberg
    );
    assert_eq!(
      from_diagonals(5, &[-2, -1, 0, 1]).structure(),
      MatrixStructure::LowerHessenberg
    );
    assert_eq!(from_diagonals(6, &[-2, 0, 2]).structure(), MatrixStructure::Banded);
    assert_eq!(from_diagonals(3, &[-2, 0, 2]).structure(), MatrixStructure::Dense);
  }

  #[test]
  fn bandwidth_ignores_zeros() {
    let m = from_diagonals(6, &[-3, 0, 1]);
    assert_eq!(m.bandwidth(), Bandwidth { lower: 3, upper: 1 });
    assert_eq!(m.to_csr().nnz(), m.nnz());
  }

  #[test]
  fn checked_access() {
    let m = StiffnessMatrix::zeros(2);
    assert_eq!(m.get(1, 1).unwrap(), 0.0);
    assert!(m.get(2, 0).is_err());
    assert!(m.get(0, 2).is_err());
  }

  #[test]
  fn text_dump() {
    let path = std::env::temp_dir().join(format!("thermofem-k-{}.txt", std::process::id()));
    let m: StiffnessMatrix = na::dmatrix![1.0, -2.5; -2.5, 4.0].into();
    m.write_text(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "1 -2.5\n-2.5 4\n");
    std::fs::remove_file(&path).unwrap();
  }
}
