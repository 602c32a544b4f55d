use super::Position;
use crate::error::{Error, Result};

/// Decides which mesh nodes lie on the (Dirichlet) boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryClassifier {
  /// One flag per node, `true` meaning boundary.
  Flags(Vec<bool>),
  /// A node is on the boundary if it lies on one of the vertical lines
  /// `x = x_lines[i]` or horizontal lines `y = y_lines[j]`.
  CoordinateLines {
    x_lines: Vec<f64>,
    y_lines: Vec<f64>,
    tolerance: f64,
  },
}

impl BoundaryClassifier {
  /// The boundary of the benchmark L-shaped mesh:
  /// the axes and the lines `x = 0.6` and `y = 0.4`.
  pub fn benchmark() -> Self {
    Self::CoordinateLines {
      x_lines: vec![0.0, 0.6],
      y_lines: vec![0.0, 0.4],
      tolerance: 1e-9,
    }
  }

  /// Axis aligned rectangle `[xmin, xmax] x [ymin, ymax]`.
  pub fn rectangle(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
    Self::CoordinateLines {
      x_lines: vec![xmin, xmax],
      y_lines: vec![ymin, ymax],
      tolerance: 1e-9,
    }
  }

  pub fn is_boundary(&self, inode: usize, position: &Position) -> Result<bool> {
    let is_boundary = match self {
      Self::Flags(flags) => *flags
        .get(inode)
        .ok_or(Error::out_of_range("boundary flag", inode, flags.len()))?,
      Self::CoordinateLines {
        x_lines,
        y_lines,
        tolerance,
      } => {
        let on = |lines: &[f64], c: f64| lines.iter().any(|&l| (c - l).abs() <= *tolerance);
        on(x_lines, position.x) || on(y_lines, position.y)
      }
    };
    Ok(is_boundary)
  }

  /// Boundary flags for all nodes.
  pub fn classify(&self, positions: &[Position]) -> Result<Vec<bool>> {
    if let Self::Flags(flags) = self {
      if flags.len() != positions.len() {
        return Err(Error::InvalidArgument {
          name: "boundary flags",
          value: flags.len() as f64,
          reason: "length must equal the number of nodes",
        });
      }
    }
    positions
      .iter()
      .enumerate()
      .map(|(inode, p)| self.is_boundary(inode, p))
      .collect()
  }
}
