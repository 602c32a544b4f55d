//! Reader for the whitespace separated `.node` and `.elem` mesh files.
//!
//! Node file: node count `N`, followed by `N` records `id x y`.
//! Element file: element count `M`, followed by `M` records `id v0 v1 v2`.
//! All ids are 1-based. Records are placed by id, not by file order.

use super::{Element, Position, VERTICES};
use crate::error::{Error, Result};

use std::{
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
  str::FromStr,
};

pub fn open(path: &Path) -> Result<BufReader<File>> {
  Ok(BufReader::new(File::open(path)?))
}

/// Whitespace token stream remembering the line of every token.
struct Tokens {
  source_name: String,
  tokens: std::vec::IntoIter<(usize, String)>,
  last_line: usize,
}
impl Tokens {
  fn new(reader: impl BufRead, source_name: &str) -> Result<Self> {
    let mut tokens = Vec::new();
    for (iline, line) in reader.lines().enumerate() {
      let line = line?;
      tokens.extend(line.split_whitespace().map(|t| (iline + 1, t.to_owned())));
    }
    Ok(Self {
      source_name: source_name.to_owned(),
      tokens: tokens.into_iter(),
      last_line: 0,
    })
  }

  fn error(&self, line: usize, reason: String) -> Error {
    Error::Parse {
      source_name: self.source_name.clone(),
      line,
      reason,
    }
  }

  fn next<T: FromStr>(&mut self, what: &str) -> Result<T> {
    let Some((line, token)) = self.tokens.next() else {
      return Err(self.error(self.last_line, format!("unexpected end of input, expected {what}")));
    };
    self.last_line = line;
    token
      .parse()
      .map_err(|_| self.error(line, format!("invalid {what} `{token}`")))
  }

  fn next_coordinate(&mut self, what: &str) -> Result<f64> {
    let value: f64 = self.next(what)?;
    if !value.is_finite() {
      return Err(self.error(self.last_line, format!("non-finite {what} `{value}`")));
    }
    Ok(value)
  }

  /// Reads a record count and checks that the remaining input can hold
  /// `count` records of `ntokens` tokens each.
  fn next_count(&mut self, what: &str, ntokens: usize) -> Result<usize> {
    let count: usize = self.next(what)?;
    let remaining = self.tokens.len();
    if count.checked_mul(ntokens).map_or(true, |n| n > remaining) {
      return Err(self.error(
        self.last_line,
        format!("{what} {count} exceeds the {remaining} remaining tokens"),
      ));
    }
    Ok(count)
  }

  /// Reads a 1-based id and converts it to a 0-based index below `count`.
  fn next_id(&mut self, what: &str, count: usize) -> Result<usize> {
    let id: usize = self.next(what)?;
    if id == 0 || id > count {
      return Err(self.error(self.last_line, format!("{what} {id} outside 1..={count}")));
    }
    Ok(id - 1)
  }
}

/// Collects the slots filled by id, failing on duplicates and gaps.
fn place<T>(tokens: &Tokens, slots: &mut [Option<T>], idx: usize, value: T, what: &str) -> Result<()> {
  if slots[idx].replace(value).is_some() {
    return Err(tokens.error(tokens.last_line, format!("duplicate {what} id {}", idx + 1)));
  }
  Ok(())
}

pub fn read_nodes(reader: impl BufRead, source_name: &str) -> Result<Vec<Position>> {
  let mut tokens = Tokens::new(reader, source_name)?;
  let count = tokens.next_count("node count", 1 + 2)?;

  let mut slots = vec![None; count];
  for _ in 0..count {
    let inode = tokens.next_id("node id", count)?;
    let x = tokens.next_coordinate("x coordinate")?;
    let y = tokens.next_coordinate("y coordinate")?;
    place(&tokens, &mut slots, inode, Position::new(x, y), "node")?;
  }

  // All `count` records were distinct ids in 1..=count, so every slot is set.
  Ok(slots.into_iter().flatten().collect())
}

pub fn read_elements(
  reader: impl BufRead,
  source_name: &str,
  nnodes: usize,
) -> Result<Vec<Element>> {
  let mut tokens = Tokens::new(reader, source_name)?;
  let count = tokens.next_count("element count", 1 + VERTICES)?;

  let mut slots = vec![None; count];
  for _ in 0..count {
    let ielement = tokens.next_id("element id", count)?;
    let mut vertices = [Element::INVALID; VERTICES];
    for v in &mut vertices {
      *v = tokens.next_id("vertex id", nnodes)?;
    }
    place(&tokens, &mut slots, ielement, Element::new(vertices), "element")?;
  }

  let elements: Vec<Element> = slots.into_iter().map(Option::unwrap_or_default).collect();
  debug_assert!(elements.iter().all(Element::is_valid));
  Ok(elements)
}
