//! Headerless binary dumps of `f64` sequences (little-endian IEEE 754).
//!
//! The length of a dump is not stored, readers infer it from the file size.

use crate::error::Result;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::{
  fs::{File, OpenOptions},
  io::{BufReader, BufWriter, Read, Write},
  path::Path,
};

pub fn write_f64s<W: Write>(writer: &mut W, values: &[f64]) -> std::io::Result<()> {
  for &v in values {
    writer.write_f64::<LittleEndian>(v)?;
  }
  Ok(())
}

/// Writes the values to `path`, truncating it, or appending if `append` is set.
pub fn dump_f64s(path: impl AsRef<Path>, values: &[f64], append: bool) -> Result<()> {
  let file = OpenOptions::new()
    .write(true)
    .create(true)
    .append(append)
    .truncate(!append)
    .open(path)?;
  let mut writer = BufWriter::new(file);
  write_f64s(&mut writer, values)?;
  writer.flush()?;
  Ok(())
}

pub fn read_f64s<R: Read>(reader: R) -> std::io::Result<Vec<f64>> {
  let mut reader = BufReader::new(reader);
  let mut values = Vec::new();
  loop {
    match reader.read_f64::<LittleEndian>() {
      Ok(v) => values.push(v),
      Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
      Err(e) => return Err(e),
    }
  }
  Ok(values)
}

pub fn load_f64s(path: impl AsRef<Path>) -> Result<Vec<f64>> {
  Ok(read_f64s(File::open(path)?)?)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn raw_layout() {
    let mut bytes = Vec::new();
    write_f64s(&mut bytes, &[1.0, -0.5]).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[..8], &1.0f64.to_le_bytes());
    assert_eq!(read_f64s(bytes.as_slice()).unwrap(), vec![1.0, -0.5]);
  }

  #[test]
  fn truncate_and_append() {
    let path = std::env::temp_dir().join(format!("thermofem-dump-{}.bin", std::process::id()));
    dump_f64s(&path, &[1.0, 2.0, 3.0], false).unwrap();
    dump_f64s(&path, &[4.0], false).unwrap();
    assert_eq!(load_f64s(&path).unwrap(), vec![4.0]);
    dump_f64s(&path, &[5.0], true).unwrap();
    assert_eq!(load_f64s(&path).unwrap(), vec![4.0, 5.0]);
    std::fs::remove_file(&path).unwrap();
  }
}
