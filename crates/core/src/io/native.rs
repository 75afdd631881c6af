//! TIFF reading/writing of class grids
//!
//! Uses the `tiff` crate. Grids are single-band images; class ids are
//! written as 32-bit unsigned integers. Any integer pixel format is accepted
//! on read, float formats only when every value is a non-negative integer.

use crate::error::{Error, Result};
use crate::grid::{ClassId, Grid};
use num_traits::ToPrimitive;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32;
use tiff::encoder::TiffEncoder;

/// Read a single-band TIFF into a class grid
pub fn read_grid<P: AsRef<Path>>(path: P) -> Result<Grid<ClassId>> {
    let file = File::open(path.as_ref())?;
    decode_grid(file)
}

/// Read a class grid from an in-memory TIFF buffer
pub fn read_grid_from_buffer(data: &[u8]) -> Result<Grid<ClassId>> {
    decode_grid(Cursor::new(data))
}

/// Internal: decode a class grid from any `Read + Seek` source
fn decode_grid<R>(reader: R) -> Result<Grid<ClassId>>
where
    R: std::io::Read + std::io::Seek,
{
    let mut decoder = Decoder::new(reader)
        .map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<ClassId> = match result {
        DecodingResult::U8(buf) => to_class_ids(&buf)?,
        DecodingResult::U16(buf) => to_class_ids(&buf)?,
        DecodingResult::U32(buf) => buf,
        DecodingResult::U64(buf) => to_class_ids(&buf)?,
        DecodingResult::I8(buf) => to_class_ids(&buf)?,
        DecodingResult::I16(buf) => to_class_ids(&buf)?,
        DecodingResult::I32(buf) => to_class_ids(&buf)?,
        DecodingResult::I64(buf) => to_class_ids(&buf)?,
        DecodingResult::F32(buf) => float_to_class_ids(buf.iter().map(|&v| v as f64))?,
        DecodingResult::F64(buf) => float_to_class_ids(buf.iter().copied())?,
        #[allow(unreachable_patterns)]
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    if data.len() != rows * cols {
        return Err(Error::UnsupportedDataType(format!(
            "expected a single-band {}x{} image, got {} samples",
            rows,
            cols,
            data.len()
        )));
    }

    Grid::from_vec(data, rows, cols)
}

fn to_class_ids<V: ToPrimitive + Copy + std::fmt::Display>(buf: &[V]) -> Result<Vec<ClassId>> {
    buf.iter()
        .map(|&v| {
            v.to_u32().ok_or_else(|| {
                Error::UnsupportedDataType(format!("pixel value {} is not a valid class id", v))
            })
        })
        .collect()
}

fn float_to_class_ids<I: Iterator<Item = f64>>(values: I) -> Result<Vec<ClassId>> {
    values
        .map(|v| {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= ClassId::MAX as f64 {
                Ok(v as ClassId)
            } else {
                Err(Error::UnsupportedDataType(format!(
                    "pixel value {} is not a valid class id",
                    v
                )))
            }
        })
        .collect()
}

/// Write a class grid to a TIFF file
pub fn write_grid<P: AsRef<Path>>(grid: &Grid<ClassId>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_grid(grid, file)
}

/// Write a class grid to an in-memory TIFF buffer
pub fn write_grid_to_buffer(grid: &Grid<ClassId>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_grid(grid, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode a class grid into any `Write + Seek` sink
fn encode_grid<W>(grid: &Grid<ClassId>, writer: W) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = grid.shape();
    let data = grid.to_flat_vec();

    encoder
        .write_image::<Gray32>(cols as u32, rows as u32, &data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_buffer_roundtrip() {
        let grid = Grid::from_array(array![[0u32, 1, 1, 7], [2, 2, 2, 16]]);
        let buf = write_grid_to_buffer(&grid).unwrap();
        let back = read_grid_from_buffer(&buf).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_file_roundtrip() {
        let grid = Grid::from_array(array![[3u32, 0], [0, 5], [1, 1]]);
        let tmp = tempfile::Builder::new().suffix(".tif").tempfile().unwrap();
        write_grid(&grid, tmp.path()).unwrap();
        let back = read_grid(tmp.path()).unwrap();
        assert_eq!(back.shape(), (3, 2));
        assert_eq!(back, grid);
    }

    #[test]
    fn test_float_class_ids() {
        assert_eq!(float_to_class_ids([0.0, 3.0].into_iter()).unwrap(), vec![0, 3]);
        assert!(float_to_class_ids([1.5].into_iter()).is_err());
        assert!(float_to_class_ids([-1.0].into_iter()).is_err());
        assert!(float_to_class_ids([f64::NAN].into_iter()).is_err());
    }

    #[test]
    fn test_negative_integer_rejected() {
        assert!(to_class_ids(&[-2i16]).is_err());
        assert_eq!(to_class_ids(&[4i16]).unwrap(), vec![4]);
    }

    #[test]
    fn test_garbage_buffer() {
        assert!(read_grid_from_buffer(b"not a tiff").is_err());
    }
}
