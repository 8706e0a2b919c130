//! Decode logic for the gkyl0 frame format
//!
//! A frame file either opens with the 5-byte magic sequence `gkyl0` followed
//! by a versioned header, or it is the headerless legacy (version 0) layout.
//! Both paths then declare the real width immediately before the domain data.
//!
//! Each record kind gets its own decode function consuming a [ByteCursor],
//! selected by a top-level dispatcher:
//!
//! - **Field**: one dense block over the declared extent
//! - **DynVector**: appended time-series blocks, each with a fresh header,
//!   concatenated in file order without re-sorting
//! - **MultiRangeField**: sparse index ranges scattered into a zero-filled
//!   dense array
//!
//! Decoding is a pure function of the input bytes. Payloads declared larger
//! than the remaining input fail fast with [Error::Truncated].

// standard library
use std::path::Path;

// crate modules
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};
use crate::frame::{FileType, Frame, RealType};
use crate::metadata::Metadata;

// external crates
use log::debug;
use ndarray::{ArrayD, IxDyn, SliceInfoElem};

/// Magic sequence opening every versioned frame file, ASCII `gkyl0`
pub const MAGIC: [u8; 5] = [103, 107, 121, 108, 48];

/// Only version produced by the versioned writer so far
const SUPPORTED_VERSION: u64 = 1;

/// File type discriminants in the versioned header
const KIND_FIELD: u64 = 1;
const KIND_DYNVECTOR: u64 = 2;
const KIND_MULTIRANGE: u64 = 3;

/// Decode a frame file from disk
///
/// Reads the whole file into memory and decodes it with [decode_frame]. There
/// is no streaming mode, so callers must ensure the file fits in memory.
///
/// ```rust, no_run
/// # use gktools_frame::read_frame;
/// let frame = read_frame("/path/to/field_10.gkyl").unwrap();
/// println!("{frame}");
/// ```
pub fn read_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    decode_frame(&std::fs::read(path)?)
}

/// Decode a frame from a byte slice
///
/// Dispatches on the header version and file type, falling back to the legacy
/// field layout when the magic sequence is absent.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    let mut cursor = ByteCursor::new(bytes);

    let Some(header) = read_versioned_header(&mut cursor)? else {
        debug!("no magic sequence found, assuming legacy layout");
        let real_type = read_real_type(&mut cursor)?;
        return decode_field(
            &mut cursor,
            0,
            FileType::Legacy,
            real_type,
            Metadata::default(),
        );
    };

    let real_type = read_real_type(&mut cursor)?;
    debug!(
        "versioned frame: version {}, file type {}, {:?} reals",
        header.version, header.file_type, real_type
    );

    match header.file_type {
        KIND_FIELD => decode_field(
            &mut cursor,
            header.version,
            FileType::Field,
            real_type,
            header.metadata,
        ),
        KIND_DYNVECTOR => decode_dynvector(&mut cursor, header, real_type),
        KIND_MULTIRANGE => decode_multirange(&mut cursor, header, real_type),
        file_type => Err(Error::UnknownFormat {
            version: header.version,
            file_type,
        }),
    }
}

/// Versioned header fields, without the real type flag
struct Header {
    version: u64,
    file_type: u64,
    metadata: Metadata,
}

/// Parse the magic + versioned header, or `None` for the legacy layout
fn read_versioned_header(cursor: &mut ByteCursor) -> Result<Option<Header>> {
    if !cursor.read_tag(&MAGIC) {
        return Ok(None);
    }

    let version = cursor.read_u64()?;
    let file_type = cursor.read_u64()?;
    if version != SUPPORTED_VERSION {
        return Err(Error::UnknownFormat { version, file_type });
    }

    let meta_size = cursor.read_u64()? as usize;
    let metadata = Metadata::from_cursor(cursor, meta_size)?;

    Ok(Some(Header {
        version,
        file_type,
        metadata,
    }))
}

/// Real type flag, present in both legacy and versioned layouts
fn read_real_type(cursor: &mut ByteCursor) -> Result<RealType> {
    match cursor.read_u64()? {
        0 => Ok(RealType::F64),
        1 => Ok(RealType::F32),
        flag => Err(Error::UnknownRealType(flag)),
    }
}

/// Shared field header: dimensions, extent, bounds, and element sizing
struct FieldHeader {
    cells: Vec<usize>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    num_components: usize,
}

fn read_field_header(cursor: &mut ByteCursor, real_type: RealType) -> Result<FieldHeader> {
    let ndim = cursor.read_u64()? as usize;
    let cells: Vec<usize> = cursor
        .read_u64_array(ndim)?
        .into_iter()
        .map(|c| c as usize)
        .collect();
    let lower = cursor.read_f64_array(ndim)?;
    let upper = cursor.read_f64_array(ndim)?;
    let num_components = read_components(cursor, real_type)?;

    Ok(FieldHeader {
        cells,
        lower,
        upper,
        num_components,
    })
}

/// Element size in bytes, converted to a component count
fn read_components(cursor: &mut ByteCursor, real_type: RealType) -> Result<usize> {
    let elem_size = cursor.read_u64()? as usize;
    let width = real_type.byte_width();
    if elem_size == 0 || elem_size % width != 0 {
        return Err(Error::UnexpectedElementSize { elem_size, width });
    }
    Ok(elem_size / width)
}

/// Field (kind 1) and legacy bodies
fn decode_field(
    cursor: &mut ByteCursor,
    version: u64,
    file_type: FileType,
    real_type: RealType,
    metadata: Metadata,
) -> Result<Frame> {
    let header = read_field_header(cursor, real_type)?;
    let total_size = cursor.read_u64()? as usize;

    // corrupt headers can declare sizes that overflow, saturate and let the
    // truncation check reject them
    let count = total_size.saturating_mul(header.num_components);
    let values = cursor.read_real_array(real_type, count)?;
    let payload_cells = payload_extent(&header.cells, total_size)?;

    let mut shape = payload_cells;
    shape.push(header.num_components);
    let array = ArrayD::from_shape_vec(IxDyn(&shape), values)?;

    Ok(Frame {
        version,
        file_type,
        real_type,
        cells: header.cells,
        lower: header.lower,
        upper: header.upper,
        num_components: header.num_components,
        metadata,
        time: Vec::new(),
        array,
    })
}

/// Reconcile the payload cell count with the declared extent
///
/// Ghost cells are stripped from payloads uniformly across dimensions, so a
/// smaller payload is attributed to the same per-dimension deficit `t` with
/// `prod(cells[d] - t) == total_size`. The declared extent stays on the frame
/// for the grid layer's trim policy.
fn payload_extent(cells: &[usize], total_size: usize) -> Result<Vec<usize>> {
    let declared: usize = cells.iter().product();
    if total_size == declared {
        return Ok(cells.to_vec());
    }

    let smallest = cells.iter().copied().min().unwrap_or(0);
    for t in 1..smallest {
        if cells.iter().map(|c| c - t).product::<usize>() == total_size {
            return Ok(cells.iter().map(|c| c - t).collect());
        }
    }

    Err(Error::UnexpectedPayloadShape {
        cells: cells.to_vec(),
        found: total_size,
    })
}

/// DynVector (kind 2) bodies, repeated until end of input
///
/// Every appended block carries a fresh embedded header. Time stamps and data
/// are concatenated in file order, restarts that wrote overlapping or
/// out-of-order blocks come through exactly as appended.
fn decode_dynvector(cursor: &mut ByteCursor, header: Header, real_type: RealType) -> Result<Frame> {
    let num_components = read_components(cursor, real_type)?;
    let mut time = Vec::new();
    let mut data = Vec::new();
    read_dynvector_block(cursor, real_type, num_components, &mut time, &mut data)?;

    while !cursor.is_empty() {
        let block = read_versioned_header(cursor)?.ok_or(Error::UnknownFormat {
            version: 0,
            file_type: 0,
        })?;
        if block.file_type != KIND_DYNVECTOR {
            return Err(Error::UnknownFormat {
                version: block.version,
                file_type: block.file_type,
            });
        }

        let block_real = read_real_type(cursor)?;
        let block_components = read_components(cursor, block_real)?;
        if block_components != num_components {
            return Err(Error::InconsistentBlock {
                expected: num_components,
                found: block_components,
            });
        }
        read_dynvector_block(cursor, block_real, num_components, &mut time, &mut data)?;
    }

    debug!("dynvector: {} samples, {} components", time.len(), num_components);
    let array = ArrayD::from_shape_vec(IxDyn(&[time.len(), num_components]), data)?;

    Ok(Frame {
        version: header.version,
        file_type: FileType::DynVector,
        real_type,
        cells: Vec::new(),
        lower: Vec::new(),
        upper: Vec::new(),
        num_components,
        metadata: header.metadata,
        time,
        array,
    })
}

/// One `count`, time array, payload sequence of a dynvector body
fn read_dynvector_block(
    cursor: &mut ByteCursor,
    real_type: RealType,
    num_components: usize,
    time: &mut Vec<f64>,
    data: &mut Vec<f64>,
) -> Result<()> {
    let count = cursor.read_u64()? as usize;
    time.extend(cursor.read_real_array(real_type, count)?);
    data.extend(cursor.read_real_array(real_type, count.saturating_mul(num_components))?);
    Ok(())
}

/// MultiRangeField (kind 3) bodies
///
/// The field header is followed by `num_ranges` blocks of 1-indexed inclusive
/// index bounds and their payloads, scattered into a dense array over the
/// declared extent. Cells not covered by any range stay zero.
fn decode_multirange(cursor: &mut ByteCursor, header: Header, real_type: RealType) -> Result<Frame> {
    let field = read_field_header(cursor, real_type)?;
    let num_ranges = cursor.read_u64()? as usize;
    let ndim = field.cells.len();

    let mut shape = field.cells.clone();
    shape.push(field.num_components);
    let mut dense = ArrayD::<f64>::zeros(IxDyn(&shape));

    for _ in 0..num_ranges {
        let lo: Vec<usize> = cursor
            .read_u64_array(ndim)?
            .into_iter()
            .map(|i| i as usize)
            .collect();
        let up: Vec<usize> = cursor
            .read_u64_array(ndim)?
            .into_iter()
            .map(|i| i as usize)
            .collect();

        let in_bounds = lo
            .iter()
            .zip(&up)
            .zip(&field.cells)
            .all(|((&l, &u), &c)| l >= 1 && l <= u && u <= c);
        if !in_bounds {
            return Err(Error::RangeOutOfBounds {
                lo,
                up,
                cells: field.cells,
            });
        }

        let range_size = cursor.read_u64()? as usize;
        let count = range_size.saturating_mul(field.num_components);
        let values = cursor.read_real_array(real_type, count)?;

        let mut range_shape: Vec<usize> = lo.iter().zip(&up).map(|(&l, &u)| u - l + 1).collect();
        let range_cells: usize = range_shape.iter().product();
        if range_cells != range_size {
            return Err(Error::UnexpectedPayloadShape {
                cells: range_shape,
                found: range_size,
            });
        }
        range_shape.push(field.num_components);
        let chunk = ArrayD::from_shape_vec(IxDyn(&range_shape), values)?;

        // 1-indexed inclusive bounds to half-open zero-based slices
        let mut slices: Vec<SliceInfoElem> = lo
            .iter()
            .zip(&up)
            .map(|(&l, &u)| SliceInfoElem::Slice {
                start: (l - 1) as isize,
                end: Some(u as isize),
                step: 1,
            })
            .collect();
        slices.push(SliceInfoElem::from(..));
        dense.slice_mut(slices.as_slice()).assign(&chunk);
    }

    Ok(Frame {
        version: header.version,
        file_type: FileType::MultiRangeField,
        real_type,
        cells: field.cells,
        lower: field.lower,
        upper: field.upper,
        num_components: field.num_components,
        metadata: header.metadata,
        time: Vec::new(),
        array: dense,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_deficit_is_inferred_uniformly() {
        // declared 6x8, payload 4x6 => deficit of 2 in every dimension
        assert_eq!(payload_extent(&[6, 8], 24).unwrap(), vec![4, 6]);
        // exact match passes straight through
        assert_eq!(payload_extent(&[6, 8], 48).unwrap(), vec![6, 8]);
    }

    #[test]
    fn irreconcilable_payload_is_an_error() {
        assert!(payload_extent(&[6, 8], 47).is_err());
        assert!(payload_extent(&[4], 0).is_err());
    }
}
