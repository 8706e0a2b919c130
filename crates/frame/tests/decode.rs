//! Integration tests for the frame decoder

use gktools_frame::{decode_frame, Error, FileType, Frame, RealType, MAGIC};
use rstest::rstest;

/// Minimal little-endian byte builder for synthetic frame files
#[derive(Default)]
struct Builder {
    bytes: Vec<u8>,
}

impl Builder {
    fn u64(mut self, value: u64) -> Self {
        self.bytes.extend(value.to_le_bytes());
        self
    }

    fn f64s(mut self, values: &[f64]) -> Self {
        for v in values {
            self.bytes.extend(v.to_le_bytes());
        }
        self
    }

    fn f32s(mut self, values: &[f32]) -> Self {
        for v in values {
            self.bytes.extend(v.to_le_bytes());
        }
        self
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend(bytes);
        self
    }

    /// Magic + version 1 header with an empty metadata blob
    fn header(self, file_type: u64) -> Self {
        self.raw(&MAGIC).u64(1).u64(file_type).u64(0)
    }

    fn build(self) -> Vec<u8> {
        self.bytes
    }
}

/// The 1D field frame of four cells on [0, 1] used throughout
fn field_1d() -> Vec<u8> {
    Builder::default()
        .header(1)
        .u64(0) // f64 reals
        .u64(1) // ndim
        .u64(4) // cells
        .f64s(&[0.0]) // lower
        .f64s(&[1.0]) // upper
        .u64(8) // elem_size
        .u64(4) // total_size
        .f64s(&[1.0, 2.0, 3.0, 4.0])
        .build()
}

#[test]
fn field_1d_shape_and_values() {
    let frame = decode_frame(&field_1d()).unwrap();

    assert_eq!(frame.version, 1);
    assert_eq!(frame.file_type, FileType::Field);
    assert_eq!(frame.real_type, RealType::F64);
    assert_eq!(frame.cells, vec![4]);
    assert_eq!(frame.num_components, 1);
    assert_eq!(frame.array.shape(), &[4, 1]);

    let values: Vec<f64> = frame.array.iter().copied().collect();
    assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn legacy_layout_without_header() {
    // same field body, no magic and no versioned header
    let bytes = Builder::default()
        .u64(0)
        .u64(1)
        .u64(4)
        .f64s(&[0.0])
        .f64s(&[1.0])
        .u64(8)
        .u64(4)
        .f64s(&[1.0, 2.0, 3.0, 4.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.version, 0);
    assert_eq!(frame.file_type, FileType::Legacy);
    assert_eq!(frame.array.shape(), &[4, 1]);
}

#[test]
fn f32_payloads_widen_to_f64() {
    let bytes = Builder::default()
        .header(1)
        .u64(1) // f32 reals
        .u64(1)
        .u64(2)
        .f64s(&[0.0])
        .f64s(&[1.0])
        .u64(4) // elem_size = one f32
        .u64(2)
        .f32s(&[1.5, -2.5])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.real_type, RealType::F32);
    assert_eq!(frame.array.as_slice().unwrap(), &[1.5, -2.5]);
}

#[test]
fn ghost_stripped_payload_keeps_declared_extent() {
    // declared 6 cells, payload holds only the 4 interior cells
    let bytes = Builder::default()
        .header(1)
        .u64(0)
        .u64(1)
        .u64(6)
        .f64s(&[0.0])
        .f64s(&[3.0])
        .u64(8)
        .u64(4)
        .f64s(&[1.0, 2.0, 3.0, 4.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.cells, vec![6]);
    assert_eq!(frame.payload_cells(), &[4]);
    assert!(frame.has_ghost_mismatch());
}

#[test]
fn dynvector_blocks_concatenate_in_file_order() {
    // block 1: t = [0, 1], data = [[5], [6]]; block 2: t = [2], data = [[7]]
    let bytes = Builder::default()
        .header(2)
        .u64(0)
        .u64(8)
        .u64(2)
        .f64s(&[0.0, 1.0])
        .f64s(&[5.0, 6.0])
        .header(2)
        .u64(0)
        .u64(8)
        .u64(1)
        .f64s(&[2.0])
        .f64s(&[7.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.file_type, FileType::DynVector);
    assert_eq!(frame.time, vec![0.0, 1.0, 2.0]);
    assert_eq!(frame.array.shape(), &[3, 1]);
    assert_eq!(frame.array.as_slice().unwrap(), &[5.0, 6.0, 7.0]);
}

#[test]
fn dynvector_out_of_order_blocks_are_not_sorted() {
    let bytes = Builder::default()
        .header(2)
        .u64(0)
        .u64(8)
        .u64(1)
        .f64s(&[3.0])
        .f64s(&[30.0])
        .header(2)
        .u64(0)
        .u64(8)
        .u64(1)
        .f64s(&[1.0])
        .f64s(&[10.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    // restart wrote an earlier time after a later one, order preserved
    assert_eq!(frame.time, vec![3.0, 1.0]);
    assert_eq!(frame.array.as_slice().unwrap(), &[30.0, 10.0]);
}

#[test]
fn dynvector_component_mismatch_is_rejected() {
    let bytes = Builder::default()
        .header(2)
        .u64(0)
        .u64(8)
        .u64(1)
        .f64s(&[0.0])
        .f64s(&[5.0])
        .header(2)
        .u64(0)
        .u64(16) // second block claims two components
        .u64(1)
        .f64s(&[1.0])
        .f64s(&[6.0, 7.0])
        .build();
    assert!(matches!(
        decode_frame(&bytes),
        Err(Error::InconsistentBlock {
            expected: 1,
            found: 2
        })
    ));
}

/// Two disjoint 1D ranges covering the declared extent
#[test]
fn multirange_disjoint_ranges_cover_extent() {
    let bytes = Builder::default()
        .header(3)
        .u64(0)
        .u64(1)
        .u64(6)
        .f64s(&[0.0])
        .f64s(&[6.0])
        .u64(8)
        .u64(2) // num_ranges
        .u64(1) // range 1: cells 1..=3
        .u64(3)
        .u64(3)
        .f64s(&[1.0, 2.0, 3.0])
        .u64(4) // range 2: cells 4..=6
        .u64(6)
        .u64(3)
        .f64s(&[4.0, 5.0, 6.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.file_type, FileType::MultiRangeField);
    // exact concatenation, no residual zero gap
    assert_eq!(
        frame.array.as_slice().unwrap(),
        &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
}

#[test]
fn multirange_uncovered_cells_stay_zero() {
    let bytes = Builder::default()
        .header(3)
        .u64(0)
        .u64(2) // 2D, 3x2 cells
        .u64(3)
        .u64(2)
        .f64s(&[0.0, 0.0])
        .f64s(&[3.0, 2.0])
        .u64(8)
        .u64(1)
        .u64(2) // single range covering cells (2..=3, 1..=2)
        .u64(1)
        .u64(3)
        .u64(2)
        .u64(4)
        .f64s(&[1.0, 2.0, 3.0, 4.0])
        .build();
    let frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.array.shape(), &[3, 2, 1]);
    assert_eq!(
        frame.array.as_slice().unwrap(),
        &[0.0, 0.0, 1.0, 2.0, 3.0, 4.0]
    );
}

#[test]
fn multirange_out_of_bounds_is_rejected() {
    let bytes = Builder::default()
        .header(3)
        .u64(0)
        .u64(1)
        .u64(4)
        .f64s(&[0.0])
        .f64s(&[1.0])
        .u64(8)
        .u64(1)
        .u64(2)
        .u64(5) // upper index beyond the declared 4 cells
        .u64(4)
        .f64s(&[0.0; 4])
        .build();
    assert!(matches!(
        decode_frame(&bytes),
        Err(Error::RangeOutOfBounds { .. })
    ));
}

#[rstest]
#[case(0, 9)] // unknown file type
#[case(7, 1)] // unknown version
fn unknown_format_pairs_are_rejected(#[case] version_offset: u64, #[case] file_type: u64) {
    let bytes = Builder::default()
        .raw(&MAGIC)
        .u64(1 + version_offset)
        .u64(file_type)
        .u64(0)
        .u64(0)
        .build();
    assert!(matches!(
        decode_frame(&bytes),
        Err(Error::UnknownFormat { .. })
    ));
}

#[test]
fn declared_payload_larger_than_input_is_truncation() {
    let mut bytes = field_1d();
    bytes.truncate(bytes.len() - 8); // drop the last value
    assert!(matches!(
        decode_frame(&bytes),
        Err(Error::Truncated { .. })
    ));
}

#[test]
fn overflowing_declared_sizes_are_truncation() {
    // total_size * components overflows usize, must error rather than wrap
    let bytes = Builder::default()
        .header(1)
        .u64(0)
        .u64(1)
        .u64(4)
        .f64s(&[0.0])
        .f64s(&[1.0])
        .u64(16) // two components
        .u64(u64::MAX)
        .build();
    assert!(matches!(
        decode_frame(&bytes),
        Err(Error::Truncated { .. })
    ));
}

#[test]
fn unknown_real_type_is_rejected() {
    let bytes = Builder::default().header(1).u64(3).build();
    assert!(matches!(decode_frame(&bytes), Err(Error::UnknownRealType(3))));
}

#[test]
fn metadata_keys_survive_decode() {
    let mut meta = Vec::new();
    meta.extend(9u64.to_le_bytes());
    meta.extend(b"polyOrder");
    meta.extend(0u64.to_le_bytes());
    meta.extend(2u64.to_le_bytes());

    let bytes = Builder::default()
        .raw(&MAGIC)
        .u64(1)
        .u64(1)
        .u64(meta.len() as u64)
        .raw(&meta)
        .u64(0)
        .u64(1)
        .u64(1)
        .f64s(&[0.0])
        .f64s(&[1.0])
        .u64(8)
        .u64(1)
        .f64s(&[9.0])
        .build();
    let frame: Frame = decode_frame(&bytes).unwrap();

    assert_eq!(frame.metadata.poly_order(), Some(2));
    assert!(frame.metadata.basis_type().is_none());
}
