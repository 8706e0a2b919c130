//! Basis descriptor inference from frame metadata

// crate modules
use crate::error::{Error, Result};

// gktools modules
use gktools_basis::{BasisDescriptor, Family, Layout};
use gktools_frame::{Frame, KEY_BASIS_TYPE, KEY_POLY_ORDER};

/// Build a descriptor from the basis entries of a frame's metadata blob
///
/// Versioned frames record their polynomial order and basis family name in
/// the header metadata, which is enough to pick the registered basis without
/// the caller specifying one.
///
/// ```rust, no_run
/// # use gktools_basis::Layout;
/// # use gktools_frame::read_frame;
/// # use gktools_interp::frame_descriptor;
/// let frame = read_frame("/path/to/field_10.gkyl").unwrap();
/// let desc = frame_descriptor(&frame, Layout::Modal).unwrap();
/// ```
pub fn frame_descriptor(frame: &Frame, layout: Layout) -> Result<BasisDescriptor> {
    let poly_order = frame
        .metadata
        .poly_order()
        .ok_or_else(|| Error::MissingMetadata(KEY_POLY_ORDER.to_string()))?;
    let name = frame
        .metadata
        .basis_type()
        .ok_or_else(|| Error::MissingMetadata(KEY_BASIS_TYPE.to_string()))?;

    let family = Family::from_name(name)?;
    Ok(BasisDescriptor::new(
        frame.num_dims(),
        poly_order,
        family,
        layout,
    )?)
}
