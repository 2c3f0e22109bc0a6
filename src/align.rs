//! Padding and cutting of big-endian byte strings into fixed-width slots.
//!
//! Two rules cover every typed value that has to fit a slot that is wider or
//! narrower than its natural size:
//!
//! * numbers and booleans (`uintN`, `intN`, `bool`) are *left aligned*: extra
//!   room is filled with zero bytes on the left and excess bytes are cut off
//!   the left, so the least significant bytes survive.
//! * byte strings and addresses (`bytesN`, `address`) are *right aligned*:
//!   extra room is filled with zero bytes on the right and excess bytes are
//!   cut off the right, so the leading bytes survive.
//!
//! Both the key derivation in [crate::schema] and the value codec in
//! [crate::codec] go through these helpers.

/// Which end of a slot a value is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Pad and cut on the left (`uintN`, `intN`, `bool`).
    Left,
    /// Pad and cut on the right (`bytesN`, `address`).
    Right,
}

impl Alignment {
    pub fn align(self, bytes: &[u8], width: usize) -> Vec<u8> {
        match self {
            Alignment::Left => left_align(bytes, width),
            Alignment::Right => right_align(bytes, width),
        }
    }

    /// Inverse of [Alignment::align] for values that were extended:
    /// returns the `natural` bytes inside a `slot`, or `None` if the padding
    /// bytes are not zero.
    pub fn unpad(self, slot: &[u8], natural: usize) -> Option<&[u8]> {
        if natural > slot.len() {
            return None;
        }
        let pad = slot.len() - natural;
        let (padding, value) = match self {
            Alignment::Left => (&slot[..pad], &slot[pad..]),
            Alignment::Right => (&slot[natural..], &slot[..natural]),
        };
        padding.iter().all(|&b| b == 0).then_some(value)
    }
}

/// Fits a big-endian number into `width` bytes, padding or cutting on the left.
///
/// ```
/// use lsp2_schema::align::left_align;
///
/// assert_eq!(left_align(&[0x05], 4), vec![0, 0, 0, 5]);
/// assert_eq!(left_align(&[0xaa, 0xbb, 0xcc], 2), vec![0xbb, 0xcc]);
/// ```
pub fn left_align(bytes: &[u8], width: usize) -> Vec<u8> {
    if bytes.len() >= width {
        return bytes[bytes.len() - width..].to_vec();
    }
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(bytes);
    out
}

/// Fits a byte string into `width` bytes, padding or cutting on the right.
///
/// ```
/// use lsp2_schema::align::right_align;
///
/// assert_eq!(right_align(&[0xca, 0xfe], 4), vec![0xca, 0xfe, 0, 0]);
/// assert_eq!(right_align(&[0xaa, 0xbb, 0xcc], 2), vec![0xaa, 0xbb]);
/// ```
pub fn right_align(bytes: &[u8], width: usize) -> Vec<u8> {
    let mut out = vec![0u8; width];
    let n = bytes.len().min(width);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}
