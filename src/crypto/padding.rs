//! PKCS#7 padding to the 16-byte AES block size.
//!
//! `pad` always appends between 1 and 16 bytes, each holding the pad
//! length; a block-aligned input gets a full extra block of `0x10`.
//! `unpad` checks the final block in constant time with `subtle`.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};
use zeroize::Zeroizing;

use crate::errors::{FieldSealError, Result};

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// Pad `data` up to the next multiple of [`BLOCK_LEN`].
pub fn pad(data: &[u8]) -> Zeroizing<Vec<u8>> {
    let pad_len = BLOCK_LEN - (data.len() % BLOCK_LEN);

    let mut out = Zeroizing::new(Vec::with_capacity(data.len() + pad_len));
    out.extend_from_slice(data);
    // pad_len is in 1..=16, so the cast is lossless.
    out.resize(data.len() + pad_len, pad_len as u8);
    out
}

/// Strip PKCS#7 padding and return the message bytes.
///
/// Fails with `InvalidPadding` when `data` is empty or not block-aligned,
/// when the final byte is 0 or greater than 16, or when the last `p`
/// bytes are not all equal to `p`.
pub fn unpad(data: &[u8]) -> Result<&[u8]> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(FieldSealError::InvalidPadding);
    }

    let last_block = &data[data.len() - BLOCK_LEN..];
    let pad_len = last_block[BLOCK_LEN - 1];

    let mut valid: Choice = !pad_len.ct_eq(&0) & !pad_len.ct_gt(&(BLOCK_LEN as u8));

    // Walk the whole final block regardless of pad_len so the check
    // takes the same time for every padding value.
    for (i, byte) in last_block.iter().enumerate() {
        let distance_from_end = (BLOCK_LEN - i) as u8;
        let inside_padding = !distance_from_end.ct_gt(&pad_len);
        valid &= !inside_padding | byte.ct_eq(&pad_len);
    }

    if bool::from(valid) {
        Ok(&data[..data.len() - usize::from(pad_len)])
    } else {
        Err(FieldSealError::InvalidPadding)
    }
}
