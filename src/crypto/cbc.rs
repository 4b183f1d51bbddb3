//! Raw AES-256-CBC over block-aligned buffers.
//!
//! Padding is handled separately in `crypto::padding`, so both
//! directions run the block mode with `NoPadding` and operate in place.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::padding::BLOCK_LEN;
use crate::errors::{FieldSealError, Result};

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the CBC initialization vector in bytes.
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt `buf` in place. `buf.len()` must be a multiple of 16.
pub fn encrypt_in_place(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], buf: &mut [u8]) -> Result<()> {
    check_aligned(buf)?;

    let msg_len = buf.len();
    Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| FieldSealError::CipherFailure(format!("cipher init: {e}")))?
        .encrypt_padded_mut::<NoPadding>(buf, msg_len)
        .map_err(|_| FieldSealError::CipherFailure("block encryption failed".into()))?;

    Ok(())
}

/// Decrypt `buf` in place. `buf.len()` must be a multiple of 16.
pub fn decrypt_in_place(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN], buf: &mut [u8]) -> Result<()> {
    check_aligned(buf)?;

    Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| FieldSealError::CipherFailure(format!("cipher init: {e}")))?
        .decrypt_padded_mut::<NoPadding>(buf)
        .map_err(|_| FieldSealError::CipherFailure("block decryption failed".into()))?;

    Ok(())
}

fn check_aligned(buf: &[u8]) -> Result<()> {
    if buf.len() % BLOCK_LEN != 0 {
        return Err(FieldSealError::CipherFailure(format!(
            "buffer length {} is not a multiple of {BLOCK_LEN}",
            buf.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    // NIST SP 800-38A, F.2.5 CBC-AES256.Encrypt
    const NIST_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172a\
                              ae2d8a571e03ac9c9eb76fac45af8e51\
                              30c81c46a35ce411e5fbc1191a0a52ef\
                              f69f2445df4f9b17ad2b417be66c3710";
    const NIST_CIPHER: &str = "f58c4c04d6e5f1ba779eabfb5f7bfbd6\
                               9cfc4e967edb808d679f777bc6702c7d\
                               39f23369a9d9bacfa530e26304231461\
                               b2eb05e2c39be9fcda6c19078c6a9d1b";

    fn nist_key_iv() -> ([u8; KEY_LEN], [u8; IV_LEN]) {
        let key: [u8; KEY_LEN] = hex(NIST_KEY).try_into().unwrap();
        let iv: [u8; IV_LEN] = hex(NIST_IV).try_into().unwrap();
        (key, iv)
    }

    #[test]
    fn matches_nist_encrypt_vector() {
        let (key, iv) = nist_key_iv();
        let mut buf = hex(NIST_PLAIN);
        encrypt_in_place(&key, &iv, &mut buf).unwrap();
        assert_eq!(buf, hex(NIST_CIPHER));
    }

    #[test]
    fn matches_nist_decrypt_vector() {
        let (key, iv) = nist_key_iv();
        let mut buf = hex(NIST_CIPHER);
        decrypt_in_place(&key, &iv, &mut buf).unwrap();
        assert_eq!(buf, hex(NIST_PLAIN));
    }

    #[test]
    fn different_iv_changes_every_block() {
        let (key, iv) = nist_key_iv();
        let mut other_iv = iv;
        other_iv[0] ^= 0x01;

        let mut a = hex(NIST_PLAIN);
        let mut b = hex(NIST_PLAIN);
        encrypt_in_place(&key, &iv, &mut a).unwrap();
        encrypt_in_place(&key, &other_iv, &mut b).unwrap();

        for (block_a, block_b) in a.chunks(BLOCK_LEN).zip(b.chunks(BLOCK_LEN)) {
            assert_ne!(block_a, block_b);
        }
    }

    #[test]
    fn rejects_unaligned_buffer() {
        let (key, iv) = nist_key_iv();
        let mut buf = vec![0u8; 17];
        assert!(encrypt_in_place(&key, &iv, &mut buf).is_err());
        assert!(decrypt_in_place(&key, &iv, &mut buf).is_err());
    }
}
