//! String identifier value object
//!
//! Compiled assets refer to names (materials, shaders, textures) through
//! fixed-size hashes. The repository entity keeps the reverse mapping.

use std::fmt;

/// 64-bit string identifier: the first 8 bytes of SHA-256 of the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringId64(u64);

impl StringId64 {
    pub fn of(s: &str) -> Self {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(s.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(bytes))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// 32-bit variant of the id (high half of the 64-bit id)
    pub const fn to_u32(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Parse `0x...` notation as printed by [`Display`](fmt::Display)
    pub fn parse_hex(s: &str) -> Option<u64> {
        let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
        if hex.is_empty() || hex.len() > 16 {
            return None;
        }
        u64::from_str_radix(hex, 16).ok()
    }
}

impl fmt::Display for StringId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}
