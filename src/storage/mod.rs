//! Checksummed fixed-layout records on a [`PersistentStore`].
//!
//! Every persisted record occupies one slot:
//!
//! ```text
//! ┌─────────┬──────────────────────┬────────────────┐
//! │ version │ fields (FIELDS_LEN)  │ crc32 (LE, x4) │
//! └─────────┴──────────────────────┴────────────────┘
//!  ◀──────────── payload ─────────▶
//! ```
//!
//! The checksum covers the payload only and is always written last, so a
//! save torn by power loss is caught by the CRC on the next load.

pub mod layout;

use core::fmt;

use crate::app::ports::{PersistentStore, StoreError};

/// Width of the trailing checksum field.
pub const CHECKSUM_LEN: usize = 4;

/// Largest slot any record may occupy (sizes the stack buffers below).
pub const MAX_SLOT_LEN: usize = 16;

/// A value with an explicit byte encoding that can live in a store slot.
pub trait Record: Sized {
    /// Layout version written as the first payload byte.
    const VERSION: u8;

    /// Encoded length of the fields, excluding version and checksum.
    const FIELDS_LEN: usize;

    /// Bytes covered by the checksum.
    const PAYLOAD_LEN: usize = 1 + Self::FIELDS_LEN;

    /// Total slot footprint.
    const SLOT_LEN: usize = Self::PAYLOAD_LEN + CHECKSUM_LEN;

    /// Serialize the fields into `out` (exactly `FIELDS_LEN` bytes).
    fn encode_fields(&self, out: &mut [u8]);

    /// Deserialize from `bytes` (exactly `FIELDS_LEN` bytes).  Out-of-range
    /// values are clamped, never rejected.
    fn decode_fields(bytes: &[u8]) -> Self;
}

/// Why a slot could not be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadError {
    /// The stored CRC does not match the payload.
    ChecksumMismatch { stored: u32, computed: u32 },
    /// The CRC matched but the layout version is unknown.
    UnsupportedVersion(u8),
    /// The slot could not be read at all.
    Store(StoreError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecksumMismatch { stored, computed } => write!(
                f,
                "checksum mismatch (stored 0x{:08x}, computed 0x{:08x})",
                stored, computed
            ),
            Self::UnsupportedVersion(v) => write!(f, "unsupported layout version {}", v),
            Self::Store(e) => write!(f, "store: {}", e),
        }
    }
}

impl core::error::Error for LoadError {}

impl From<StoreError> for LoadError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Read and verify the record stored at `offset`.
pub fn load<R: Record>(store: &impl PersistentStore, offset: usize) -> Result<R, LoadError> {
    debug_assert!(R::SLOT_LEN <= MAX_SLOT_LEN);
    let mut buf = [0u8; MAX_SLOT_LEN];
    let slot = &mut buf[..R::SLOT_LEN];
    store.read(offset, slot)?;

    let payload_len = R::PAYLOAD_LEN;
    let mut crc_bytes = [0u8; CHECKSUM_LEN];
    crc_bytes.copy_from_slice(&slot[payload_len..]);
    let stored = u32::from_le_bytes(crc_bytes);
    let computed = store.crc(offset, payload_len)?;
    if stored != computed {
        return Err(LoadError::ChecksumMismatch { stored, computed });
    }

    if slot[0] != R::VERSION {
        return Err(LoadError::UnsupportedVersion(slot[0]));
    }

    Ok(R::decode_fields(&slot[1..payload_len]))
}

/// Serialize `record` into the slot at `offset` and rewrite its checksum.
///
/// Returns the checksum that was written.
pub fn save<R: Record>(
    store: &mut impl PersistentStore,
    offset: usize,
    record: &R,
) -> Result<u32, StoreError> {
    debug_assert!(R::SLOT_LEN <= MAX_SLOT_LEN);
    let mut buf = [0u8; MAX_SLOT_LEN];
    let payload_len = R::PAYLOAD_LEN;
    buf[0] = R::VERSION;
    record.encode_fields(&mut buf[1..payload_len]);

    store.write(offset, &buf[..payload_len])?;
    let crc = store.crc(offset, payload_len)?;
    store.write(offset + payload_len, &crc.to_le_bytes())?;
    store.commit()?;
    Ok(crc)
}
