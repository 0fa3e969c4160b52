//! EEPROM-style byte store adapter.
//!
//! Implements [`PersistentStore`] over a RAM image of [`EEPROM_SIZE`] bytes.
//!
//! - **`target_os = "espidf"`**: the image is mirrored into a single NVS
//!   blob. It is loaded once in [`EepromAdapter::new`] and written back on
//!   every [`commit`](PersistentStore::commit).
//! - **host**: the image lives only in memory and starts erased (`0xFF`).
//!
//! The last [`WDT_DEBUG_RESERVED`] bytes belong to the watchdog
//! debug trace and are write-protected here.

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{PersistentStore, StoreError};
use crate::storage::layout::{WDT_DEBUG_RESERVED, reserved_start};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Size of the emulated EEPROM.
pub const EEPROM_SIZE: usize = 512;

/// Value of a never-written byte.
pub const ERASED: u8 = 0xFF;

#[cfg(target_os = "espidf")]
const EEPROM_NAMESPACE: &[u8] = b"petfeeder\0";
#[cfg(target_os = "espidf")]
const EEPROM_KEY: &[u8] = b"eeprom\0";

const CRC_TABLE: [u32; 16] = [
    0x0000_0000, 0x1db7_1064, 0x3b6e_20c8, 0x26d9_30ac,
    0x76dc_4190, 0x6b6b_51f4, 0x4db2_6158, 0x5005_713c,
    0xedb8_8320, 0xf00f_9344, 0xd6d6_a3e8, 0xcb61_b38c,
    0x9b64_c2b0, 0x86d3_d2d4, 0xa00a_e278, 0xbdbd_f21c,
];

/// CRC-32 (IEEE, reflected) computed a nibble at a time.
pub fn eeprom_crc(bytes: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &b in bytes {
        crc = CRC_TABLE[((crc ^ u32::from(b)) & 0x0f) as usize] ^ (crc >> 4);
        crc = CRC_TABLE[((crc ^ u32::from(b >> 4)) & 0x0f) as usize] ^ (crc >> 4);
    }
    !crc
}

pub struct EepromAdapter {
    image: Vec<u8>,
    dirty: bool,
}

impl EepromAdapter {
    /// Open the store, initialising NVS flash and loading the saved image.
    ///
    /// A missing or wrong-sized blob yields an erased image; the records in
    /// it will then fail their checksums and fall back to defaults.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, StoreError> {
        // SAFETY: called once from the main task before any other NVS user.
        let ret = unsafe { nvs_flash_init() };
        if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
            warn!("EEPROM: erasing and re-initialising NVS partition");
            if unsafe { nvs_flash_erase() } != ESP_OK || unsafe { nvs_flash_init() } != ESP_OK {
                return Err(StoreError::Io);
            }
        } else if ret != ESP_OK {
            return Err(StoreError::Io);
        }

        let mut image = vec![ERASED; EEPROM_SIZE];
        match Self::with_nvs_handle(false, |handle| {
            let mut size = EEPROM_SIZE;
            let ret = unsafe {
                nvs_get_blob(
                    handle,
                    EEPROM_KEY.as_ptr() as *const _,
                    image.as_mut_ptr() as *mut _,
                    &mut size,
                )
            };
            if ret != ESP_OK {
                return Err(ret);
            }
            Ok(size)
        }) {
            Ok(EEPROM_SIZE) => info!("EepromAdapter: restored {} byte image", EEPROM_SIZE),
            Ok(size) => {
                warn!("EEPROM: stored image is {} bytes, starting erased", size);
                image.fill(ERASED);
            }
            Err(rc) => {
                info!("EepromAdapter: no stored image (rc={}), starting erased", rc);
                image.fill(ERASED);
            }
        }
        Ok(Self {
            image,
            dirty: false,
        })
    }

    /// Open the store.  On the host this is an erased in-memory image.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, StoreError> {
        info!("EepromAdapter: simulation backend");
        Ok(Self::with_capacity(EEPROM_SIZE))
    }

    /// An erased in-memory store of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            image: vec![ERASED; capacity],
            dirty: false,
        }
    }

    /// Raw view of the whole image (diagnostics and tests).
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Whether writes are pending a [`commit`](PersistentStore::commit).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<(), StoreError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.image.len() => Ok(()),
            _ => Err(StoreError::OutOfBounds { offset, len }),
        }
    }

    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };
        let ret = unsafe { nvs_open(EEPROM_NAMESPACE.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }
        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

impl PersistentStore for EepromAdapter {
    fn capacity(&self) -> usize {
        self.image.len()
    }

    fn read_byte(&self, offset: usize) -> Result<u8, StoreError> {
        self.image
            .get(offset)
            .copied()
            .ok_or(StoreError::OutOfBounds { offset, len: 1 })
    }

    fn write_byte(&mut self, offset: usize, value: u8) -> Result<(), StoreError> {
        self.check_range(offset, 1)?;
        if offset >= reserved_start(self.image.len()) {
            return Err(StoreError::Reserved { offset });
        }
        if self.image[offset] != value {
            self.image[offset] = value;
            self.dirty = true;
        }
        Ok(())
    }

    fn crc(&self, offset: usize, len: usize) -> Result<u32, StoreError> {
        self.check_range(offset, len)?;
        Ok(eeprom_crc(&self.image[offset..offset + len]))
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        self.check_range(offset, buf.len())?;
        buf.copy_from_slice(&self.image[offset..offset + buf.len()]);
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        #[cfg(target_os = "espidf")]
        {
            let image = &self.image;
            Self::with_nvs_handle(true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        EEPROM_KEY.as_ptr() as *const _,
                        image.as_ptr() as *const _,
                        image.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            })
            .map_err(|rc| {
                warn!("EEPROM: NVS commit failed (rc={})", rc);
                StoreError::Io
            })?;
        }

        self.dirty = false;
        log::debug!(
            "EEPROM: committed ({} bytes, last {} reserved)",
            self.image.len(),
            WDT_DEBUG_RESERVED
        );
        Ok(())
    }
}
