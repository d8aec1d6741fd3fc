// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Block device interface consumed at volume activation.

use alloc::sync::Arc;

use inherit_methods_macro::inherit_methods;

use crate::EntryResult;

/// Sector size used by all FAT block devices.
pub const SECTOR_SIZE: usize = 512;

/// Trait for sector-granular block device drivers.
pub trait BlockDeviceOps: Send + Sync {
    /// Total number of sectors on the device.
    fn num_sectors(&self) -> u64;

    /// Read one sector into `buf` (`buf.len() == SECTOR_SIZE`).
    fn read_sector(&self, sector: u64, buf: &mut [u8]) -> EntryResult<()>;

    /// Write one sector from `buf` (`buf.len() == SECTOR_SIZE`).
    fn write_sector(&self, sector: u64, buf: &[u8]) -> EntryResult<()>;
}

/// A reference-counted block device wrapper.
#[derive(Clone)]
pub struct BlockDevice {
    ops: Arc<dyn BlockDeviceOps>,
}

#[inherit_methods(from = "self.ops")]
impl BlockDevice {
    pub fn num_sectors(&self) -> u64;

    pub fn read_sector(&self, sector: u64, buf: &mut [u8]) -> EntryResult<()>;

    pub fn write_sector(&self, sector: u64, buf: &[u8]) -> EntryResult<()>;
}

impl BlockDevice {
    /// Create a new block device wrapper from a driver object.
    pub fn new(ops: Arc<dyn BlockDeviceOps>) -> Self {
        Self { ops }
    }
}

impl core::fmt::Debug for BlockDevice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockDevice")
            .field("num_sectors", &self.num_sectors())
            .finish()
    }
}
