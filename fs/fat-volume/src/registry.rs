// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The current-volume registry.
//!
//! A registry is a single slot holding the volume that unqualified
//! "default volume" operations target. It models the one active storage
//! device of a typical embedded system. Semantics are last-writer-wins:
//! whichever volume claimed the slot most recently is current, until
//! another claims it or [`VolumeRegistry::release`] clears it.
//!
//! The process-wide default slot is [`CURRENT_VOLUME`]; code that needs
//! independent volumes (tests, multi-card setups) can create private
//! registries instead of contending for it.

use alloc::sync::Arc;

use spin::Mutex;

use crate::volume::Volume;

/// A volume shared behind a lock, as stored in a registry.
pub type SharedVolume = Arc<Mutex<Volume>>;

/// A single slot designating the current volume.
pub struct VolumeRegistry {
    slot: Mutex<Option<SharedVolume>>,
}

impl VolumeRegistry {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Makes `volume` the current one, displacing any previous holder.
    pub fn claim(&self, volume: &SharedVolume) {
        *self.slot.lock() = Some(volume.clone());
    }

    /// Makes `volume` current only if no volume has ever claimed the
    /// slot (or it has been released). Returns `true` if it did.
    pub fn claim_if_empty(&self, volume: &SharedVolume) -> bool {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            *slot = Some(volume.clone());
            true
        } else {
            false
        }
    }

    /// The current volume, if any.
    pub fn current(&self) -> Option<SharedVolume> {
        self.slot.lock().clone()
    }

    /// Clears the slot. Part of the teardown contract: call this before
    /// detaching the block device backing the current volume.
    pub fn release(&self) {
        *self.slot.lock() = None;
    }
}

impl Default for VolumeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for VolumeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VolumeRegistry")
            .field("occupied", &self.slot.lock().is_some())
            .finish()
    }
}

/// The process-wide current-volume slot.
pub static CURRENT_VOLUME: VolumeRegistry = VolumeRegistry::new();

/// The volume registered in [`CURRENT_VOLUME`], if any.
pub fn current_volume() -> Option<SharedVolume> {
    CURRENT_VOLUME.current()
}
