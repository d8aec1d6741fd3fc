// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Entry engine trait and wrapper.

use alloc::sync::Arc;

use inherit_methods_macro::inherit_methods;

use crate::{BlockDevice, DirHandle, EntryResult, HandleOps};

/// Trait for directory-entry engine implementations.
pub trait EntryEngineOps: Send + Sync {
    /// Gets the name of the engine (e.g. the FAT variant)
    fn name(&self) -> &str;

    /// Bind the engine to `partition` of `device`.
    ///
    /// Called exactly once, at volume activation. Fails with
    /// [`crate::EntryError::BadPartition`] if the partition does not
    /// exist or does not hold a recognizable filesystem.
    fn init(&self, device: BlockDevice, partition: u8) -> EntryResult<()>;

    /// Open a handle to the volume root directory.
    fn open_root(&self) -> EntryResult<alloc::boxed::Box<dyn HandleOps>>;
}

/// A reference-counted entry engine wrapper.
#[derive(Clone)]
pub struct Engine {
    ops: Arc<dyn EntryEngineOps>,
}

#[inherit_methods(from = "self.ops")]
impl Engine {
    pub fn name(&self) -> &str;

    pub fn init(&self, device: BlockDevice, partition: u8) -> EntryResult<()>;
}

impl Engine {
    /// Create a new engine wrapper from an implementation object.
    pub fn new(ops: Arc<dyn EntryEngineOps>) -> Self {
        Self { ops }
    }

    /// Open a handle to the volume root directory.
    pub fn open_root(&self) -> EntryResult<DirHandle> {
        self.ops.open_root().map(DirHandle::from_ops)
    }
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine").field("name", &self.name()).finish()
    }
}
