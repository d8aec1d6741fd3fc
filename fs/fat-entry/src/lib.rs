// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Interfaces to the FAT directory-entry engine.
//!
//! The volume navigation layer does not decode the on-disk FAT format
//! itself. It drives an *entry engine* through the traits in this crate:
//! a block device supplies sectors, an [`EntryEngineOps`] implementation
//! turns one partition of it into a tree of directory entries, and every
//! open entry is represented by an owned [`DirHandle`].
#![no_std]
#![allow(rustdoc::broken_intra_doc_links)]

extern crate alloc;

mod device;
mod engine;
mod error;
mod handle;
mod types;

pub use device::*;
pub use engine::*;
pub use error::*;
pub use handle::*;
pub use types::*;
