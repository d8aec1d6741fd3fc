// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Volume-level navigation for FAT filesystems.
//!
//! This crate resolves textual paths against one mounted volume,
//! maintains the per-volume working directory cursor, and composes the
//! directory-entry engine behind [`fat_entry`] into one-shot volume
//! operations (exists, ls, mkdir, open, remove, rename, rmdir,
//! truncate, recursive delete). The on-disk format, the block driver
//! and name translation live below the [`fat_entry`] traits.
#![cfg_attr(all(not(test), not(doc)), no_std)]
#![allow(rustdoc::broken_intra_doc_links)]

extern crate alloc;

#[macro_use]
extern crate log;

mod ls;
pub mod path;
mod registry;
mod resolver;
mod volume;
mod working_dir;

pub use registry::{CURRENT_VOLUME, SharedVolume, VolumeRegistry, current_volume};
pub use resolver::PathResolver;
pub use volume::{Volume, chvol, chvol_in};
pub use working_dir::WorkingDir;

pub type FsError = fat_entry::EntryError;
pub type FsResult<T> = Result<T, FsError>;
