// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The volume working-directory cursor.

use core::mem;

use fat_entry::{DirHandle, ErrorBits};

use crate::{FsError, FsResult, resolver::PathResolver};

/// The persistent "current directory" handle of a volume.
///
/// This is the one handle whose lifetime is the volume's, not a single
/// call's. Every relative operation resolves against its value at call
/// time.
#[derive(Debug)]
pub struct WorkingDir {
    handle: DirHandle,
}

impl WorkingDir {
    /// Creates a cursor positioned at the volume root.
    pub fn open_root(resolver: &PathResolver) -> FsResult<Self> {
        Ok(Self {
            handle: resolver.open_root()?,
        })
    }

    /// The current cursor handle.
    pub fn handle(&self) -> &DirHandle {
        &self.handle
    }

    /// Mutable access to the cursor handle, for directory-stream
    /// operations (`rewind`, `seek_set`, `open_next`).
    pub fn handle_mut(&mut self) -> &mut DirHandle {
        &mut self.handle
    }

    /// Accumulated error bits of the cursor handle.
    pub fn error(&self) -> ErrorBits {
        self.handle.error()
    }

    /// Resets the cursor to the volume root: the previous handle is
    /// closed first, then the root is opened fresh.
    pub fn reset(&mut self, resolver: &PathResolver) -> FsResult<()> {
        self.handle.close();
        self.handle = resolver.open_root()?;
        Ok(())
    }

    /// Replaces the cursor with `new`, closing the old handle.
    ///
    /// Fails with [`FsError::NotADirectory`] if `new` is not a
    /// directory; the cursor is left unchanged on failure.
    pub fn replace(&mut self, new: DirHandle) -> FsResult<()> {
        if !new.is_dir() {
            return Err(FsError::NotADirectory);
        }
        let mut old = mem::replace(&mut self.handle, new);
        old.close();
        Ok(())
    }
}
