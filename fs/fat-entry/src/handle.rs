// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Open directory-entry handles.
//!
//! A [`DirHandle`] is an owned reference to one open file or directory.
//! Handles are stack-scoped: dropping one releases it. The single
//! exception is the volume working-directory cursor, which lives as long
//! as its volume. Besides the engine-side state, a handle carries an
//! open flag and a sticky [`ErrorBits`] field recording every failing
//! sub-operation since the last [`DirHandle::clear_error`].

use alloc::boxed::Box;
use core::any::Any;

use crate::{EntryError, EntryKind, EntryResult, ErrorBits, Metadata, OpenFlags};

/// Engine-side operations of one open directory entry.
///
/// Implementations must uphold two FAT iteration contracts relied on by
/// the volume layer:
///
/// - Removing a child entry leaves the stream positions of its siblings
///   valid; a removed slot is simply skipped by later [`open_next`]
///   calls (tombstone semantics).
/// - [`open_next`] never yields the `.` and `..` entries.
///
/// [`open_next`]: HandleOps::open_next
pub trait HandleOps: Send {
    /// Open the child entry `name` of this directory.
    ///
    /// `name` may be `..`, which opens the parent directory (the root
    /// directory is its own parent). [`OpenFlags::CREATE`] creates a
    /// missing file; a write open of a read-only entry fails with
    /// [`EntryError::ReadOnly`].
    fn open(&self, name: &str, flags: OpenFlags) -> EntryResult<Box<dyn HandleOps>>;

    /// Open the next child entry at or after the current stream
    /// position, advancing the position past it. `Ok(None)` at end.
    fn open_next(&mut self, flags: OpenFlags) -> EntryResult<Option<Box<dyn HandleOps>>>;

    /// Open a fresh, independent handle to this same entry.
    fn reopen(&self) -> EntryResult<Box<dyn HandleOps>>;

    /// Name of this entry within its parent; empty for the root.
    fn name(&self) -> &str;

    /// Entry metadata (kind, size, attributes, mtime).
    fn metadata(&self) -> EntryResult<Metadata>;

    /// File or directory.
    fn kind(&self) -> EntryKind;

    /// `true` if this handle refers to the volume root directory.
    fn is_root(&self) -> bool;

    /// Current position in the directory stream or file data.
    fn cur_position(&self) -> u32;

    /// Set the stream position.
    fn seek_set(&mut self, pos: u32) -> EntryResult<()>;

    /// Read file data at the current position.
    fn read(&mut self, buf: &mut [u8]) -> EntryResult<usize>;

    /// Write file data at the current position.
    fn write(&mut self, buf: &[u8]) -> EntryResult<usize>;

    /// Truncate the file data to `length` bytes.
    fn truncate(&mut self, length: u32) -> EntryResult<()>;

    /// Current data size in bytes (0 for directories).
    fn size(&self) -> u32;

    /// Create the subdirectory `name` under this directory.
    fn mkdir(&self, name: &str) -> EntryResult<Box<dyn HandleOps>>;

    /// Unlink this entry and free its data clusters.
    ///
    /// Removes the entry even if its read-only attribute is set;
    /// read-only policy is enforced by [`HandleOps::open`] with
    /// [`OpenFlags::WRITE`], not here. The handle is unusable afterwards.
    fn remove(&mut self) -> EntryResult<()>;

    /// Move this entry under `dst_dir` with the name `new_name`.
    ///
    /// `dst_dir` must belong to the same engine instance; engines
    /// recover their concrete type through [`HandleOps::as_any`].
    fn rename(&mut self, dst_dir: &dyn HandleOps, new_name: &str) -> EntryResult<()>;

    /// Remove this directory. Fails with
    /// [`EntryError::DirectoryNotEmpty`] unless it is empty.
    fn rmdir(&mut self) -> EntryResult<()>;

    /// Downcast support for cross-handle operations.
    fn as_any(&self) -> &dyn Any;
}

/// An owned handle to one open file or directory.
pub struct DirHandle {
    ops: Box<dyn HandleOps>,
    open: bool,
    error: ErrorBits,
}

impl DirHandle {
    /// Wrap a raw engine handle.
    pub fn from_ops(ops: Box<dyn HandleOps>) -> Self {
        Self {
            ops,
            open: true,
            error: ErrorBits::empty(),
        }
    }

    /// `true` until [`DirHandle::close`], `remove` or `rmdir` succeed.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Accumulated error bits since the last [`DirHandle::clear_error`].
    pub fn error(&self) -> ErrorBits {
        self.error
    }

    /// Reset the accumulated error bits.
    pub fn clear_error(&mut self) {
        self.error = ErrorBits::empty();
    }

    /// Name of this entry within its parent; empty for the root.
    pub fn name(&self) -> &str {
        self.ops.name()
    }

    /// File or directory.
    pub fn kind(&self) -> EntryKind {
        self.ops.kind()
    }

    /// `true` if this handle refers to a directory.
    pub fn is_dir(&self) -> bool {
        self.kind().is_dir()
    }

    /// `true` if this handle refers to a regular file.
    pub fn is_file(&self) -> bool {
        self.kind().is_file()
    }

    /// `true` if this handle refers to the volume root directory.
    pub fn is_root(&self) -> bool {
        self.ops.is_root()
    }

    /// Current data size in bytes (0 for directories).
    pub fn size(&self) -> u32 {
        self.ops.size()
    }

    /// Current position in the directory stream or file data.
    pub fn cur_position(&self) -> u32 {
        self.ops.cur_position()
    }

    /// Entry metadata.
    pub fn metadata(&self) -> EntryResult<Metadata> {
        if !self.open {
            return Err(EntryError::Closed);
        }
        self.ops.metadata()
    }

    /// Borrow the raw engine handle, e.g. as a rename destination.
    pub fn ops(&self) -> &dyn HandleOps {
        &*self.ops
    }

    fn check_open(&mut self) -> EntryResult<()> {
        if self.open {
            Ok(())
        } else {
            self.error |= ErrorBits::CLOSED;
            Err(EntryError::Closed)
        }
    }

    fn tag<T>(&mut self, bit: ErrorBits, result: EntryResult<T>) -> EntryResult<T> {
        if result.is_err() {
            self.error |= bit;
        }
        result
    }

    /// Open the child entry `name` of this directory.
    pub fn open(&mut self, name: &str, flags: OpenFlags) -> EntryResult<DirHandle> {
        self.check_open()?;
        let result = self.ops.open(name, flags);
        self.tag(ErrorBits::OPEN, result).map(Self::from_ops)
    }

    /// Open the next child entry, advancing the stream position.
    pub fn open_next(&mut self, flags: OpenFlags) -> EntryResult<Option<DirHandle>> {
        self.check_open()?;
        let result = self.ops.open_next(flags);
        self.tag(ErrorBits::OPEN, result)
            .map(|raw| raw.map(Self::from_ops))
    }

    /// Open a fresh, independent handle to this same entry.
    pub fn reopen(&self) -> EntryResult<DirHandle> {
        if !self.open {
            return Err(EntryError::Closed);
        }
        self.ops.reopen().map(Self::from_ops)
    }

    /// Reset the stream position to zero.
    pub fn rewind(&mut self) {
        // A seek to zero cannot fail on an open handle.
        let _ = self.seek_set(0);
    }

    /// Set the stream position.
    pub fn seek_set(&mut self, pos: u32) -> EntryResult<()> {
        self.check_open()?;
        let result = self.ops.seek_set(pos);
        self.tag(ErrorBits::SEEK, result)
    }

    /// Read file data at the current position.
    pub fn read(&mut self, buf: &mut [u8]) -> EntryResult<usize> {
        self.check_open()?;
        let result = self.ops.read(buf);
        self.tag(ErrorBits::READ, result)
    }

    /// Write file data at the current position.
    pub fn write(&mut self, buf: &[u8]) -> EntryResult<usize> {
        self.check_open()?;
        let result = self.ops.write(buf);
        self.tag(ErrorBits::WRITE, result)
    }

    /// Truncate the file data to `length` bytes.
    pub fn truncate(&mut self, length: u32) -> EntryResult<()> {
        self.check_open()?;
        let result = self.ops.truncate(length);
        self.tag(ErrorBits::WRITE, result)
    }

    /// Create the subdirectory `name` under this directory.
    pub fn mkdir(&mut self, name: &str) -> EntryResult<DirHandle> {
        self.check_open()?;
        let result = self.ops.mkdir(name);
        self.tag(ErrorBits::MKDIR, result).map(Self::from_ops)
    }

    /// Unlink this entry and free its data clusters.
    ///
    /// The caller must guarantee no other handle references this entry;
    /// the engine does not detect that and the volume can be corrupted.
    pub fn remove(&mut self) -> EntryResult<()> {
        self.check_open()?;
        let result = self.ops.remove();
        self.tag(ErrorBits::REMOVE, result)?;
        self.open = false;
        Ok(())
    }

    /// Move this entry under `dst_dir` with the name `new_name`.
    pub fn rename(&mut self, dst_dir: &DirHandle, new_name: &str) -> EntryResult<()> {
        self.check_open()?;
        if !dst_dir.is_open() {
            self.error |= ErrorBits::RENAME;
            return Err(EntryError::Closed);
        }
        let result = self.ops.rename(dst_dir.ops(), new_name);
        self.tag(ErrorBits::RENAME, result)
    }

    /// Remove this directory if it is empty.
    pub fn rmdir(&mut self) -> EntryResult<()> {
        self.check_open()?;
        let result = self.ops.rmdir();
        self.tag(ErrorBits::REMOVE, result)?;
        self.open = false;
        Ok(())
    }

    /// Close the handle. Later operations fail with
    /// [`EntryError::Closed`]. Dropping a handle closes it implicitly.
    pub fn close(&mut self) {
        self.open = false;
    }
}

impl core::fmt::Debug for DirHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DirHandle")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .field("open", &self.open)
            .field("position", &self.cur_position())
            .field("error", &self.error)
            .finish()
    }
}
