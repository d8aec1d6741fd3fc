// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Entry classification, open flags and per-handle state bits.

use bitflags::bitflags;
use chrono::NaiveDateTime;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

impl EntryKind {
    /// Returns `true` for [`EntryKind::Directory`].
    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }

    /// Returns `true` for [`EntryKind::File`].
    pub fn is_file(self) -> bool {
        self == EntryKind::File
    }
}

/// Metadata of an open directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// File or directory
    pub kind: EntryKind,
    /// Data size in bytes (0 for directories)
    pub size: u32,
    /// FAT read-only attribute
    pub read_only: bool,
    /// Last modification time, if the engine records one
    pub modified: Option<NaiveDateTime>,
}

bitflags! {
    /// Open flags for the final component of a resolution.
    ///
    /// Intermediate components are always opened with [`OpenFlags::READ`];
    /// the flags given to an operation apply to the last component only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u8 {
        /// Open for reading
        const READ = 1 << 0;
        /// Open for writing
        const WRITE = 1 << 1;
        /// Create the final component if it does not exist
        const CREATE = 1 << 2;
        /// Create missing intermediate directories while resolving
        const CREATE_PARENTS = 1 << 3;
        /// Truncate the file to zero length after opening
        const TRUNCATE = 1 << 4;
    }
}

bitflags! {
    /// Flags for directory listing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LsFlags: u8 {
        /// Print the modification date of each entry
        const DATE = 1 << 0;
        /// Print the size of each entry
        const SIZE = 1 << 1;
        /// Recurse into subdirectories (pre-order, depth-first)
        const RECURSIVE = 1 << 2;
    }
}

bitflags! {
    /// Sticky error bits accumulated on a [`crate::DirHandle`].
    ///
    /// A failing sub-operation sets the matching bit and leaves it set
    /// until [`crate::DirHandle::clear_error`] is called, so a handle can
    /// report its failure state after the fact.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ErrorBits: u8 {
        /// A child open or reopen failed
        const OPEN = 1 << 0;
        /// A read failed
        const READ = 1 << 1;
        /// A write or truncate failed
        const WRITE = 1 << 2;
        /// A seek failed
        const SEEK = 1 << 3;
        /// A remove or rmdir failed
        const REMOVE = 1 << 4;
        /// A rename failed
        const RENAME = 1 << 5;
        /// An operation was attempted on a closed handle
        const CLOSED = 1 << 6;
        /// A mkdir failed
        const MKDIR = 1 << 7;
    }
}
