// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error type shared by the entry engine and the volume layer.

/// Possible errors when operating on directory entries or the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryError {
    /// A path component does not exist
    NotFound,
    /// An intermediate path component is not a directory
    NotADirectory,
    /// The operation targets a directory but requires a file
    IsADirectory,
    /// The target entry already exists
    AlreadyExists,
    /// The directory is not empty
    DirectoryNotEmpty,
    /// The path is empty where a name is required, or otherwise malformed
    InvalidPath,
    /// Write access to a read-only entry was requested
    ReadOnly,
    /// The handle has been closed
    Closed,
    /// The requested partition does not exist on the device
    BadPartition,
    /// The block device reported an error
    Io,
}

impl core::fmt::Display for EntryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EntryError::NotFound => write!(f, "entry not found"),
            EntryError::NotADirectory => write!(f, "not a directory"),
            EntryError::IsADirectory => write!(f, "is a directory"),
            EntryError::AlreadyExists => write!(f, "entry already exists"),
            EntryError::DirectoryNotEmpty => write!(f, "directory not empty"),
            EntryError::InvalidPath => write!(f, "invalid path"),
            EntryError::ReadOnly => write!(f, "entry is read-only"),
            EntryError::Closed => write!(f, "handle is closed"),
            EntryError::BadPartition => write!(f, "no such partition"),
            EntryError::Io => write!(f, "block device error"),
        }
    }
}

/// Convenience type alias for Result with EntryError
pub type EntryResult<T> = core::result::Result<T, EntryError>;
