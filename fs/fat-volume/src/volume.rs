// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The volume operations facade.

use alloc::sync::Arc;
use core::fmt::Write;

use fat_entry::{BlockDevice, DirHandle, Engine, ErrorBits, LsFlags, OpenFlags};
use spin::Mutex;

use crate::{
    FsError, FsResult,
    ls::list_dir,
    path::Path,
    registry::{CURRENT_VOLUME, SharedVolume, VolumeRegistry},
    resolver::PathResolver,
    working_dir::WorkingDir,
};

/// One mounted FAT volume.
///
/// A volume owns its entry engine, a path resolver and the working
/// directory cursor. Every operation opens the handles it needs and
/// releases them before returning; only the cursor persists across
/// calls. Access is single-threaded by design: the lock in
/// [`SharedVolume`] makes the shared storage sound, it does not make
/// concurrent operation sequences against one volume meaningful.
pub struct Volume {
    engine: Engine,
    resolver: PathResolver,
    vwd: WorkingDir,
}

impl Volume {
    /// Activates a volume on `partition` of `device` and registers it in
    /// the process-wide [`CURRENT_VOLUME`] slot if `set_current` is true
    /// or no volume has ever been registered.
    pub fn begin(
        engine: Engine,
        device: BlockDevice,
        set_current: bool,
        partition: u8,
    ) -> FsResult<SharedVolume> {
        Self::begin_in(&CURRENT_VOLUME, engine, device, set_current, partition)
    }

    /// [`Volume::begin`] against an explicit registry.
    pub fn begin_in(
        registry: &VolumeRegistry,
        engine: Engine,
        device: BlockDevice,
        set_current: bool,
        partition: u8,
    ) -> FsResult<SharedVolume> {
        engine.init(device, partition)?;
        info!("volume activated: {} (partition {partition})", engine.name());
        let resolver = PathResolver::new(engine.clone());
        let vwd = WorkingDir::open_root(&resolver)?;
        let volume = Arc::new(Mutex::new(Self {
            engine,
            resolver,
            vwd,
        }));
        if set_current {
            registry.claim(&volume);
        } else {
            registry.claim_if_empty(&volume);
        }
        Ok(volume)
    }

    /// The entry engine backing this volume.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The path resolver of this volume.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    // ========== Working directory ==========

    /// Sets the working directory to the volume root. The previous
    /// cursor handle is closed first.
    pub fn chdir_root(&mut self) -> FsResult<()> {
        self.vwd.reset(&self.resolver)
    }

    /// Sets the working directory to `path`, resolved against the
    /// current cursor. On failure the cursor is unchanged.
    pub fn chdir(&mut self, path: impl AsRef<Path>) -> FsResult<()> {
        let new = self
            .resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::READ)?;
        self.vwd.replace(new)
    }

    /// The working directory cursor handle.
    pub fn vwd(&self) -> &DirHandle {
        self.vwd.handle()
    }

    /// Sets the working directory's stream position to zero.
    pub fn vwd_rewind(&mut self) {
        self.vwd.handle_mut().rewind();
    }

    /// The working directory's current stream position.
    pub fn vwd_position(&self) -> u32 {
        self.vwd.handle().cur_position()
    }

    /// Sets the working directory's stream position.
    pub fn vwd_seek_set(&mut self, pos: u32) -> FsResult<()> {
        self.vwd.handle_mut().seek_set(pos)
    }

    /// Opens the next entry of the working directory, advancing the
    /// cursor's stream position. `Ok(None)` at end of directory.
    pub fn vwd_open_next(&mut self, flags: OpenFlags) -> FsResult<Option<DirHandle>> {
        self.vwd.handle_mut().open_next(flags)
    }

    /// Accumulated error bits of the cursor handle.
    pub fn vwd_error(&self) -> ErrorBits {
        self.vwd.error()
    }

    /// Removes the working directory if it is empty, then resets the
    /// cursor to the volume root.
    pub fn vwd_rmdir(&mut self) -> FsResult<()> {
        self.vwd.handle_mut().rmdir()?;
        self.chdir_root()
    }

    /// Recursively deletes the contents of the working directory, like
    /// `rm -rf *`: entries are removed in on-disk order, depth-first,
    /// ignoring the read-only attribute. If the working directory is
    /// not the volume root it is removed last, and on success the
    /// cursor is reset to the root.
    ///
    /// Not transactional: a failing nested removal aborts the walk with
    /// an error, but everything already removed stays removed.
    pub fn rm_rf_star(&mut self) -> FsResult<()> {
        if let Err(err) = remove_all(self.vwd.handle_mut()) {
            warn!("recursive delete aborted: {err}");
            return Err(err);
        }
        if !self.vwd.handle().is_root() {
            self.vwd.handle_mut().rmdir()?;
        }
        self.chdir_root()
    }

    // ========== Root-based operations ==========

    /// Tests for the existence of `path`. Any resolution failure counts
    /// as "does not exist".
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolver
            .resolve_from_root(path.as_ref(), OpenFlags::READ)
            .is_ok()
    }

    /// Lists the contents of the directory at `path` to `out`.
    pub fn ls<W: Write>(&self, out: &mut W, path: impl AsRef<Path>, flags: LsFlags) -> FsResult<()> {
        let mut dir = self
            .resolver
            .resolve_from_root(path.as_ref(), OpenFlags::READ)?;
        if !dir.is_dir() {
            return Err(FsError::NotADirectory);
        }
        list_dir(&mut dir, out, flags, 0)
    }

    /// Lists the contents of the volume root directory to `out`.
    pub fn ls_root<W: Write>(&self, out: &mut W, flags: LsFlags) -> FsResult<()> {
        let mut root = self.resolver.open_root()?;
        list_dir(&mut root, out, flags, 0)
    }

    /// Creates the directory at `path`. With `create_parents`, missing
    /// intermediate directories are created too. Fails with
    /// [`FsError::AlreadyExists`] if the final component exists as
    /// anything.
    pub fn mkdir(&self, path: impl AsRef<Path>, create_parents: bool) -> FsResult<()> {
        let (mut parent, name) = self
            .resolver
            .resolve_parent_from_root(path.as_ref(), create_parents)?;
        parent.mkdir(name)?;
        Ok(())
    }

    /// Opens the entry at `path` and returns its handle. The handle
    /// keeps reporting sub-operation failures through
    /// [`DirHandle::error`] after this call.
    pub fn open(&self, path: impl AsRef<Path>, flags: OpenFlags) -> FsResult<DirHandle> {
        self.resolver.resolve_from_root(path.as_ref(), flags)
    }

    /// Removes the file at `path`, unlinking its directory entry and
    /// freeing its data clusters.
    ///
    /// The file must not be open elsewhere; removing an entry another
    /// handle still references can corrupt the volume and is not
    /// detected here.
    pub fn remove(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let mut entry = self
            .resolver
            .resolve_from_root(path.as_ref(), OpenFlags::WRITE)?;
        if entry.is_dir() {
            return Err(FsError::IsADirectory);
        }
        entry.remove()
    }

    /// Removes the directory at `path` if it is empty.
    pub fn rmdir(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let mut dir = self
            .resolver
            .resolve_from_root(path.as_ref(), OpenFlags::READ)?;
        if !dir.is_dir() {
            return Err(FsError::NotADirectory);
        }
        dir.rmdir()
    }

    /// Truncates the file at `path` to `length` bytes and leaves the
    /// file position at the new end.
    pub fn truncate(&self, path: impl AsRef<Path>, length: u32) -> FsResult<()> {
        let mut file = self
            .resolver
            .resolve_from_root(path.as_ref(), OpenFlags::WRITE)?;
        if file.is_dir() {
            return Err(FsError::IsADirectory);
        }
        file.truncate(length)?;
        file.seek_set(length)
    }

    // ========== Cursor-based operations ==========

    /// Renames (or moves) `old` to `new`, both resolved against the
    /// working directory. `new` must not already exist.
    ///
    /// The entry to be renamed must not be open elsewhere: the
    /// directory entry may move, and a handle opened before this call
    /// would then reference stale on-disk state.
    pub fn rename(&self, old: impl AsRef<Path>, new: impl AsRef<Path>) -> FsResult<()> {
        let (mut dst_dir, new_name) =
            self.resolver
                .resolve_parent(self.vwd.handle(), new.as_ref(), false)?;
        if dst_dir.open(new_name, OpenFlags::READ).is_ok() {
            return Err(FsError::AlreadyExists);
        }
        dst_dir.clear_error();
        let mut entry = self
            .resolver
            .resolve(self.vwd.handle(), old.as_ref(), OpenFlags::READ)?;
        entry.rename(&dst_dir, new_name)
    }

    /// Tests for the existence of `path` relative to the working
    /// directory.
    pub fn rel_exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::READ)
            .is_ok()
    }

    /// Removes the file at `path`, resolved against the working
    /// directory. See [`Volume::remove`] for the caller obligations.
    pub fn rel_remove(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let mut entry = self
            .resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::WRITE)?;
        if entry.is_dir() {
            return Err(FsError::IsADirectory);
        }
        entry.remove()
    }

    /// Removes the empty directory at `path`, resolved against the
    /// working directory.
    pub fn rel_rmdir(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let mut dir = self
            .resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::READ)?;
        if !dir.is_dir() {
            return Err(FsError::NotADirectory);
        }
        dir.rmdir()
    }

    /// `true` if `path` (relative to the working directory) resolves to
    /// a directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::READ)
            .map(|h| h.is_dir())
            .unwrap_or(false)
    }

    /// `true` if `path` (relative to the working directory) resolves to
    /// a regular file.
    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        self.resolver
            .resolve(self.vwd.handle(), path.as_ref(), OpenFlags::READ)
            .map(|h| h.is_file())
            .unwrap_or(false)
    }
}

/// Removes every entry under `dir`, depth-first in on-disk order.
fn remove_all(dir: &mut DirHandle) -> FsResult<()> {
    dir.rewind();
    while let Some(mut entry) = dir.open_next(OpenFlags::READ)? {
        if entry.is_dir() {
            remove_all(&mut entry)?;
            entry.rmdir()?;
        } else {
            entry.remove()?;
        }
    }
    Ok(())
}

/// Makes `volume` the current volume in [`CURRENT_VOLUME`].
pub fn chvol(volume: &SharedVolume) {
    CURRENT_VOLUME.claim(volume);
}

/// Makes `volume` the current volume in an explicit registry.
pub fn chvol_in(registry: &VolumeRegistry, volume: &SharedVolume) {
    registry.claim(volume);
}

impl core::fmt::Debug for Volume {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Volume")
            .field("engine", &self.engine)
            .field("vwd", &self.vwd)
            .finish()
    }
}
