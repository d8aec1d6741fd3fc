// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Path resolution.
//!
//! Resolution turns a path string into an open [`DirHandle`] by walking
//! the components strictly left to right, one engine open per component.
//! Intermediate components are opened read-only and must be directories;
//! the caller's flags apply only to the final component. A rooted path
//! (leading separator) starts the walk at the volume root no matter what
//! base was supplied; an empty path yields a handle equivalent to the
//! base itself.

use fat_entry::{DirHandle, Engine, OpenFlags};

use crate::{
    FsError, FsResult,
    path::{DOT, DOTDOT, Path},
};

/// Resolves paths against a single volume's entry engine.
#[derive(Clone)]
pub struct PathResolver {
    engine: Engine,
}

impl PathResolver {
    /// Creates a resolver for the given engine.
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Opens a fresh handle to the volume root directory.
    pub fn open_root(&self) -> FsResult<DirHandle> {
        self.engine.open_root()
    }

    /// Resolves `path` against `base` and returns an open handle to the
    /// final component.
    pub fn resolve(&self, base: &DirHandle, path: &Path, flags: OpenFlags) -> FsResult<DirHandle> {
        trace!("resolve {:?} (flags {:?})", path.as_str(), flags);
        let mut cur = self.start(base, path)?;
        let mut components = path.components().peekable();
        while let Some(name) = components.next() {
            let is_last = components.peek().is_none();
            if name == DOT {
                continue;
            }
            if name == DOTDOT {
                // Never above the volume root.
                if !cur.is_root() {
                    cur = cur.open(DOTDOT, OpenFlags::READ)?;
                }
                continue;
            }
            let child_flags = if is_last { flags } else { OpenFlags::READ };
            let create_dir = !is_last && flags.contains(OpenFlags::CREATE_PARENTS);
            let next = self.open_component(&mut cur, name, child_flags, create_dir)?;
            if !is_last && !next.is_dir() {
                debug!("resolve: {name:?} is not a directory");
                return Err(FsError::NotADirectory);
            }
            cur = next;
        }
        Ok(cur)
    }

    /// Resolves `path` from the volume root, ignoring any base.
    pub fn resolve_from_root(&self, path: &Path, flags: OpenFlags) -> FsResult<DirHandle> {
        let root = self.open_root()?;
        self.resolve(&root, path, flags)
    }

    /// Resolves all but the last component of `path` and returns the
    /// parent directory handle together with the final name.
    ///
    /// With `create_parents`, missing intermediate directories are
    /// created on the way down. Fails with [`FsError::InvalidPath`] if
    /// the path has no final name (empty, or ending in `.`/`..`).
    pub fn resolve_parent<'p>(
        &self,
        base: &DirHandle,
        path: &'p Path,
        create_parents: bool,
    ) -> FsResult<(DirHandle, &'p str)> {
        let name = path.file_name().ok_or(FsError::InvalidPath)?;
        let mut components = path.components();
        components.next_back();

        let mut cur = self.start(base, path)?;
        for comp in components {
            if comp == DOT {
                continue;
            }
            if comp == DOTDOT {
                if !cur.is_root() {
                    cur = cur.open(DOTDOT, OpenFlags::READ)?;
                }
                continue;
            }
            let next = self.open_component(&mut cur, comp, OpenFlags::READ, create_parents)?;
            if !next.is_dir() {
                return Err(FsError::NotADirectory);
            }
            cur = next;
        }
        if !cur.is_dir() {
            return Err(FsError::NotADirectory);
        }
        Ok((cur, name))
    }

    /// [`PathResolver::resolve_parent`] with the volume root as base.
    pub fn resolve_parent_from_root<'p>(
        &self,
        path: &'p Path,
        create_parents: bool,
    ) -> FsResult<(DirHandle, &'p str)> {
        let root = self.open_root()?;
        self.resolve_parent(&root, path, create_parents)
    }

    /// Effective base of a walk: the root for rooted paths, a reopen of
    /// the caller's base otherwise.
    fn start(&self, base: &DirHandle, path: &Path) -> FsResult<DirHandle> {
        if path.is_absolute() {
            self.open_root()
        } else {
            base.reopen()
        }
    }

    fn open_component(
        &self,
        dir: &mut DirHandle,
        name: &str,
        flags: OpenFlags,
        create_dir: bool,
    ) -> FsResult<DirHandle> {
        if !dir.is_dir() {
            return Err(FsError::NotADirectory);
        }
        match dir.open(name, flags) {
            Err(FsError::NotFound) if create_dir => {
                debug!("resolve: creating missing directory {name:?}");
                dir.mkdir(name)
            }
            other => other,
        }
    }
}

impl core::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PathResolver")
            .field("engine", &self.engine)
            .finish()
    }
}
