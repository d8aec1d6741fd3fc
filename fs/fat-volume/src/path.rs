// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Path strings and component iteration.
//!
//! A path is a sequence of UTF-8 segments separated by `/`. Consecutive
//! separators collapse, so `//a///b` and `/a/b` name the same entry. A
//! leading separator makes the path *rooted*: resolution starts at the
//! volume root regardless of the base the caller supplies.

/// Directory separator.
pub const SEPARATOR: char = '/';

/// The current-directory component.
pub const DOT: &str = ".";

/// The parent-directory component.
pub const DOTDOT: &str = "..";

/// A borrowed path slice, analogous to `str`.
#[derive(Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

impl Path {
    /// Wrap a string slice as a path slice.
    pub fn new<S: AsRef<str> + ?Sized>(s: &S) -> &Path {
        // SAFETY: Path is a repr(transparent) wrapper around str.
        unsafe { &*(s.as_ref() as *const str as *const Path) }
    }

    /// The underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// `true` if the path begins at the volume root.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with(SEPARATOR)
    }

    /// `true` if the path has no components, i.e. it names the base
    /// itself (`""`, `"/"`, `"///"`).
    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Iterate the path components left to right, skipping empty
    /// segments. `.` and `..` are yielded like any other component.
    pub fn components(&self) -> Components<'_> {
        Components { rest: &self.inner }
    }

    /// The final component, if it names an entry (`None` for an empty
    /// path or one ending in `.` or `..`).
    pub fn file_name(&self) -> Option<&str> {
        match self.components().next_back() {
            Some(name) if name != DOT && name != DOTDOT => Some(name),
            _ => None,
        }
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<Path> for alloc::string::String {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

/// Double-ended iterator over the non-empty segments of a [`Path`].
#[derive(Debug, Clone)]
pub struct Components<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Components<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.rest = self.rest.trim_start_matches(SEPARATOR);
        if self.rest.is_empty() {
            return None;
        }
        let (head, tail) = match self.rest.find(SEPARATOR) {
            Some(idx) => self.rest.split_at(idx),
            None => (self.rest, ""),
        };
        self.rest = tail;
        Some(head)
    }
}

impl DoubleEndedIterator for Components<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.rest = self.rest.trim_end_matches(SEPARATOR);
        if self.rest.is_empty() {
            return None;
        }
        let (head, tail) = match self.rest.rfind(SEPARATOR) {
            Some(idx) => (&self.rest[..idx], &self.rest[idx + 1..]),
            None => ("", self.rest),
        };
        self.rest = head;
        Some(tail)
    }
}
