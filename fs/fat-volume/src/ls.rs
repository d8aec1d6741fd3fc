// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Directory listing to a text sink.

use chrono::{Datelike, Timelike};
use core::fmt::Write;

use fat_entry::{DirHandle, LsFlags, OpenFlags};

use crate::{FsError, FsResult};

/// Streams the entries of `dir` to `out` in on-disk order.
///
/// With [`LsFlags::RECURSIVE`], descends fully into each subdirectory
/// before continuing with its siblings (pre-order, depth-first), with
/// two spaces of indentation per level. Entries are never sorted.
pub(crate) fn list_dir<W: Write>(
    dir: &mut DirHandle,
    out: &mut W,
    flags: LsFlags,
    depth: usize,
) -> FsResult<()> {
    dir.rewind();
    while let Some(mut entry) = dir.open_next(OpenFlags::READ)? {
        let meta = entry.metadata()?;
        for _ in 0..depth {
            write_str(out, "  ")?;
        }
        if flags.contains(LsFlags::DATE) {
            match meta.modified {
                Some(t) => write_fmt(
                    out,
                    format_args!(
                        "{:04}-{:02}-{:02} {:02}:{:02} ",
                        t.year(),
                        t.month(),
                        t.day(),
                        t.hour(),
                        t.minute()
                    ),
                )?,
                None => write_str(out, "                 ")?,
            }
        }
        if flags.contains(LsFlags::SIZE) {
            if entry.is_file() {
                write_fmt(out, format_args!("{:>10} ", meta.size))?;
            } else {
                write_str(out, "           ")?;
            }
        }
        write_str(out, entry.name())?;
        if entry.is_dir() {
            write_str(out, "/")?;
        }
        write_str(out, "\n")?;
        if entry.is_dir() && flags.contains(LsFlags::RECURSIVE) {
            list_dir(&mut entry, out, flags, depth + 1)?;
        }
    }
    Ok(())
}

fn write_str<W: Write>(out: &mut W, s: &str) -> FsResult<()> {
    out.write_str(s).map_err(|_| FsError::Io)
}

fn write_fmt<W: Write>(out: &mut W, args: core::fmt::Arguments<'_>) -> FsResult<()> {
    out.write_fmt(args).map_err(|_| FsError::Io)
}
