// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Unit tests for volume operations and the current-volume registry

#![cfg(test)]


use fat_entry::{ErrorBits, LsFlags, OpenFlags};
use fat_volume::{FsError, Volume, VolumeRegistry, chvol_in, current_volume};
use test_helpers::*;

// ========== Activation Tests ==========

#[test]
fn test_begin_bad_partition() {
    init_logger();
    let raw = RamEngine::new();
    let registry = VolumeRegistry::new();

    let result = Volume::begin_in(
        &registry,
        fat_entry::Engine::new(raw),
        ram_device(),
        true,
        9,
    );

    assert!(matches!(result, Err(FsError::BadPartition)));
    assert!(registry.current().is_none());
}

#[test]
fn test_begin_starts_at_root() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(vol.vwd().is_root());
    assert_eq!(vol.engine().name(), "ramfat");
}

// ========== Registry Tests ==========

#[test]
fn test_first_volume_becomes_current() {
    init_logger();
    let registry = VolumeRegistry::new();
    let (engine, _raw) = setup_engine();

    // Even with set_current false, the first volume fills the slot
    let volume = Volume::begin_in(&registry, engine, ram_device(), false, 1).unwrap();

    let current = registry.current().expect("registry slot empty");
    assert!(alloc_ptr_eq(&current, &volume));
}

#[test]
fn test_second_volume_does_not_steal_slot() {
    init_logger();
    let registry = VolumeRegistry::new();
    let (engine_a, _raw_a) = setup_engine();
    let (engine_b, _raw_b) = setup_engine();

    let first = Volume::begin_in(&registry, engine_a, ram_device(), true, 1).unwrap();
    let second = Volume::begin_in(&registry, engine_b, ram_device(), false, 1).unwrap();

    let current = registry.current().expect("registry slot empty");
    assert!(alloc_ptr_eq(&current, &first));
    assert!(!alloc_ptr_eq(&current, &second));
}

#[test]
fn test_set_current_overrides_slot() {
    init_logger();
    let registry = VolumeRegistry::new();
    let (engine_a, _raw_a) = setup_engine();
    let (engine_b, _raw_b) = setup_engine();

    let _first = Volume::begin_in(&registry, engine_a, ram_device(), true, 1).unwrap();
    let second = Volume::begin_in(&registry, engine_b, ram_device(), true, 1).unwrap();

    let current = registry.current().expect("registry slot empty");
    assert!(alloc_ptr_eq(&current, &second));
}

#[test]
fn test_chvol_and_release() {
    init_logger();
    let registry = VolumeRegistry::new();
    let (engine_a, _raw_a) = setup_engine();
    let (engine_b, _raw_b) = setup_engine();

    let first = Volume::begin_in(&registry, engine_a, ram_device(), true, 1).unwrap();
    let second = Volume::begin_in(&registry, engine_b, ram_device(), false, 1).unwrap();

    chvol_in(&registry, &second);
    assert!(alloc_ptr_eq(&registry.current().unwrap(), &second));

    chvol_in(&registry, &first);
    assert!(alloc_ptr_eq(&registry.current().unwrap(), &first));

    registry.release();
    assert!(registry.current().is_none());
}

#[test]
fn test_global_registry() {
    init_logger();
    let (engine, _raw) = setup_engine();

    // The only test touching the process-wide slot.
    let volume = Volume::begin(engine, ram_device(), true, 1).unwrap();

    let current = current_volume().expect("global slot empty");
    assert!(alloc_ptr_eq(&current, &volume));
}

fn alloc_ptr_eq(a: &fat_volume::SharedVolume, b: &fat_volume::SharedVolume) -> bool {
    std::sync::Arc::ptr_eq(a, b)
}

// ========== Existence and Type Queries ==========

#[test]
fn test_exists() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(vol.exists("/short.txt"));
    assert!(vol.exists("/a/b/deep.txt"));
    assert!(vol.exists("/"));
    assert!(!vol.exists("/missing.txt"));
    assert!(!vol.exists("/short.txt/below"));
}

#[test]
fn test_exists_is_always_root_based() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    // exists() ignores the cursor; rel_exists() uses it
    assert!(!vol.exists("file.txt"));
    assert!(vol.rel_exists("file.txt"));
}

#[test]
fn test_is_dir_is_file() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(vol.is_dir("a"));
    assert!(!vol.is_file("a"));
    assert!(vol.is_file("short.txt"));
    assert!(!vol.is_dir("short.txt"));
    assert!(!vol.is_dir("missing"));
    assert!(!vol.is_file("missing"));
}

// ========== Open, Read, Write ==========

#[test]
fn test_open_and_read() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut file = vol.open("/short.txt", OpenFlags::READ).unwrap();

    let mut buf = [0u8; 32];
    let n = file.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello world");
}

#[test]
fn test_open_missing_without_create() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let result = vol.open("/nope.txt", OpenFlags::READ);

    assert!(matches!(result, Err(FsError::NotFound)));
}

#[test]
fn test_open_create_and_write() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let flags = OpenFlags::READ | OpenFlags::WRITE | OpenFlags::CREATE;
    let mut file = vol.open("/new.txt", flags).unwrap();
    file.write(b"payload").unwrap();
    drop(file);

    assert!(vol.exists("/new.txt"));
    let mut file = vol.open("/new.txt", OpenFlags::READ).unwrap();
    let mut buf = [0u8; 16];
    let n = file.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"payload");
}

#[test]
fn test_handle_error_bits_are_sticky() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut dir = vol.open("/a", OpenFlags::READ).unwrap();
    assert!(dir.error().is_empty());

    // Reading a directory fails and leaves the READ bit set
    let mut buf = [0u8; 8];
    assert!(matches!(dir.read(&mut buf), Err(FsError::IsADirectory)));
    assert!(dir.error().contains(ErrorBits::READ));

    // A later successful operation does not clear it
    assert!(dir.metadata().is_ok());
    assert!(dir.error().contains(ErrorBits::READ));

    dir.clear_error();
    assert!(dir.error().is_empty());
}

// ========== mkdir Tests ==========

#[test]
fn test_mkdir() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.mkdir("/c", false).unwrap();

    assert!(vol.is_dir("c"));
}

#[test]
fn test_mkdir_existing_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(matches!(vol.mkdir("/a", false), Err(FsError::AlreadyExists)));
    assert!(matches!(
        vol.mkdir("/short.txt", false),
        Err(FsError::AlreadyExists)
    ));
}

#[test]
fn test_mkdir_missing_parents() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let result = vol.mkdir("/x/y/z", false);

    assert!(matches!(result, Err(FsError::NotFound)));
    assert!(!vol.exists("/x"));
}

#[test]
fn test_mkdir_create_parents() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.mkdir("/x/y/z", true).unwrap();

    assert!(vol.is_dir("x"));
    assert!(vol.is_dir("x/y"));
    assert!(vol.is_dir("x/y/z"));
}

// ========== remove Tests ==========

#[test]
fn test_remove_file() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.remove("/short.txt").unwrap();

    assert!(!vol.exists("/short.txt"));
}

#[test]
fn test_remove_directory_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(matches!(vol.remove("/a"), Err(FsError::IsADirectory)));
    assert!(vol.exists("/a"));
}

#[test]
fn test_remove_read_only_fails() {
    let (volume, raw) = setup_volume();
    raw.set_read_only("short.txt");
    let vol = volume.lock();

    assert!(matches!(vol.remove("/short.txt"), Err(FsError::ReadOnly)));
    assert!(vol.exists("/short.txt"));
}

#[test]
fn test_rel_remove() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    vol.rel_remove("file.txt").unwrap();

    assert!(!vol.exists("/a/file.txt"));
    assert!(matches!(vol.rel_remove("b"), Err(FsError::IsADirectory)));
}

// ========== rmdir Tests ==========

#[test]
fn test_rmdir_non_empty_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let result = vol.rmdir("/a");

    assert!(matches!(result, Err(FsError::DirectoryNotEmpty)));
    assert!(vol.exists("/a/file.txt"));
}

#[test]
fn test_rmdir_empty_succeeds() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();
    vol.mkdir("/empty", false).unwrap();

    vol.rmdir("/empty").unwrap();

    assert!(!vol.exists("/empty"));
}

#[test]
fn test_rmdir_on_file_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(matches!(
        vol.rmdir("/short.txt"),
        Err(FsError::NotADirectory)
    ));
}

#[test]
fn test_rel_rmdir() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.mkdir("/a/empty", false).unwrap();
    vol.chdir("a").unwrap();

    vol.rel_rmdir("empty").unwrap();

    assert!(!vol.exists("/a/empty"));
}

// ========== truncate Tests ==========

#[test]
fn test_truncate_to_zero() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.truncate("/short.txt", 0).unwrap();

    let mut file = vol.open("/short.txt", OpenFlags::READ).unwrap();
    assert_eq!(file.size(), 0);
    assert_eq!(file.cur_position(), 0);
    let mut buf = [0u8; 8];
    assert_eq!(file.read(&mut buf).unwrap(), 0);
}

#[test]
fn test_truncate_shortens() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.truncate("/short.txt", 5).unwrap();

    let mut file = vol.open("/short.txt", OpenFlags::READ).unwrap();
    let mut buf = [0u8; 16];
    let n = file.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello");
}

#[test]
fn test_truncate_directory_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(matches!(vol.truncate("/a", 0), Err(FsError::IsADirectory)));
}

// ========== rename Tests ==========

#[test]
fn test_rename_file() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.rename("short.txt", "renamed.txt").unwrap();

    assert!(!vol.exists("/short.txt"));
    assert!(vol.exists("/renamed.txt"));
    let mut file = vol.open("/renamed.txt", OpenFlags::READ).unwrap();
    let mut buf = [0u8; 16];
    let n = file.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello world");
}

#[test]
fn test_rename_to_existing_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let result = vol.rename("short.txt", "a");

    assert!(matches!(result, Err(FsError::AlreadyExists)));
    assert!(vol.exists("/short.txt"));
}

#[test]
fn test_rename_moves_into_subdir() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    vol.rename("short.txt", "a/moved.txt").unwrap();

    assert!(!vol.exists("/short.txt"));
    assert!(vol.exists("/a/moved.txt"));
}

#[test]
fn test_rename_resolves_from_cursor() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    vol.rename("file.txt", "renamed.txt").unwrap();

    assert!(vol.exists("/a/renamed.txt"));
    assert!(!vol.exists("/a/file.txt"));
}

#[test]
fn test_rename_missing_source() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    assert!(matches!(
        vol.rename("ghost.txt", "other.txt"),
        Err(FsError::NotFound)
    ));
}

// ========== ls Tests ==========

#[test]
fn test_ls_plain() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    vol.ls_root(&mut out, LsFlags::empty()).unwrap();

    // On-disk (insertion) order, directories marked with a slash
    assert_eq!(out, "short.txt\na/\n");
}

#[test]
fn test_ls_size() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    vol.ls_root(&mut out, LsFlags::SIZE).unwrap();

    assert_eq!(out, "        11 short.txt\n           a/\n");
}

#[test]
fn test_ls_date() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    vol.ls(&mut out, "/a/b", LsFlags::DATE).unwrap();

    assert_eq!(out, "2024-05-01 12:30 deep.txt\n");
}

#[test]
fn test_ls_recursive() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    vol.ls_root(&mut out, LsFlags::RECURSIVE).unwrap();

    // Pre-order walk, two spaces of indent per level
    assert_eq!(
        out,
        "short.txt\na/\n  file.txt\n  b/\n    deep.txt\n"
    );
}

#[test]
fn test_ls_subdirectory_path() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    vol.ls(&mut out, "/a", LsFlags::empty()).unwrap();

    assert_eq!(out, "file.txt\nb/\n");
}

#[test]
fn test_ls_on_file_fails() {
    let (volume, _raw) = setup_volume();
    let vol = volume.lock();

    let mut out = String::new();
    let result = vol.ls(&mut out, "/short.txt", LsFlags::empty());

    assert!(matches!(result, Err(FsError::NotADirectory)));
}

// ========== Working Directory Stream Tests ==========

#[test]
fn test_vwd_open_next_iterates_in_order() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    let mut names = Vec::new();
    while let Some(entry) = vol.vwd_open_next(OpenFlags::READ).unwrap() {
        names.push(entry.name().to_owned());
    }

    assert_eq!(names, ["file.txt", "b"]);
    assert!(vol.vwd_error().is_empty());
}

#[test]
fn test_vwd_rewind_restarts_stream() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();

    let first = vol.vwd_open_next(OpenFlags::READ).unwrap().unwrap();
    assert_eq!(first.name(), "short.txt");
    assert!(vol.vwd_position() > 0);

    vol.vwd_rewind();
    assert_eq!(vol.vwd_position(), 0);
    let again = vol.vwd_open_next(OpenFlags::READ).unwrap().unwrap();
    assert_eq!(again.name(), "short.txt");
}

#[test]
fn test_vwd_seek_set() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();

    vol.vwd_seek_set(1).unwrap();

    let entry = vol.vwd_open_next(OpenFlags::READ).unwrap().unwrap();
    assert_eq!(entry.name(), "a");
}

#[test]
fn test_vwd_rmdir_empty() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.mkdir("/empty", false).unwrap();
    vol.chdir("empty").unwrap();

    vol.vwd_rmdir().unwrap();

    assert!(vol.vwd().is_root());
    assert!(!vol.exists("/empty"));
}

#[test]
fn test_vwd_rmdir_non_empty_keeps_cursor() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    let result = vol.vwd_rmdir();

    assert!(matches!(result, Err(FsError::DirectoryNotEmpty)));
    assert_eq!(vol.vwd().name(), "a");
    assert!(vol.exists("/a"));
}

// ========== Recursive Delete Tests ==========

#[test]
fn test_rm_rf_star_at_root() {
    let (volume, raw) = setup_volume();
    // The read-only attribute does not protect against recursive delete
    raw.set_read_only("a/file.txt");
    let mut vol = volume.lock();

    vol.rm_rf_star().unwrap();

    assert!(!vol.exists("/short.txt"));
    assert!(!vol.exists("/a"));
    assert!(vol.vwd().is_root());
    let mut out = String::new();
    vol.ls_root(&mut out, LsFlags::empty()).unwrap();
    assert_eq!(out, "");
}

#[test]
fn test_rm_rf_star_removes_non_root_cursor() {
    let (volume, _raw) = setup_volume();
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    vol.rm_rf_star().unwrap();

    assert!(!vol.exists("/a"));
    assert!(vol.exists("/short.txt"));
    assert!(vol.vwd().is_root());
}

#[test]
fn test_rm_rf_star_partial_failure() {
    let (volume, raw) = setup_volume();
    raw.seal("a/b/deep.txt");
    let mut vol = volume.lock();
    vol.chdir("a").unwrap();

    let result = vol.rm_rf_star();

    assert!(matches!(result, Err(FsError::Io)));
    // The walk is not transactional: entries removed before the
    // failure stay removed.
    assert!(!vol.exists("/a/file.txt"));
    assert!(vol.exists("/a/b/deep.txt"));
    assert!(vol.exists("/short.txt"));
    // The cursor is only reset on success
    assert_eq!(vol.vwd().name(), "a");
}
