//! End-to-end tests: resolve a base path, build a real zip archive and
//! assemble it behind a stub, then read everything back.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use sfxpack_core::{assemble, build, resolve, ArchiveBuilder, Asset, Error};
use tempfile::TempDir;

const STUB: &[u8] = b"MZ\x90\x00 not really a stub";
const CONFIG: &[u8] = b"title=project\nextract-to=.\n";

/// Lays out a small tree under `<tmp>/project` and returns it.
fn fixture() -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");

    let files: &[(&str, &[u8])] = &[
        ("README.md", b"# project\n"),
        ("bin/run.sh", b"#!/bin/sh\necho hi\n"),
        ("lib/a/empty.txt", b""),
        ("lib/a/data.bin", &[0u8, 1, 2, 3, 255]),
        ("lib/b.txt", b"bee"),
    ];

    for (name, content) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    fs::create_dir_all(root.join("lib/nothing/here")).unwrap();

    (temp, root)
}

fn read_entries(archive: &Path) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut content = vec![];
            entry.read_to_end(&mut content).unwrap();
            (entry.name().to_string(), content)
        })
        .collect()
}

#[test]
fn archive_contains_every_regular_file() {
    let (temp, root) = fixture();
    let base = resolve(&root, None).unwrap();
    let archive = temp.path().join("project.zip");

    let summary = build(&root, &base, &archive).unwrap();
    assert_eq!(summary.entries, 5);
    assert_eq!(summary.path, archive);

    let entries = read_entries(&archive);
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        [
            "README.md",
            "bin/run.sh",
            "lib/a/data.bin",
            "lib/a/empty.txt",
            "lib/b.txt"
        ]
    );
    assert!(names.iter().all(|n| !n.starts_with('/') && !n.contains('\\')));
}

#[test]
fn archive_round_trips_bytes() {
    let (temp, root) = fixture();
    let big: Vec<u8> = (0..100_000u32).flat_map(|i| i.to_le_bytes()).collect();
    fs::write(root.join("big.bin"), &big).unwrap();

    let base = resolve(&root, None).unwrap();
    let archive = temp.path().join("project.zip");
    let summary = build(&root, &base, &archive).unwrap();

    for (name, content) in read_entries(&archive) {
        assert_eq!(content, fs::read(root.join(&name)).unwrap(), "{}", name);
    }
    assert_eq!(summary.bytes, 10 + 18 + 5 + 3 + big.len() as u64);
}

#[test]
fn working_directory_roots_entries_above_input() {
    let (temp, root) = fixture();
    let base = resolve(&root, Some(temp.path())).unwrap();
    let archive = temp.path().join("out.zip");

    build(&root, &base, &archive).unwrap();

    let entries = read_entries(&archive);
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|(n, _)| n.starts_with("project/")));
    assert!(entries.iter().any(|(n, _)| n == "project/lib/b.txt"));
}

#[test]
fn identical_trees_give_identical_archives() {
    let (temp, root) = fixture();
    let base = resolve(&root, None).unwrap();
    let first = temp.path().join("first.zip");
    let second = temp.path().join("second.zip");

    build(&root, &base, &first).unwrap();
    build(&root, &base, &second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn archive_inside_input_tree_does_not_include_itself() {
    let (_temp, root) = fixture();
    let base = resolve(&root, None).unwrap();
    let archive = root.join("project.zip");

    build(&root, &base, &archive).unwrap();
    // Rebuilding over the previous archive must skip it too.
    ArchiveBuilder::new(&base)
        .exclude(&archive)
        .build(&root, &archive)
        .unwrap();

    let entries = read_entries(&archive);
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|(n, _)| !n.ends_with(".zip") && !n.ends_with(".tmp")));
}

#[test]
fn missing_directory_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let base = resolve(temp.path(), None).unwrap();
    let archive = temp.path().join("out.zip");

    let err = build(&temp.path().join("missing"), &base, &archive).unwrap_err();
    assert!(matches!(err, Error::DirectoryNotFound { .. }));
    assert!(!archive.exists());
}

#[test]
fn unwritable_archive_location() {
    let (temp, root) = fixture();
    let base = resolve(&root, None).unwrap();

    let err = build(&root, &base, temp.path().join("no/such/dir/out.zip")).unwrap_err();
    assert!(matches!(err, Error::ArchiveCreation { .. }));
}

#[cfg(unix)]
#[test]
fn failed_build_leaves_no_archive() {
    let (temp, root) = fixture();
    std::os::unix::fs::symlink(root.join("gone"), root.join("lib/broken")).unwrap();

    let out_dir = temp.path().join("out");
    fs::create_dir(&out_dir).unwrap();
    let archive = out_dir.join("project.zip");

    let base = resolve(&root, None).unwrap();
    let err = build(&root, &base, &archive).unwrap_err();

    assert!(matches!(err, Error::EntryWrite { .. }));
    assert!(!archive.exists());
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[cfg(unix)]
#[test]
fn file_symlink_is_archived_once() {
    let (temp, root) = fixture();
    std::os::unix::fs::symlink("b.txt", root.join("lib/b.txt.link")).unwrap();

    let base = resolve(&root, None).unwrap();
    let archive = temp.path().join("project.zip");
    let summary = build(&root, &base, &archive).unwrap();

    let entries = read_entries(&archive);
    assert_eq!(summary.entries, 5);
    assert_eq!(entries.len(), 5);
    let b: Vec<_> = entries.iter().filter(|(n, _)| n == "lib/b.txt").collect();
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].1, b"bee");
}

#[test]
fn executable_is_stub_config_archive() {
    let (temp, root) = fixture();
    let base = resolve(&root, None).unwrap();
    let archive = temp.path().join("project.zip");
    let exe = temp.path().join("project.exe");

    build(&root, &base, &archive).unwrap();
    let summary = assemble(
        &Asset::embedded(STUB),
        &Asset::embedded(CONFIG),
        &archive,
        &exe,
    )
    .unwrap();

    let archive_bytes = fs::read(&archive).unwrap();
    let exe_bytes = fs::read(&exe).unwrap();

    let mut expected = STUB.to_vec();
    expected.extend_from_slice(CONFIG);
    expected.extend_from_slice(&archive_bytes);

    assert_eq!(exe_bytes, expected);
    assert_eq!(
        summary.len as usize,
        STUB.len() + CONFIG.len() + archive_bytes.len()
    );
}

#[test]
fn executable_is_readable_as_zip() {
    let (temp, root) = fixture();
    let base = resolve(&root, None).unwrap();
    let archive = temp.path().join("project.zip");
    let exe = temp.path().join("project.exe");

    build(&root, &base, &archive).unwrap();
    assemble(&Asset::embedded(STUB), &Asset::embedded(b""), &archive, &exe).unwrap();

    let entries = read_entries(&exe);
    assert_eq!(entries.len(), 5);
    assert!(entries.contains(&("lib/b.txt".to_string(), b"bee".to_vec())));
}
