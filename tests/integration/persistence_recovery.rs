use kvfs::store::{KeyValueStore, MemoryStore};
use kvfs::tree::Catalog;
use kvfs::{FileId, StalePathPolicy, VirtualFilesystem};
use std::sync::Arc;

use crate::support::put_raw_record;

#[test]
fn corrupt_metadata_does_not_hand_out_live_ids() {
    let store = Arc::new(MemoryStore::new());
    store.set("fileSystem", "][").unwrap();
    put_raw_record(store.as_ref(), 1, "kept.json", "Photos", "{}");
    put_raw_record(store.as_ref(), 2, "also.json", "Photos", "{}");

    let mut vfs =
        VirtualFilesystem::open(store.clone(), Arc::new(Catalog::default_palette())).unwrap();
    assert_eq!(vfs.get_file_count("Photos", false), 2);

    let id = vfs.add_file_as_text("Photos", "new.json", "{}").unwrap();
    assert_eq!(id, FileId(3));
    assert_eq!(vfs.get_file("kept.json", "Photos").unwrap().id, FileId(1));
}

#[test]
fn corrupt_records_are_skipped_and_reported() {
    let store = Arc::new(MemoryStore::new());
    store.set("fileSystem", r#"{"nextId":3}"#).unwrap();
    put_raw_record(store.as_ref(), 1, "good.json", "Photos", "{}");
    store.set("file_2", "{{{{").unwrap();

    let vfs = VirtualFilesystem::open(store, Arc::new(Catalog::default_palette())).unwrap();
    let report = vfs.last_reload_report();
    assert_eq!(report.loaded, 1);
    assert_eq!(report.corrupt, vec![FileId(2)]);
}

#[test]
fn stale_folder_with_first_root_policy_lands_in_first_root() {
    let store = Arc::new(MemoryStore::new());
    store.set("fileSystem", r#"{"nextId":2}"#).unwrap();
    put_raw_record(store.as_ref(), 1, "lost.json", "Renamed/Folder", "{}");

    let vfs = VirtualFilesystem::with_policy(
        store,
        Arc::new(Catalog::default_palette()),
        StalePathPolicy::FirstRoot,
    )
    .unwrap();

    let lost = vfs.get_file("lost.json", "Named Colors").unwrap();
    assert_eq!(lost.folder_path, "Named Colors");
    assert_eq!(
        vfs.last_reload_report().relocated,
        vec![(FileId(1), "Renamed/Folder".to_string())]
    );

    // saving rewrites the denormalized path to the folder it now lives in
    vfs.save_file(lost).unwrap();
    let stored = vfs.load_file_by_id(FileId(1)).unwrap().unwrap();
    assert_eq!(stored.folder_path, "Named Colors");
}

#[test]
fn orphan_above_counter_is_reported_not_overwritten() {
    let store = Arc::new(MemoryStore::new());
    store.set("fileSystem", r#"{"nextId":1}"#).unwrap();
    put_raw_record(store.as_ref(), 1, "orphan.json", "Photos", "{}");

    let mut vfs =
        VirtualFilesystem::open(store.clone(), Arc::new(Catalog::default_palette())).unwrap();
    assert_eq!(vfs.last_reload_report().orphaned, vec![FileId(1)]);
    assert_eq!(vfs.get_file_count("Photos", false), 0);

    let id = vfs.add_file_as_text("Photos", "fresh.json", "{}").unwrap();
    assert_eq!(id, FileId(2));
    // counter now covers the orphan, so it is loaded again
    assert!(vfs.get_file("orphan.json", "Photos").is_some());
    assert!(vfs.last_reload_report().orphaned.is_empty());
}

#[test]
fn records_survive_a_catalog_without_their_folder() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut vfs =
            VirtualFilesystem::open(store.clone(), Arc::new(Catalog::default_palette())).unwrap();
        vfs.add_file_as_text("Custom Palettes/Video Game Consoles", "snes.json", "[]")
            .unwrap();
    }

    let vfs = VirtualFilesystem::open(store, Arc::new(Catalog::empty())).unwrap();
    let snes = vfs
        .get_file("snes.json", "Custom Palettes/Video Game Consoles")
        .unwrap();
    assert_eq!(snes.content, "[]");
    assert_eq!(vfs.get_category(snes), "Video Game Consoles");
}
