use kvfs::{ApiError, FileId, FolderRef, UNCATEGORIZED};

use crate::support::default_vfs;

#[test]
fn photos_add_delete_add_never_reuses_ids() {
    let (_store, mut vfs) = default_vfs();

    let first = vfs
        .add_file_as_base64("Photos", "sunset.png", "AAA=")
        .unwrap();
    assert_eq!(first, FileId(1));
    assert_eq!(vfs.get_file_count("Photos", false), 1);

    let sunset = vfs.get_file("sunset.png", "Photos").unwrap().clone();
    vfs.delete_file(&sunset).unwrap();
    assert_eq!(vfs.get_file_count("Photos", false), 0);
    assert!(vfs.get_file("sunset.png", "Photos").is_none());

    let second = vfs
        .add_file_as_base64("Photos", "sunrise.png", "AAA=")
        .unwrap();
    assert_eq!(second, FileId(2));
}

#[test]
fn nested_built_in_path_resolves_with_parent() {
    let (_store, mut vfs) = default_vfs();
    let modern = vfs
        .get_folder("Named Colors/Modern", None, false)
        .expect("Modern folder");
    let node = vfs.folder(modern).unwrap();
    let parent = vfs.folder(node.parent.unwrap()).unwrap();
    assert_eq!(node.name, "Modern");
    assert_eq!(parent.name, "Named Colors");
    assert!(parent.parent.is_none());
}

#[test]
fn deleted_file_disappears_from_every_listing() {
    let (_store, mut vfs) = default_vfs();
    vfs.add_file_as_text("Named Colors/Modern", "mine.json", "[]")
        .unwrap();
    assert_eq!(vfs.get_file_count("Named Colors", true), 8);

    let mine = vfs
        .get_file("mine.json", "Named Colors/Modern")
        .unwrap()
        .clone();
    vfs.delete_file(&mine).unwrap();

    for folder in vfs.tree().flatten() {
        assert!(vfs.list_files(folder).iter().all(|f| f.id != mine.id));
    }
    assert_eq!(vfs.get_file_count("Named Colors", true), 7);
}

#[test]
fn category_depends_on_folder_depth() {
    let (_store, mut vfs) = default_vfs();
    vfs.add_file_as_text("Overlay Images", "top.json", "{}")
        .unwrap();
    vfs.add_file_as_text("Overlay Images/Built In", "deep.json", "{}")
        .unwrap();

    let top = vfs.get_file("top.json", "Overlay Images").unwrap();
    assert_eq!(vfs.get_category(top), UNCATEGORIZED);
    let deep = vfs.get_file("deep.json", "Overlay Images/Built In").unwrap();
    assert_eq!(vfs.get_category(deep), "Built In");

    let logo = vfs.get_file("Logo", "Overlay Images/Built In").unwrap();
    assert_eq!(vfs.get_category(logo), "Built In");
}

#[test]
fn created_folder_survives_reload_once_it_holds_a_file() {
    let (_store, mut vfs) = default_vfs();
    let created = vfs
        .get_folder("Imports/2024/March", None, true)
        .expect("created");
    assert_eq!(
        vfs.get_full_path(created).as_deref(),
        Some("Imports/2024/March")
    );
    vfs.add_file(FolderRef::ById(created), kvfs::FileRecord::new_user("a.json", "{}"))
        .unwrap();

    vfs.reload().unwrap();
    let march = vfs.find_folder("Imports/2024/March").unwrap();
    assert_eq!(vfs.list_files(march).len(), 1);
    assert_eq!(vfs.get_category(&vfs.list_files(march)[0]), "March");
    assert_eq!(vfs.last_reload_report().recreated.len(), 1);
}

#[test]
fn empty_folder_created_in_memory_is_dropped_by_reload() {
    let (_store, mut vfs) = default_vfs();
    vfs.get_folder("Scratch", None, true).unwrap();
    assert!(vfs.find_folder("Scratch").is_some());
    vfs.reload().unwrap();
    assert!(vfs.find_folder("Scratch").is_none());
}

#[test]
fn built_in_records_cannot_be_deleted_or_saved() {
    let (store, mut vfs) = default_vfs();
    let parrots = vfs.get_file("Parrots", "Photos/Built In").unwrap().clone();

    let err = vfs.delete_file(&parrots).unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert!(err.is_user_facing());
    assert!(vfs.save_file(&parrots).is_err());
    assert!(store.is_empty());
}
