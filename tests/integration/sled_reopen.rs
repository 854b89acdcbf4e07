use kvfs::store::SledStore;
use kvfs::tree::Catalog;
use kvfs::{FileId, VirtualFilesystem};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn files_and_counter_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store");

    {
        let store = Arc::new(SledStore::open(&path).unwrap());
        let mut vfs =
            VirtualFilesystem::open(store, Arc::new(Catalog::default_palette())).unwrap();
        vfs.add_file_as_text("Photos", "a.json", r#"{"a":1}"#).unwrap();
        vfs.add_file_as_text("Photos", "b.json", r#"{"b":2}"#).unwrap();
        let a = vfs.get_file("a.json", "Photos").unwrap().clone();
        vfs.delete_file(&a).unwrap();
    }

    let store = Arc::new(SledStore::open(&path).unwrap());
    let mut vfs = VirtualFilesystem::open(store, Arc::new(Catalog::default_palette())).unwrap();
    assert_eq!(vfs.get_file_count("Photos", false), 1);
    assert_eq!(
        vfs.get_file("b.json", "Photos").unwrap().content,
        r#"{"b":2}"#
    );
    let id = vfs.add_file_as_text("Photos", "c.json", "{}").unwrap();
    assert_eq!(id, FileId(3));
}
