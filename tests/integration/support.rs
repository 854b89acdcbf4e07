use kvfs::store::{KeyValueStore, MemoryStore};
use kvfs::tree::Catalog;
use kvfs::VirtualFilesystem;
use std::sync::Arc;

/// Fresh filesystem over an empty memory store with the bundled catalog.
pub fn default_vfs() -> (Arc<MemoryStore>, VirtualFilesystem) {
    let store = Arc::new(MemoryStore::new());
    let vfs = VirtualFilesystem::open(store.clone(), Arc::new(Catalog::default_palette())).unwrap();
    (store, vfs)
}

/// Write a raw record the way an older build or another writer would have.
pub fn put_raw_record(store: &dyn KeyValueStore, id: u64, name: &str, folder: &str, content: &str) {
    let value = serde_json::json!({
        "name": name,
        "folderPath": folder,
        "content": content,
    });
    store
        .set(&format!("file_{}", id), &value.to_string())
        .unwrap();
}
