use kvfs::store::MemoryStore;
use kvfs::tree::{Catalog, NamespaceTree};
use kvfs::VirtualFilesystem;
use proptest::prelude::*;
use std::sync::Arc;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{1,8}"
}

fn path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("/"))
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    DeleteOldest,
}

proptest! {
    #[test]
    fn create_then_resolve_is_idempotent(p in path()) {
        let mut tree = NamespaceTree::new();
        let created = tree.resolve(&p, None, true);
        prop_assert!(created.is_some());
        let count = tree.folder_count();
        let resolved = tree.resolve(&p, None, false);
        prop_assert_eq!(created, resolved);
        prop_assert_eq!(tree.resolve(&p, None, true), created);
        prop_assert_eq!(tree.folder_count(), count);
        prop_assert_eq!(tree.full_path(created.unwrap()), Some(p));
    }

    #[test]
    fn ids_strictly_increase_across_deletes(
        ops in prop::collection::vec(prop_oneof![Just(Op::Add), Just(Op::DeleteOldest)], 1..20)
    ) {
        let mut vfs = VirtualFilesystem::open(
            Arc::new(MemoryStore::new()),
            Arc::new(Catalog::default_palette()),
        ).unwrap();
        let mut last = 0u64;
        let mut live = Vec::new();
        for (i, op) in ops.into_iter().enumerate() {
            match op {
                Op::Add => {
                    let id = vfs
                        .add_file_as_text("Photos", &format!("f{}.json", i), "{}")
                        .unwrap();
                    prop_assert!(id.0 > last);
                    last = id.0;
                    live.push(id);
                }
                Op::DeleteOldest => {
                    if live.is_empty() {
                        continue;
                    }
                    let id = live.remove(0);
                    let record = vfs.get_file_by_id(id).unwrap().clone();
                    vfs.delete_file(&record).unwrap();
                }
            }
            prop_assert_eq!(vfs.get_file_count("Photos", false), live.len());
        }
    }
}
