use clap::Parser;
use kvfs::config::{KvfsConfig, StorageBackend};
use kvfs::tooling::cli::{Cli, CliContext, Commands};

fn memory_context() -> CliContext {
    let mut config = KvfsConfig::default();
    config.storage.backend = StorageBackend::Memory;
    CliContext::from_config(&config).unwrap()
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["kvfs", "tree"],
        vec!["kvfs", "ls", "Photos"],
        vec!["kvfs", "ls", "Named Colors/Modern", "--format", "json"],
        vec!["kvfs", "count", "Photos", "--recursive"],
        vec!["kvfs", "add", "Photos", "a.json", "--text", "{}"],
        vec!["kvfs", "add", "Photos", "a.png", "--file", "./a.png"],
        vec!["kvfs", "cat", "Photos", "a.json"],
        vec!["kvfs", "rm", "Photos", "a.json"],
        vec!["kvfs", "category", "Photos", "a.json"],
        vec!["kvfs", "--store", "/tmp/kvfs", "doctor"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_text_and_file_together() {
    let conflict = Cli::try_parse_from([
        "kvfs", "add", "Photos", "a.json", "--text", "{}", "--file", "./a.json",
    ]);
    assert!(conflict.is_err());
}

#[test]
fn add_count_cat_rm_round_trip() {
    let mut cli = memory_context();
    let added = cli
        .execute(&Commands::Add {
            folder: "Photos".to_string(),
            name: "p.json".to_string(),
            text: Some(r#"{"k":"v"}"#.to_string()),
            file: None,
        })
        .unwrap();
    assert!(added.contains("#1"));

    let count = cli
        .execute(&Commands::Count {
            folder: "Photos".to_string(),
            recursive: true,
        })
        .unwrap();
    assert_eq!(count, "3");

    let cat = cli
        .execute(&Commands::Cat {
            folder: "Photos".to_string(),
            name: "p.json".to_string(),
        })
        .unwrap();
    assert!(cat.contains("\"k\": \"v\""));

    cli.execute(&Commands::Rm {
        folder: "Photos".to_string(),
        name: "p.json".to_string(),
    })
    .unwrap();
    assert_eq!(cli.vfs().get_file_count("Photos", false), 0);
}

#[test]
fn add_binary_file_from_disk() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("dot.png");
    std::fs::write(&path, [0u8, 0u8]).unwrap();

    let mut cli = memory_context();
    cli.execute(&Commands::Add {
        folder: "Photos".to_string(),
        name: "dot.png".to_string(),
        text: None,
        file: Some(path),
    })
    .unwrap();
    let record = cli.vfs().get_file("dot.png", "Photos").unwrap();
    assert_eq!(record.content, "AAA=");

    let cat = cli
        .execute(&Commands::Cat {
            folder: "Photos".to_string(),
            name: "dot.png".to_string(),
        })
        .unwrap();
    assert_eq!(cat, "2 bytes of image/png");
}

#[test]
fn ls_json_lists_built_ins() {
    let mut cli = memory_context();
    let out = cli
        .execute(&Commands::Ls {
            folder: "Named Colors/Modern".to_string(),
            format: "json".to_string(),
        })
        .unwrap();
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Web Colors");
    assert_eq!(rows[0]["category"], "Modern");
    assert_eq!(rows[0]["built_in"], true);
}

#[test]
fn missing_targets_are_errors() {
    let mut cli = memory_context();
    assert!(cli
        .execute(&Commands::Ls {
            folder: "Nowhere".to_string(),
            format: "text".to_string(),
        })
        .is_err());
    assert!(cli
        .execute(&Commands::Rm {
            folder: "Photos".to_string(),
            name: "ghost.json".to_string(),
        })
        .is_err());
    let doctor = cli.execute(&Commands::Doctor).unwrap();
    assert!(doctor.contains("no problems found"));
}

#[test]
fn tree_lists_every_root() {
    let mut cli = memory_context();
    let tree = cli.execute(&Commands::Tree).unwrap();
    for root in ["Named Colors/", "Custom Palettes/", "Photos/", "Overlay Images/"] {
        assert!(tree.contains(root), "missing {root} in\n{tree}");
    }
    assert!(tree.contains("  Built In/ (2 files)"));
}
