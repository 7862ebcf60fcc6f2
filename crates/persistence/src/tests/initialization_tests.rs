// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_tournament;
use crate::Persistence;
use std::path::PathBuf;
use tourney_domain::TournamentFormat;

#[test]
fn test_in_memory_database_enforces_foreign_keys() {
    let persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let first: Persistence = Persistence::new_in_memory().unwrap();
    let second: Persistence = Persistence::new_in_memory().unwrap();

    create_test_tournament(&first, TournamentFormat::Single);

    assert_eq!(first.list_tournaments().unwrap().len(), 1);
    assert!(second.list_tournaments().unwrap().is_empty());
}

#[test]
fn test_file_database_survives_reopen() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "tourney_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        create_test_tournament(&persistence, TournamentFormat::Double);
    }

    let reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let tournaments = reopened.list_tournaments().unwrap();
    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0].name, "Spring Open");
    assert_eq!(tournaments[0].format, TournamentFormat::Double);

    drop(reopened);
    for suffix in ["", "-wal", "-shm"] {
        let mut file: std::ffi::OsString = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
