//! Snapshot export/import against a real data directory: import replaces the
//! store and rebuilds every derived file, including regenerated login
//! credentials.

use std::fs;
use std::path::Path;

use srms::credentials::{CredentialTables, Role};
use srms::storage::TextTables;
use srms::{backup, RecordStore, StudentRecord};
use tempfile::tempdir;

fn open_store(dir: &Path) -> RecordStore<TextTables> {
    RecordStore::open(TextTables::new(dir), CredentialTables::new(dir)).expect("open store")
}

fn record(roll: u32, name: &str, parent: &str) -> StudentRecord {
    let mut st = StudentRecord::new(roll, name, parent, "9876543210");
    st.marks = [80.0, 70.0, 90.0, 60.0, 85.0];
    st
}

#[test]
fn import_into_fresh_directory_rebuilds_all_files() {
    let src = tempdir().expect("tempdir");
    let snapshot = src.path().join("snapshot.json");
    {
        let mut store = open_store(src.path());
        store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");
        store.add(record(2, "Bob Ray", "Jim Ray")).expect("add");
        store.submit_complaint(2, "no chalk").expect("complain");
        let summary = backup::export_snapshot(store.records(), &snapshot).expect("export");
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.complaint_count, 1);
    }

    let dst = tempdir().expect("tempdir");
    let mut store = open_store(dst.path());
    let records = backup::import_snapshot(&snapshot).expect("import");
    store.replace_all(records).expect("replace");

    assert_eq!(store.records().len(), 2);
    assert_eq!(store.get(2).expect("record").complaint, "no chalk");

    let complaints = fs::read_to_string(dst.path().join("complaints.txt")).expect("read");
    assert_eq!(complaints, "2|no chalk\n");

    // Login tables were rebuilt with regenerated starter passwords.
    let creds = CredentialTables::new(dst.path());
    assert!(creds.verify(Role::Student, 1, "AnnLee@001").expect("verify"));
    assert!(creds.verify(Role::Parent, 2, "JimRay#002").expect("verify"));
}

#[test]
fn tampered_snapshot_with_duplicate_rolls_is_rejected_whole() {
    let dir = tempdir().expect("tempdir");
    let mut store = open_store(dir.path());
    store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");

    // A hand-edited snapshot can carry anything; primary-key uniqueness must
    // still hold after import.
    let snapshot = dir.path().join("snapshot.json");
    backup::export_snapshot(
        &[record(5, "Bob Ray", "Jim Ray"), record(5, "Cyd Moe", "Kim Moe")],
        &snapshot,
    )
    .expect("export");

    let records = backup::import_snapshot(&snapshot).expect("import parses");
    assert!(store.replace_all(records).is_err());

    // Nothing was replaced: record, student table and login tables all still
    // hold exactly the pre-import state.
    let rolls: Vec<u32> = store.records().iter().map(|st| st.roll).collect();
    assert_eq!(rolls, vec![1]);
    let students = fs::read_to_string(dir.path().join("students.txt")).expect("read");
    assert!(students.contains("Ann Lee"));
    assert!(!students.contains("Bob Ray"));
    let login = fs::read_to_string(dir.path().join("student_login.txt")).expect("read");
    assert_eq!(login, "1|AnnLee@001\n");
}

#[test]
fn import_replaces_prior_records_and_credentials() {
    let dir = tempdir().expect("tempdir");
    let snapshot = dir.path().join("snapshot.json");
    let mut store = open_store(dir.path());
    store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");
    backup::export_snapshot(store.records(), &snapshot).expect("export");

    store.add(record(9, "Zed Orr", "Sal Orr")).expect("add");
    let records = backup::import_snapshot(&snapshot).expect("import");
    store.replace_all(records).expect("replace");

    assert_eq!(store.records().len(), 1);
    assert!(store.get(9).is_none());

    let creds = CredentialTables::new(dir.path());
    assert!(!creds.verify(Role::Student, 9, "ZedOrr@009").expect("verify"));
    assert!(creds.verify(Role::Student, 1, "AnnLee@001").expect("verify"));

    let students = fs::read_to_string(dir.path().join("students.txt")).expect("read");
    assert!(!students.contains("Zed"));
}
