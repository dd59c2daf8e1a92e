//! End-to-end lifecycle over a real data directory: every mutation must leave
//! the four derived files consistent with the in-memory store.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use srms::credentials::{CredentialTables, Role};
use srms::storage::TextTables;
use srms::{MarkUpdate, RecordStore, StudentRecord};
use tempfile::tempdir;

fn open_store(dir: &Path) -> RecordStore<TextTables> {
    RecordStore::open(TextTables::new(dir), CredentialTables::new(dir)).expect("open store")
}

fn record(roll: u32, name: &str, parent: &str) -> StudentRecord {
    let mut st = StudentRecord::new(roll, name, parent, "9876543210");
    st.marks = [80.0, 70.0, 90.0, 60.0, 85.0];
    st
}

fn login_rolls(dir: &Path, file: &str) -> BTreeSet<u32> {
    let text = fs::read_to_string(dir.join(file)).unwrap_or_default();
    text.lines()
        .filter_map(|l| l.split('|').next())
        .filter_map(|r| r.trim().parse::<u32>().ok())
        .collect()
}

fn student_rolls(dir: &Path) -> BTreeSet<u32> {
    login_rolls(dir, "students.txt")
}

#[test]
fn add_creates_record_and_both_credentials() {
    let dir = tempdir().expect("tempdir");
    let mut store = open_store(dir.path());

    let pw = store.add(record(101, "Ann Lee", "Tom Lee")).expect("add");
    assert_eq!(store.records().len(), 1);
    assert_eq!(pw.student, "AnnLee@101");
    assert_eq!(pw.parent, "TomLee#101");

    let students = fs::read_to_string(dir.path().join("students.txt")).expect("read");
    assert_eq!(students, "101|Ann Lee|Tom Lee|9876543210|80,70,90,60,85|\n");
    let student_login = fs::read_to_string(dir.path().join("student_login.txt")).expect("read");
    assert_eq!(student_login, "101|AnnLee@101\n");
    let parent_login = fs::read_to_string(dir.path().join("parent_login.txt")).expect("read");
    assert_eq!(parent_login, "101|TomLee#101\n");

    let creds = CredentialTables::new(dir.path());
    assert!(creds.verify(Role::Student, 101, "AnnLee@101").expect("verify"));
    assert!(creds.verify(Role::Parent, 101, "TomLee#101").expect("verify"));
}

#[test]
fn delete_cascades_to_every_file() {
    let dir = tempdir().expect("tempdir");
    let mut store = open_store(dir.path());
    store.add(record(101, "Ann Lee", "Tom Lee")).expect("add");
    store.add(record(102, "Bob Ray", "Jim Ray")).expect("add");
    store.submit_complaint(101, "broken chair").expect("complain");

    store.delete(101).expect("delete");

    for file in [
        "students.txt",
        "student_login.txt",
        "parent_login.txt",
        "complaints.txt",
    ] {
        let text = fs::read_to_string(dir.path().join(file)).expect("read");
        assert!(!text.contains("101"), "{} still references 101: {:?}", file, text);
    }
    // The sibling record is untouched.
    assert_eq!(student_rolls(dir.path()), BTreeSet::from([102]));
    assert_eq!(login_rolls(dir.path(), "student_login.txt"), BTreeSet::from([102]));
}

#[test]
fn login_tables_always_mirror_the_student_table() {
    let dir = tempdir().expect("tempdir");
    let mut store = open_store(dir.path());

    store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");
    store.add(record(2, "Bob Ray", "Jim Ray")).expect("add");
    store.add(record(3, "Cyd Moe", "Kim Moe")).expect("add");
    store.delete(2).expect("delete");
    store.add(record(4, "Dee Fox", "Pat Fox")).expect("add");
    store.delete(1).expect("delete");

    let students = student_rolls(dir.path());
    assert_eq!(students, BTreeSet::from([3, 4]));
    assert_eq!(login_rolls(dir.path(), "student_login.txt"), students);
    assert_eq!(login_rolls(dir.path(), "parent_login.txt"), students);
}

#[test]
fn complaints_file_is_exactly_the_active_complaints() {
    let dir = tempdir().expect("tempdir");
    let mut store = open_store(dir.path());
    store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");
    store.add(record(2, "Bob Ray", "Jim Ray")).expect("add");

    store.submit_complaint(2, "no chalk").expect("complain");
    let text = fs::read_to_string(dir.path().join("complaints.txt")).expect("read");
    assert_eq!(text, "2|no chalk\n");

    store.submit_complaint(1, "fan broken").expect("complain");
    store.resolve_complaint(2).expect("resolve");
    let text = fs::read_to_string(dir.path().join("complaints.txt")).expect("read");
    assert_eq!(text, "1|fan broken\n");
}

#[test]
fn reopening_the_store_sees_persisted_state() {
    let dir = tempdir().expect("tempdir");
    {
        let mut store = open_store(dir.path());
        store.add(record(7, "Ann Lee", "Tom Lee")).expect("add");
        store
            .update_marks(7, MarkUpdate::Single { subject: 0, value: 33.5 })
            .expect("update");
        store.submit_complaint(7, "wifi down").expect("complain");
    }
    let store = open_store(dir.path());
    assert_eq!(store.skipped_on_load(), 0);
    let st = store.get(7).expect("record");
    assert_eq!(st.name, "Ann Lee");
    assert!((st.marks[0] - 33.5).abs() < 1e-6);
    assert_eq!(st.complaint, "wifi down");
}

#[test]
fn corrupt_student_lines_are_dropped_on_load_and_rewrite() {
    let dir = tempdir().expect("tempdir");
    {
        let mut store = open_store(dir.path());
        store.add(record(1, "Ann Lee", "Tom Lee")).expect("add");
    }
    // Hand-corrupt the table: one broken line, one with a short marks list.
    let path = dir.path().join("students.txt");
    let mut text = fs::read_to_string(&path).expect("read");
    text.push_str("garbage without pipes\n");
    text.push_str("2|Bob Ray|Jim Ray|9876543210|50,60,70|\n");
    fs::write(&path, text).expect("write");

    let mut store = open_store(dir.path());
    assert_eq!(store.skipped_on_load(), 1);
    assert_eq!(store.records().len(), 2);
    // Short marks list means all five default to zero, not a partial fill.
    assert_eq!(store.get(2).expect("record").marks, [0.0; 5]);

    // The next persist rewrites the table without the garbage line.
    store.submit_complaint(1, "anything").expect("complain");
    let text = fs::read_to_string(&path).expect("read");
    assert!(!text.contains("garbage"));
    assert_eq!(text.lines().count(), 2);
}
