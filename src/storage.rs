//! Storage port for the primary student table and its derived complaints
//! view. The production backend writes flat text files in a data directory;
//! tests substitute an in-memory implementation to exercise the store without
//! touching disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

use crate::codec;
use crate::error::Result;
use crate::model::StudentRecord;

pub const STUDENTS_FILE: &str = "students.txt";
pub const COMPLAINTS_FILE: &str = "complaints.txt";

/// Result of loading the student table. Skipped lines are a diagnostic only;
/// the recovery policy is skip-and-continue, never fail.
pub struct LoadOutcome {
    pub records: Vec<StudentRecord>,
    pub skipped_lines: usize,
}

pub trait StorePort {
    fn load(&self) -> Result<LoadOutcome>;
    /// Persists the full record list: student table first, then the derived
    /// complaints table. This ordering is relied on for crash-consistency
    /// approximation; the complaints file is always recomputable from the
    /// student file.
    fn save(&self, records: &[StudentRecord]) -> Result<()>;
}

/// Production backend over a data directory of delimited text files.
pub struct TextTables {
    dir: PathBuf,
}

impl TextTables {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        TextTables {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn students_path(&self) -> PathBuf {
        self.dir.join(STUDENTS_FILE)
    }

    pub fn complaints_path(&self) -> PathBuf {
        self.dir.join(COMPLAINTS_FILE)
    }
}

impl StorePort for TextTables {
    fn load(&self) -> Result<LoadOutcome> {
        let path = self.students_path();
        // Absence of the table means an empty store, not an error.
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LoadOutcome {
                    records: Vec::new(),
                    skipped_lines: 0,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let mut records: Vec<StudentRecord> = Vec::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match codec::decode_record(line) {
                Some(st) => {
                    // A duplicate roll in a hand-edited file would break the
                    // primary-key invariant; treat the later line as corrupt.
                    if records.iter().any(|r| r.roll == st.roll) {
                        warn!("{}: duplicate roll {}, line skipped", STUDENTS_FILE, st.roll);
                        skipped += 1;
                        continue;
                    }
                    records.push(st);
                }
                None => {
                    warn!("{}: malformed line skipped: {:?}", STUDENTS_FILE, line);
                    skipped += 1;
                }
            }
        }
        Ok(LoadOutcome {
            records,
            skipped_lines: skipped,
        })
    }

    fn save(&self, records: &[StudentRecord]) -> Result<()> {
        let mut out = String::new();
        for st in records {
            out.push_str(&codec::encode_record(st));
            out.push('\n');
        }
        write_file(&self.students_path(), &out)?;
        write_file(&self.complaints_path(), &codec::encode_complaints(records))?;
        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(content.as_bytes())?;
    Ok(())
}
