//! srms - role-based student record manager over flat text tables.
//!
//! The record store is the single source of truth; every mutation cascades to
//! the delimited on-disk tables so `students.txt`, `complaints.txt` and the
//! two login files stay consistent with memory. Corruption in the persisted
//! tables is recovered by omission: malformed lines are skipped on load and
//! dropped on rewrite, never surfaced as errors.
//!
//! Files in a data directory:
//!
//! - `students.txt`       `roll|name|parentName|parentMobile|m1,m2,m3,m4,m5|complaint`
//! - `student_login.txt`  `roll|password`
//! - `parent_login.txt`   `roll|password`
//! - `admin_login.txt`    `username password` (single line)
//! - `complaints.txt`     `roll|complaint`, fully re-derived on every persist

pub mod backup;
pub mod codec;
pub mod credentials;
pub mod error;
pub mod model;
pub mod password;
pub mod storage;
pub mod store;

pub use error::{Result, SrmsError};
pub use model::{StudentRecord, NUM_SUBJECTS, SUBJECTS};
pub use store::{GeneratedPasswords, MarkUpdate, RecordStore};
