//! The record store: single source of truth for student records, plus the
//! cascade that keeps the four derived files consistent with it.
//!
//! Every mutating operation persists before returning, in a fixed order:
//! student table, then complaints table (both inside `StorePort::save`), then
//! the login tables. There is no cross-file transaction; the ordering keeps
//! the primary table ahead of its derivations so a crash mid-cascade loses
//! only re-derivable data.

use log::info;

use crate::credentials::CredentialTables;
use crate::error::{Result, SrmsError};
use crate::model::{is_valid_mark, StudentRecord, NUM_SUBJECTS, SUBJECTS};
use crate::password::{self, Role};
use crate::storage::StorePort;

/// Starter passwords handed back to the admin on enrolment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPasswords {
    pub student: String,
    pub parent: String,
}

/// A marks update: the whole row, or one subject by position.
#[derive(Debug, Clone, Copy)]
pub enum MarkUpdate {
    All([f32; NUM_SUBJECTS]),
    Single { subject: usize, value: f32 },
}

pub struct RecordStore<P: StorePort> {
    records: Vec<StudentRecord>,
    port: P,
    creds: CredentialTables,
    skipped_on_load: usize,
}

impl<P: StorePort> RecordStore<P> {
    /// Loads the student table through the port. A missing table is an empty
    /// store; corrupt lines are skipped and counted, never fatal.
    pub fn open(port: P, creds: CredentialTables) -> Result<Self> {
        let loaded = port.load()?;
        Ok(RecordStore {
            records: loaded.records,
            port,
            creds,
            skipped_on_load: loaded.skipped_lines,
        })
    }

    /// Snapshot of all records in insertion order.
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn get(&self, roll: u32) -> Option<&StudentRecord> {
        self.records.iter().find(|st| st.roll == roll)
    }

    /// Lines skipped while loading the student table, for diagnostics.
    pub fn skipped_on_load(&self) -> usize {
        self.skipped_on_load
    }

    /// Active complaints in store order, mirroring the derived table.
    pub fn complaints(&self) -> Vec<(u32, &str)> {
        self.records
            .iter()
            .filter(|st| st.has_complaint())
            .map(|st| (st.roll, st.complaint.as_str()))
            .collect()
    }

    /// Enrols a record: persists the tables and appends a generated starter
    /// credential to both login files. Both passwords are returned so the
    /// admin can hand them out.
    pub fn add(&mut self, record: StudentRecord) -> Result<GeneratedPasswords> {
        if self.records.iter().any(|st| st.roll == record.roll) {
            return Err(SrmsError::DuplicateKey(record.roll));
        }
        check_marks(&record.marks)?;

        let passwords = GeneratedPasswords {
            student: password::generate(&record.name, record.roll, Role::Student),
            parent: password::generate(&record.parent_name, record.roll, Role::Parent),
        };
        let roll = record.roll;
        self.records.push(record);
        self.port.save(&self.records)?;
        self.creds.append(Role::Student, roll, &passwords.student)?;
        self.creds.append(Role::Parent, roll, &passwords.parent)?;
        info!("added roll {}", roll);
        Ok(passwords)
    }

    /// Removes a record and cascades to both login tables. The complaints
    /// table is rebuilt as part of the save.
    pub fn delete(&mut self, roll: u32) -> Result<()> {
        let idx = self
            .records
            .iter()
            .position(|st| st.roll == roll)
            .ok_or(SrmsError::NotFound(roll))?;
        self.records.remove(idx);
        self.port.save(&self.records)?;
        self.creds.remove_by_roll(Role::Student, roll)?;
        self.creds.remove_by_roll(Role::Parent, roll)?;
        info!("deleted roll {}", roll);
        Ok(())
    }

    pub fn update_marks(&mut self, roll: u32, update: MarkUpdate) -> Result<()> {
        let idx = self
            .records
            .iter()
            .position(|st| st.roll == roll)
            .ok_or(SrmsError::NotFound(roll))?;
        match update {
            MarkUpdate::All(marks) => {
                check_marks(&marks)?;
                self.records[idx].marks = marks;
            }
            MarkUpdate::Single { subject, value } => {
                if subject >= NUM_SUBJECTS {
                    return Err(SrmsError::InvalidSubject(subject));
                }
                if !is_valid_mark(value) {
                    return Err(SrmsError::OutOfRange {
                        subject: SUBJECTS[subject],
                        value,
                    });
                }
                self.records[idx].marks[subject] = value;
            }
        }
        self.port.save(&self.records)
    }

    /// Records a complaint, replacing any prior one. Text is trimmed; an
    /// empty result is rejected.
    pub fn submit_complaint(&mut self, roll: u32, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SrmsError::EmptyComplaint);
        }
        let idx = self
            .records
            .iter()
            .position(|st| st.roll == roll)
            .ok_or(SrmsError::NotFound(roll))?;
        self.records[idx].complaint = text.to_string();
        self.port.save(&self.records)
    }

    pub fn resolve_complaint(&mut self, roll: u32) -> Result<()> {
        let idx = self
            .records
            .iter()
            .position(|st| st.roll == roll)
            .ok_or(SrmsError::NotFound(roll))?;
        if !self.records[idx].has_complaint() {
            return Err(SrmsError::NoComplaint(roll));
        }
        self.records[idx].complaint.clear();
        self.port.save(&self.records)
    }

    /// Replaces the whole store and re-persists every derived file, including
    /// a full rewrite of both login tables with regenerated starter
    /// credentials. Used by snapshot import.
    ///
    /// Imported records get the same checks `add` applies: a duplicate roll or
    /// an out-of-range mark in a hand-edited snapshot rejects the whole import
    /// before any file is touched.
    pub fn replace_all(&mut self, records: Vec<StudentRecord>) -> Result<()> {
        for (i, st) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.roll == st.roll) {
                return Err(SrmsError::DuplicateKey(st.roll));
            }
            check_marks(&st.marks)?;
        }
        for st in &self.records {
            self.creds.remove_by_roll(Role::Student, st.roll)?;
            self.creds.remove_by_roll(Role::Parent, st.roll)?;
        }
        self.records = records;
        self.port.save(&self.records)?;
        for st in &self.records {
            let spw = password::generate(&st.name, st.roll, Role::Student);
            let ppw = password::generate(&st.parent_name, st.roll, Role::Parent);
            self.creds.append(Role::Student, st.roll, &spw)?;
            self.creds.append(Role::Parent, st.roll, &ppw)?;
        }
        Ok(())
    }
}

fn check_marks(marks: &[f32; NUM_SUBJECTS]) -> Result<()> {
    for (i, m) in marks.iter().enumerate() {
        if !is_valid_mark(*m) {
            return Err(SrmsError::OutOfRange {
                subject: SUBJECTS[i],
                value: *m,
            });
        }
    }
    Ok(())
}
