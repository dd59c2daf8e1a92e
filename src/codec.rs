//! Line codec for the pipe-delimited student table and the derived
//! complaints table.
//!
//! Encoding is total: every record renders to one well-formed line. Decoding
//! is permissive: a line is either accepted as a whole record or skipped as a
//! whole; no partial record ever reaches the caller.

use crate::model::{is_digits, StudentRecord, NUM_SUBJECTS};

pub const FIELD_DELIM: char = '|';
pub const MARKS_DELIM: char = ',';

/// `roll|name|parentName|parentMobile|m1,m2,m3,m4,m5|complaint`
pub fn encode_record(st: &StudentRecord) -> String {
    let marks: Vec<String> = st.marks.iter().map(|m| m.to_string()).collect();
    format!(
        "{}|{}|{}|{}|{}|{}",
        st.roll,
        st.name,
        st.parent_name,
        st.parent_mobile,
        marks.join(","),
        st.complaint
    )
}

/// Decodes one student-table line. Returns `None` for any line that cannot be
/// taken as a full record: wrong field count or a non-numeric roll. A marks
/// sub-field that does not split into exactly five values zeroes all five
/// marks rather than salvaging a prefix; an individual mark that fails to
/// parse becomes 0.
pub fn decode_record(line: &str) -> Option<StudentRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let parts: Vec<&str> = line.split(FIELD_DELIM).collect();
    if parts.len() != 6 {
        return None;
    }
    let roll_str = parts[0].trim();
    if !is_digits(roll_str) {
        return None;
    }
    let roll = roll_str.parse::<u32>().ok()?;

    let mut marks = [0.0f32; NUM_SUBJECTS];
    let mparts: Vec<&str> = parts[4].split(MARKS_DELIM).collect();
    if mparts.len() == NUM_SUBJECTS {
        for (i, ms) in mparts.iter().enumerate() {
            marks[i] = ms.trim().parse::<f32>().unwrap_or(0.0);
        }
    }

    Some(StudentRecord {
        roll,
        name: parts[1].trim().to_string(),
        parent_name: parts[2].trim().to_string(),
        parent_mobile: parts[3].trim().to_string(),
        marks,
        // Complaint text is kept verbatim; trimming happens only when deciding
        // whether a complaint is active.
        complaint: parts[5].to_string(),
    })
}

/// Derived complaints view: one `roll|complaint` line per record whose
/// trimmed complaint is non-empty, in store order. Always recomputed from the
/// records, never patched in place.
pub fn encode_complaints(records: &[StudentRecord]) -> String {
    let mut out = String::new();
    for st in records {
        if st.has_complaint() {
            out.push_str(&format!("{}|{}\n", st.roll, st.complaint));
        }
    }
    out
}
