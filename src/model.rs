use serde::{Deserialize, Serialize};

/// Fixed subject list shared by every record. Marks are stored positionally
/// in this order.
pub const SUBJECTS: [&str; NUM_SUBJECTS] = ["Maths", "Physics", "Chemistry", "English", "Computer"];

pub const NUM_SUBJECTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub roll: u32,
    pub name: String,
    pub parent_name: String,
    pub parent_mobile: String,
    pub marks: [f32; NUM_SUBJECTS],
    /// Empty string means no active complaint.
    pub complaint: String,
}

impl StudentRecord {
    pub fn new(roll: u32, name: &str, parent_name: &str, parent_mobile: &str) -> Self {
        StudentRecord {
            roll,
            name: name.to_string(),
            parent_name: parent_name.to_string(),
            parent_mobile: parent_mobile.to_string(),
            marks: [0.0; NUM_SUBJECTS],
            complaint: String::new(),
        }
    }

    pub fn has_complaint(&self) -> bool {
        !self.complaint.trim().is_empty()
    }
}

pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn is_alpha_or_space(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

pub fn is_valid_mobile(s: &str) -> bool {
    is_digits(s) && (7..=15).contains(&s.len())
}

pub fn is_valid_mark(m: f32) -> bool {
    (0.0..=100.0).contains(&m)
}
