//! Deterministic password generation.
//!
//! Passwords are derived from the holder's name and roll number so the admin
//! can read them out at enrolment time. This is a deliberate memorability
//! tradeoff: anyone who knows the scheme can reconstruct a password, so these
//! are starter credentials the holder is expected to change.

use crate::error::{Result, SrmsError};

/// Minimum accepted password length for the change-password workflows.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Parent,
}

impl Role {
    /// Single-character suffix distinguishing student from parent passwords.
    pub fn marker(self) -> char {
        match self {
            Role::Student => '@',
            Role::Parent => '#',
        }
    }
}

/// `"Ann Lee"`, roll 7, student => `AnnLee@007`.
///
/// Spaces are stripped from the name, the role marker appended, then the last
/// three decimal digits of the roll zero-padded to width 3.
pub fn generate(name: &str, roll: u32, role: Role) -> String {
    let cleaned: String = name.chars().filter(|c| *c != ' ').collect();
    format!("{}{}{:03}", cleaned, role.marker(), roll % 1000)
}

pub fn check_length(password: &str) -> Result<()> {
    let got = password.chars().count();
    if got < MIN_PASSWORD_LEN {
        return Err(SrmsError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
            got,
        });
    }
    Ok(())
}
