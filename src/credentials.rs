//! Credential tables: one `roll|password` file per role, plus the single
//! space-delimited admin pair. Passwords are stored in plaintext; that is the
//! on-disk contract of this system, not an oversight.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error::{Result, SrmsError};
use crate::model::is_digits;
use crate::password;

pub const STUDENT_LOGIN_FILE: &str = "student_login.txt";
pub const PARENT_LOGIN_FILE: &str = "parent_login.txt";
pub const ADMIN_LOGIN_FILE: &str = "admin_login.txt";

pub use crate::password::Role;

/// The two role-keyed login tables and the admin pair, rooted in one data
/// directory. Uniqueness of rolls is the record store's concern; this layer
/// appends and filters without checking it.
pub struct CredentialTables {
    dir: PathBuf,
}

impl CredentialTables {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        CredentialTables {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn login_path(&self, role: Role) -> PathBuf {
        let name = match role {
            Role::Student => STUDENT_LOGIN_FILE,
            Role::Parent => PARENT_LOGIN_FILE,
        };
        self.dir.join(name)
    }

    pub fn admin_path(&self) -> PathBuf {
        self.dir.join(ADMIN_LOGIN_FILE)
    }

    /// All well-formed `roll|password` entries, in file order. Malformed
    /// lines are skipped; a missing file reads as an empty table.
    pub fn entries(&self, role: Role) -> Result<Vec<(u32, String)>> {
        let path = self.login_path(role);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('|').collect();
            if parts.len() != 2 {
                warn!("{:?}: malformed login line skipped: {:?}", path, line);
                continue;
            }
            let roll_str = parts[0].trim();
            if !is_digits(roll_str) {
                warn!("{:?}: non-numeric roll skipped: {:?}", path, line);
                continue;
            }
            let Ok(roll) = roll_str.parse::<u32>() else {
                warn!("{:?}: non-numeric roll skipped: {:?}", path, line);
                continue;
            };
            out.push((roll, parts[1].trim().to_string()));
        }
        Ok(out)
    }

    pub fn append(&self, role: Role, roll: u32, pw: &str) -> Result<()> {
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.login_path(role))?;
        writeln!(f, "{}|{}", roll, pw)?;
        Ok(())
    }

    /// True when some entry matches both fields exactly.
    pub fn verify(&self, role: Role, roll: u32, pw: &str) -> Result<bool> {
        Ok(self
            .entries(role)?
            .iter()
            .any(|(r, p)| *r == roll && p == pw))
    }

    /// Drops every entry for `roll`, keeping all others in their original
    /// order. Rewriting from the parsed entries also drops malformed lines.
    pub fn remove_by_roll(&self, role: Role, roll: u32) -> Result<()> {
        let kept: Vec<(u32, String)> = self
            .entries(role)?
            .into_iter()
            .filter(|(r, _)| *r != roll)
            .collect();
        self.rewrite(role, &kept)
    }

    /// Verifies `(roll, old)` then replaces the password on every entry for
    /// `roll` (normally exactly one). The new password must meet the minimum
    /// length policy.
    pub fn change_password(&self, role: Role, roll: u32, old: &str, new: &str) -> Result<()> {
        let mut entries = self.entries(role)?;
        if !entries.iter().any(|(r, p)| *r == roll && p == old) {
            return Err(SrmsError::AuthenticationFailed);
        }
        password::check_length(new)?;
        for e in entries.iter_mut() {
            if e.0 == roll {
                e.1 = new.to_string();
            }
        }
        self.rewrite(role, &entries)
    }

    fn rewrite(&self, role: Role, entries: &[(u32, String)]) -> Result<()> {
        let mut out = String::new();
        for (r, p) in entries {
            out.push_str(&format!("{}|{}\n", r, p));
        }
        fs::write(self.login_path(role), out)?;
        Ok(())
    }

    /// The one `username password` pair, or `None` when the file is missing
    /// or does not hold two fields.
    pub fn read_admin(&self) -> Result<Option<(String, String)>> {
        let text = match fs::read_to_string(self.admin_path()) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut fields = text.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(u), Some(p)) => Ok(Some((u.to_string(), p.to_string()))),
            _ => Ok(None),
        }
    }

    pub fn write_admin(&self, username: &str, pw: &str) -> Result<()> {
        fs::write(self.admin_path(), format!("{} {}\n", username, pw))?;
        Ok(())
    }

    pub fn verify_admin(&self, username: &str, pw: &str) -> Result<bool> {
        Ok(match self.read_admin()? {
            Some((u, p)) => u == username && p == pw,
            None => false,
        })
    }

    /// Rewrites the single admin line with the same username and a new
    /// password, after verifying the old one.
    pub fn change_admin_password(&self, old: &str, new: &str) -> Result<()> {
        let Some((username, current)) = self.read_admin()? else {
            return Err(SrmsError::AuthenticationFailed);
        };
        if current != old {
            return Err(SrmsError::AuthenticationFailed);
        }
        password::check_length(new)?;
        self.write_admin(&username, new)
    }
}
