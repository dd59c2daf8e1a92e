use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::bail;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use srms::credentials::{CredentialTables, Role};
use srms::model::{is_alpha_or_space, is_digits, is_valid_mark, is_valid_mobile};
use srms::storage::TextTables;
use srms::{backup, MarkUpdate, RecordStore, StudentRecord, NUM_SUBJECTS, SUBJECTS};

const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

type Store = RecordStore<TextTables>;

fn main() -> anyhow::Result<()> {
    TermLogger::init(
        LevelFilter::Warn,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();

    let data_dir: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if !data_dir.is_dir() {
        std::fs::create_dir_all(&data_dir)?;
    }

    let creds = CredentialTables::new(&data_dir);
    // First run: provision a default admin pair so the admin menu is
    // reachable. The holder should change it immediately.
    if creds.read_admin()?.is_none() {
        creds.write_admin(DEFAULT_ADMIN_USER, DEFAULT_ADMIN_PASSWORD)?;
        log::warn!(
            "{:?}: created default admin credentials, change the password",
            creds.admin_path()
        );
    }

    let mut store = Store::open(TextTables::new(&data_dir), CredentialTables::new(&data_dir))?;
    if store.skipped_on_load() > 0 {
        log::warn!(
            "skipped {} malformed line(s) while loading the student table",
            store.skipped_on_load()
        );
    }

    main_menu(&mut store, &creds, &data_dir)
}

fn main_menu(store: &mut Store, creds: &CredentialTables, data_dir: &Path) -> anyhow::Result<()> {
    loop {
        println!("\n============================");
        println!("     STUDENT RECORD SYSTEM");
        println!("============================");
        println!("1. Admin Login\n2. Student Login\n3. Parent Login\n4. Exit");
        match prompt("Enter choice: ")?.as_str() {
            "1" => {
                let user = prompt("Enter Admin Username: ")?;
                let pass = prompt("Enter Password: ")?;
                if creds.verify_admin(&user, &pass)? {
                    admin_menu(store, creds, data_dir)?;
                } else {
                    println!("Wrong admin credentials.");
                }
            }
            "2" => {
                if let Some(roll) = role_login(creds, Role::Student)? {
                    student_menu(store, creds, roll)?;
                } else {
                    println!("Invalid student credentials.");
                }
            }
            "3" => {
                if let Some(roll) = role_login(creds, Role::Parent)? {
                    parent_menu(store, creds, roll)?;
                } else {
                    println!("Invalid parent credentials.");
                }
            }
            "4" => {
                println!("Goodbye.");
                return Ok(());
            }
            _ => println!("Invalid choice."),
        }
    }
}

fn role_login(creds: &CredentialTables, role: Role) -> anyhow::Result<Option<u32>> {
    let label = match role {
        Role::Student => "Roll Number",
        Role::Parent => "Student Roll Number",
    };
    let roll = prompt_roll(&format!("Enter {}: ", label))?;
    let pass = prompt("Enter Password: ")?;
    if creds.verify(role, roll, &pass)? {
        Ok(Some(roll))
    } else {
        Ok(None)
    }
}

fn admin_menu(store: &mut Store, creds: &CredentialTables, data_dir: &Path) -> anyhow::Result<()> {
    loop {
        println!("\n--- ADMIN MENU ---");
        println!(
            "1. Add Student\n2. View Students\n3. Delete Student\n4. Update Marks\n\
             5. View Complaints\n6. Solve Complaint\n7. Change Admin Password\n\
             8. Export Snapshot\n9. Import Snapshot\n10. Logout"
        );
        match prompt("Enter choice: ")?.as_str() {
            "1" => add_student(store)?,
            "2" => view_students(store),
            "3" => delete_student(store)?,
            "4" => update_marks(store)?,
            "5" => view_complaints(store),
            "6" => solve_complaint(store)?,
            "7" => change_admin_password(creds)?,
            "8" => export_snapshot(store, data_dir)?,
            "9" => import_snapshot(store, data_dir)?,
            "10" => return Ok(()),
            _ => println!("Invalid choice."),
        }
    }
}

fn add_student(store: &mut Store) -> anyhow::Result<()> {
    let roll = prompt_roll("Enter Roll Number (numbers only): ")?;
    if store.get(roll).is_some() {
        println!("Roll already exists. Aborting add.");
        return Ok(());
    }
    let name = prompt_name("Enter Student Full Name: ")?;
    let parent_name = prompt_name("Enter Parent Full Name: ")?;
    let mobile = prompt_mobile("Enter Parent Mobile (digits only, 7-15): ")?;

    let mut record = StudentRecord::new(roll, &name, &parent_name, &mobile);
    println!("Enter marks for subjects (0-100):");
    for i in 0..NUM_SUBJECTS {
        record.marks[i] = prompt_mark(&format!("{}: ", SUBJECTS[i]))?;
    }

    match store.add(record) {
        Ok(pw) => {
            println!("\nStudent added successfully.");
            println!("Student Password: {}", pw.student);
            println!("Parent  Password: {}", pw.parent);
        }
        Err(e) => println!("Add failed: {}", e),
    }
    Ok(())
}

fn view_students(store: &Store) {
    if store.records().is_empty() {
        println!("No students present.");
        return;
    }
    println!("\n---- STUDENT LIST ----");
    for st in store.records() {
        let marks: Vec<String> = st.marks.iter().map(|m| m.to_string()).collect();
        let complaint = if st.has_complaint() {
            st.complaint.as_str()
        } else {
            "None"
        };
        println!(
            "{} | {} | {} | {} | Marks: {} | Complaint: {}",
            st.roll,
            st.name,
            st.parent_name,
            st.parent_mobile,
            marks.join(","),
            complaint
        );
    }
}

fn delete_student(store: &mut Store) -> anyhow::Result<()> {
    let roll = prompt_roll("Enter roll number to delete: ")?;
    match store.delete(roll) {
        Ok(()) => println!("Student deleted and related data removed."),
        Err(e) => println!("Delete failed: {}", e),
    }
    Ok(())
}

fn update_marks(store: &mut Store) -> anyhow::Result<()> {
    let roll = prompt_roll("Enter roll number: ")?;
    if store.get(roll).is_none() {
        println!("Student not found.");
        return Ok(());
    }
    println!("Update marks options:\n1. Update all subjects\n2. Update single subject");
    let update = match prompt("Choose: ")?.as_str() {
        "1" => {
            let mut marks = [0.0f32; NUM_SUBJECTS];
            for i in 0..NUM_SUBJECTS {
                marks[i] = prompt_mark(&format!("{}: ", SUBJECTS[i]))?;
            }
            MarkUpdate::All(marks)
        }
        "2" => {
            for (i, s) in SUBJECTS.iter().enumerate() {
                println!("{}. {}", i + 1, s);
            }
            let choice = prompt_roll("Choose subject number: ")? as usize;
            if choice < 1 || choice > NUM_SUBJECTS {
                println!("Invalid subject choice.");
                return Ok(());
            }
            let value = prompt_mark(&format!("Enter marks for {}: ", SUBJECTS[choice - 1]))?;
            MarkUpdate::Single {
                subject: choice - 1,
                value,
            }
        }
        _ => {
            println!("Invalid choice.");
            return Ok(());
        }
    };
    match store.update_marks(roll, update) {
        Ok(()) => println!("Marks updated."),
        Err(e) => println!("Update failed: {}", e),
    }
    Ok(())
}

fn view_complaints(store: &Store) {
    let complaints = store.complaints();
    println!("\n--- Complaints ---");
    if complaints.is_empty() {
        println!("No complaints found.");
        return;
    }
    for (roll, text) in complaints {
        println!("{} | {}", roll, text);
    }
}

fn solve_complaint(store: &mut Store) -> anyhow::Result<()> {
    if store.complaints().is_empty() {
        println!("No complaints to solve.");
        return Ok(());
    }
    let roll = prompt_roll("Enter roll number to mark complaint solved: ")?;
    match store.resolve_complaint(roll) {
        Ok(()) => println!("Complaint removed for roll {}.", roll),
        Err(e) => println!("Could not resolve: {}", e),
    }
    Ok(())
}

fn change_admin_password(creds: &CredentialTables) -> anyhow::Result<()> {
    let old = prompt("Enter old admin password: ")?;
    let new = prompt_new_password()?;
    match creds.change_admin_password(&old, &new) {
        Ok(()) => println!("Admin password changed successfully."),
        Err(e) => println!("Password change failed: {}", e),
    }
    Ok(())
}

fn change_role_password(creds: &CredentialTables, role: Role, roll: u32) -> anyhow::Result<()> {
    let old = prompt("Enter old password: ")?;
    let new = prompt_new_password()?;
    match creds.change_password(role, roll, &old, &new) {
        Ok(()) => println!("Password changed successfully."),
        Err(e) => println!("Password change failed: {}", e),
    }
    Ok(())
}

fn export_snapshot(store: &Store, data_dir: &Path) -> anyhow::Result<()> {
    let name = prompt("Snapshot file name [snapshot.json]: ")?;
    let name = if name.is_empty() { "snapshot.json" } else { name.as_str() };
    match backup::export_snapshot(store.records(), &data_dir.join(name)) {
        Ok(summary) => println!(
            "Exported {} record(s), {} active complaint(s).",
            summary.record_count, summary.complaint_count
        ),
        Err(e) => println!("Export failed: {}", e),
    }
    Ok(())
}

fn import_snapshot(store: &mut Store, data_dir: &Path) -> anyhow::Result<()> {
    let name = prompt("Snapshot file name [snapshot.json]: ")?;
    let name = if name.is_empty() { "snapshot.json" } else { name.as_str() };
    println!("Import replaces all records and regenerates login passwords.");
    if !confirm("Continue? (Y/N): ")? {
        println!("Import cancelled.");
        return Ok(());
    }
    match backup::import_snapshot(&data_dir.join(name)) {
        Ok(records) => {
            let n = records.len();
            store.replace_all(records)?;
            println!("Imported {} record(s).", n);
        }
        Err(e) => println!("Import failed: {}", e),
    }
    Ok(())
}

fn student_menu(store: &mut Store, creds: &CredentialTables, roll: u32) -> anyhow::Result<()> {
    loop {
        println!("\n--- STUDENT MENU ---");
        println!("1. View My Details\n2. Raise Complaint\n3. Change Password\n4. Logout");
        match prompt("Choice: ")?.as_str() {
            "1" => view_record(store, roll, "STUDENT PORTAL"),
            "2" => raise_complaint(store, roll)?,
            "3" => change_role_password(creds, Role::Student, roll)?,
            "4" => return Ok(()),
            _ => println!("Invalid choice."),
        }
    }
}

fn parent_menu(store: &mut Store, creds: &CredentialTables, roll: u32) -> anyhow::Result<()> {
    loop {
        println!("\n--- PARENT MENU ---");
        println!("1. View Child Details\n2. Change Password\n3. Logout");
        match prompt("Choice: ")?.as_str() {
            "1" => view_record(store, roll, "PARENT VIEW"),
            "2" => change_role_password(creds, Role::Parent, roll)?,
            "3" => return Ok(()),
            _ => println!("Invalid choice."),
        }
    }
}

fn view_record(store: &Store, roll: u32, heading: &str) {
    let Some(st) = store.get(roll) else {
        println!("Student record not found.");
        return;
    };
    println!("\n=============================");
    println!("       {}", heading);
    println!("=============================");
    println!("Roll: {}", st.roll);
    println!("Name: {}", st.name);
    println!("Parent: {}", st.parent_name);
    println!(
        "Parent Mobile: {}",
        if st.parent_mobile.is_empty() {
            "N/A"
        } else {
            st.parent_mobile.as_str()
        }
    );
    println!("Marks:");
    for (i, subject) in SUBJECTS.iter().enumerate() {
        println!("  {} : {}", subject, st.marks[i]);
    }
    println!(
        "Complaint: {}",
        if st.has_complaint() {
            st.complaint.as_str()
        } else {
            "None"
        }
    );
}

fn raise_complaint(store: &mut Store, roll: u32) -> anyhow::Result<()> {
    let text = prompt("Enter your complaint (single line):\n")?;
    if text.trim().is_empty() {
        println!("Complaint cannot be empty.");
        return Ok(());
    }
    println!("\nYou entered:\n\"{}\"", text.trim());
    if !confirm("Submit complaint? (Y/N): ")? {
        println!("Complaint cancelled.");
        return Ok(());
    }
    match store.submit_complaint(roll, &text) {
        Ok(()) => println!("Complaint submitted."),
        Err(e) => println!("Could not submit: {}", e),
    }
    Ok(())
}

// ---- prompt helpers ----

fn prompt(msg: &str) -> anyhow::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        bail!("input stream closed");
    }
    Ok(line.trim().to_string())
}

fn confirm(msg: &str) -> anyhow::Result<bool> {
    let answer = prompt(msg)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

fn prompt_roll(msg: &str) -> anyhow::Result<u32> {
    loop {
        let s = prompt(msg)?;
        if is_digits(&s) {
            if let Ok(v) = s.parse::<u32>() {
                return Ok(v);
            }
        }
        println!("Invalid! Enter numbers only.");
    }
}

fn prompt_name(msg: &str) -> anyhow::Result<String> {
    loop {
        let s = prompt(msg)?;
        if is_alpha_or_space(&s) {
            return Ok(s);
        }
        println!("Only alphabets and spaces allowed.");
    }
}

fn prompt_mobile(msg: &str) -> anyhow::Result<String> {
    loop {
        let s = prompt(msg)?;
        if is_valid_mobile(&s) {
            return Ok(s);
        }
        println!("Invalid mobile. Enter digits only (7-15 digits).");
    }
}

fn prompt_mark(msg: &str) -> anyhow::Result<f32> {
    loop {
        let s = prompt(msg)?;
        if let Ok(m) = s.parse::<f32>() {
            if is_valid_mark(m) {
                return Ok(m);
            }
        }
        println!("Invalid marks! Enter a value from 0 to 100.");
    }
}

fn prompt_new_password() -> anyhow::Result<String> {
    loop {
        let s = prompt("Enter new password (min 6 chars): ")?;
        if s.chars().count() >= srms::password::MIN_PASSWORD_LEN {
            return Ok(s);
        }
        println!("Too short! Enter again.");
    }
}
