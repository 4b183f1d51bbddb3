//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::registry::KeyInfo;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a bold section heading framed by rules.
pub fn section(title: &str) {
    let rule = "=".repeat(60);
    println!("\n{}", style(&rule).dim());
    println!("  {}", style(title).bold());
    println!("{}\n", style(&rule).dim());
}

/// Print an arbitrary table with the given header and rows.
pub fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

/// Print a table of registered keys (Name, Fingerprint, Created).
pub fn print_keys_table(keys: &[KeyInfo]) {
    if keys.is_empty() {
        info("No data keys registered yet.");
        tip("Run `fieldseal keygen <NAME>` to create your first key.");
        return;
    }

    let rows = keys
        .iter()
        .map(|k| {
            vec![
                k.name.clone(),
                k.fingerprint.clone(),
                k.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]
        })
        .collect();

    print_table(&["Name", "Fingerprint", "Created"], rows);
}

/// Shorten a long value for table display: the first `max - 3`
/// characters followed by "...".
pub fn preview(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let keep = max.saturating_sub(3);
    let head: String = value.chars().take(keep).collect();
    format!("{head}...")
}
