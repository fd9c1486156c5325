//! Terminal output helpers.
//!
//! Everything user-facing goes through here so the status glyphs stay
//! consistent: `✓` for results, `⚠` for degraded-but-continuing situations,
//! `ℹ` for progress and `x` for hard failures. Warnings and errors go to
//! stderr, results to stdout, so `compile_commands ... > out` stays clean.
//!
//! ## Example
//!
//! ```rust
//! use ccgen::ui::Table;
//!
//! let mut table = Table::new(&["Project", "Command"]);
//! table.add_row(vec!["/src/app".to_string(), "-r /src/app".to_string()]);
//! table.print();
//! ```

use colored::*;

pub fn success(msg: impl std::fmt::Display) {
    println!("{} {}", "✓".green(), msg);
}

pub fn info(msg: impl std::fmt::Display) {
    println!("{} {}", "ℹ".blue(), msg);
}

pub fn warn(msg: impl std::fmt::Display) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

pub fn error(msg: impl std::fmt::Display) {
    eprintln!("{} {}", "x".red(), msg);
}

/// Indented secondary line, used under a heading in verbose output.
pub fn detail(label: &str, value: impl std::fmt::Display) {
    println!("   {} {}", format!("{}:", label).dimmed(), value);
}

/// Box-drawn table that shrinks its widest columns to fit the terminal.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| visible_width(h)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(visible_width(&flatten(cell)));
            }
        }
        fit_widths(&mut widths, max_width);

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| {
            let mut out = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let clipped = console::truncate_str(&flatten(cell), *width, "...").to_string();
                let pad = width.saturating_sub(visible_width(&clipped));
                let shown = if bold {
                    clipped.bold().to_string()
                } else {
                    clipped
                };
                out.push_str(&format!(" {}{} │", shown, " ".repeat(pad)));
            }
            out
        };

        let mut lines = vec![rule("┌", "┬", "┐"), line(&self.headers, true)];
        lines.push(rule("├", "┼", "┤"));
        lines.extend(self.rows.iter().map(|row| line(row, false)));
        lines.push(rule("└", "┴", "┘"));
        lines
    }

    pub fn print(&self) {
        let (_rows, cols) = console::Term::stdout().size();
        for line in self.render(cols as usize) {
            println!("{}", line);
        }
    }
}

/// Trim the widest column one character at a time until the table fits,
/// never below 8 characters per column.
fn fit_widths(widths: &mut [usize], max_width: usize) {
    let overhead = 3 + 3 * widths.len();
    let budget = max_width.saturating_sub(overhead);
    while widths.iter().sum::<usize>() > budget {
        match widths.iter_mut().max_by_key(|w| **w) {
            Some(widest) if *widest > 8 => *widest -= 1,
            _ => break,
        }
    }
}

fn flatten(cell: &str) -> String {
    cell.replace(['\n', '\r', '\t'], " ")
}

fn visible_width(s: &str) -> usize {
    console::measure_text_width(s)
}
