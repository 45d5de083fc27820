//! Text cleanup of the flattened activity table.
//!
//! Activity names exported from the planning tool carry equipment codes
//! in parentheses (`(BH128; BH129)`), path separators and filler words
//! that break the `;`-joined sub-activity field downstream. The passes
//! run in a fixed order; later ones assume the earlier ones already ran.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::logs::log_success;
use crate::output::write_text;
use crate::parser::read_text;

static PARENTHESIZED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^()]+?)\)").unwrap());
static PARENTHESIZED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((BH\d+)\);").unwrap());
static CODE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(BH\d+);").unwrap());
static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").unwrap());
static PATH_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\\/]").unwrap());

/// Filler word dropped from every line.
pub const REMOVED_WORD: &str = "disponível";

/// Clean one line. A trailing line terminator is kept as is.
pub fn clean_line(line: &str) -> String {
    let text = PARENTHESIZED.replace_all(line, |caps: &Captures| caps[1].replace(';', " "));
    let text = PARENTHESIZED_CODE.replace_all(&text, "${1}");
    let text = CODE_SEPARATOR.replace_all(&text, "${1} ");
    let text = PARENS.replace_all(&text, "");
    let text = PATH_SEPARATORS.replace_all(&text, "");
    text.replace(REMOVED_WORD, "")
}

/// Clean text line by line, keeping line terminators.
pub fn clean_text(text: &str) -> String {
    text.split_inclusive('\n').map(clean_line).collect()
}

/// Result of a cleanup run
#[derive(Debug, Clone, Serialize)]
pub struct CleanupReport {
    pub lines: usize,
    pub changed_lines: usize,
    pub output_path: PathBuf,
}

/// Clean a UTF-8 file into `output`.
pub fn clean_file(input: &Path, output: &Path) -> PipelineResult<CleanupReport> {
    let text = read_text(input)?;

    let mut lines = 0;
    let mut changed_lines = 0;
    let mut cleaned = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let fixed = clean_line(line);
        lines += 1;
        if fixed != line {
            changed_lines += 1;
        }
        cleaned.push_str(&fixed);
    }

    write_text(output, &cleaned)?;
    log_success(format!("Cleaned {} lines ({} changed) → {}", lines, changed_lines, output.display()));

    Ok(CleanupReport {
        lines,
        changed_lines,
        output_path: output.to_path_buf(),
    })
}
