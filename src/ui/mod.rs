//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_outcome, display_range, display_status, display_success,
    display_unmatched_commits, display_validation_report, display_validation_start,
    display_warning,
};

/// Interpret a yes/no answer. Empty input takes the default; anything
/// unrecognized yields `None` so the caller can ask again.
pub fn parse_answer(input: &str, default_yes: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default_yes),
        "y" | "ye" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask a yes/no question on stdin, repeating until the answer is understood.
///
/// Default is yes: pressing Enter confirms.
///
/// # Returns
/// * `Ok(true)` - The user confirmed
/// * `Ok(false)` - The user declined, or stdin was closed
/// * `Err` - If reading input fails
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    confirm_with(prompt, &mut input, &mut io::stdout())
}

fn confirm_with<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    loop {
        write!(output, "\n{} [Y/n] ", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match parse_answer(&line, true) {
            Some(answer) => return Ok(answer),
            None => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}
