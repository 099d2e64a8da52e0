use std::io::{self, BufRead, Write};

use colored::Colorize;

/// Print `question` and read one trimmed answer. `None` means end of input.
pub fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<Option<String>> {
    write!(output, "{} {} ", "?".yellow().bold(), question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// `[y/n]` question where only an explicit yes counts.
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    Ok(matches!(
        ask(input, output, question)?.map(|a| a.to_lowercase()).as_deref(),
        Some("y") | Some("yes")
    ))
}

/// `[Y/n]` question where an empty answer counts as yes.
pub fn confirm_default_yes<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    Ok(matches!(
        ask(input, output, question)?.map(|a| a.to_lowercase()).as_deref(),
        Some("") | Some("y") | Some("yes")
    ))
}

/// Parse `1, 3,x,9` into zero-based indices below `len`, dropping anything invalid.
pub fn parse_selection(answer: &str, len: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for part in answer.split(',') {
        if let Ok(n) = part.trim().parse::<usize>() {
            if n >= 1 && n <= len && !picked.contains(&(n - 1)) {
                picked.push(n - 1);
            }
        }
    }
    picked
}
