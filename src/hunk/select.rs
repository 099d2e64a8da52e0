//! Interactive keep/skip/quit/detail prompt over parsed hunks.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use super::{DiffLine, Hunk};

/// Body lines shown before the preview is cut off.
pub const PREVIEW_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Skip,
    Quit,
    Detail,
}

impl Decision {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "y" => Some(Self::Keep),
            "n" => Some(Self::Skip),
            "q" => Some(Self::Quit),
            "d" => Some(Self::Detail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub hunks: Vec<Hunk>,
    /// Set when the operator quit before seeing every hunk.
    pub aborted: bool,
}

/// A decision that moves past the current hunk.
enum Answer {
    Keep,
    Skip,
    Quit,
}

pub struct HunkSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HunkSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Walk every file's hunks in order and collect the ones marked to keep.
    pub fn select(&mut self, files: &[(String, Vec<Hunk>)]) -> io::Result<Selection> {
        let mut selection = Selection::default();

        for (path, hunks) in files {
            if hunks.is_empty() {
                continue;
            }

            writeln!(self.output)?;
            writeln!(self.output, "{} {}", "File:".bold(), path.cyan())?;
            writeln!(self.output, "{}", "─".repeat(50).dimmed())?;

            for (i, hunk) in hunks.iter().enumerate() {
                writeln!(self.output)?;
                writeln!(
                    self.output,
                    "{} {}",
                    format!("Hunk {}/{}:", i + 1, hunks.len()).bold(),
                    hunk.summary().dimmed()
                )?;
                self.preview(hunk)?;

                match self.decide(hunk)? {
                    Answer::Keep => selection.hunks.push(hunk.clone()),
                    Answer::Skip => {}
                    Answer::Quit => {
                        selection.aborted = true;
                        return Ok(selection);
                    }
                }
            }
        }

        Ok(selection)
    }

    /// Prompt until a consuming decision is made. `d` reprints the hunk and asks again.
    fn decide(&mut self, hunk: &Hunk) -> io::Result<Answer> {
        loop {
            write!(
                self.output,
                "\n{} Stage this hunk? [y/n/q/d] ",
                "?".yellow().bold()
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(Answer::Quit);
            }

            match Decision::parse(&line) {
                Some(Decision::Detail) => {
                    writeln!(self.output, "\n{}", "Full hunk content:".bold())?;
                    writeln!(self.output, "{}", hunk.header.cyan())?;
                    for line in &hunk.lines {
                        self.write_line(line, "")?;
                    }
                }
                Some(Decision::Keep) => return Ok(Answer::Keep),
                Some(Decision::Skip) => return Ok(Answer::Skip),
                Some(Decision::Quit) => return Ok(Answer::Quit),
                None => {
                    writeln!(
                        self.output,
                        "  {}",
                        "y=stage, n=skip, q=quit, d=show full hunk".dimmed()
                    )?;
                }
            }
        }
    }

    fn preview(&mut self, hunk: &Hunk) -> io::Result<()> {
        writeln!(self.output, "{}", hunk.header.cyan())?;
        for line in hunk.lines.iter().take(PREVIEW_LINES) {
            self.write_line(line, "  ")?;
        }
        if hunk.lines.len() > PREVIEW_LINES {
            writeln!(self.output, "  {}", "... (truncated)".dimmed())?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &DiffLine, indent: &str) -> io::Result<()> {
        let text = line.render();
        match line {
            DiffLine::Added(_) => writeln!(self.output, "{}{}", indent, text.green()),
            DiffLine::Removed(_) => writeln!(self.output, "{}{}", indent, text.red()),
            DiffLine::Context(_) => writeln!(self.output, "{}{}", indent, text),
        }
    }
}
