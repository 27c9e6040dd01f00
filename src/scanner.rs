//! Line classification.
//!
//! A [`LineScanner`] walks a file's lines in order and labels each one blank,
//! comment or code using a language's comment syntax. Block comments are
//! tracked with an explicit [`ScanState`] carried from line to line:
//!
//! - while a block is open every line is a comment, whitespace-only lines
//!   included, and only the end delimiter of the pair that opened it closes it;
//! - a line that starts with a block opener is a comment, checked before the
//!   language's line-comment prefixes;
//! - a line that starts with a line-comment prefix is a comment;
//! - a line that leaves a block open is a comment; anything else with
//!   non-whitespace text is code.
//!
//! A block still open at end of input is simply unterminated; the lines
//! already counted stand.

use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::trace;

use crate::language::LanguageDefinition;
use crate::lines::read_file_lines_lossy;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineCounts {
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
}

impl LineCounts {
    pub fn total(&self) -> u64 {
        self.code + self.comment + self.blank
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// `InBlock` holds the index of the open pair in the language's
/// `block_comments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InBlock(usize),
}

pub struct LineScanner<'a> {
    language: &'a LanguageDefinition,
    state: ScanState,
    seen_content: bool,
    counts: LineCounts,
}

impl<'a> LineScanner<'a> {
    pub fn new(language: &'a LanguageDefinition) -> Self {
        LineScanner {
            language,
            state: ScanState::Normal,
            seen_content: false,
            counts: LineCounts::default(),
        }
    }

    /// Classify one line (without its terminator) and fold it into the counts.
    pub fn push_line(&mut self, line: &str) -> LineKind {
        let trimmed = line.trim();
        let kind = match self.state {
            ScanState::InBlock(pair) => {
                self.state = self.settle(trimmed, ScanState::InBlock(pair));
                LineKind::Comment
            }
            ScanState::Normal => self.classify_normal(trimmed),
        };
        if !trimmed.is_empty() {
            self.seen_content = true;
        }
        match kind {
            LineKind::Blank => self.counts.blank += 1,
            LineKind::Comment => self.counts.comment += 1,
            LineKind::Code => self.counts.code += 1,
        }
        trace!(language = self.language.name, ?kind, state = ?self.state, line = trimmed);
        kind
    }

    pub fn finish(self) -> LineCounts {
        self.counts
    }

    fn classify_normal(&mut self, trimmed: &str) -> LineKind {
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if !self.language.has_comment_syntax() {
            return LineKind::Code;
        }
        // An interpreter line is code even where `#` starts a comment.
        if !self.seen_content && trimmed.starts_with("#!") {
            return LineKind::Code;
        }
        if let Some((pair, (start, _))) = self
            .language
            .block_pairs()
            .find(|(_, (start, _))| trimmed.starts_with(start))
        {
            self.state = self.settle(&trimmed[start.len()..], ScanState::InBlock(pair));
            return LineKind::Comment;
        }
        if self
            .language
            .line_comments
            .iter()
            .any(|prefix| !prefix.is_empty() && trimmed.starts_with(prefix))
        {
            return LineKind::Comment;
        }
        match self.find_opener(trimmed) {
            None => LineKind::Code,
            Some((pair, at)) => {
                let start = self.language.block_comments[pair].0;
                self.state = self.settle(&trimmed[at + start.len()..], ScanState::InBlock(pair));
                match self.state {
                    ScanState::InBlock(_) => LineKind::Comment,
                    ScanState::Normal => LineKind::Code,
                }
            }
        }
    }

    /// Run the rest of a line through the block state machine and return the
    /// state in effect at its end.
    fn settle(&self, mut text: &str, mut state: ScanState) -> ScanState {
        loop {
            match state {
                ScanState::InBlock(pair) => {
                    let end = self.language.block_comments[pair].1;
                    match text.find(end) {
                        Some(at) => {
                            text = &text[at + end.len()..];
                            state = ScanState::Normal;
                        }
                        None => return state,
                    }
                }
                ScanState::Normal => match self.find_opener(text) {
                    Some((pair, at)) => {
                        let start = self.language.block_comments[pair].0;
                        text = &text[at + start.len()..];
                        state = ScanState::InBlock(pair);
                    }
                    None => return ScanState::Normal,
                },
            }
        }
    }

    /// First block opener in declaration order that occurs in `text`, unless
    /// a line comment starts before it.
    fn find_opener(&self, text: &str) -> Option<(usize, usize)> {
        let (pair, at) = self
            .language
            .block_pairs()
            .find_map(|(idx, (start, _))| find_outside_strings(text, start).map(|at| (idx, at)))?;
        let line_comment = self
            .language
            .line_comments
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .filter_map(|prefix| find_outside_strings(text, prefix))
            .min();
        match line_comment {
            Some(lc) if lc < at => None,
            _ => Some((pair, at)),
        }
    }
}

/// Byte offset of `needle` in `text`, skipping double-quoted string literals.
/// Delimiters that contain a quote themselves are searched for verbatim.
fn find_outside_strings(text: &str, needle: &str) -> Option<usize> {
    if needle.contains('"') {
        return text.find(needle);
    }
    let bytes = text.as_bytes();
    let needle = needle.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 2,
                b'"' => {
                    in_string = false;
                    i += 1;
                }
                _ => i += 1,
            }
            continue;
        }
        if bytes[i..].starts_with(needle) {
            return Some(i);
        }
        // '"' and '\"' are character literals, not string openers
        if b == b'\'' {
            match (bytes.get(i + 1), bytes.get(i + 2), bytes.get(i + 3)) {
                (Some(b'"'), Some(b'\''), _) => {
                    i += 3;
                    continue;
                }
                (Some(b'\\'), Some(b'"'), Some(b'\'')) => {
                    i += 4;
                    continue;
                }
                _ => {}
            }
        }
        if b == b'"' {
            in_string = true;
        }
        i += 1;
    }
    None
}

/// Count a file on disk. Any read failure fails the whole file so that no
/// partial counts are ever reported for it. Once `cancel` is set the read is
/// abandoned with an `Interrupted` error.
pub fn scan_file(
    path: &Path,
    language: &LanguageDefinition,
    cancel: &AtomicBool,
) -> io::Result<LineCounts> {
    let mut scanner = LineScanner::new(language);
    for line in read_file_lines_lossy(path)? {
        if cancel.load(Ordering::Relaxed) {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "scan cancelled"));
        }
        scanner.push_line(&line?);
    }
    Ok(scanner.finish())
}
