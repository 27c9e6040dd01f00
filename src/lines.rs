use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Reads a file line by line, converting invalid UTF-8 sequences using replacement characters.
/// Line terminators (`\n`, `\r\n`) are stripped; a final line without a terminator is still yielded.
pub struct LossyLineReader {
    reader: BufReader<Box<dyn Read + Send>>,
    buffer: Vec<u8>,
}

impl LossyLineReader {
    fn new(file: fs::File) -> Self {
        Self::from_reader(Box::new(file))
    }

    pub fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
        }
    }
}

impl Iterator for LossyLineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&self.buffer);
                let line = text.trim_end_matches(['\n', '\r']).to_string();
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

pub fn read_file_lines_lossy(file_path: &Path) -> io::Result<LossyLineReader> {
    let file = fs::File::open(file_path)?;
    Ok(LossyLineReader::new(file))
}

// Longest first line read when probing for an interpreter.
const FIRST_LINE_LIMIT: u64 = 4096;

/// First line of the file, cut at `FIRST_LINE_LIMIT` bytes, or `None` when
/// it is empty or cannot be read.
pub fn read_first_line(file_path: &Path) -> Option<String> {
    let file = fs::File::open(file_path).ok()?;
    LossyLineReader::from_reader(Box::new(file.take(FIRST_LINE_LIMIT)))
        .next()?
        .ok()
}
