//! Rendering of an [`AnalysisResult`] as a text table or JSON.

use std::fmt::Write as FmtWrite;

use serde::Serialize;

use crate::error::Result;
use crate::scanner::LineCounts;
use crate::stats::{AnalysisResult, ClocFile};

const LANGUAGE_HEADER: &str = "Language";
const FILE_HEADER: &str = "File";
const COMMON_HEADER: &str = "files          blank        comment           code";
// Name column of the per-language table.
const NAME_WIDTH: usize = 27;

fn separator(output: &mut String, width: usize) {
    let _ = writeln!(output, "{}", "-".repeat(width));
}

/// Per-language table, or one row per file when `by_file` is set. Both end
/// with a TOTAL row.
pub fn build_table_report(result: &AnalysisResult, by_file: bool) -> String {
    let mut output = String::new();
    let name_width = if by_file {
        result.max_path_length.max(NAME_WIDTH)
    } else {
        NAME_WIDTH
    };
    let row_len = name_width + COMMON_HEADER.len() + 2;
    let header = if by_file { FILE_HEADER } else { LANGUAGE_HEADER };

    separator(&mut output, row_len);
    let _ = writeln!(
        output,
        "{:<width$} {}",
        header,
        COMMON_HEADER,
        width = name_width + 1
    );
    separator(&mut output, row_len);

    if by_file {
        for file in result.sorted_files() {
            let _ = writeln!(
                output,
                "{:<width$} {:>21} {:>14} {:>14}",
                file.path.display().to_string(),
                file.counts.blank,
                file.counts.comment,
                file.counts.code,
                width = name_width
            );
        }
    } else {
        for stats in result.sorted_languages() {
            let _ = writeln!(
                output,
                "{:<width$} {:>6} {:>14} {:>14} {:>14}",
                stats.name,
                stats.files.len(),
                stats.blank,
                stats.comment,
                stats.code,
                width = name_width
            );
        }
    }

    separator(&mut output, row_len);
    let total = &result.total;
    let _ = writeln!(
        output,
        "{:<width$} {:>6} {:>14} {:>14} {:>14}",
        total.name,
        total.files.len(),
        total.blank,
        total.comment,
        total.code,
        width = name_width
    );
    separator(&mut output, row_len);
    output
}

#[derive(Serialize)]
struct JsonLanguage<'a> {
    name: &'a str,
    files: usize,
    code: u64,
    comment: u64,
    blank: u64,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    name: String,
    language: &'a str,
    #[serde(flatten)]
    counts: LineCounts,
}

#[derive(Serialize)]
struct JsonTotal {
    files: usize,
    code: u64,
    comment: u64,
    blank: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    languages: Option<Vec<JsonLanguage<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<JsonFile<'a>>>,
    total: JsonTotal,
}

/// JSON document with a `languages` array (or `files` when `by_file`) and a
/// `total` object, rows in reporting order.
pub fn build_json_report(result: &AnalysisResult, by_file: bool) -> Result<String> {
    let (languages, files) = if by_file {
        let files = result
            .sorted_files()
            .into_iter()
            .map(|file| JsonFile {
                name: file.path.display().to_string(),
                language: &file.language,
                counts: file.counts,
            })
            .collect();
        (None, Some(files))
    } else {
        let languages = result
            .sorted_languages()
            .into_iter()
            .map(|stats| JsonLanguage {
                name: &stats.name,
                files: stats.files.len(),
                code: stats.code,
                comment: stats.comment,
                blank: stats.blank,
            })
            .collect();
        (Some(languages), None)
    };
    let report = JsonReport {
        languages,
        files,
        total: JsonTotal {
            files: result.total.files.len(),
            code: result.total.code,
            comment: result.total.comment,
            blank: result.total.blank,
        },
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn format_file_details(file: &ClocFile) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "File: {}", file.path.display());
    let _ = writeln!(output, "  Language: {}", file.language);
    let _ = writeln!(output, "  Code lines: {}", file.counts.code);
    let _ = writeln!(output, "  Comment lines: {}", file.counts.comment);
    let _ = writeln!(output, "  Blank lines: {}", file.counts.blank);
    output
}
