//! Per-language accumulation of line counts.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::LineCounts;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LanguageStats {
    pub name: String,
    /// Files in the order they were accumulated.
    pub files: Vec<PathBuf>,
    pub code: u64,
    pub comment: u64,
    pub blank: u64,
    pub total: u64,
}

impl LanguageStats {
    pub fn new(name: impl Into<String>) -> Self {
        LanguageStats {
            name: name.into(),
            ..LanguageStats::default()
        }
    }

    fn add(&mut self, path: &Path, counts: &LineCounts) {
        self.files.push(path.to_path_buf());
        self.code += counts.code;
        self.comment += counts.comment;
        self.blank += counts.blank;
        self.total += counts.total();
    }
}

/// Reporting order: most code first, ties by name.
pub fn report_order(a: &LanguageStats, b: &LanguageStats) -> Ordering {
    b.code.cmp(&a.code).then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClocFile {
    pub path: PathBuf,
    pub language: String,
    pub counts: LineCounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub languages: HashMap<String, LanguageStats>,
    pub total: LanguageStats,
    pub files: Vec<ClocFile>,
    pub max_path_length: usize,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        AnalysisResult {
            languages: HashMap::new(),
            total: LanguageStats::new("TOTAL"),
            files: Vec::new(),
            max_path_length: 0,
        }
    }
}

impl AnalysisResult {
    pub fn sorted_languages(&self) -> Vec<&LanguageStats> {
        let mut sorted: Vec<_> = self.languages.values().collect();
        sorted.sort_by(|a, b| report_order(a, b));
        sorted
    }

    /// Per-file rows, most code first, ties by path.
    pub fn sorted_files(&self) -> Vec<&ClocFile> {
        let mut sorted: Vec<_> = self.files.iter().collect();
        sorted.sort_by(|a, b| {
            b.counts
                .code
                .cmp(&a.counts.code)
                .then_with(|| a.path.cmp(&b.path))
        });
        sorted
    }
}

/// Single writer folding per-file counts into per-language and grand totals.
/// Each path must be accumulated at most once per run.
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AnalysisResult,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator::default()
    }

    pub fn accumulate(&mut self, language: &str, path: &Path, counts: LineCounts) {
        match self.result.languages.get_mut(language) {
            Some(stats) => stats.add(path, &counts),
            None => {
                let mut stats = LanguageStats::new(language);
                stats.add(path, &counts);
                self.result.languages.insert(language.to_string(), stats);
            }
        }
        self.result.total.add(path, &counts);
        let path_len = path.to_string_lossy().chars().count();
        self.result.max_path_length = self.result.max_path_length.max(path_len);
        self.result.files.push(ClocFile {
            path: path.to_path_buf(),
            language: language.to_string(),
            counts,
        });
    }

    pub fn finish(self) -> AnalysisResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(code: u64, comment: u64, blank: u64) -> LineCounts {
        LineCounts {
            code,
            comment,
            blank,
        }
    }

    #[test]
    fn accumulate_creates_languages_lazily_and_sums() {
        let mut agg = Aggregator::new();
        agg.accumulate("Rust", Path::new("a.rs"), counts(10, 2, 1));
        agg.accumulate("Rust", Path::new("src/b.rs"), counts(5, 0, 3));
        agg.accumulate("Go", Path::new("main.go"), counts(7, 1, 0));
        let result = agg.finish();

        let rust = &result.languages["Rust"];
        assert_eq!(rust.files, vec![PathBuf::from("a.rs"), PathBuf::from("src/b.rs")]);
        assert_eq!((rust.code, rust.comment, rust.blank, rust.total), (15, 2, 4, 21));

        assert_eq!(result.total.name, "TOTAL");
        assert_eq!(result.total.files.len(), 3);
        assert_eq!(
            (result.total.code, result.total.comment, result.total.blank),
            (22, 3, 4)
        );
        assert_eq!(result.total.total, 29);
        assert_eq!(result.max_path_length, "src/b.rs".len());
        assert_eq!(result.files.len(), 3);
    }

    #[test]
    fn same_syntax_languages_accumulate_separately() {
        let mut agg = Aggregator::new();
        agg.accumulate("C", Path::new("x.c"), counts(1, 0, 0));
        agg.accumulate("C Header", Path::new("x.h"), counts(2, 0, 0));
        let result = agg.finish();
        assert_eq!(result.languages.len(), 2);
        assert_eq!(result.languages["C"].code, 1);
        assert_eq!(result.languages["C Header"].code, 2);
    }

    #[test]
    fn accumulating_twice_double_counts() {
        let mut agg = Aggregator::new();
        agg.accumulate("Go", Path::new("main.go"), counts(3, 0, 0));
        agg.accumulate("Go", Path::new("main.go"), counts(3, 0, 0));
        let result = agg.finish();
        assert_eq!(result.languages["Go"].code, 6);
        assert_eq!(result.languages["Go"].files.len(), 2);
    }

    #[test]
    fn report_order_is_code_desc_then_name() {
        fn build(order: &[(&str, u64)]) -> AnalysisResult {
            let mut agg = Aggregator::new();
            for (idx, (lang, code)) in order.iter().enumerate() {
                let path = PathBuf::from(format!("f{idx}"));
                agg.accumulate(lang, &path, counts(*code, 0, 0));
            }
            agg.finish()
        }
        let forward = build(&[("Go", 5), ("C", 9), ("Awk", 5), ("Zig", 1)]);
        let backward = build(&[("Zig", 1), ("Awk", 5), ("C", 9), ("Go", 5)]);
        let names = |r: &AnalysisResult| -> Vec<String> {
            r.sorted_languages().iter().map(|s| s.name.clone()).collect()
        };
        assert_eq!(names(&forward), vec!["C", "Awk", "Go", "Zig"]);
        assert_eq!(names(&forward), names(&backward));
    }

    #[test]
    fn sorted_files_orders_by_code_then_path() {
        let mut agg = Aggregator::new();
        agg.accumulate("Go", Path::new("b.go"), counts(1, 0, 0));
        agg.accumulate("Go", Path::new("a.go"), counts(1, 0, 0));
        agg.accumulate("Rust", Path::new("c.rs"), counts(4, 0, 0));
        let result = agg.finish();
        let paths: Vec<_> = result.sorted_files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("c.rs"), PathBuf::from("a.go"), PathBuf::from("b.go")]
        );
    }

    #[test]
    fn empty_result_has_zero_totals() {
        let result = Aggregator::new().finish();
        assert!(result.languages.is_empty());
        assert_eq!(result.total.total, 0);
        assert_eq!(result.max_path_length, 0);
    }
}
