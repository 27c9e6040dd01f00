//! Drives classification and scanning over a list of files.
//!
//! Files are classified and scanned independently on a rayon pool; the
//! per-file outcomes come back in input order and are folded into a single
//! [`Aggregator`] on the calling thread.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::{Classification, Classifier};
use crate::config::ClocOptions;
use crate::error::{ClocError, Result};
use crate::language::Registry;
use crate::scanner::{scan_file, LineCounts};
use crate::stats::{AnalysisResult, Aggregator};

pub struct Processor<'r> {
    registry: &'r Registry,
    options: ClocOptions,
    cancel: Arc<AtomicBool>,
}

impl<'r> Processor<'r> {
    pub fn new(registry: &'r Registry, options: ClocOptions) -> Result<Self> {
        registry.validate()?;
        Ok(Processor {
            registry,
            options,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Setting the returned flag stops workers from opening further files
    /// and abandons reads in progress. Files already counted are still part
    /// of the result.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn analyze(&self, paths: &[PathBuf]) -> Result<AnalysisResult> {
        let outcomes = match self.options.jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|err| ClocError::ThreadPool(err.to_string()))?;
                pool.install(|| self.process_all(paths))
            }
            None => self.process_all(paths),
        };

        let mut aggregator = Aggregator::new();
        for (path, outcome) in paths.iter().zip(outcomes) {
            if let Some((language, counts)) = outcome {
                aggregator.accumulate(language, path, counts);
            }
        }
        Ok(aggregator.finish())
    }

    fn process_all(&self, paths: &[PathBuf]) -> Vec<Option<(&'static str, LineCounts)>> {
        paths.par_iter().map(|path| self.process(path)).collect()
    }

    /// Classify and count one file. `None` means the file is left out of
    /// the result: cancelled, filtered, unrecognized or unreadable.
    fn process(&self, path: &Path) -> Option<(&'static str, LineCounts)> {
        if self.cancel.load(Ordering::Relaxed) {
            return None;
        }
        if self.options.excludes_extension(path) {
            debug!(path = %path.display(), "excluded by extension");
            return None;
        }
        let (language, rule) = match Classifier::new(self.registry).classify(path, None) {
            Classification::Language { name, rule } => (name, rule),
            Classification::Skipped { rule } => {
                debug!(path = %path.display(), rule, "skipped by name");
                return None;
            }
            Classification::Unrecognized => return None,
        };
        if !self.options.includes_language(language) {
            return None;
        }
        let definition = self.registry.lookup(language)?;
        match scan_file(path, definition, &self.cancel) {
            Ok(counts) => {
                debug!(
                    path = %path.display(),
                    language,
                    rule,
                    code = counts.code,
                    comment = counts.comment,
                    blank = counts.blank,
                    "counted"
                );
                Some((language, counts))
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                debug!(path = %path.display(), "scan abandoned");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageDefinition;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    fn processor(options: ClocOptions) -> Processor<'static> {
        Processor::new(Registry::builtin(), options).expect("builtin registry is valid")
    }

    #[test]
    fn analyzes_mixed_tree() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path();
        let paths = vec![
            write(dir, "main.c", "/* header */\nint main() {\n\n  return 0;\n}\n")?,
            write(dir, "util.h", "// decl\nint util(void);\n")?,
            write(dir, "script", "#!/usr/bin/env python\n# hi\nprint(1)\n")?,
            write(dir, "README", "not counted\n")?,
            write(dir, "rebar", "#!/usr/bin/env escript\n")?,
        ];
        let result = processor(ClocOptions::default())
            .analyze(&paths)
            .expect("analysis");

        assert_eq!(result.languages.len(), 3);
        let c = &result.languages["C"];
        assert_eq!((c.code, c.comment, c.blank), (3, 1, 1));
        let h = &result.languages["C Header"];
        assert_eq!((h.code, h.comment, h.blank), (1, 1, 0));
        let py = &result.languages["Python"];
        assert_eq!((py.code, py.comment, py.blank), (2, 1, 0));
        assert_eq!(py.files, vec![paths[2].clone()]);

        assert_eq!(result.total.files.len(), 3);
        assert_eq!(result.total.total, 5 + 2 + 3);
        Ok(())
    }

    #[test]
    fn unreadable_file_is_left_out() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path();
        let good = write(dir, "ok.go", "package main\n")?;
        let gone = dir.join("gone.go");
        // a directory with a source extension opens but cannot be read as a file
        let not_a_file = dir.join("pkg.rs");
        fs::create_dir(&not_a_file)?;

        let result = processor(ClocOptions::default())
            .analyze(&[gone.clone(), good.clone(), not_a_file.clone()])
            .expect("analysis completes");
        assert_eq!(result.languages.len(), 1);
        assert_eq!(result.languages["Go"].files, vec![good]);
        assert!(!result.total.files.contains(&gone));
        assert!(!result.total.files.contains(&not_a_file));
        assert_eq!(result.total.code, 1);
        Ok(())
    }

    #[test]
    fn result_is_independent_of_input_order_and_threads() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path();
        let mut paths = Vec::new();
        for idx in 0..20 {
            let body = "fn f() {}\n".repeat(idx % 4 + 1);
            paths.push(write(dir, &format!("f{idx}.rs"), &body)?);
            paths.push(write(dir, &format!("g{idx}.go"), "// c\npackage g\n")?);
        }
        let names = |result: &AnalysisResult| -> Vec<(String, u64)> {
            result
                .sorted_languages()
                .iter()
                .map(|s| (s.name.clone(), s.code))
                .collect()
        };

        let serial = processor(ClocOptions {
            jobs: Some(1),
            ..ClocOptions::default()
        })
        .analyze(&paths)
        .expect("serial");
        let mut reversed = paths.clone();
        reversed.reverse();
        let parallel = processor(ClocOptions {
            jobs: Some(4),
            ..ClocOptions::default()
        })
        .analyze(&reversed)
        .expect("parallel");

        assert_eq!(names(&serial), names(&parallel));
        assert_eq!(names(&serial), vec![("Rust".to_string(), 50), ("Go".to_string(), 20)]);
        let rust_files: Vec<_> = paths.iter().filter(|p| p.extension().unwrap() == "rs").cloned().collect();
        assert_eq!(serial.languages["Rust"].files, rust_files);
        Ok(())
    }

    #[test]
    fn filters_apply_before_counting() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let dir = temp_dir.path();
        let paths = vec![
            write(dir, "a.js", "let a = 1;\n")?,
            write(dir, "b.rs", "fn b() {}\n")?,
            write(dir, "c.go", "package c\n")?,
        ];
        let mut options = ClocOptions::default();
        options.exclude_exts.insert("js".into());
        options.include_langs.insert("Rust".into());
        options.include_langs.insert("JavaScript".into());
        let result = processor(options).analyze(&paths).expect("analysis");
        let names: Vec<_> = result.languages.keys().cloned().collect();
        assert_eq!(names, vec!["Rust".to_string()]);
        Ok(())
    }

    #[test]
    fn cancelled_run_returns_empty_but_valid_result() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = write(temp_dir.path(), "a.rs", "fn a() {}\n")?;
        let processor = processor(ClocOptions::default());
        processor.cancel_handle().store(true, Ordering::Relaxed);
        let result = processor.analyze(&[path]).expect("analysis");
        assert!(result.languages.is_empty());
        assert_eq!(result.total.total, 0);
        Ok(())
    }

    #[test]
    fn empty_registry_is_a_hard_failure() {
        static EMPTY: [LanguageDefinition; 0] = [];
        let registry = Registry::from_tables(&EMPTY, &[]);
        let err = Processor::new(&registry, ClocOptions::default()).err();
        assert!(matches!(err, Some(ClocError::EmptyRegistry(_))));
    }
}
