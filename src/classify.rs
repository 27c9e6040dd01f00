//! Decide which language a file belongs to.
//!
//! Classification runs an ordered list of independent rules; the first one
//! that returns a verdict wins:
//!
//! 1. ambiguous extensions (`.m`, `.v`, `.fs`, `.r`, `.ts`, `.mo`) are decided
//!    by sniffing the file content,
//! 2. exact special filenames (`CMakeLists.txt`, `pom.xml`, ...),
//! 3. case-insensitive filenames (`makefile`, ...; `rebar` is skipped),
//! 4. a `#!` interpreter line,
//! 5. the raw extension.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::language::{
    Registry, AMBIGUOUS_EXTENSIONS, INTERPRETERS, NOCASE_FILENAMES, SPECIAL_FILENAMES,
};
use crate::lines::read_first_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Language {
        name: &'static str,
        rule: &'static str,
    },
    /// Deliberately excluded by name; not an error.
    Skipped { rule: &'static str },
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Language(&'static str),
    Skip,
    Unrecognized,
}

/// What a rule may look at. `content` is the caller-supplied file text; when
/// absent, rules that need content read the file themselves.
struct Candidate<'a> {
    path: &'a Path,
    basename: Option<&'a str>,
    extension: Option<&'a str>,
    content: Option<&'a str>,
}

type Rule = fn(&Candidate<'_>, &Registry) -> Option<Verdict>;

const RULES: &[(&str, Rule)] = &[
    ("ambiguous-extension", ambiguous_extension),
    ("special-filename", special_filename),
    ("filename-nocase", nocase_filename),
    ("shebang", shebang),
    ("extension", raw_extension),
];

pub struct Classifier<'r> {
    registry: &'r Registry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Classifier { registry }
    }

    pub fn classify(&self, path: &Path, content: Option<&str>) -> Classification {
        let candidate = Candidate {
            path,
            basename: path.file_name().and_then(|name| name.to_str()),
            extension: path.extension().and_then(|ext| ext.to_str()),
            content,
        };
        for &(rule, apply) in RULES {
            let Some(verdict) = apply(&candidate, self.registry) else {
                continue;
            };
            let classification = match verdict {
                Verdict::Language(name) => Classification::Language { name, rule },
                Verdict::Skip => Classification::Skipped { rule },
                Verdict::Unrecognized => Classification::Unrecognized,
            };
            debug!(path = %path.display(), rule, ?classification, "classified");
            return classification;
        }
        debug!(path = %path.display(), "unrecognized");
        Classification::Unrecognized
    }
}

fn ambiguous_extension(candidate: &Candidate<'_>, _registry: &Registry) -> Option<Verdict> {
    let ext = candidate.extension?.to_lowercase();
    AMBIGUOUS_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)?;
    let bytes: Cow<'_, [u8]> = match candidate.content {
        Some(text) => Cow::Borrowed(text.as_bytes()),
        None => match fs::read(candidate.path) {
            Ok(bytes) => Cow::Owned(bytes),
            Err(_) => return Some(Verdict::Unrecognized),
        },
    };
    Some(match sniff(&ext, &bytes) {
        Some(name) => Verdict::Language(name),
        None => Verdict::Unrecognized,
    })
}

fn special_filename(candidate: &Candidate<'_>, _registry: &Registry) -> Option<Verdict> {
    let basename = candidate.basename?;
    SPECIAL_FILENAMES
        .iter()
        .find(|(name, _)| *name == basename)
        .map(|(_, lang)| Verdict::Language(*lang))
}

fn nocase_filename(candidate: &Candidate<'_>, _registry: &Registry) -> Option<Verdict> {
    let lower = candidate.basename?.to_lowercase();
    NOCASE_FILENAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, lang)| match lang {
            Some(lang) => Verdict::Language(*lang),
            None => Verdict::Skip,
        })
}

/// Unreadable files simply have no shebang. Once an interpreter is named
/// the extension is never consulted; an unknown one leaves the file
/// unrecognized.
fn shebang(candidate: &Candidate<'_>, registry: &Registry) -> Option<Verdict> {
    let first_line = match candidate.content {
        Some(text) => text.lines().next().map(str::to_string),
        None => read_first_line(candidate.path),
    }?;
    let interpreter = interpreter_from_shebang(&first_line)?;
    Some(
        registry
            .language_for_extension(interpreter_extension(interpreter))
            .map_or(Verdict::Unrecognized, Verdict::Language),
    )
}

fn raw_extension(candidate: &Candidate<'_>, registry: &Registry) -> Option<Verdict> {
    registry
        .language_for_extension(candidate.extension?)
        .map(Verdict::Language)
}

/// Interpreter name from a `#!` line: `NAME` for `#!/usr/bin/env NAME`,
/// otherwise the last path segment. Only the leading ASCII letters count, so
/// `python3` yields `python`.
pub fn interpreter_from_shebang(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("#!")?;
    let mut tokens = rest.split_whitespace();
    let program = tokens.next()?;
    if program.ends_with("/env") {
        if let Some(name) = tokens.next().map(leading_letters).filter(|n| !n.is_empty()) {
            return Some(name);
        }
    }
    let (_, last) = program.rsplit_once('/')?;
    let name = leading_letters(last);
    (!name.is_empty()).then_some(name)
}

/// Canonical extension for an interpreter; unmapped names are used verbatim.
pub fn interpreter_extension(interpreter: &str) -> &str {
    INTERPRETERS
        .iter()
        .find(|(name, _)| *name == interpreter)
        .map(|(_, ext)| *ext)
        .unwrap_or(interpreter)
}

fn leading_letters(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    &s[..end]
}

fn has_line_starting_with(text: &str, prefixes: &[&str]) -> bool {
    text.lines()
        .map(str::trim_start)
        .any(|line| prefixes.iter().any(|p| line.starts_with(p)))
}

/// Pick a language for an ambiguous extension from the file's content.
fn sniff(ext: &str, bytes: &[u8]) -> Option<&'static str> {
    if ext == "mo" {
        // Compiled gettext catalogs share the extension and are binary.
        return std::str::from_utf8(bytes).ok().map(|_| "Motoko");
    }
    let text = String::from_utf8_lossy(bytes);
    let name = match ext {
        "m" => {
            const OBJC: &[&str] = &["@interface", "@implementation", "@end", "#import", "@property"];
            const MERCURY: &[&str] = &[":- module", ":- interface", ":- implementation"];
            if has_line_starting_with(&text, OBJC) {
                "Objective-C"
            } else if has_line_starting_with(&text, MERCURY) {
                "Mercury"
            } else {
                "MATLAB"
            }
        }
        "v" => {
            const COQ: &[&str] = &[
                "Require ",
                "Theorem ",
                "Lemma ",
                "Proof.",
                "Qed.",
                "Definition ",
                "Inductive ",
                "Fixpoint ",
            ];
            if has_line_starting_with(&text, COQ) {
                "Coq"
            } else {
                "Verilog"
            }
        }
        "fs" => {
            const GLSL: &[&str] = &["#version", "uniform ", "varying ", "layout("];
            if has_line_starting_with(&text, GLSL) || text.contains("gl_")
            {
                "GLSL"
            } else {
                "F#"
            }
        }
        "r" => {
            if text.trim_start().to_ascii_uppercase().starts_with("REBOL") {
                "Rebol"
            } else {
                "R"
            }
        }
        "ts" => {
            let head = text.trim_start();
            if head.starts_with("<?xml")
                || head.starts_with("<TS")
                || head.contains("<!DOCTYPE TS")
            {
                "XML"
            } else {
                "TypeScript"
            }
        }
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    impl Classification {
        fn language(&self) -> Option<&'static str> {
            match self {
                Classification::Language { name, .. } => Some(*name),
                _ => None,
            }
        }
    }

    fn classify(path: &str, content: Option<&str>) -> Classification {
        Classifier::new(Registry::builtin()).classify(Path::new(path), content)
    }

    fn language(path: &str, content: Option<&str>) -> Option<&'static str> {
        classify(path, content).language()
    }

    #[test]
    fn shebang_overrides_missing_extension() {
        let got = classify("bin/script", Some("#!/usr/bin/env python\nprint(1)\n"));
        assert_eq!(
            got,
            Classification::Language {
                name: "Python",
                rule: "shebang"
            }
        );
    }

    #[test]
    fn shebang_overrides_extension() {
        assert_eq!(language("tool.txt", Some("#!/bin/bash\necho\n")), Some("BASH"));
        assert_eq!(language("tool.txt", Some("echo\n")), Some("Plain Text"));
    }

    #[test]
    fn unknown_interpreter_is_unrecognized() {
        assert_eq!(
            classify("run.sh", Some("#!/usr/bin/env node\nconsole.log(1)\n")),
            Classification::Unrecognized
        );
        assert_eq!(language("run.rb", Some("#!/opt/weird\n")), None);
        assert_eq!(language("run", Some("#!/opt/weird\n")), None);
        // no interpreter named at all: the extension still decides
        assert_eq!(language("run.rb", Some("#!\n")), Some("Ruby"));
    }

    #[test]
    fn interpreter_parsing() {
        assert_eq!(interpreter_from_shebang("#!/usr/bin/env python3"), Some("python"));
        assert_eq!(interpreter_from_shebang("#! /usr/bin/perl -w"), Some("perl"));
        assert_eq!(interpreter_from_shebang("  #!/bin/sh"), Some("sh"));
        assert_eq!(interpreter_from_shebang("#!/usr/bin/env -S node"), Some("env"));
        assert_eq!(interpreter_from_shebang("#!sh"), None);
        assert_eq!(interpreter_from_shebang("# comment"), None);
        assert_eq!(interpreter_extension("python"), "py");
        assert_eq!(interpreter_extension("rc"), "plan9sh");
        assert_eq!(interpreter_extension("zsh"), "zsh");
    }

    #[test]
    fn interpreter_table_resolves_through_registry() {
        assert_eq!(language("x", Some("#!/usr/bin/env ruby\n")), Some("Ruby"));
        assert_eq!(language("x", Some("#!/bin/rc\n")), Some("Plan9 Shell"));
        assert_eq!(language("x", Some("#!/usr/bin/escript\n")), Some("Erlang"));
        assert_eq!(language("x", Some("#!/usr/bin/make -f\n")), Some("Makefile"));
    }

    #[test]
    fn special_filenames_win_over_extension_and_shebang() {
        assert_eq!(language("CMakeLists.txt", Some("#!/bin/sh\n")), Some("CMake"));
        assert_eq!(language("proj/pom.xml", Some("<project/>")), Some("Maven"));
        assert_eq!(language("build.xml", Some("")), Some("Ant"));
        assert_eq!(language("meson_options.txt", Some("")), Some("Meson"));
        assert_eq!(language("Makefile.am", Some("")), Some("Makefile"));
        // exact table is case-sensitive
        assert_eq!(language("POM.XML", Some("")), Some("XML"));
    }

    #[test]
    fn nocase_filenames_and_skip() {
        assert_eq!(language("GNU/MAKEFILE", Some("all:\n")), Some("Makefile"));
        assert_eq!(language("Nukefile", Some("")), Some("Nu"));
        assert_eq!(
            classify("deps/Rebar", Some("#!/usr/bin/env escript\n")),
            Classification::Skipped {
                rule: "filename-nocase"
            }
        );
    }

    #[test]
    fn ambiguous_extensions_use_content() {
        assert_eq!(language("a.m", Some("#import <Foundation/Foundation.h>\n")), Some("Objective-C"));
        assert_eq!(language("a.m", Some(":- module foo.\n")), Some("Mercury"));
        assert_eq!(language("a.m", Some("function y = f(x)\n")), Some("MATLAB"));
        assert_eq!(language("a.v", Some("Theorem t : True.\nProof.\n")), Some("Coq"));
        assert_eq!(language("a.v", Some("module top;\nendmodule\n")), Some("Verilog"));
        assert_eq!(language("a.fs", Some("#version 330\n")), Some("GLSL"));
        assert_eq!(language("a.fs", Some("let x = 1\n")), Some("F#"));
        assert_eq!(language("a.R", Some("x <- 1\n")), Some("R"));
        assert_eq!(language("a.r", Some("REBOL [Title: \"x\"]\n")), Some("Rebol"));
        assert_eq!(language("a.ts", Some("<?xml version=\"1.0\"?>\n<TS>\n")), Some("XML"));
        assert_eq!(language("a.ts", Some("const x: number = 1;\n")), Some("TypeScript"));
        assert_eq!(language("a.mo", Some("actor {}\n")), Some("Motoko"));
    }

    #[test]
    fn binary_mo_file_is_unrecognized() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("messages.mo");
        fs::write(&path, [0xde, 0x12, 0x04, 0x95, 0xff, 0xfe])?;
        let got = Classifier::new(Registry::builtin()).classify(&path, None);
        assert_eq!(got, Classification::Unrecognized);
        Ok(())
    }

    #[test]
    fn unreadable_file_falls_back_to_extension() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let classifier = Classifier::new(Registry::builtin());
        let missing = temp_dir.path().join("vanished.rs");
        assert_eq!(classifier.classify(&missing, None).language(), Some("Rust"));
        let missing_ts = temp_dir.path().join("vanished.ts");
        assert_eq!(classifier.classify(&missing_ts, None), Classification::Unrecognized);
        Ok(())
    }

    #[test]
    fn reads_shebang_from_disk() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("deploy");
        fs::write(&path, "#!/usr/bin/env perl\nprint 1;\n")?;
        let classifier = Classifier::new(Registry::builtin());
        assert_eq!(classifier.classify(&path, None).language(), Some("Perl"));
        Ok(())
    }

    #[test]
    fn unrecognized_when_nothing_matches() {
        assert_eq!(classify("README", Some("hello\n")), Classification::Unrecognized);
        assert_eq!(classify("data.unknownext", Some("")), Classification::Unrecognized);
    }

    #[test]
    fn classification_is_stable() {
        let first = classify("src/lib.rs", Some("fn main() {}\n"));
        for _ in 0..5 {
            assert_eq!(classify("src/lib.rs", Some("fn main() {}\n")), first);
        }
        assert_eq!(first.language(), Some("Rust"));
    }
}
