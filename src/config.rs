use std::collections::HashSet;
use std::path::Path;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputType {
    Default,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Count blank, comment and code lines per language",
    long_about = "Walks the given paths, classifies every file by name, extension, interpreter line or content, and reports blank, comment and code lines per language. Run with --show-lang to list the supported languages.",
    color = clap::ColorChoice::Always
)]
pub struct Args {
    #[arg(default_value = ".")]
    pub paths: Vec<String>,

    /// Directory name to skip (repeatable)
    #[arg(short, long, action = ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Print counts for every file once the run has finished
    #[arg(short, long)]
    pub verbose: bool,

    /// Log every classification decision to stderr
    #[arg(long)]
    pub debug: bool,

    #[arg(short = 'd', long, default_value = "100")]
    pub max_depth: usize,

    #[arg(short = 'n', long)]
    pub non_recursive: bool,

    /// Glob a file name or root-relative path must match
    #[arg(short = 'f', long)]
    pub filespec: Option<String>,

    /// Only descend into directories whose name matches this regex
    #[arg(long = "match-d", value_name = "REGEX")]
    pub match_dir: Option<String>,

    /// Extensions to leave out, comma separated
    #[arg(long, value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Only report these languages, comma separated
    #[arg(long, value_delimiter = ',')]
    pub include_lang: Vec<String>,

    /// Report every file instead of every language
    #[arg(long)]
    pub by_file: bool,

    #[arg(short = 'o', long, value_enum, default_value_t = OutputType::Default)]
    pub output_type: OutputType,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// List supported languages and their extensions
    #[arg(short = 'l', long)]
    pub show_lang: bool,
}

/// Settings the counting engine consumes, resolved from [`Args`].
#[derive(Debug, Clone, Default)]
pub struct ClocOptions {
    pub debug: bool,
    pub exclude_exts: HashSet<String>,
    pub include_langs: HashSet<String>,
    pub jobs: Option<usize>,
}

impl ClocOptions {
    pub fn from_args(args: &Args) -> Self {
        ClocOptions {
            debug: args.debug,
            exclude_exts: args
                .exclude_ext
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
            include_langs: args
                .include_lang
                .iter()
                .map(|lang| lang.trim().to_string())
                .filter(|lang| !lang.is_empty())
                .collect(),
            jobs: args.jobs.filter(|jobs| *jobs > 0),
        }
    }

    pub fn excludes_extension(&self, path: &Path) -> bool {
        if self.exclude_exts.is_empty() {
            return false;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.exclude_exts.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    /// An empty include list admits every language.
    pub fn includes_language(&self, name: &str) -> bool {
        self.include_langs.is_empty() || self.include_langs.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::parse_from(["locscan"]);
        assert_eq!(args.paths, vec!["."]);
        assert_eq!(args.max_depth, 100);
        assert_eq!(args.output_type, OutputType::Default);
        assert!(!args.by_file && !args.debug && !args.show_lang);
        assert!(args.match_dir.is_none());
    }

    #[test]
    fn options_normalise_lists() {
        let args = Args::parse_from([
            "locscan",
            "src",
            "lib",
            "--exclude-ext",
            ".JS, ts",
            "--include-lang",
            "Rust,Go",
            "-j",
            "0",
            "--debug",
            "-o",
            "json",
            "--match-d",
            "^(src|lib)$",
        ]);
        assert_eq!(args.paths, vec!["src", "lib"]);
        assert_eq!(args.match_dir.as_deref(), Some("^(src|lib)$"));
        assert_eq!(args.output_type, OutputType::Json);
        let opts = ClocOptions::from_args(&args);
        assert!(opts.debug);
        assert_eq!(opts.jobs, None);
        assert!(opts.excludes_extension(Path::new("a/b.js")));
        assert!(opts.excludes_extension(Path::new("x.TS")));
        assert!(!opts.excludes_extension(Path::new("x.rs")));
        assert!(!opts.excludes_extension(Path::new("Makefile")));
        assert!(opts.includes_language("Rust"));
        assert!(!opts.includes_language("Python"));
    }

    #[test]
    fn verbose_help_describes_end_of_run_output() {
        use clap::CommandFactory;
        let command = Args::command();
        let verbose = command
            .get_arguments()
            .find(|arg| arg.get_id() == "verbose")
            .expect("verbose flag");
        let help = verbose.get_help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("once the run has finished"), "{help}");
    }

    #[test]
    fn default_options_admit_everything() {
        let opts = ClocOptions::default();
        assert!(opts.includes_language("Anything"));
        assert!(!opts.excludes_extension(Path::new("a.rs")));
    }
}
