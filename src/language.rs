//! Language registry: comment syntax per language plus the extension,
//! filename and interpreter tables the classifier resolves against.
//!
//! All data is static and the built-in registry is constructed once per
//! process. Adding a language means one entry in [`LANGUAGES`] and one or
//! more entries in [`EXTENSIONS`].

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::sync::OnceLock;

use crate::error::{ClocError, Result};

/// Comment syntax for one language. Delimiters are matched literally and
/// case-sensitively against line text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageDefinition {
    pub name: &'static str,
    pub line_comments: &'static [&'static str],
    /// `("", "")` marks "no block comments" and is ignored by the scanner.
    pub block_comments: &'static [(&'static str, &'static str)],
}

impl LanguageDefinition {
    pub const fn new(
        name: &'static str,
        line_comments: &'static [&'static str],
        block_comments: &'static [(&'static str, &'static str)],
    ) -> Self {
        LanguageDefinition {
            name,
            line_comments,
            block_comments,
        }
    }

    /// Block pairs that can actually open a comment.
    pub fn block_pairs(&self) -> impl Iterator<Item = (usize, &(&'static str, &'static str))> {
        self.block_comments
            .iter()
            .enumerate()
            .filter(|(_, (start, end))| !start.is_empty() && !end.is_empty())
    }

    pub fn has_comment_syntax(&self) -> bool {
        !self.line_comments.is_empty() || self.block_pairs().next().is_some()
    }
}

const NONE: &[(&str, &str)] = &[("", "")];
const C_BLOCK: &[(&str, &str)] = &[("/*", "*/")];
const XML_BLOCK: &[(&str, &str)] = &[("<!--", "-->")];
const ML_BLOCK: &[(&str, &str)] = &[("(*", "*)")];
const HS_BLOCK: &[(&str, &str)] = &[("{-", "-}")];
const PY_BLOCK: &[(&str, &str)] = &[("\"\"\"", "\"\"\"")];

const SLASH: &[&str] = &["//"];
const HASH: &[&str] = &["#"];
const DASH: &[&str] = &["--"];
const SEMI: &[&str] = &[";"];
const PERCENT: &[&str] = &["%"];
const XML_LINE: &[&str] = &["<!--"];
const NO_LINE: &[&str] = &[];

type Def = LanguageDefinition;

pub const LANGUAGES: &[LanguageDefinition] = &[
    Def::new("ActionScript", SLASH, C_BLOCK),
    Def::new("Ada", DASH, NONE),
    Def::new("Ant", XML_LINE, XML_BLOCK),
    Def::new("AsciiDoc", NO_LINE, NONE),
    Def::new("Assembly", &["//", ";", "#", "@", "|", "!"], C_BLOCK),
    Def::new("ATS", SLASH, &[("/*", "*/"), ("(*", "*)")]),
    Def::new("AutoHotkey", SEMI, NONE),
    Def::new("Awk", HASH, NONE),
    Def::new("Arduino Sketch", SLASH, C_BLOCK),
    Def::new("Batch", &["REM", "rem"], NONE),
    Def::new("BASH", HASH, NONE),
    Def::new("BitBake", HASH, NONE),
    Def::new("C", SLASH, C_BLOCK),
    Def::new("C Header", SLASH, C_BLOCK),
    Def::new("C Shell", HASH, NONE),
    Def::new("Cairo", SLASH, NONE),
    Def::new("Carbon", SLASH, NONE),
    Def::new("Cap'n Proto", HASH, NONE),
    Def::new("Carp", SEMI, NONE),
    Def::new("C#", SLASH, C_BLOCK),
    Def::new("Chapel", SLASH, C_BLOCK),
    Def::new("Clojure", &["#", "#_"], NONE),
    Def::new("COBOL", &["*", "/"], NONE),
    Def::new("CoffeeScript", HASH, &[("###", "###")]),
    Def::new("Coq", &["(*"], ML_BLOCK),
    Def::new("ColdFusion", NO_LINE, &[("<!---", "--->")]),
    Def::new("ColdFusion CFScript", SLASH, C_BLOCK),
    Def::new("CMake", HASH, NONE),
    Def::new("C++", SLASH, C_BLOCK),
    Def::new("C++ Header", SLASH, C_BLOCK),
    Def::new("Crystal", HASH, NONE),
    Def::new("CSS", SLASH, C_BLOCK),
    Def::new("Cython", HASH, PY_BLOCK),
    Def::new("CUDA", SLASH, C_BLOCK),
    Def::new("D", SLASH, C_BLOCK),
    Def::new("Dart", &["//", "///"], C_BLOCK),
    Def::new("Dhall", DASH, HS_BLOCK),
    Def::new("DTrace", NO_LINE, C_BLOCK),
    Def::new("Device Tree", SLASH, C_BLOCK),
    Def::new("Eiffel", DASH, NONE),
    Def::new("Elm", DASH, HS_BLOCK),
    Def::new("Elixir", HASH, NONE),
    Def::new("Erlang", PERCENT, NONE),
    Def::new("Expect", HASH, NONE),
    Def::new("Fish", HASH, NONE),
    Def::new("Frege", DASH, HS_BLOCK),
    Def::new("F*", &["(*", "//"], ML_BLOCK),
    Def::new("F#", &["(*"], ML_BLOCK),
    Def::new("Lean", DASH, &[("/-", "-/")]),
    Def::new("Logtalk", PERCENT, NONE),
    Def::new("Lua", DASH, &[("--[[", "]]")]),
    Def::new("Lilypond", PERCENT, NONE),
    Def::new("LISP", &[";;"], &[("#|", "|#")]),
    Def::new("LiveScript", HASH, C_BLOCK),
    Def::new("Factor", &["! "], NONE),
    Def::new("FORTRAN Legacy", &["c", "C", "!", "*"], NONE),
    Def::new("FORTRAN Modern", &["!"], NONE),
    Def::new("Gherkin", HASH, NONE),
    Def::new("GLSL", SLASH, C_BLOCK),
    Def::new("Go", SLASH, C_BLOCK),
    Def::new("Groovy", SLASH, C_BLOCK),
    Def::new("Handlebars", NO_LINE, &[("<!--", "-->"), ("{{!", "}}")]),
    Def::new("Haskell", DASH, HS_BLOCK),
    Def::new("Haxe", SLASH, C_BLOCK),
    Def::new("Hare", SLASH, NONE),
    Def::new("HLSL", SLASH, C_BLOCK),
    Def::new("HTML", &["//", "<!--"], XML_BLOCK),
    Def::new("Idris", DASH, HS_BLOCK),
    Def::new("Imba", HASH, &[("###", "###")]),
    Def::new("Io", &["//", "#"], C_BLOCK),
    Def::new("SKILL", SEMI, C_BLOCK),
    Def::new("JAI", SLASH, C_BLOCK),
    Def::new("Janet", HASH, NONE),
    Def::new("Java", SLASH, C_BLOCK),
    Def::new("JSP", SLASH, C_BLOCK),
    Def::new("JavaScript", SLASH, C_BLOCK),
    Def::new("Julia", HASH, &[("#=", "=#")]),
    Def::new("Jupyter Notebook", HASH, NONE),
    Def::new("JSON", NO_LINE, NONE),
    Def::new("JSX", SLASH, C_BLOCK),
    Def::new("Koka", SLASH, C_BLOCK),
    Def::new("Kotlin", SLASH, C_BLOCK),
    Def::new("LD Script", SLASH, C_BLOCK),
    Def::new("LESS", SLASH, C_BLOCK),
    Def::new("Objective-C", SLASH, C_BLOCK),
    Def::new("Markdown", XML_LINE, XML_BLOCK),
    Def::new("Motoko", SLASH, C_BLOCK),
    Def::new("Nix", HASH, C_BLOCK),
    Def::new("NSIS", &["#", ";"], C_BLOCK),
    Def::new("Nu", &[";", "#"], NONE),
    Def::new("OCaml", NO_LINE, ML_BLOCK),
    Def::new("Objective-C++", SLASH, C_BLOCK),
    Def::new("Makefile", HASH, NONE),
    Def::new("MATLAB", PERCENT, &[("%{", "}%")]),
    Def::new("Mercury", PERCENT, C_BLOCK),
    Def::new("Maven", XML_LINE, XML_BLOCK),
    Def::new("Meson", HASH, NONE),
    Def::new("Mojo", HASH, NONE),
    Def::new("Move", SLASH, NONE),
    Def::new("Mustache", NO_LINE, &[("{{!", "}}")]),
    Def::new("M4", HASH, NONE),
    Def::new("Nim", HASH, &[("#[", "]#")]),
    Def::new("Nunjucks", NO_LINE, &[("{#", "#}"), ("<!--", "-->")]),
    Def::new("lex", NO_LINE, C_BLOCK),
    Def::new("Odin", SLASH, C_BLOCK),
    Def::new("Ohm", SLASH, C_BLOCK),
    Def::new("PHP", &["#", "//"], C_BLOCK),
    Def::new("Pascal", SLASH, &[("{", "}"), ("(*", "*)")]),
    Def::new("Perl", HASH, &[("=pod", "=cut")]),
    Def::new("Plain Text", NO_LINE, NONE),
    Def::new("Plan9 Shell", HASH, NONE),
    Def::new("Pony", SLASH, C_BLOCK),
    Def::new("PowerShell", HASH, &[("<#", "#>")]),
    Def::new("Polly", XML_LINE, XML_BLOCK),
    Def::new("Protocol Buffers", SLASH, NONE),
    Def::new("Python", HASH, PY_BLOCK),
    Def::new("Q", &["/ "], NONE),
    Def::new("QML", SLASH, C_BLOCK),
    Def::new("R", HASH, NONE),
    Def::new("Rebol", SEMI, NONE),
    Def::new("Red", SEMI, NONE),
    Def::new("Rego", HASH, NONE),
    Def::new("RMarkdown", NO_LINE, NONE),
    Def::new("RAML", HASH, NONE),
    Def::new("Racket", SEMI, &[("#|", "|#")]),
    Def::new("ReStructuredText", NO_LINE, NONE),
    Def::new("Ring", &["#", "//"], C_BLOCK),
    Def::new("Ruby", HASH, &[("=begin", "=end")]),
    Def::new("Ruby HTML", XML_LINE, XML_BLOCK),
    Def::new("Rust", &["//", "///", "//!"], C_BLOCK),
    Def::new("Scala", SLASH, C_BLOCK),
    Def::new("Sass", SLASH, C_BLOCK),
    Def::new("Scheme", SEMI, &[("#|", "|#")]),
    Def::new("sed", HASH, NONE),
    Def::new("Stan", SLASH, C_BLOCK),
    Def::new("Solidity", SLASH, C_BLOCK),
    Def::new("Bourne Shell", HASH, NONE),
    Def::new("Standard ML", NO_LINE, ML_BLOCK),
    Def::new("SQL", DASH, C_BLOCK),
    Def::new("Svelte", SLASH, &[("/*", "*/"), ("<!--", "-->")]),
    Def::new("Swift", SLASH, C_BLOCK),
    Def::new("Terra", DASH, &[("--[[", "]]")]),
    Def::new("TeX", PERCENT, NONE),
    Def::new("Isabelle", NO_LINE, ML_BLOCK),
    Def::new("TLA", &["\\*"], ML_BLOCK),
    Def::new("Tcl/Tk", HASH, NONE),
    Def::new("TOML", HASH, NONE),
    Def::new("TypeScript", SLASH, C_BLOCK),
    Def::new("HCL", &["#", "//"], C_BLOCK),
    Def::new("Umka", SLASH, C_BLOCK),
    Def::new("Unity-Prefab", NO_LINE, NONE),
    Def::new("MSBuild script", XML_LINE, XML_BLOCK),
    Def::new("Vala", SLASH, C_BLOCK),
    Def::new("Verilog", SLASH, C_BLOCK),
    Def::new("VimL", &["\""], NONE),
    Def::new("Visual Basic", &["'"], NONE),
    Def::new("Vue", XML_LINE, XML_BLOCK),
    Def::new("Vyper", HASH, PY_BLOCK),
    Def::new("WiX", XML_LINE, XML_BLOCK),
    Def::new("XML", XML_LINE, XML_BLOCK),
    Def::new("XML resource", XML_LINE, XML_BLOCK),
    Def::new("XSLT", XML_LINE, XML_BLOCK),
    Def::new("XSD", XML_LINE, XML_BLOCK),
    Def::new("YAML", HASH, NONE),
    Def::new("Yacc", SLASH, C_BLOCK),
    Def::new("Yul", SLASH, C_BLOCK),
    Def::new("Zephir", SLASH, C_BLOCK),
    Def::new("Zig", &["//", "///"], NONE),
    Def::new("Zsh", HASH, NONE),
];

/// Extension (without the leading dot) to language name. Interpreter
/// pseudo-extensions produced by shebang detection resolve here too.
pub const EXTENSIONS: &[(&str, &str)] = &[
    ("as", "ActionScript"),
    ("ada", "Ada"),
    ("adb", "Ada"),
    ("ads", "Ada"),
    ("adoc", "AsciiDoc"),
    ("asciidoc", "AsciiDoc"),
    ("asm", "Assembly"),
    ("s", "Assembly"),
    ("S", "Assembly"),
    ("dats", "ATS"),
    ("sats", "ATS"),
    ("hats", "ATS"),
    ("ahk", "AutoHotkey"),
    ("awk", "Awk"),
    ("ino", "Arduino Sketch"),
    ("bat", "Batch"),
    ("btm", "Batch"),
    ("cmd", "Batch"),
    ("bash", "BASH"),
    ("bb", "BitBake"),
    ("bbappend", "BitBake"),
    ("bbclass", "BitBake"),
    ("c", "C"),
    ("h", "C Header"),
    ("csh", "C Shell"),
    ("tcsh", "C Shell"),
    ("cairo", "Cairo"),
    ("carbon", "Carbon"),
    ("capnp", "Cap'n Proto"),
    ("carp", "Carp"),
    ("cs", "C#"),
    ("chpl", "Chapel"),
    ("clj", "Clojure"),
    ("cljs", "Clojure"),
    ("cljc", "Clojure"),
    ("cob", "COBOL"),
    ("cbl", "COBOL"),
    ("cpy", "COBOL"),
    ("coffee", "CoffeeScript"),
    ("cfm", "ColdFusion"),
    ("cfc", "ColdFusion CFScript"),
    ("cmake", "CMake"),
    ("cc", "C++"),
    ("cpp", "C++"),
    ("cxx", "C++"),
    ("c++", "C++"),
    ("pcc", "C++"),
    ("hh", "C++ Header"),
    ("hpp", "C++ Header"),
    ("hxx", "C++ Header"),
    ("inl", "C++ Header"),
    ("ipp", "C++ Header"),
    ("cr", "Crystal"),
    ("css", "CSS"),
    ("pyx", "Cython"),
    ("pxi", "Cython"),
    ("pxd", "Cython"),
    ("cu", "CUDA"),
    ("cuh", "CUDA"),
    ("d", "D"),
    ("dart", "Dart"),
    ("dhall", "Dhall"),
    ("dtrace", "DTrace"),
    ("dts", "Device Tree"),
    ("dtsi", "Device Tree"),
    ("e", "Eiffel"),
    ("elm", "Elm"),
    ("ex", "Elixir"),
    ("exs", "Elixir"),
    ("erl", "Erlang"),
    ("hrl", "Erlang"),
    ("exp", "Expect"),
    ("fish", "Fish"),
    ("fr", "Frege"),
    ("fst", "F*"),
    ("fsti", "F*"),
    ("fsi", "F#"),
    ("fsx", "F#"),
    ("lean", "Lean"),
    ("hlean", "Lean"),
    ("lgt", "Logtalk"),
    ("logtalk", "Logtalk"),
    ("lua", "Lua"),
    ("ly", "Lilypond"),
    ("ily", "Lilypond"),
    ("lisp", "LISP"),
    ("lsp", "LISP"),
    ("ls", "LiveScript"),
    ("factor", "Factor"),
    ("f", "FORTRAN Legacy"),
    ("F", "FORTRAN Legacy"),
    ("for", "FORTRAN Legacy"),
    ("ftn", "FORTRAN Legacy"),
    ("f77", "FORTRAN Legacy"),
    ("pfo", "FORTRAN Legacy"),
    ("f90", "FORTRAN Modern"),
    ("F90", "FORTRAN Modern"),
    ("f95", "FORTRAN Modern"),
    ("f03", "FORTRAN Modern"),
    ("f08", "FORTRAN Modern"),
    ("feature", "Gherkin"),
    ("glsl", "GLSL"),
    ("vert", "GLSL"),
    ("frag", "GLSL"),
    ("geom", "GLSL"),
    ("tesc", "GLSL"),
    ("tese", "GLSL"),
    ("comp", "GLSL"),
    ("go", "Go"),
    ("groovy", "Groovy"),
    ("gradle", "Groovy"),
    ("handlebars", "Handlebars"),
    ("hbs", "Handlebars"),
    ("hs", "Haskell"),
    ("lhs", "Haskell"),
    ("hx", "Haxe"),
    ("ha", "Hare"),
    ("hlsl", "HLSL"),
    ("fx", "HLSL"),
    ("html", "HTML"),
    ("htm", "HTML"),
    ("xhtml", "HTML"),
    ("idr", "Idris"),
    ("lidr", "Idris"),
    ("imba", "Imba"),
    ("io", "Io"),
    ("il", "SKILL"),
    ("jai", "JAI"),
    ("janet", "Janet"),
    ("java", "Java"),
    ("jsp", "JSP"),
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("jl", "Julia"),
    ("ipynb", "Jupyter Notebook"),
    ("json", "JSON"),
    ("jsx", "JSX"),
    ("kk", "Koka"),
    ("kt", "Kotlin"),
    ("kts", "Kotlin"),
    ("lds", "LD Script"),
    ("less", "LESS"),
    ("md", "Markdown"),
    ("markdown", "Markdown"),
    ("nix", "Nix"),
    ("nsi", "NSIS"),
    ("nsh", "NSIS"),
    ("nu", "Nu"),
    ("ml", "OCaml"),
    ("mli", "OCaml"),
    ("mll", "OCaml"),
    ("mly", "OCaml"),
    ("mm", "Objective-C++"),
    ("make", "Makefile"),
    ("mk", "Makefile"),
    ("mak", "Makefile"),
    ("makefile", "Makefile"),
    ("meson", "Meson"),
    ("mojo", "Mojo"),
    ("move", "Move"),
    ("mustache", "Mustache"),
    ("m4", "M4"),
    ("nim", "Nim"),
    ("njk", "Nunjucks"),
    ("l", "lex"),
    ("lex", "lex"),
    ("odin", "Odin"),
    ("ohm", "Ohm"),
    ("php", "PHP"),
    ("php3", "PHP"),
    ("php4", "PHP"),
    ("php5", "PHP"),
    ("pas", "Pascal"),
    ("pp", "Pascal"),
    ("pl", "Perl"),
    ("pm", "Perl"),
    ("txt", "Plain Text"),
    ("text", "Plain Text"),
    ("plan9sh", "Plan9 Shell"),
    ("pony", "Pony"),
    ("ps1", "PowerShell"),
    ("psm1", "PowerShell"),
    ("psd1", "PowerShell"),
    ("polly", "Polly"),
    ("proto", "Protocol Buffers"),
    ("py", "Python"),
    ("pyi", "Python"),
    ("q", "Q"),
    ("qml", "QML"),
    ("reb", "Rebol"),
    ("rebol", "Rebol"),
    ("red", "Red"),
    ("reds", "Red"),
    ("rego", "Rego"),
    ("Rmd", "RMarkdown"),
    ("raml", "RAML"),
    ("rkt", "Racket"),
    ("rst", "ReStructuredText"),
    ("ring", "Ring"),
    ("rb", "Ruby"),
    ("rake", "Ruby"),
    ("erb", "Ruby HTML"),
    ("rhtml", "Ruby HTML"),
    ("rs", "Rust"),
    ("scala", "Scala"),
    ("sbt", "Scala"),
    ("sass", "Sass"),
    ("scss", "Sass"),
    ("scm", "Scheme"),
    ("ss", "Scheme"),
    ("sed", "sed"),
    ("stan", "Stan"),
    ("sol", "Solidity"),
    ("sh", "Bourne Shell"),
    ("sml", "Standard ML"),
    ("sql", "SQL"),
    ("svelte", "Svelte"),
    ("swift", "Swift"),
    ("t", "Terra"),
    ("tex", "TeX"),
    ("sty", "TeX"),
    ("thy", "Isabelle"),
    ("tla", "TLA"),
    ("tcl", "Tcl/Tk"),
    ("tk", "Tcl/Tk"),
    ("toml", "TOML"),
    ("tsx", "TypeScript"),
    ("mts", "TypeScript"),
    ("cts", "TypeScript"),
    ("tf", "HCL"),
    ("hcl", "HCL"),
    ("um", "Umka"),
    ("prefab", "Unity-Prefab"),
    ("csproj", "MSBuild script"),
    ("vbproj", "MSBuild script"),
    ("fsproj", "MSBuild script"),
    ("props", "MSBuild script"),
    ("targets", "MSBuild script"),
    ("vala", "Vala"),
    ("vapi", "Vala"),
    ("sv", "Verilog"),
    ("svh", "Verilog"),
    ("vh", "Verilog"),
    ("vim", "VimL"),
    ("vb", "Visual Basic"),
    ("bas", "Visual Basic"),
    ("vue", "Vue"),
    ("vy", "Vyper"),
    ("wxs", "WiX"),
    ("xml", "XML"),
    ("resx", "XML resource"),
    ("xsl", "XSLT"),
    ("xslt", "XSLT"),
    ("xsd", "XSD"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("y", "Yacc"),
    ("yul", "Yul"),
    ("zep", "Zephir"),
    ("zig", "Zig"),
    ("zsh", "Zsh"),
];

/// Extensions whose language cannot be decided from the name alone; the
/// classifier hands these to the content sniffer, and [`Registry::describe`]
/// lists them under every language they can resolve to.
pub const AMBIGUOUS_EXTENSIONS: &[(&str, &[&str])] = &[
    ("m", &["Objective-C", "MATLAB", "Mercury"]),
    ("v", &["Verilog", "Coq"]),
    ("fs", &["F#", "GLSL"]),
    ("r", &["R", "Rebol"]),
    ("ts", &["TypeScript", "XML"]),
    ("mo", &["Motoko"]),
];

/// Exact basenames that decide the language regardless of extension.
pub const SPECIAL_FILENAMES: &[(&str, &str)] = &[
    ("meson.build", "Meson"),
    ("meson_options.txt", "Meson"),
    ("CMakeLists.txt", "CMake"),
    ("configure.ac", "M4"),
    ("Makefile.am", "Makefile"),
    ("build.xml", "Ant"),
    ("pom.xml", "Maven"),
];

/// Basenames matched after lowercasing. `None` means the file is skipped.
pub const NOCASE_FILENAMES: &[(&str, Option<&str>)] = &[
    ("makefile", Some("Makefile")),
    ("nukefile", Some("Nu")),
    ("rebar", None),
];

/// Interpreter names whose canonical extension differs from the binary name.
pub const INTERPRETERS: &[(&str, &str)] = &[
    ("gosh", "scm"),
    ("make", "make"),
    ("perl", "pl"),
    ("rc", "plan9sh"),
    ("python", "py"),
    ("ruby", "rb"),
    ("escript", "erl"),
];

#[derive(Debug, Clone)]
pub struct Registry {
    languages: HashMap<&'static str, LanguageDefinition>,
    extensions: HashMap<&'static str, &'static str>,
}

impl Registry {
    pub fn from_tables(
        languages: &[LanguageDefinition],
        extensions: &[(&'static str, &'static str)],
    ) -> Self {
        Registry {
            languages: languages.iter().map(|def| (def.name, *def)).collect(),
            extensions: extensions.iter().copied().collect(),
        }
    }

    /// The process-wide registry built from the static tables.
    pub fn builtin() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| Registry::from_tables(LANGUAGES, EXTENSIONS))
    }

    /// Rejects a registry that could never classify anything, or one whose
    /// extension table points at languages it does not define.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(ClocError::EmptyRegistry("no languages defined".into()));
        }
        let mut dangling: Vec<_> = self
            .extensions
            .iter()
            .filter(|(_, name)| !self.languages.contains_key(**name))
            .map(|(ext, name)| format!("{ext} -> {name}"))
            .collect();
        if !dangling.is_empty() {
            dangling.sort();
            return Err(ClocError::EmptyRegistry(format!(
                "extensions map to undefined languages: {}",
                dangling.join(", ")
            )));
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&LanguageDefinition> {
        self.languages.get(name)
    }

    /// Resolve an extension (no leading dot) to a language name. Exact match
    /// first so case-distinguished entries (`F`, `Rmd`) win, then lowercase.
    pub fn language_for_extension(&self, ext: &str) -> Option<&'static str> {
        if let Some(name) = self.extensions.get(ext) {
            return Some(*name);
        }
        let lower = ext.to_lowercase();
        self.extensions.get(lower.as_str()).copied()
    }

    /// Extensions mapped to `name`, sorted, including ambiguous ones the
    /// content sniffer can resolve to it.
    pub fn extensions_for(&self, name: &str) -> Vec<&'static str> {
        let mut exts: Vec<&'static str> = self
            .extensions
            .iter()
            .filter(|(_, lang)| **lang == name)
            .map(|(ext, _)| *ext)
            .collect();
        exts.extend(
            AMBIGUOUS_EXTENSIONS
                .iter()
                .filter(|(_, langs)| langs.contains(&name))
                .map(|(ext, _)| *ext),
        );
        exts.sort_unstable();
        exts.dedup();
        exts
    }

    /// One line per language, sorted by name: `Name (ext, ext)`.
    pub fn describe(&self) -> String {
        let mut names: Vec<&'static str> = self.languages.keys().copied().collect();
        names.sort_unstable();
        let mut out = String::new();
        for name in names {
            let _ = writeln!(out, "{:<30} ({})", name, self.extensions_for(name).join(", "));
        }
        out
    }
}
