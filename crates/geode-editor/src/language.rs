//! Language definitions — static lookup data for the highlighter.
//!
//! A [`Language`] names a filetype, the filename patterns that select it,
//! its keywords and operators, its comment delimiters, and which literal
//! classes (numbers, strings) it highlights. Definitions are plain
//! `'static` tables; nothing here is computed at runtime.
//!
//! # Selection
//!
//! [`Language::detect`] walks [`LANGUAGES`] in order and returns the first
//! definition with a matching pattern. A pattern that starts with `.` is
//! an extension and must equal the filename's extension exactly (`.c`
//! does not match `main.cc`); any other pattern matches as a substring of
//! the filename (`Makefile` style).

use bitflags::bitflags;

bitflags! {
    /// Literal classes a language highlights.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Features: u8 {
        const NUMBERS = 0b01;
        const STRINGS = 0b10;
    }
}

/// Which keyword color a keyword gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordKind {
    /// Control flow, declarations, preprocessor directives.
    Control,
    /// Primitive type names and qualifiers.
    Type,
}

/// A keyword and its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub text: &'static str,
    pub kind: KeywordKind,
}

impl Keyword {
    const fn control(text: &'static str) -> Self {
        Self {
            text,
            kind: KeywordKind::Control,
        }
    }

    const fn ty(text: &'static str) -> Self {
        Self {
            text,
            kind: KeywordKind::Type,
        }
    }
}

/// A filetype's highlighting rules.
#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    /// Filetype name shown in the status bar.
    pub name: &'static str,
    /// Extensions (leading `.`) or filename substrings.
    pub patterns: &'static [&'static str],
    pub keywords: &'static [Keyword],
    pub operators: &'static [&'static str],
    /// Single-line comment start; empty disables line comments.
    pub line_comment: &'static str,
    /// Block comment delimiters; either empty disables block comments.
    pub block_comment: (&'static str, &'static str),
    pub features: Features,
}

impl Language {
    /// Whether `filename` matches one of this language's patterns.
    #[must_use]
    pub fn matches(&self, filename: &str) -> bool {
        let extension = filename.rfind('.').map(|dot| &filename[dot..]);
        self.patterns.iter().any(|pattern| {
            if pattern.starts_with('.') {
                extension == Some(*pattern)
            } else {
                filename.contains(pattern)
            }
        })
    }

    /// The first built-in language whose patterns match `filename`.
    #[must_use]
    pub fn detect(filename: &str) -> Option<&'static Self> {
        LANGUAGES.iter().find(|lang| lang.matches(filename))
    }

    /// Whether block comments are enabled.
    #[inline]
    #[must_use]
    pub const fn has_block_comments(&self) -> bool {
        !self.block_comment.0.is_empty() && !self.block_comment.1.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// Every built-in language, in detection order.
pub static LANGUAGES: &[Language] = &[C, CPP];

const C_FAMILY_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~",
];

pub const C: Language = Language {
    name: "c",
    patterns: &[".c", ".h"],
    keywords: &[
        Keyword::control("#include"),
        Keyword::control("#pragma"),
        Keyword::control("#define"),
        Keyword::control("#undef"),
        Keyword::control("#ifdef"),
        Keyword::control("#ifndef"),
        Keyword::control("#endif"),
        Keyword::control("#error"),
        Keyword::control("auto"),
        Keyword::control("break"),
        Keyword::control("case"),
        Keyword::control("continue"),
        Keyword::control("default"),
        Keyword::control("do"),
        Keyword::control("else"),
        Keyword::control("enum"),
        Keyword::control("extern"),
        Keyword::control("for"),
        Keyword::control("goto"),
        Keyword::control("if"),
        Keyword::control("register"),
        Keyword::control("return"),
        Keyword::control("sizeof"),
        Keyword::control("static"),
        Keyword::control("struct"),
        Keyword::control("switch"),
        Keyword::control("typedef"),
        Keyword::control("union"),
        Keyword::control("volatile"),
        Keyword::control("while"),
        Keyword::control("NULL"),
        Keyword::ty("int"),
        Keyword::ty("long"),
        Keyword::ty("double"),
        Keyword::ty("float"),
        Keyword::ty("char"),
        Keyword::ty("unsigned"),
        Keyword::ty("signed"),
        Keyword::ty("void"),
        Keyword::ty("short"),
        Keyword::ty("auto"),
        Keyword::ty("const"),
    ],
    operators: C_FAMILY_OPERATORS,
    line_comment: "//",
    block_comment: ("/*", "*/"),
    features: Features::NUMBERS.union(Features::STRINGS),
};

pub const CPP: Language = Language {
    name: "cpp",
    patterns: &[".cc", ".cpp", ".hpp"],
    keywords: &[
        Keyword::control("#include"),
        Keyword::control("#pragma"),
        Keyword::control("#define"),
        Keyword::control("#undef"),
        Keyword::control("#ifdef"),
        Keyword::control("#ifndef"),
        Keyword::control("#endif"),
        Keyword::control("#error"),
        Keyword::control("alignas"),
        Keyword::control("alignof"),
        Keyword::control("and"),
        Keyword::control("and_eq"),
        Keyword::control("asm"),
        Keyword::control("auto"),
        Keyword::control("bitand"),
        Keyword::control("bitor"),
        Keyword::control("break"),
        Keyword::control("case"),
        Keyword::control("class"),
        Keyword::control("compl"),
        Keyword::control("constexpr"),
        Keyword::control("const_cast"),
        Keyword::control("continue"),
        Keyword::control("default"),
        Keyword::control("delete"),
        Keyword::control("decltype"),
        Keyword::control("do"),
        Keyword::control("dynamic_cast"),
        Keyword::control("else"),
        Keyword::control("enum"),
        Keyword::control("explicit"),
        Keyword::control("export"),
        Keyword::control("extern"),
        Keyword::control("false"),
        Keyword::control("for"),
        Keyword::control("friend"),
        Keyword::control("goto"),
        Keyword::control("if"),
        Keyword::control("inline"),
        Keyword::control("mutable"),
        Keyword::control("namespace"),
        Keyword::control("new"),
        Keyword::control("noexcept"),
        Keyword::control("not"),
        Keyword::control("not_eq"),
        Keyword::control("nullptr"),
        Keyword::control("operator"),
        Keyword::control("or"),
        Keyword::control("or_eq"),
        Keyword::control("private"),
        Keyword::control("protected"),
        Keyword::control("public"),
        Keyword::control("register"),
        Keyword::control("reinterpret_cast"),
        Keyword::control("return"),
        Keyword::control("sizeof"),
        Keyword::control("static"),
        Keyword::control("static_assert"),
        Keyword::control("static_cast"),
        Keyword::control("struct"),
        Keyword::control("switch"),
        Keyword::control("template"),
        Keyword::control("this"),
        Keyword::control("thread_local"),
        Keyword::control("throw"),
        Keyword::control("true"),
        Keyword::control("try"),
        Keyword::control("typedef"),
        Keyword::control("typeid"),
        Keyword::control("typename"),
        Keyword::control("union"),
        Keyword::control("virtual"),
        Keyword::control("volatile"),
        Keyword::control("while"),
        Keyword::control("xor"),
        Keyword::control("xor_eq"),
        Keyword::control("NULL"),
        Keyword::ty("int"),
        Keyword::ty("long"),
        Keyword::ty("double"),
        Keyword::ty("float"),
        Keyword::ty("char"),
        Keyword::ty("unsigned"),
        Keyword::ty("signed"),
        Keyword::ty("void"),
        Keyword::ty("short"),
        Keyword::ty("auto"),
        Keyword::ty("const"),
        Keyword::ty("bool"),
    ],
    operators: C_FAMILY_OPERATORS,
    line_comment: "//",
    block_comment: ("/*", "*/"),
    features: Features::NUMBERS.union(Features::STRINGS),
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Detection ----------------------------------------------------------

    #[test]
    fn detects_c_by_extension() {
        assert_eq!(Language::detect("main.c").map(|l| l.name), Some("c"));
        assert_eq!(Language::detect("src/geode.h").map(|l| l.name), Some("c"));
    }

    #[test]
    fn detects_cpp_by_extension() {
        assert_eq!(Language::detect("main.cpp").map(|l| l.name), Some("cpp"));
        assert_eq!(Language::detect("a.cc").map(|l| l.name), Some("cpp"));
        assert_eq!(Language::detect("a.hpp").map(|l| l.name), Some("cpp"));
    }

    #[test]
    fn extension_must_match_exactly() {
        // ".c" is a prefix of ".cc" but must not select C.
        assert_eq!(Language::detect("x.cc").map(|l| l.name), Some("cpp"));
        assert!(Language::detect("notes.csv").is_none());
    }

    #[test]
    fn only_last_extension_counts() {
        assert!(Language::detect("archive.c.txt").is_none());
    }

    #[test]
    fn unknown_files_have_no_language() {
        assert!(Language::detect("README").is_none());
        assert!(Language::detect("").is_none());
    }

    #[test]
    fn substring_patterns_match_anywhere() {
        static MAKE: Language = Language {
            name: "make",
            patterns: &["Makefile"],
            keywords: &[],
            operators: &[],
            line_comment: "#",
            block_comment: ("", ""),
            features: Features::empty(),
        };
        assert!(MAKE.matches("Makefile"));
        assert!(MAKE.matches("build/Makefile.am"));
        assert!(!MAKE.matches("makefile"));
        assert!(!MAKE.has_block_comments());
    }

    // -- Tables -------------------------------------------------------------

    #[test]
    fn builtins_highlight_numbers_and_strings() {
        for lang in LANGUAGES {
            assert!(lang.features.contains(Features::NUMBERS), "{}", lang.name);
            assert!(lang.features.contains(Features::STRINGS), "{}", lang.name);
            assert!(lang.has_block_comments(), "{}", lang.name);
        }
    }

    #[test]
    fn type_keywords_are_flagged() {
        let int = C.keywords.iter().find(|k| k.text == "int").unwrap();
        assert_eq!(int.kind, KeywordKind::Type);
        let ret = C.keywords.iter().find(|k| k.text == "return").unwrap();
        assert_eq!(ret.kind, KeywordKind::Control);
        assert!(CPP.keywords.iter().any(|k| k.text == "bool" && k.kind == KeywordKind::Type));
    }
}
