//! @ai:module:intent Recognize source files whose syntax carries `/** */` doc comments
//! @ai:module:layer domain
//! @ai:module:public_api Language, detect_language, is_supported_file
//! @ai:module:stateless true

use std::path::Path;

/// @ai:intent A language family with C-style block comments and quoted string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Java,
    Kotlin,
    Scala,
    CSharp,
    Php,
    Go,
    Rust,
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::Kotlin,
        Language::Scala,
        Language::CSharp,
        Language::Php,
        Language::Go,
        Language::Rust,
        Language::C,
        Language::Cpp,
    ];

    /// @ai:intent Get file extensions for this language
    /// @ai:effects pure
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::Java => &["java"],
            Language::Kotlin => &["kt", "kts"],
            Language::Scala => &["scala"],
            Language::CSharp => &["cs"],
            Language::Php => &["php"],
            Language::Go => &["go"],
            Language::Rust => &["rs"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
        }
    }
}

/// @ai:intent Detect the language from a file path
/// @ai:example ("lib/util.js") -> Some(JavaScript)
/// @ai:example ("README.md") -> None
/// @ai:effects pure
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();

    Language::ALL
        .into_iter()
        .find(|lang| lang.extensions().contains(&ext.as_str()))
}

/// @ai:intent Check if a file should be scanned when walking a directory
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    detect_language(path).is_some()
}
