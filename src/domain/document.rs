//! Collected JavaScript source documents
//!
//! A [`SourceDocument`] is the immutable unit of analysis: the text captured
//! by the browser extension or imported from disk, plus a metadata summary
//! computed once at ingestion. The engine only ever borrows documents; it
//! never mutates them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Framework detected in a collected script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkGuess {
    React,
    Vue,
    Angular,
    Svelte,
    #[default]
    Unknown,
}

/// Bundler detected in a collected script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BundlerGuess {
    Webpack,
    Rollup,
    Vite,
    Parcel,
    #[default]
    Unknown,
}

/// One-shot summary of a collected script, computed at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceMetadata {
    pub minified: bool,
    pub obfuscated: bool,
    pub framework: FrameworkGuess,
    pub bundler: BundlerGuess,
    pub has_source_map: bool,
    pub line_count: usize,
}

static HEX_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\x[0-9a-fA-F]{2}").expect("hex escape pattern"));
static UNICODE_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u[0-9a-fA-F]{4}").expect("unicode escape pattern"));
static OBFUSCATED_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_0x[0-9a-fA-F]+").expect("obfuscated ident pattern"));
static SOURCE_MAP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//[@#]\s*sourceMappingURL=(\S+)").expect("source map pattern"));

impl SourceMetadata {
    /// Derive the summary from raw script text.
    ///
    /// Heuristics only: average line length and line density for
    /// minification, escape-sequence and `_0x` identifier density for
    /// obfuscation, marker substrings for framework and bundler.
    pub fn detect(text: &str) -> Self {
        let line_count = text.lines().count().max(1);

        Self {
            minified: Self::looks_minified(text, line_count),
            obfuscated: Self::looks_obfuscated(text),
            framework: Self::guess_framework(text),
            bundler: Self::guess_bundler(text),
            has_source_map: SOURCE_MAP_URL.is_match(text),
            line_count,
        }
    }

    fn looks_minified(text: &str, line_count: usize) -> bool {
        // too short to judge
        if line_count < 10 {
            return false;
        }
        let avg_line_len = text.len() / line_count;
        avg_line_len > 200 || (text.len() > 1_000 && line_count < 20)
    }

    fn looks_obfuscated(text: &str) -> bool {
        let patterns: [&Regex; 3] = [&HEX_ESCAPE, &UNICODE_ESCAPE, &OBFUSCATED_IDENT];
        let dense = patterns
            .iter()
            .filter(|p| p.find_iter(text).take(11).count() > 10)
            .count();
        dense >= 2
    }

    fn guess_framework(text: &str) -> FrameworkGuess {
        if text.contains("React.createElement")
            || text.contains("react-dom")
            || text.contains("jsx-runtime")
        {
            FrameworkGuess::React
        } else if text.contains("Vue.component")
            || text.contains("createApp")
            || text.contains("vue-router")
        {
            FrameworkGuess::Vue
        } else if text.contains("@angular/core") || text.contains("platformBrowserDynamic") {
            FrameworkGuess::Angular
        } else if text.contains("SvelteComponent") || text.contains("svelte") {
            FrameworkGuess::Svelte
        } else {
            FrameworkGuess::Unknown
        }
    }

    fn guess_bundler(text: &str) -> BundlerGuess {
        if text.contains("__webpack_require__") || text.contains("webpackChunk") {
            BundlerGuess::Webpack
        } else if text.contains("/*! Rollup") || text.contains("rollup") {
            BundlerGuess::Rollup
        } else if text.contains("__vite") || text.contains("vite") {
            BundlerGuess::Vite
        } else if text.contains("parcelRequire") || text.contains("$parcel$") {
            BundlerGuess::Parcel
        } else {
            BundlerGuess::Unknown
        }
    }
}

/// An immutable script captured for analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Collector-assigned identifier
    pub id: String,
    /// Where the script came from (URL or file path)
    pub origin: String,
    /// The full script text
    pub text: String,
    /// Text length in bytes
    pub size: usize,
    /// Summary computed once at ingestion
    pub metadata: SourceMetadata,
}

impl SourceDocument {
    /// Build a document, computing size and metadata once
    pub fn new(id: impl Into<String>, origin: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let metadata = SourceMetadata::detect(&text);
        Self {
            id: id.into(),
            origin: origin.into(),
            size: text.len(),
            text,
            metadata,
        }
    }
}
