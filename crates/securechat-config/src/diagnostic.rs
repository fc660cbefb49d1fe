// SPDX-FileCopyrightText: 2026 SecureChat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error reporting.
//!
//! Figment errors are turned into miette diagnostics. Unknown keys get a
//! label pointing into the TOML file that contains them and, when a valid key
//! is close enough by Jaro-Winkler similarity, a "did you mean" hint.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::Kind;
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Below this similarity no correction is offered.
const MIN_SIMILARITY: f64 = 0.75;

/// A configuration problem, renderable with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(securechat::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Keys accepted at this position, comma separated.
        valid_keys: String,
        #[label("not a securechat setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(securechat::config::invalid_type), help("use a value of type {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(securechat::config::missing_key),
        help("set `{key}` in securechat.toml or through a SECURECHAT_ variable")
    )]
    MissingKey { key: String },

    /// Parsed fine, but the value is out of range or otherwise unusable.
    #[error("invalid setting: {message}")]
    #[diagnostic(code(securechat::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(securechat::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? accepted keys: {valid_keys}"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

impl ConfigError {
    fn from_figment(error: &figment::Error, sources: &[(String, String)]) -> Self {
        let dotted_path = error.path.join(".");
        match &error.kind {
            Kind::UnknownField(field, accepted) => {
                let (span, src) = match locate_key(error, field, sources) {
                    Some((span, src)) => (Some(span), Some(src)),
                    None => (None, None),
                };
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, accepted),
                    valid_keys: accepted.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: if dotted_path.is_empty() {
                    field.to_string()
                } else {
                    format!("{dotted_path}.{field}")
                },
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: dotted_path,
                detail: format!("found {actual}"),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        }
    }
}

/// Split a figment error into one diagnostic per underlying problem.
///
/// `sources` pairs a display path with file contents and is used to attach
/// spans to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| ConfigError::from_figment(&error, sources))
        .collect()
}

/// Find the file and span of `field` for an unknown-key error.
fn locate_key(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|meta| meta.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    // Inline strings carry no file metadata; a lone source must be the one.
    let (name, content) = match file {
        Some(file) => sources.iter().find(|(name, _)| *name == file)?,
        None if sources.len() == 1 => &sources[0],
        None => return None,
    };

    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` inside the table named by `path`.
///
/// Table headers are matched by their dotted name (`[transfer]`,
/// `[a.b]`); an empty `path` means keys before the first header.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted_table = path.join(".");
    let mut current_table = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
            current_table = header.trim().to_string();
            continue;
        }
        if current_table != wanted_table {
            continue;
        }

        let indent = line.len() - line.trim_start().len();
        let key = trimmed.split('=').next().map(str::trim);
        if key == Some(field) {
            return Some(line_start + indent);
        }
    }

    None
}

/// The accepted key most similar to `unknown`, if it is similar enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_closest_timeout_key() {
        let valid = &["unread_count_timeout_ms", "mark_read_delay_ms"];
        assert_eq!(
            suggest_key("unread_count_timout_ms", valid),
            Some("unread_count_timeout_ms".to_string())
        );
    }

    #[test]
    fn unrelated_key_gets_no_suggestion() {
        assert_eq!(suggest_key("zzzzzz", &["max_uploads", "max_file_size_bytes"]), None);
    }

    #[test]
    fn key_is_found_in_its_own_table_only() {
        let content = "[logging]\nmax_uplods = 1\n[transfer]\n  max_uplods = 3\n";
        let path = vec!["transfer".to_string()];

        let offset = find_key_offset(content, &path, "max_uplods").unwrap();
        assert_eq!(offset, content.rfind("max_uplods").unwrap());
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let content = "[sync]\r\nfoo = 1\r\nbar = 2\r\n";
        let path = vec!["sync".to_string()];

        let offset = find_key_offset(content, &path, "bar").unwrap();
        assert_eq!(&content[offset..offset + 3], "bar");
    }

    #[test]
    fn top_level_keys_precede_first_table() {
        let content = "typo = 1\n[sync]\ntypo = 2\n";
        assert_eq!(find_key_offset(content, &[], "typo"), Some(0));
    }
}
