//! Submission normalizing
//!
//! Raw form pairs become escaped, trimmed values split into typed
//! directives (reserved fields) and the ordered fields shown to the owner.

use platform::text::escape_html;
use std::collections::HashMap;

pub const FIELD_REDIRECT: &str = "_next";
pub const FIELD_SUBJECT: &str = "_subject";
pub const FIELD_CC: &str = "_cc";
pub const FIELD_CAPTCHA: &str = "altcha";

/// Reserved fields that steer the relay instead of being delivered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDirectives {
    /// `_next`: redirect target replacing the success page
    pub redirect: Option<String>,
    /// `_subject`: subject line override
    pub subject: Option<String>,
    /// `_cc`: carbon-copy tokens, already truncated
    pub cc: Vec<String>,
    /// `altcha`: captcha proof. `Some("")` when the field was posted empty.
    pub captcha: Option<String>,
}

/// A submission after escaping and splitting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSubmission {
    pub directives: SubmissionDirectives,
    /// Visible fields in first-seen order
    pub fields: Vec<(String, String)>,
}

/// Control fields start with `_` and are never rendered.
pub fn is_control_field(name: &str) -> bool {
    name.starts_with('_')
}

/// Normalize raw form pairs
///
/// When a name repeats, the last value wins but the field keeps the
/// position of its first occurrence.
pub fn normalize(raw: Vec<(String, String)>, cc_max: usize) -> NormalizedSubmission {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(raw.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    for (name, value) in raw {
        let value = escape_html(value.trim());
        match positions.get(&name) {
            Some(&at) => merged[at].1 = value,
            None => {
                positions.insert(name.clone(), merged.len());
                merged.push((name, value));
            }
        }
    }

    let mut submission = NormalizedSubmission::default();
    for (name, value) in merged {
        if name == FIELD_REDIRECT {
            submission.directives.redirect = non_empty(value);
        } else if name == FIELD_SUBJECT {
            submission.directives.subject = non_empty(value);
        } else if name == FIELD_CC {
            submission.directives.cc = split_cc(&value, cc_max);
        } else if name == FIELD_CAPTCHA {
            submission.directives.captcha = Some(value);
        } else if !is_control_field(&name) {
            submission.fields.push((name, value));
        }
    }
    submission
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn split_cc(value: &str, cc_max: usize) -> Vec<String> {
    value
        .split(',')
        .take(cc_max)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
