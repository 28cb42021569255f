//! Token rendering for template content.
//!
//! Tokens are written as `[[Name]]`. Lookups are exact and case-sensitive;
//! a token with no value is left in the output untouched.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::{Captures, Regex};

pub type TokenMap = HashMap<String, String>;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[\[([A-Za-z0-9_.-]+)\]\]").expect("Invalid regex pattern"))
}

/// Substitute every `[[Token]]` in a single pass.
///
/// Substituted values are not rescanned, so a value containing `[[Other]]`
/// is written literally.
pub fn render_map(template: &str, tokens: &TokenMap) -> String {
    token_pattern()
        .replace_all(template, |caps: &Captures| match tokens.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of all tokens referenced by a template, sorted and deduplicated.
pub fn find_tokens(template: &str) -> BTreeSet<String> {
    token_pattern()
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}
