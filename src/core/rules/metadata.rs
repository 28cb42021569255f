//! Built-in descriptor rules.

use std::sync::OnceLock;

use regex::Regex;

use super::{MetadataRule, RuleIdentifiers, RuleResult};
use crate::descriptor::MetadataDocument;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^(https?|ftp)://[^\s/?#]+[^\s]*$").expect("Invalid regex pattern")
    })
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\d+(\.\d+){0,3}(-[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?(\+[0-9A-Za-z-]+(\.[0-9A-Za-z-]+)*)?$",
        )
        .expect("Invalid regex pattern")
    })
}

fn invalid_value(element: &str) -> RuleResult {
    RuleResult::error(
        RuleIdentifiers::INVALID_TYPE_ELEMENT,
        format!(
            "The <{}> element in the package nuspec file has an invalid value.",
            element
        ),
    )
}

/// Inline `<license>` blocks cannot be packed.
pub struct LicenseMetadataRule;

impl MetadataRule for LicenseMetadataRule {
    fn name(&self) -> &'static str {
        "license"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        match document.license {
            Some(_) => vec![RuleResult::error(
                RuleIdentifiers::UNSUPPORTED_ELEMENT_USED,
                "<license> elements are not supported in packsmith, use <licenseUrl> instead.",
            )],
            None => Vec::new(),
        }
    }
}

pub struct RequiredMetadataRule;

impl MetadataRule for RequiredMetadataRule {
    fn name(&self) -> &'static str {
        "required"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        [
            ("id", &document.id),
            ("version", &document.version),
            ("authors", &document.authors),
            ("description", &document.description),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(element, _)| {
            RuleResult::error(
                RuleIdentifiers::REQUIRED_ELEMENT_MISSING,
                format!(
                    "<{}> is a required element in the package nuspec file.",
                    element
                ),
            )
        })
        .collect()
    }
}

pub struct UnsupportedElementRule;

impl MetadataRule for UnsupportedElementRule {
    fn name(&self) -> &'static str {
        "unsupported-element"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        document
            .unsupported_elements
            .iter()
            .map(|element| {
                RuleResult::error(
                    RuleIdentifiers::UNSUPPORTED_ELEMENT_USED,
                    format!("<{}> elements are not supported in packsmith.", element),
                )
            })
            .collect()
    }
}

/// URL elements must be absolute http, https or ftp URLs.
pub struct UrlMetadataRule;

impl MetadataRule for UrlMetadataRule {
    fn name(&self) -> &'static str {
        "url"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        document
            .urls()
            .into_iter()
            .filter(|(_, value)| !url_pattern().is_match(value))
            .map(|(element, _)| invalid_value(element))
            .collect()
    }
}

pub struct LicenseAcceptanceRule;

impl MetadataRule for LicenseAcceptanceRule {
    fn name(&self) -> &'static str {
        "license-acceptance"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        if document.require_license_acceptance && document.license_url.is_none() {
            vec![RuleResult::error(
                RuleIdentifiers::MISSING_ELEMENT_ON_REQUIRING_LICENSE_ACCEPTANCE,
                "Enabling license acceptance requires a license url.",
            )]
        } else {
            Vec::new()
        }
    }
}

/// Versions take 1 to 4 numeric parts with optional pre-release and build labels.
/// A missing version is left to `RequiredMetadataRule`.
pub struct VersionMetadataRule;

impl MetadataRule for VersionMetadataRule {
    fn name(&self) -> &'static str {
        "version"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        match document.version.as_deref() {
            Some(version) if !version_pattern().is_match(version) => {
                vec![invalid_value("version")]
            }
            _ => Vec::new(),
        }
    }
}

pub struct SummaryMetadataRule;

impl MetadataRule for SummaryMetadataRule {
    fn name(&self) -> &'static str {
        "summary"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        match document.summary {
            Some(_) => Vec::new(),
            None => vec![RuleResult::note(
                RuleIdentifiers::EMPTY_SUMMARY,
                "<summary> is empty; a short summary improves package listings.",
            )],
        }
    }
}

pub struct TagsMetadataRule;

impl MetadataRule for TagsMetadataRule {
    fn name(&self) -> &'static str {
        "tags"
    }

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        match document.tags.as_deref() {
            Some(tags) if tags.contains(',') => vec![RuleResult::warning(
                RuleIdentifiers::COMMA_SEPARATED_TAGS,
                "Tags are space separated; commas will become part of the tag text.",
            )],
            _ => Vec::new(),
        }
    }
}
