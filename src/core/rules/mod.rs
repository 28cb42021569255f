//! Descriptor metadata validation.
//!
//! A `ValidationPipeline` runs every registered `MetadataRule` over one
//! `MetadataDocument` and concatenates the findings in registration order.
//! Rules never fail; a problem in the document is a finding, not an error.

use serde::Serialize;

use crate::descriptor::MetadataDocument;

pub mod metadata;

pub use metadata::{
    LicenseAcceptanceRule, LicenseMetadataRule, RequiredMetadataRule, SummaryMetadataRule,
    TagsMetadataRule, UnsupportedElementRule, UrlMetadataRule, VersionMetadataRule,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks packing.
    Error,
    Warning,
    Note,
}

/// Stable finding identifiers.
pub struct RuleIdentifiers;

impl RuleIdentifiers {
    pub const REQUIRED_ELEMENT_MISSING: &'static str = "CHCR0001";
    pub const INVALID_TYPE_ELEMENT: &'static str = "CHCR0002";
    pub const MISSING_ELEMENT_ON_REQUIRING_LICENSE_ACCEPTANCE: &'static str = "CHCR0003";
    pub const UNSUPPORTED_ELEMENT_USED: &'static str = "CHCU0001";
    pub const EMPTY_SUMMARY: &'static str = "CHCN0001";
    pub const COMMA_SEPARATED_TAGS: &'static str = "CHCW0001";
}

/// One finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    severity: Severity,
    id: String,
    message: String,
}

impl RuleResult {
    pub fn new(severity: Severity, id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, id, message)
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, id, message)
    }

    pub fn note(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Note, id, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub trait MetadataRule {
    /// Short name used in debug logs.
    fn name(&self) -> &'static str;

    fn validate(&self, document: &MetadataDocument) -> Vec<RuleResult>;
}

#[derive(Default)]
pub struct ValidationPipeline {
    rules: Vec<Box<dyn MetadataRule>>,
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with every built-in rule, license rule first.
    pub fn with_default_rules() -> Self {
        let mut pipeline = Self::new();
        pipeline
            .register(Box::new(LicenseMetadataRule))
            .register(Box::new(RequiredMetadataRule))
            .register(Box::new(UnsupportedElementRule))
            .register(Box::new(UrlMetadataRule))
            .register(Box::new(LicenseAcceptanceRule))
            .register(Box::new(VersionMetadataRule))
            .register(Box::new(SummaryMetadataRule))
            .register(Box::new(TagsMetadataRule));
        pipeline
    }

    pub fn register(&mut self, rule: Box<dyn MetadataRule>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn run(&self, document: &MetadataDocument) -> Vec<RuleResult> {
        let mut results = Vec::new();

        for rule in &self.rules {
            let found = rule.validate(document);
            tracing::debug!("{} produced {} finding(s)", rule.name(), found.len());
            results.extend(found);
        }

        results
    }
}

/// Whether any finding blocks packing.
pub fn has_errors(results: &[RuleResult]) -> bool {
    results.iter().any(|r| r.severity() == Severity::Error)
}
