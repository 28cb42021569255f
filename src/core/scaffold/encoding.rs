use std::path::Path;

use crate::defaults::EncodingConfig;
use crate::local_files::TextEncoding;

/// Chooses the encoding for each generated file from its name.
///
/// Files matching any BOM pattern get `Utf8Bom`; everything else is plain
/// UTF-8. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct EncodingPolicy {
    bom_patterns: Vec<String>,
}

impl EncodingPolicy {
    pub fn new(bom_patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            bom_patterns: bom_patterns
                .into_iter()
                .map(|p| p.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &EncodingConfig) -> Self {
        Self::new(config.bom_patterns.iter().cloned())
    }

    pub fn for_path(&self, path: &Path) -> TextEncoding {
        let Some(name) = path.file_name() else {
            return TextEncoding::Utf8;
        };
        let name = name.to_string_lossy().to_ascii_lowercase();

        if self
            .bom_patterns
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, &name))
        {
            TextEncoding::Utf8Bom
        } else {
            TextEncoding::Utf8
        }
    }
}

impl Default for EncodingPolicy {
    fn default() -> Self {
        Self::from_config(&EncodingConfig::default())
    }
}
