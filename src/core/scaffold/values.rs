use std::collections::BTreeMap;

use crate::utils::template::TokenMap;

/// Token names understood by the built-in skeleton.
pub struct TokenNames;

impl TokenNames {
    pub const PACKAGE_NAME: &'static str = "PackageName";
    pub const PACKAGE_NAME_LOWER: &'static str = "PackageNameLower";
    pub const PACKAGE_VERSION: &'static str = "PackageVersion";
    pub const MAINTAINER_NAME: &'static str = "MaintainerName";
    pub const MAINTAINER_REPO: &'static str = "MaintainerRepo";
    pub const INSTALLER_TYPE: &'static str = "InstallerType";
    pub const URL: &'static str = "Url";
    pub const URL64: &'static str = "Url64";
    pub const SILENT_ARGS: &'static str = "SilentArgs";
    pub const CHECKSUM: &'static str = "Checksum";
    pub const CHECKSUM_TYPE: &'static str = "ChecksumType";
    pub const CHECKSUM64: &'static str = "Checksum64";
    pub const CHECKSUM_TYPE64: &'static str = "ChecksumType64";
}

/// Author-supplied values for template tokens.
#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub version: Option<String>,
    pub maintainer: Option<String>,
    /// Free-form `key=value` pairs; these override everything else.
    pub extra: BTreeMap<String, String>,
}

impl TemplateValues {
    /// Build the token map for a package.
    pub fn to_tokens(&self, package_name: &str) -> TokenMap {
        let mut tokens = TokenMap::new();
        let mut set = |key: &str, value: &str| {
            tokens.insert(key.to_string(), value.to_string());
        };

        set(TokenNames::PACKAGE_NAME, package_name);
        set(TokenNames::PACKAGE_NAME_LOWER, &package_name.to_lowercase());
        set(
            TokenNames::PACKAGE_VERSION,
            self.version.as_deref().unwrap_or("1.0.0"),
        );
        set(
            TokenNames::MAINTAINER_NAME,
            self.maintainer.as_deref().unwrap_or("__REPLACE_YOUR_NAME__"),
        );
        set(TokenNames::MAINTAINER_REPO, "__REPLACE_YOUR_REPO__");
        set(TokenNames::INSTALLER_TYPE, "exe");
        set(TokenNames::URL, "");
        set(TokenNames::URL64, "");
        set(TokenNames::SILENT_ARGS, "");
        set(TokenNames::CHECKSUM, "");
        set(TokenNames::CHECKSUM_TYPE, "sha256");
        set(TokenNames::CHECKSUM64, "");
        set(TokenNames::CHECKSUM_TYPE64, "sha256");

        for (key, value) in &self.extra {
            tokens.insert(key.clone(), value.clone());
        }

        tokens
    }
}
