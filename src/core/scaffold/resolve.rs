//! Template selection.
//!
//! Picks the template directory to mirror, or none for the built-in skeleton.
//! A name that does not exist on disk falls back to the built-in skeleton
//! without a warning.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::local_files::FileSystem;

use super::TemplateRequest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTemplate {
    pub name: String,
    pub path: PathBuf,
}

fn present(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

/// Choose a template name.
///
/// With `built_in_only`, the configured default is ignored and only an
/// explicit name can win. Otherwise the explicit name takes precedence over
/// the default. Either way the candidate must satisfy `exists`.
pub fn resolve<F>(
    explicit: Option<&str>,
    default: Option<&str>,
    built_in_only: bool,
    exists: F,
) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let candidate = if built_in_only {
        present(explicit)
    } else {
        present(explicit).or(present(default))
    };

    candidate.filter(|name| exists(name)).map(str::to_string)
}

/// Resolve a request against the templates installed under `templates_root`.
pub fn resolve_in(
    fs: &dyn FileSystem,
    templates_root: &Path,
    request: &TemplateRequest,
) -> Option<ResolvedTemplate> {
    let name = resolve(
        request.template_name.as_deref(),
        request.default_template_name.as_deref(),
        request.built_in_only,
        |name| fs.dir_exists(&templates_root.join(name)),
    )?;

    Some(ResolvedTemplate {
        path: templates_root.join(&name),
        name,
    })
}
