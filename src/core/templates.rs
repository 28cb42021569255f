//! Installed template catalog.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::scaffold::DescriptorRename;
use crate::utils::template::find_tokens;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateFile {
    /// Relative to the template root.
    pub path: PathBuf,
    /// Renamed to the descriptor placeholder on generation.
    pub descriptor: bool,
    pub tokens: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<TemplateFile>,
    /// Union of every file's tokens.
    pub tokens: BTreeSet<String>,
}

/// Every directory directly under `root`, sorted by name.
///
/// A missing root yields an empty list.
pub fn list(fs: &dyn FileSystem, root: &Path) -> Result<Vec<TemplateSummary>> {
    if !fs.dir_exists(root) {
        return Ok(Vec::new());
    }

    let mut templates: Vec<TemplateSummary> = fs
        .list(root)?
        .into_iter()
        .filter(|entry| entry.is_dir)
        .filter_map(|entry| {
            let name = entry.path.file_name()?.to_string_lossy().into_owned();
            Some(TemplateSummary {
                name,
                path: entry.path,
            })
        })
        .collect();
    templates.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(templates)
}

pub fn info(fs: &dyn FileSystem, root: &Path, name: &str) -> Result<TemplateInfo> {
    let path = root.join(name);
    if name.trim().is_empty() || !fs.dir_exists(&path) {
        return Err(Error::template_not_found(name));
    }

    let descriptor = DescriptorRename::NUSPEC;
    let mut claimed = false;
    let mut files = Vec::new();
    let mut all_tokens = BTreeSet::new();

    for file in fs.list_files_recursive(&path)? {
        let relative = file
            .strip_prefix(&path)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| file.clone());

        let is_descriptor = !claimed && descriptor.matches(&relative);
        claimed |= is_descriptor;

        let tokens = find_tokens(&fs.read(&file)?);
        all_tokens.extend(tokens.iter().cloned());

        files.push(TemplateFile {
            path: relative,
            descriptor: is_descriptor,
            tokens,
        });
    }

    Ok(TemplateInfo {
        name: name.to_string(),
        path,
        files,
        tokens: all_tokens,
    })
}
