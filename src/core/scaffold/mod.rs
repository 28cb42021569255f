//! Package scaffolding.
//!
//! Materializes a new package definition under `<output>/<name>`, either by
//! mirroring a template directory or by emitting the built-in skeleton.
//! Content tokens are substituted during generation; the descriptor's file
//! name keeps a placeholder that is replaced later, when the package is packed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::local_files::{FileSystem, TextEncoding};
use crate::utils::template::{render_map, TokenMap};
use crate::utils::validation;

pub mod builtin;
pub mod encoding;
pub mod resolve;
pub mod values;

pub use encoding::EncodingPolicy;
pub use resolve::{resolve, resolve_in, ResolvedTemplate};
pub use values::{TemplateValues, TokenNames};

/// One `new` invocation, built from configuration and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct TemplateRequest {
    pub package_name: String,
    pub template_name: Option<String>,
    pub default_template_name: Option<String>,
    pub built_in_only: bool,
    pub output_directory: Option<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
    /// Log each generated file path at info level.
    pub regular_output: bool,
    pub values: TemplateValues,
}

impl TemplateRequest {
    /// The trimmed package name, which must be a single directory name.
    pub fn package_name(&self) -> Result<&str> {
        validation::require_dir_name(&self.package_name, "name")
    }

    pub fn tokens(&self) -> Result<TokenMap> {
        Ok(self.values.to_tokens(self.package_name()?))
    }
}

/// Maps the descriptor template at the template root to its placeholder name.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorRename {
    pub extension: &'static str,
    pub placeholder: &'static str,
}

impl DescriptorRename {
    pub const NUSPEC: Self = Self {
        extension: "nuspec",
        placeholder: "__name_replace__",
    };

    /// Whether a template-relative path is the descriptor template.
    pub fn matches(&self, relative: &Path) -> bool {
        let at_root = relative
            .parent()
            .map_or(true, |parent| parent.as_os_str().is_empty());

        at_root
            && relative
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(self.extension))
    }

    /// Placeholder file name, keeping the source file's extension as written.
    pub fn renamed(&self, relative: &Path) -> PathBuf {
        let extension = relative
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.extension.to_string());
        PathBuf::from(format!("{}.{}", self.placeholder, extension))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    Directory,
    File {
        encoding: TextEncoding,
        #[serde(skip)]
        content: String,
    },
}

/// A directory or file produced under the destination root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedEntry {
    /// Relative to the destination root; empty for the root itself.
    pub path: PathBuf,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutcome {
    pub package_name: String,
    pub destination: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
    pub dry_run: bool,
    pub entries: Vec<GeneratedEntry>,
}

pub struct ScaffoldGenerator<'a> {
    fs: &'a dyn FileSystem,
    encoding: EncodingPolicy,
    descriptor: DescriptorRename,
}

impl<'a> ScaffoldGenerator<'a> {
    pub fn new(fs: &'a dyn FileSystem, encoding: EncodingPolicy) -> Self {
        Self {
            fs,
            encoding,
            descriptor: DescriptorRename::NUSPEC,
        }
    }

    /// Where `generate` would write, without touching the filesystem.
    pub fn preview_destination(&self, request: &TemplateRequest) -> Result<PathBuf> {
        let name = request.package_name()?;

        let base = match &request.output_directory {
            Some(dir) => dir.clone(),
            None => self.fs.current_dir()?,
        };

        Ok(base.join(name))
    }

    pub fn generate(
        &self,
        request: &TemplateRequest,
        template_root: Option<&Path>,
    ) -> Result<GenerateOutcome> {
        let name = request.package_name()?;
        let destination = self.preview_destination(request)?;
        let exists = self.fs.dir_exists(&destination);

        if exists && !request.force {
            return Err(Error::scaffold_destination_exists(
                destination.display().to_string(),
            ));
        }

        let plan = template_root
            .map(|root| self.plan_template(root))
            .transpose()?;

        let mut outcome = GenerateOutcome {
            package_name: name.to_string(),
            destination: destination.clone(),
            template: template_root.map(Path::to_path_buf),
            dry_run: request.dry_run,
            entries: Vec::new(),
        };

        if request.dry_run {
            tracing::info!(
                "Would have generated a new package specification at {}",
                destination.display()
            );
            return Ok(outcome);
        }

        if exists {
            self.fs.delete_dir(&destination)?;
        }

        let mut tree = TreeWriter {
            fs: self.fs,
            destination: &destination,
            created: HashSet::new(),
            entries: Vec::new(),
            regular_output: request.regular_output,
        };
        let tokens = request.tokens()?;

        tree.ensure_dir(Path::new(""))?;
        match &plan {
            Some(plan) => self.mirror_template(&mut tree, plan, &tokens)?,
            None => self.emit_builtin(&mut tree, &tokens)?,
        }

        outcome.entries = tree.entries;

        tracing::info!(
            "Successfully generated {} package specification files\n at '{}'",
            name,
            destination.display()
        );

        Ok(outcome)
    }

    /// Lists the template tree and maps each file to its destination path.
    ///
    /// Runs before any mutation so an unusable template leaves the
    /// destination untouched.
    fn plan_template(&self, root: &Path) -> Result<TemplatePlan> {
        let dirs = self
            .fs
            .list_dirs_recursive(root)?
            .iter()
            .map(|dir| relative_to(root, dir).map(Path::to_path_buf))
            .collect::<Result<Vec<_>>>()?;

        let mut descriptor_claimed = false;
        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for source in self.fs.list_files_recursive(root)? {
            let relative = relative_to(root, &source)?;

            let target = if !descriptor_claimed && self.descriptor.matches(relative) {
                descriptor_claimed = true;
                self.descriptor.renamed(relative)
            } else {
                relative.to_path_buf()
            };

            // A literal placeholder file would overwrite the renamed descriptor.
            if !seen.insert(target.clone()) {
                return Err(Error::template_invalid(
                    root.display().to_string(),
                    format!("more than one file would be generated at '{}'", target.display()),
                ));
            }

            files.push((source, target));
        }

        Ok(TemplatePlan { dirs, files })
    }

    fn mirror_template(
        &self,
        tree: &mut TreeWriter<'_>,
        plan: &TemplatePlan,
        tokens: &TokenMap,
    ) -> Result<()> {
        for dir in &plan.dirs {
            tree.ensure_dir(dir)?;
        }

        for (source, target) in &plan.files {
            let template = self.fs.read(source)?;
            let encoding = self.encoding.for_path(target);
            tree.write_file(target, &render_map(&template, tokens), encoding)?;
        }

        Ok(())
    }

    fn emit_builtin(&self, tree: &mut TreeWriter<'_>, tokens: &TokenMap) -> Result<()> {
        tree.ensure_dir(Path::new(builtin::SCRIPTS_DIR))?;

        for file in builtin::files() {
            let target: PathBuf = file.path.split('/').collect();
            let encoding = self.encoding.for_path(&target);
            tree.write_file(&target, &render_map(file.template, tokens), encoding)?;
        }

        Ok(())
    }
}

/// Template directories relative to its root, and each source file paired
/// with its target relative to the destination.
struct TemplatePlan {
    dirs: Vec<PathBuf>,
    files: Vec<(PathBuf, PathBuf)>,
}

fn relative_to<'p>(root: &Path, path: &'p Path) -> Result<&'p Path> {
    path.strip_prefix(root).map_err(|_| {
        Error::internal_unexpected(format!(
            "{} is not under template root {}",
            path.display(),
            root.display()
        ))
    })
}

/// Writes entries below the destination root, creating each directory once.
struct TreeWriter<'a> {
    fs: &'a dyn FileSystem,
    destination: &'a Path,
    created: HashSet<PathBuf>,
    entries: Vec<GeneratedEntry>,
    regular_output: bool,
}

impl TreeWriter<'_> {
    fn target(&self, relative: &Path) -> PathBuf {
        if relative.as_os_str().is_empty() {
            self.destination.to_path_buf()
        } else {
            self.destination.join(relative)
        }
    }

    fn ensure_dir(&mut self, relative: &Path) -> Result<()> {
        if !self.created.insert(relative.to_path_buf()) {
            return Ok(());
        }

        self.fs.ensure_dir(&self.target(relative))?;
        self.entries.push(GeneratedEntry {
            path: relative.to_path_buf(),
            kind: EntryKind::Directory,
        });
        Ok(())
    }

    fn write_file(&mut self, relative: &Path, content: &str, encoding: TextEncoding) -> Result<()> {
        if let Some(parent) = relative.parent() {
            self.ensure_dir(parent)?;
        }

        let target = self.target(relative);
        if self.regular_output {
            tracing::info!("Generating template to a file\n at '{}'", target.display());
        }
        tracing::debug!("{}", content);

        self.fs.write(&target, content, encoding)?;
        self.entries.push(GeneratedEntry {
            path: relative.to_path_buf(),
            kind: EntryKind::File {
                encoding,
                content: content.to_string(),
            },
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{capture_logs, FsCall, MemoryFs};
    use tracing::Level;

    fn request(name: &str) -> TemplateRequest {
        TemplateRequest {
            package_name: name.to_string(),
            ..Default::default()
        }
    }

    fn nested_template() -> MemoryFs {
        MemoryFs::new("/work")
            .with_dir("/templates/test/empty/nested")
            .with_dir("/templates/test/tools/lower")
            .with_file("/templates/test/template.nuspec", "<id>[[PackageName]]</id>")
            .with_file("/templates/test/random.txt", "")
            .with_file("/templates/test/tools/install.ps1", "# [[PackageName]] [[Unknown]]")
            .with_file("/templates/test/tools/lower/another.ps1", "")
    }

    #[test]
    fn preview_uses_current_directory_by_default() {
        let fs = MemoryFs::new("/work");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        assert_eq!(
            generator.preview_destination(&request("Bob")).unwrap(),
            PathBuf::from("/work/Bob")
        );
    }

    #[test]
    fn preview_uses_output_directory_when_given() {
        let fs = MemoryFs::new("/work");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.output_directory = Some(PathBuf::from("/packages"));

        assert_eq!(
            generator.preview_destination(&req).unwrap(),
            PathBuf::from("/packages/Bob")
        );
    }

    #[test]
    fn empty_package_name_is_rejected() {
        let fs = MemoryFs::new("/work");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let err = generator.generate(&request("  "), None).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn package_name_must_be_single_directory_name() {
        let fs = MemoryFs::new("/work/out").with_file("/work/keep.txt", "x");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        for name in ["..", ".", "a/b", "/abs"] {
            let mut req = request(name);
            req.force = true;

            let err = generator.generate(&req, None).unwrap_err();
            assert_eq!(err.code.as_str(), "validation.invalid_argument", "{name}");
            assert_eq!(err.details["field"], "name");
            assert!(generator.preview_destination(&req).is_err());
        }

        assert!(fs.calls().is_empty());
        assert!(fs.has_file("/work/keep.txt"));
    }

    #[test]
    fn trimmed_name_is_used_for_tokens_and_outcome() {
        let fs = MemoryFs::new("/work").with_file("/templates/t/a.txt", "[[PackageName]]");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let (result, logs) = capture_logs(|| {
            generator.generate(&request(" Bob "), Some(Path::new("/templates/t")))
        });
        let outcome = result.unwrap();

        assert_eq!(outcome.package_name, "Bob");
        assert_eq!(outcome.destination, PathBuf::from("/work/Bob"));
        assert_eq!(fs.file_content("/work/Bob/a.txt").as_deref(), Some("Bob"));
        assert_eq!(
            logs.messages(Level::INFO).last().map(String::as_str),
            Some("Successfully generated Bob package specification files\n at '/work/Bob'")
        );
    }

    #[test]
    fn dry_run_logs_single_info_line_and_never_mutates() {
        let fs = nested_template();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.dry_run = true;
        req.force = true;
        req.regular_output = true;

        let (result, logs) =
            capture_logs(|| generator.generate(&req, Some(Path::new("/templates/test"))));

        let outcome = result.unwrap();
        assert!(outcome.dry_run);
        assert!(outcome.entries.is_empty());
        assert!(fs.calls().is_empty());

        let infos = logs.messages(Level::INFO);
        assert_eq!(
            infos,
            vec!["Would have generated a new package specification at /work/Bob"]
        );
    }

    #[test]
    fn dry_run_with_output_directory_names_that_directory() {
        let fs = MemoryFs::new("/work");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.dry_run = true;
        req.output_directory = Some(PathBuf::from("/packages"));

        let (result, logs) = capture_logs(|| generator.generate(&req, None));

        assert!(result.is_ok());
        assert_eq!(
            logs.messages(Level::INFO),
            vec!["Would have generated a new package specification at /packages/Bob"]
        );
    }

    #[test]
    fn existing_destination_fails_without_writes() {
        let fs = nested_template().with_dir("/work/Bob");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let err = generator
            .generate(&request("Bob"), Some(Path::new("/templates/test")))
            .unwrap_err();

        assert_eq!(err.code.as_str(), "scaffold.destination_exists");
        assert_eq!(
            err.message,
            "The location for the template already exists. You can:\n 1. Remove '/work/Bob'\n 2. Use --force\n 3. Specify a different name"
        );
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn existing_destination_fails_even_with_output_directory() {
        let fs = MemoryFs::new("/work").with_dir("/packages/Bob");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.output_directory = Some(PathBuf::from("/packages"));

        let err = generator.generate(&req, None).unwrap_err();
        assert!(err.message.contains(" 1. Remove '/packages/Bob'"));
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn existing_destination_is_replaced_with_force() {
        let fs = MemoryFs::new("/work").with_file("/work/Bob/stale.txt", "old");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.force = true;

        generator.generate(&req, None).unwrap();

        let calls = fs.calls();
        assert_eq!(calls[0], FsCall::DeleteDir(PathBuf::from("/work/Bob")));
        assert!(!fs.has_file("/work/Bob/stale.txt"));
        assert!(fs.has_file("/work/Bob/__name_replace__.nuspec"));
    }

    #[test]
    fn mirrors_every_directory_and_file_including_empty_leaves() {
        let fs = nested_template();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let (result, logs) = capture_logs(|| {
            generator.generate(&request("Bob"), Some(Path::new("/templates/test")))
        });
        result.unwrap();

        assert_eq!(
            fs.created_dirs(),
            vec![
                PathBuf::from("/work/Bob"),
                PathBuf::from("/work/Bob/empty"),
                PathBuf::from("/work/Bob/empty/nested"),
                PathBuf::from("/work/Bob/tools"),
                PathBuf::from("/work/Bob/tools/lower"),
            ]
        );

        assert_eq!(
            fs.written_files(),
            vec![
                PathBuf::from("/work/Bob/random.txt"),
                PathBuf::from("/work/Bob/__name_replace__.nuspec"),
                PathBuf::from("/work/Bob/tools/install.ps1"),
                PathBuf::from("/work/Bob/tools/lower/another.ps1"),
            ]
        );

        assert_eq!(
            logs.messages(Level::INFO).last().map(String::as_str),
            Some("Successfully generated Bob package specification files\n at '/work/Bob'")
        );
    }

    #[test]
    fn directories_are_created_once() {
        let fs = nested_template();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        generator
            .generate(&request("Bob"), Some(Path::new("/templates/test")))
            .unwrap();

        let created = fs.created_dirs();
        let unique: HashSet<_> = created.iter().collect();
        assert_eq!(created.len(), unique.len());
    }

    #[test]
    fn substitutes_tokens_and_keeps_unknown_ones() {
        let fs = nested_template();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        generator
            .generate(&request("Bob"), Some(Path::new("/templates/test")))
            .unwrap();

        assert_eq!(
            fs.file_content("/work/Bob/__name_replace__.nuspec").as_deref(),
            Some("<id>Bob</id>")
        );
        assert_eq!(
            fs.file_content("/work/Bob/tools/install.ps1").as_deref(),
            Some("# Bob [[Unknown]]")
        );
    }

    #[test]
    fn only_root_descriptor_is_renamed() {
        let fs = MemoryFs::new("/work")
            .with_file("/templates/t/package.nuspec", "")
            .with_file("/templates/t/tools/nested.nuspec", "");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        generator
            .generate(&request("Bob"), Some(Path::new("/templates/t")))
            .unwrap();

        assert!(fs.has_file("/work/Bob/__name_replace__.nuspec"));
        assert!(fs.has_file("/work/Bob/tools/nested.nuspec"));
    }

    #[test]
    fn literal_placeholder_beside_descriptor_is_rejected() {
        let fs = MemoryFs::new("/work")
            .with_file("/templates/t/Template.nuspec", "renamed")
            .with_file("/templates/t/__name_replace__.nuspec", "literal")
            .with_file("/work/Bob/keep.txt", "mine");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.force = true;

        let err = generator
            .generate(&req, Some(Path::new("/templates/t")))
            .unwrap_err();

        assert_eq!(err.code.as_str(), "template.invalid");
        assert!(err.details["problem"]
            .as_str()
            .unwrap()
            .contains("__name_replace__.nuspec"));
        assert!(fs.calls().is_empty());
        assert!(fs.has_file("/work/Bob/keep.txt"));
    }

    #[test]
    fn encoding_follows_policy_per_file() {
        let fs = nested_template();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        generator
            .generate(&request("Bob"), Some(Path::new("/templates/test")))
            .unwrap();

        assert_eq!(
            fs.file_encoding("/work/Bob/tools/install.ps1"),
            Some(TextEncoding::Utf8Bom)
        );
        assert_eq!(
            fs.file_encoding("/work/Bob/__name_replace__.nuspec"),
            Some(TextEncoding::Utf8)
        );
    }

    #[test]
    fn logs_content_at_debug_and_paths_with_regular_output() {
        let fs =
            MemoryFs::new("/work").with_file("/templates/t/bob.nuspec", "[[PackageName]]");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());
        let mut req = request("Bob");
        req.output_directory = Some(PathBuf::from("/packages"));
        req.regular_output = true;

        let (result, logs) =
            capture_logs(|| generator.generate(&req, Some(Path::new("/templates/t"))));
        result.unwrap();

        assert_eq!(logs.messages(Level::DEBUG), vec!["Bob"]);
        assert_eq!(
            logs.messages(Level::INFO),
            vec![
                "Generating template to a file\n at '/packages/Bob/__name_replace__.nuspec'",
                "Successfully generated Bob package specification files\n at '/packages/Bob'",
            ]
        );
    }

    #[test]
    fn quiet_generation_logs_only_content_and_summary() {
        let fs =
            MemoryFs::new("/work").with_file("/templates/t/bob.nuspec", "[[PackageName]]");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let (result, logs) =
            capture_logs(|| generator.generate(&request("Bob"), Some(Path::new("/templates/t"))));
        result.unwrap();

        assert_eq!(logs.messages(Level::DEBUG), vec!["Bob"]);
        assert_eq!(logs.messages(Level::INFO).len(), 1);
    }

    #[test]
    fn builtin_skeleton_when_no_template() {
        let fs = MemoryFs::new("/work");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let outcome = generator.generate(&request("Bob"), None).unwrap();

        assert!(outcome.template.is_none());
        assert_eq!(
            fs.created_dirs(),
            vec![PathBuf::from("/work/Bob"), PathBuf::from("/work/Bob/tools")]
        );
        assert_eq!(fs.written_files().len(), builtin::files().len());
        assert!(fs.has_file("/work/Bob/__name_replace__.nuspec"));
        assert!(fs.has_file("/work/Bob/tools/install.ps1"));
        assert!(fs
            .file_content("/work/Bob/__name_replace__.nuspec")
            .unwrap()
            .contains("<id>bob</id>"));
    }

    #[test]
    fn write_failure_propagates_unchanged() {
        let fs = MemoryFs::new("/work").failing_writes();
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let (result, logs) = capture_logs(|| generator.generate(&request("Bob"), None));

        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["error"], "disk full");
        assert!(logs
            .messages(Level::INFO)
            .iter()
            .all(|m| !m.starts_with("Successfully generated")));
    }

    #[test]
    fn outcome_lists_entries_relative_to_destination() {
        let fs = MemoryFs::new("/work").with_file("/templates/t/tools/a.ps1", "x");
        let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::default());

        let outcome = generator
            .generate(&request("Bob"), Some(Path::new("/templates/t")))
            .unwrap();

        let paths: Vec<_> = outcome.entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::new(), PathBuf::from("tools"), PathBuf::from("tools/a.ps1")]
        );
        assert_eq!(
            outcome.entries[2].kind,
            EntryKind::File {
                encoding: TextEncoding::Utf8Bom,
                content: "x".to_string()
            }
        );
    }
}
