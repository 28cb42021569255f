use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use packsmith::descriptor;
use packsmith::local_files::{FileSystem, LocalFs};
use packsmith::rules::{self, RuleResult, Severity, ValidationPipeline};
use packsmith::Error;

use super::CmdResult;

#[derive(Args)]
pub struct ValidateArgs {
    /// Descriptor file, or a package directory containing one
    path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ValidateOutput {
    command: String,
    path: String,
    passed: bool,
    errors: usize,
    warnings: usize,
    notes: usize,
    findings: Vec<RuleResult>,
}

pub fn run(args: ValidateArgs) -> CmdResult<ValidateOutput> {
    let fs = LocalFs::new();
    let path = locate_descriptor(&fs, &args.path)?;

    let document = descriptor::load(&fs, &path)?;
    let findings = ValidationPipeline::with_default_rules().run(&document);

    let count = |severity: Severity| findings.iter().filter(|r| r.severity() == severity).count();
    let passed = !rules::has_errors(&findings);

    let output = ValidateOutput {
        command: "validate".to_string(),
        path: path.display().to_string(),
        passed,
        errors: count(Severity::Error),
        warnings: count(Severity::Warning),
        notes: count(Severity::Note),
        findings,
    };

    Ok((output, if passed { 0 } else { 1 }))
}

/// A directory resolves to the first `.nuspec` directly inside it.
fn locate_descriptor(fs: &dyn FileSystem, path: &Path) -> packsmith::Result<PathBuf> {
    if !fs.dir_exists(path) {
        return Ok(path.to_path_buf());
    }

    fs.list(path)?
        .into_iter()
        .find(|entry| {
            !entry.is_dir
                && entry
                    .path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("nuspec"))
        })
        .map(|entry| entry.path)
        .ok_or_else(|| {
            Error::validation_invalid_argument(
                "path",
                format!("No .nuspec file found in {}", path.display()),
                None,
                None,
            )
        })
}
