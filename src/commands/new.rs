use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use packsmith::defaults;
use packsmith::local_files::LocalFs;
use packsmith::scaffold::{
    self, EncodingPolicy, GenerateOutcome, ResolvedTemplate, ScaffoldGenerator, TemplateRequest,
    TemplateValues,
};

use super::{parse_key_val, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct NewArgs {
    /// Package name; also the name of the generated directory
    name: String,

    /// Installed template to generate from
    #[arg(long, short = 't')]
    template: Option<String>,

    /// Ignore the configured default template
    #[arg(long = "built-in")]
    built_in: bool,

    /// Directory to create the package in (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    output_directory: Option<PathBuf>,

    /// Package version written into the descriptor
    #[arg(long = "version", value_name = "VERSION")]
    package_version: Option<String>,

    /// Maintainer name written into the descriptor
    #[arg(long)]
    maintainer: Option<String>,

    /// Replace an existing package directory
    #[arg(long)]
    force: bool,

    /// Report what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Extra token values as KEY=value pairs
    #[arg(value_parser = parse_key_val, value_name = "KEY=VALUE")]
    values: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct NewOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_name: Option<String>,
    #[serde(flatten)]
    outcome: GenerateOutcome,
}

pub fn run(args: NewArgs, global: &GlobalArgs) -> CmdResult<NewOutput> {
    let defaults = defaults::load_defaults();
    let fs = LocalFs::new();

    let request = TemplateRequest {
        package_name: args.name,
        template_name: args.template,
        default_template_name: defaults.default_template_name.clone(),
        built_in_only: args.built_in,
        output_directory: args.output_directory,
        force: args.force,
        dry_run: args.dry_run,
        regular_output: global.verbose,
        values: TemplateValues {
            version: args.package_version,
            maintainer: args.maintainer,
            extra: args.values.into_iter().collect(),
        },
    };

    let templates_root = defaults.templates_root()?;
    let resolved = scaffold::resolve_in(&fs, &templates_root, &request);
    match &resolved {
        Some(template) => tracing::debug!("Using template {}", template.path.display()),
        None => tracing::debug!("Using built-in package skeleton"),
    }

    let generator = ScaffoldGenerator::new(&fs, EncodingPolicy::from_config(&defaults.encoding));
    let outcome = generator.generate(&request, resolved.as_ref().map(|t| t.path.as_path()))?;

    Ok((
        NewOutput {
            command: "new".to_string(),
            template_name: resolved.map(|ResolvedTemplate { name, .. }| name),
            outcome,
        },
        0,
    ))
}
