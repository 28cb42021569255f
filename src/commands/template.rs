use clap::{Args, Subcommand};
use serde::Serialize;

use packsmith::defaults;
use packsmith::local_files::LocalFs;
use packsmith::templates::{self, TemplateInfo, TemplateSummary};

use super::CmdResult;

#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    command: TemplateCommand,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// List installed templates
    List,
    /// Show the files and tokens of one template
    Info {
        /// Template name
        name: String,
    },
}

#[derive(Debug, Serialize)]
pub struct TemplateOutput {
    command: String,
    root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_template_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    templates: Option<Vec<TemplateSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template: Option<TemplateInfo>,
}

pub fn run(args: TemplateArgs) -> CmdResult<TemplateOutput> {
    let defaults = defaults::load_defaults();
    let root = defaults.templates_root()?;
    let fs = LocalFs::new();

    let mut output = TemplateOutput {
        command: String::new(),
        root: root.display().to_string(),
        default_template_name: defaults.default_template_name.clone(),
        templates: None,
        template: None,
    };

    match args.command {
        TemplateCommand::List => {
            output.command = "template.list".to_string();
            output.templates = Some(templates::list(&fs, &root)?);
        }
        TemplateCommand::Info { name } => {
            output.command = "template.info".to_string();
            output.template = Some(templates::info(&fs, &root, &name)?);
        }
    }

    Ok((output, 0))
}
