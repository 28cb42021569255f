pub type CmdResult<T> = packsmith::Result<(T, i32)>;

/// Flags accepted by every command.
pub(crate) struct GlobalArgs {
    pub verbose: bool,
}

/// Parse a `KEY=value` argument. The value may itself contain `=`.
pub(crate) fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=value: no `=` found in `{s}`"))?;
    let key = s[..pos].trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=value: empty key in `{s}`"));
    }
    Ok((key.to_string(), s[pos + 1..].to_string()))
}

pub mod config;
pub mod new;
pub mod template;
pub mod validate;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (packsmith::Result<serde_json::Value>, i32) {
    match command {
        // Commands without global context
        crate::Commands::Validate(args) => dispatch!(args, validate),
        crate::Commands::Template(args) => dispatch!(args, template),
        crate::Commands::Config(args) => dispatch!(args, config),

        // Commands with global context
        crate::Commands::New(args) => dispatch!(args, global, new),
    }
}
