use std::path::PathBuf;

use clap::Args;

use dms_core::stack::DEFAULT_STACK_NAME;
use dms_core::{ContextConfig, DmsStack};

use super::{write_output, OutputFormat};

#[derive(Args)]
pub struct SynthArgs {
    /// Path to the context file (JSON or YAML)
    #[arg(short, long, default_value = "conf/env.json")]
    pub config: PathBuf,
    /// Environment to synthesize
    #[arg(short, long, env = "DMS_ENVIRONMENT")]
    pub environment: String,
    /// Target account, overriding the context
    #[arg(long, env = "DMS_ACCOUNT")]
    pub account: Option<String>,
    /// Stack name
    #[arg(long, default_value = DEFAULT_STACK_NAME)]
    pub stack_name: String,
    /// Template format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Write the template to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: SynthArgs) -> anyhow::Result<()> {
    let mut context = ContextConfig::load(&args.config, &args.environment)?;
    if let Some(account) = args.account {
        context.account = Some(account);
    }
    context.validate()?;

    let stack = DmsStack::new(&args.stack_name, &context)?;
    let template = stack.template();
    tracing::info!(
        stack = %stack.name,
        account = stack.account.as_deref().unwrap_or("unresolved"),
        region = stack.region.as_deref().unwrap_or("unresolved"),
        resources = template.resources.len(),
        "Synthesized stack"
    );

    let rendered = match args.format {
        OutputFormat::Json => stack.to_json_pretty()?,
        OutputFormat::Yaml => stack.to_yaml()?,
    };
    write_output(args.output.as_deref(), &rendered)
}
