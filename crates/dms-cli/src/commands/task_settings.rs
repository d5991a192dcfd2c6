use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use dms_core::settings::TaskSettings;
use dms_core::ContextConfig;

use super::{render, write_output, OutputFormat};

#[derive(Args)]
pub struct TaskSettingsArgs {
    /// Context file whose overrides are layered over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Environment to read from the context file
    #[arg(short, long, env = "DMS_ENVIRONMENT")]
    pub environment: Option<String>,
    /// Resolve settings for this task
    #[arg(short, long, requires = "config")]
    pub task: Option<String>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Write the settings to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: TaskSettingsArgs) -> anyhow::Result<()> {
    let settings = match &args.config {
        None => TaskSettings::defaults(),
        Some(path) => {
            let environment = args
                .environment
                .as_deref()
                .context("--environment is required with --config")?;
            let context = ContextConfig::load(path, environment)?;
            let task = match args.task.as_deref() {
                Some(name) => Some(
                    context
                        .task(name)
                        .with_context(|| format!("Task '{name}' not found in '{environment}'"))?,
                ),
                None => None,
            };
            context.resolved_task_settings(task)
        }
    };

    write_output(args.output.as_deref(), &render(&settings, args.format)?)
}
