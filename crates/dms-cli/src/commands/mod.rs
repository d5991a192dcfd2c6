use std::path::Path;

use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

pub mod list_engines;
pub mod mapping;
pub mod synth;
pub mod task_settings;
pub mod validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize the DMS stack template for one environment
    Synth(synth::SynthArgs),
    /// Validate a context file without synthesizing
    Validate(validate::ValidateArgs),
    /// Generate table mappings from a mapping rules file
    Mapping(mapping::MappingArgs),
    /// Print resolved replication task settings
    TaskSettings(task_settings::TaskSettingsArgs),
    /// List supported endpoint engines
    ListEngines(list_engines::ListEnginesArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Writes to `output` when given, stdout otherwise.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Wrote output");
        }
        None => println!("{}", content.trim_end()),
    }
    Ok(())
}
