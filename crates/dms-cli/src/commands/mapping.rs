use std::path::PathBuf;

use clap::Args;

use dms_core::mapping::{MappingGenerator, MappingRulesFile};

use super::{render, write_output, OutputFormat};

#[derive(Args)]
pub struct MappingArgs {
    /// Mapping rules file listing the tables to replicate
    pub rules: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Write the mappings to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: MappingArgs) -> anyhow::Result<()> {
    let file = MappingRulesFile::from_file(&args.rules)?;
    let mappings = MappingGenerator::new().generate(&file.tables);

    tracing::info!(
        tables = file.tables.len(),
        rules = mappings.rules.len(),
        "Generated table mappings"
    );

    write_output(args.output.as_deref(), &render(&mappings, args.format)?)
}
