use clap::Args;
use serde::Serialize;

use dms_core::{EndpointType, EngineName};

#[derive(Args)]
pub struct ListEnginesArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct EngineRow {
    engine: EngineName,
    settings: &'static str,
    requires_database_name: bool,
    source_attributes: Option<&'static str>,
    target_attributes: Option<&'static str>,
}

impl From<EngineName> for EngineRow {
    fn from(engine: EngineName) -> Self {
        Self {
            engine,
            settings: engine.settings_key(),
            requires_database_name: engine.requires_database_name(),
            source_attributes: engine.extra_connection_attributes(EndpointType::Source),
            target_attributes: engine.extra_connection_attributes(EndpointType::Target),
        }
    }
}

pub fn execute(args: ListEnginesArgs) -> anyhow::Result<()> {
    let rows: Vec<EngineRow> = EngineName::ALL.into_iter().map(EngineRow::from).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<19} {:<28} {:<24} {}",
        "ENGINE", "SETTINGS", "SOURCE ATTRIBUTES", "TARGET ATTRIBUTES"
    );
    println!("{}", "-".repeat(100));
    for row in &rows {
        println!(
            "{:<19} {:<28} {:<24} {}",
            row.engine.as_str(),
            row.settings,
            row.source_attributes.unwrap_or("-"),
            row.target_attributes.unwrap_or("-")
        );
    }

    Ok(())
}
