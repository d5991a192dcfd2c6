use std::path::PathBuf;

use clap::Args;

use dms_core::{ContextConfig, DmsError};

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the context file to validate
    #[arg(short, long, default_value = "conf/env.json")]
    pub config: PathBuf,
    /// Environment to validate
    #[arg(short, long, env = "DMS_ENVIRONMENT")]
    pub environment: String,
}

pub fn execute(args: ValidateArgs) -> anyhow::Result<()> {
    println!(
        "Validating {} ({})...",
        args.config.display(),
        args.environment
    );

    let context = ContextConfig::load(&args.config, &args.environment)?;
    println!("  Parsing: OK");
    println!(
        "  Replication instance: {}",
        context.replication_instance_identifier
    );
    println!("  Tasks found: {}", context.tasks.len());

    for (i, task) in context.tasks.iter().enumerate() {
        let migration_type = task.migration_type.or(context.migration_type).unwrap_or_default();
        println!("\n  Task #{}: '{}'", i + 1, task.name);
        println!("    Source: {}", task.source_engine());
        println!("    Target: {}", task.target_engine());
        println!("    Migration type: {migration_type}");
        println!(
            "    Table mappings: {} rule(s)",
            task.resolved_table_mappings().rules.len()
        );
    }

    let errors = match context.validate() {
        Ok(()) => Vec::new(),
        Err(DmsError::Validation(errors)) => errors,
        Err(e) => return Err(e.into()),
    };

    println!();
    if errors.is_empty() {
        println!("Validation PASSED");
    } else {
        println!("Validation FAILED with {} error(s):", errors.len());
        for err in &errors {
            eprintln!("  - {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}
