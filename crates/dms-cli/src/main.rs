use clap::Parser;

mod commands;

#[derive(Parser)]
#[command(
    name = "dms",
    about = "DMS stack synthesizer - replication instances, endpoints and tasks as CloudFormation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // stdout carries the rendered documents
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        commands::Commands::Synth(args) => commands::synth::execute(args),
        commands::Commands::Validate(args) => commands::validate::execute(args),
        commands::Commands::Mapping(args) => commands::mapping::execute(args),
        commands::Commands::TaskSettings(args) => commands::task_settings::execute(args),
        commands::Commands::ListEngines(args) => commands::list_engines::execute(args),
    }
}
