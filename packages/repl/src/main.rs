use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use cosmos_client::{CosmosClient, Credentials};
use cosmos_repl::host::{PlainHost, TerminalHost};
use cosmos_repl::io::IoHost;
use cosmos_repl::session::ColorMode;
use cosmos_repl::ReplCore;

/// cosmos-cli - Interactive CosmosDB query shell
#[derive(Parser, Debug)]
#[command(name = "cosmos-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pre-select a database
    #[arg(short = 'd', long)]
    database: Option<String>,

    /// Pre-select a collection
    #[arg(short = 'c', long)]
    collection: Option<String>,

    /// When to use ANSI color
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Commands to run non-interactively, in order, before exiting
    #[arg(trailing_var_arg = true)]
    commands: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match CosmosClient::connect(&credentials) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut core = ReplCore::new(client, args.color);

    let result = if args.commands.is_empty() {
        run_interactive(&mut core, &args)
    } else {
        run_batch(&mut core, &args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(core: &mut ReplCore, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut host = TerminalHost::new(
        core.context().client_handle(),
        core.context().cache_handle(),
    )?;
    preselect(core, args, &mut host)?;
    core.run(&mut host)?;
    Ok(())
}

fn run_batch(core: &mut ReplCore, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut host = PlainHost::new();
    preselect(core, args, &mut host)?;
    core.run_batch(&args.commands, &mut host)?;
    Ok(())
}

fn preselect(
    core: &mut ReplCore,
    args: &Args,
    host: &mut impl IoHost,
) -> Result<(), Box<dyn std::error::Error>> {
    core.preselect(args.database.as_deref(), args.collection.as_deref(), host)?;
    Ok(())
}
