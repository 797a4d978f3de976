use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use stockaudit_observability::LogFormat;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "stockaudit", about = "Warehouse stock audit reconciliation", version)]
struct Cli {
    /// Log line format (logs go to stderr).
    #[arg(long, global = true, env = "STOCKAUDIT_LOG_FORMAT", default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the warehouses present in a stock listing.
    Warehouses(StockArgs),
    /// Replay a scan file against one warehouse and emit the JSON report.
    Report(ReportArgs),
    /// Read scans interactively from stdin.
    Scan(SessionArgs),
}

#[derive(Args)]
struct StockArgs {
    /// Stock listing: a JSON array of row objects.
    #[arg(long, env = "STOCKAUDIT_STOCK_FILE", value_name = "FILE")]
    stock: PathBuf,
}

#[derive(Args)]
struct SessionArgs {
    #[command(flatten)]
    stock: StockArgs,

    /// Warehouse to audit.
    #[arg(long, env = "STOCKAUDIT_WAREHOUSE")]
    warehouse: String,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Scan file, one code per line; blank lines are ignored.
    #[arg(long, value_name = "FILE")]
    scans: PathBuf,

    /// Observation note for the record accuracy (ERI) pass.
    #[arg(long, value_name = "TEXT")]
    eri_note: Option<String>,

    /// Observation note for the location accuracy (ERU) pass.
    #[arg(long, value_name = "TEXT")]
    eru_note: Option<String>,

    /// Write the report here instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    stockaudit_observability::init(cli.log_format);

    match cli.command {
        Commands::Warehouses(args) => {
            let desk = commands::open_desk(&args.stock)?;
            commands::list_warehouses(&desk, &mut io::stdout().lock())?;
        }
        Commands::Report(args) => {
            let mut desk = commands::open_session(&args.session.stock.stock, &args.session.warehouse)?;

            let notes = commands::Notes {
                records: args.eri_note,
                locations: args.eru_note,
            };
            let report = commands::replay(&mut desk, &args.scans, &notes)?;
            commands::write_report(&report, args.output.as_deref())?;
            eprint!("{}", render::summary_table(&report));
        }
        Commands::Scan(args) => {
            let mut desk = commands::open_session(&args.stock.stock, &args.warehouse)?;
            commands::scan_loop(&mut desk, io::stdin().lock(), &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
