use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "tvscan")]
#[command(about = "Stock screener scan gateway", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the scan gateway server
    Serve {
        /// Port to listen on (overrides SCREENER_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run a one-shot scan and print the rows
    Scan {
        /// Markets to scan
        #[arg(short, long, default_value = "america")]
        market: Vec<String>,

        /// Columns to retrieve, comma-separated
        #[arg(short, long, default_value = "name,close,volume")]
        columns: String,

        /// Filter in field:op:value form (e.g. close:gte:10 or
        /// close:between:50,100), repeatable
        #[arg(short, long)]
        filter: Vec<String>,

        /// Ticker allow-list, comma-separated
        #[arg(short, long)]
        tickers: Option<String>,

        /// Page to fetch (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page
        #[arg(long, default_value_t = 50)]
        page_size: usize,
    },
    /// Fetch the full ticker universe and save it as JSON
    FetchTickers {
        /// Output file (default: data/tickers.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await,
        Commands::Scan {
            market,
            columns,
            filter,
            tickers,
            page,
            page_size,
        } => commands::scan::run(market, &columns, &filter, tickers.as_deref(), page, page_size).await,
        Commands::FetchTickers { output } => commands::fetch_tickers::run(output).await,
    }
}
