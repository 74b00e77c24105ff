use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use zaiko::cli;
use zaiko::error::ZaikoResult;

#[derive(Parser)]
#[command(name = "zaiko")]
#[command(about = "在庫集計表から在庫表（箱）と在庫表（こもの）を作成します")]
#[command(long_about = "Zaiko - inventory stock sheet builder

Reads the 在庫集計表 sheet of a summary workbook, takes the stock column
for the collection date, drops excluded products and rebuilds the two
stock sheets with the workbook's own formatting.

COMMANDS:
  build    - Write 在庫集計結果_YYYYMMDD.xlsx
  inspect  - Show the resolved column and both lists without writing
  layout   - Print the effective layout as YAML

EXAMPLES:
  zaiko build 在庫.xlsm                        # Today's date (Japan time)
  zaiko build 在庫.xlsm --date 2024/05/01      # Explicit collection date
  zaiko build 在庫.xlsm --weekly               # Weekday template (Sun..Fri)
  zaiko inspect 在庫.xlsm --date 2024-05-01
  zaiko layout > layout.yaml                   # Start a custom layout

Set RUST_LOG (e.g. RUST_LOG=zaiko=debug) for detailed logs.")]
#[command(version)]
struct Cli {
    /// Show debug logs and extra detail
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the stock workbook.

The stock column is found by locating the date in row 5 of 在庫集計表 and
stepping 8 columns right; row 7 of that column must read 本残. With
--weekly the column comes from the weekday table instead
(Sun=M, Mon=R, Tue=W, Wed=AB, Thu=AG, Fri=AL; Saturday is rejected).

OUTPUT:
  Only 在庫表（箱） and 在庫表（こもの） are written, as a plain .xlsx.
  Macros and macro-only defined names are not carried.")]
    /// Build the stock workbook
    Build {
        /// Summary workbook (.xlsx / .xlsm)
        input: PathBuf,

        /// Collection date, YYYY-MM-DD or YYYY/MM/DD (default: today in Japan)
        #[arg(short, long)]
        date: Option<String>,

        /// Output file path
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,

        /// Directory for the dated output file
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Layout YAML overriding sheet names, rows and rules
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Use the weekday column table
        #[arg(short, long)]
        weekly: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved column and both lists without writing
    Inspect {
        /// Summary workbook (.xlsx / .xlsm)
        input: PathBuf,

        /// Collection date, YYYY-MM-DD or YYYY/MM/DD (default: today in Japan)
        #[arg(short, long)]
        date: Option<String>,

        /// Layout YAML overriding sheet names, rows and rules
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Use the weekday column table
        #[arg(short, long)]
        weekly: bool,
    },

    /// Print the effective layout as YAML
    Layout {
        /// Layout YAML to merge over the defaults
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Start from the weekday preset
        #[arg(short, long)]
        weekly: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "zaiko=debug" } else { "zaiko=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(cli: Cli) -> ZaikoResult<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Build {
            input,
            date,
            output,
            out_dir,
            layout,
            weekly,
            json,
        } => cli::build(input, date, output, out_dir, layout, weekly, json, verbose),

        Commands::Inspect {
            input,
            date,
            layout,
            weekly,
        } => cli::inspect(input, date, layout, weekly),

        Commands::Layout { layout, weekly } => cli::layout(layout, weekly),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = dispatch(cli) {
        eprintln!("{} {}", "エラー:".red().bold(), e);
        process::exit(1);
    }
}
