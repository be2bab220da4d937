use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use royalbit_groupdoc::cli;
use royalbit_groupdoc::config::GroupdocConfig;
use royalbit_groupdoc::error::GroupdocError;
use royalbit_groupdoc::export::ArtifactKind;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "groupdoc")]
#[command(about = "Split a spreadsheet by activity code and export each group.")]
#[command(long_about = "Groupdoc - group spreadsheet rows by activity code (kode kegiatan)
and export each group as Excel, Word and PDF.

COMMANDS:
  inspect   - Show header row, columns and groups of a workbook
  upload    - Load a workbook as the active dataset
  groups    - List group keys of the active dataset
  show      - Print the rows of one group
  export    - Write Excel/Word/PDF files for one group
  split     - Export every group of one or more workbooks

EXAMPLES:
  groupdoc upload rekap.xlsx                 # Auto-detect the code column
  groupdoc upload rekap.xlsx --column Unit   # Group by a chosen column
  groupdoc groups
  groupdoc export 5.2.01 --format pdf
  groupdoc split jan.xlsx feb.xlsx -o output")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "GROUPDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the active dataset snapshot
    #[arg(long, global = true, env = "GROUPDOC_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Directory where exported files are written
    #[arg(short = 'o', long, global = true, env = "GROUPDOC_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Fall back to the first column when no grouping column matches
    #[arg(long, global = true)]
    first_column_fallback: bool,

    /// Print errors as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a workbook is read, without storing it
    Inspect {
        /// Path to the workbook (.xlsx, .xls, .xlsb, .ods)
        file: PathBuf,

        /// Grouping column to use instead of auto-detection
        #[arg(short, long)]
        column: Option<String>,
    },

    /// Load a workbook as the active dataset
    Upload {
        /// Path to the workbook
        file: PathBuf,

        /// Grouping column to use instead of auto-detection
        #[arg(short, long)]
        column: Option<String>,
    },

    /// List group keys of the active dataset
    Groups,

    /// Print the rows of one group
    Show {
        /// Group key (exact value of the grouping column)
        key: String,
    },

    /// Write export files for one group
    Export {
        /// Group key (exact value of the grouping column)
        key: String,

        /// Formats to write (xlsx, docx, pdf); all when omitted
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<ArtifactKind>,
    },

    /// Export every group of each workbook, one session per workbook
    Split {
        /// Paths to the workbooks
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Grouping column to use instead of auto-detection
        #[arg(short, long)]
        column: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "groupdoc=info,royalbit_groupdoc=info",
        1 => "groupdoc=debug,royalbit_groupdoc=debug",
        _ => "groupdoc=trace,royalbit_groupdoc=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<GroupdocConfig, GroupdocError> {
    let mut config = match &cli.config {
        Some(path) => GroupdocConfig::from_file(path)?,
        None => GroupdocConfig::default(),
    };
    if let Some(dir) = &cli.state_dir {
        config.state_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if cli.first_column_fallback {
        config.resolver.first_column_fallback = true;
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Inspect { file, column } => cli::inspect(file, column, &config)?,
        Commands::Upload { file, column } => cli::upload(file, column, &config)?,
        Commands::Groups => cli::groups(&config)?,
        Commands::Show { key } => cli::show(key, &config)?,
        Commands::Export { key, format } => cli::export(key, format, &config)?,
        Commands::Split { files, column } => cli::split(files, column, &config)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<GroupdocError>() {
                Some(e) if json => match serde_json::to_string(&e.report()) {
                    Ok(line) => eprintln!("{}", line),
                    Err(_) => eprintln!("{}", e),
                },
                Some(e) => eprintln!(
                    "{} {}",
                    format!("❌ [{}]", e.kind()).red().bold(),
                    e
                ),
                None => eprintln!("{} {:#}", "❌".red().bold(), err),
            }
            ExitCode::FAILURE
        }
    }
}
