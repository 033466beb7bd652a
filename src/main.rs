use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use backoffice::cli::{
    handle_export_command, handle_import_command, handle_invoice_command, handle_labor_command,
    handle_material_command, handle_snapshot_command, handle_task_command,
    handle_template_command, today, InvoiceCommands, LaborCommands, ListArgs, MaterialCommands,
    SnapshotFormat, StdinConfirm, TaskCommands,
};
use backoffice::config::{paths::BackofficePaths, settings::Settings};
use backoffice::reports::DashboardReport;
use backoffice::services::reset_all;
use backoffice::storage::Storage;

#[derive(Parser)]
#[command(
    name = "backoffice",
    version,
    about = "Back-office ledger for labor, materials, tasks and invoices",
    long_about = "backoffice records labor and material costs, tracks tasks, and bills \
                  unpaid work through a single draft invoice that is finalized into a \
                  paid one. Data lives in JSON files in a per-user data directory."
)]
struct Cli {
    /// Data directory (overrides the platform default)
    #[arg(long, global = true, env = "BACKOFFICE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Labor entry commands
    #[command(subcommand)]
    Labor(LaborCommands),

    /// Material purchase commands
    #[command(subcommand, alias = "materials")]
    Material(MaterialCommands),

    /// Task commands
    #[command(subcommand, alias = "tasks")]
    Task(TaskCommands),

    /// Invoice commands
    #[command(subcommand, alias = "invoices")]
    Invoice(InvoiceCommands),

    /// Import a CSV file into a collection
    Import {
        /// Collection (labor, materials, tasks)
        collection: String,
        /// Path to the CSV file
        file: PathBuf,
    },

    /// Export a collection to CSV
    Export {
        /// Collection (labor, materials, tasks)
        collection: String,
        /// Output file (default: {collection}_export_{date}.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        filter: ListArgs,
    },

    /// Write a header-only CSV template for a collection
    Template {
        /// Collection (labor, materials, tasks)
        collection: String,
        /// Output file (default: {collection}_template.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export all data to a JSON or YAML snapshot
    Snapshot {
        /// Output file path
        output: PathBuf,
        /// Snapshot format
        #[arg(short, long, value_enum, default_value = "json")]
        format: SnapshotFormat,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the dashboard summary
    Dashboard,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete all data
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => BackofficePaths::with_base_dir(dir),
        None => BackofficePaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    for notice in storage.load_all()? {
        eprintln!("Warning: {}", notice);
    }

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing backoffice at: {}", paths.base_dir().display());
            storage.save_all()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'backoffice labor add --help' to record your first entry.");
        }
        Some(Commands::Config) => {
            println!("Backoffice Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!(
                "Initialized:    {}",
                if storage.is_initialized() { "Yes" } else { "No" }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Invoice prefix:    {}", settings.invoice_prefix);
            println!("  Import author:     {}", settings.import_author);
            println!("  Recent task count: {}", settings.recent_task_count);
        }
        Some(Commands::Labor(cmd)) => handle_labor_command(&storage, &settings, cmd)?,
        Some(Commands::Material(cmd)) => handle_material_command(&storage, &settings, cmd)?,
        Some(Commands::Task(cmd)) => handle_task_command(&storage, cmd)?,
        Some(Commands::Invoice(cmd)) => handle_invoice_command(&storage, &settings, cmd)?,
        Some(Commands::Import { collection, file }) => {
            handle_import_command(&storage, &settings, &collection, &file)?
        }
        Some(Commands::Export {
            collection,
            output,
            filter,
        }) => handle_export_command(&storage, &collection, output, &filter)?,
        Some(Commands::Template { collection, output }) => {
            handle_template_command(&collection, output)?
        }
        Some(Commands::Snapshot {
            output,
            format,
            pretty,
        }) => handle_snapshot_command(&storage, &output, format, pretty)?,
        Some(Commands::Dashboard) => {
            let report = DashboardReport::generate(&storage, today(), settings.recent_task_count)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }
        Some(Commands::Audit { limit }) => {
            let entries = storage.audit().read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Reset { yes }) => {
            if reset_all(&storage, &StdinConfirm::new(yes))? {
                println!("All data has been reset.");
            } else {
                println!("Cancelled.");
            }
        }
        None => {
            println!("backoffice - labor, materials, tasks and invoices");
            println!();
            println!("Run 'backoffice --help' for usage information.");
        }
    }

    Ok(())
}
