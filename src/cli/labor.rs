//! Labor CLI commands

use clap::Subcommand;

use super::{
    parse_amount, parse_date, parse_date_or_today, parse_money, print_bulk_outcome, ListArgs,
    StdinConfirm,
};
use crate::config::Settings;
use crate::display::labor::{format_labor_details, format_labor_list};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::PaymentStatus;
use crate::services::{CreateLaborInput, LaborService, LaborUpdate};
use crate::storage::Storage;

/// Labor subcommands
#[derive(Subcommand)]
pub enum LaborCommands {
    /// Record a labor entry
    Add {
        /// Worker or job name
        name: String,
        /// Hours worked (e.g., "6" or "1.5")
        hours: String,
        /// Hourly rate (e.g., "30.00")
        rate: String,
        /// Date worked (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Payment status (paid, unpaid)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// List labor entries
    List {
        #[command(flatten)]
        filter: ListArgs,
    },
    /// Show a labor entry
    Show {
        /// Labor entry ID
        id: String,
    },
    /// Edit a labor entry
    Edit {
        /// Labor entry ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        hours: Option<String>,
        #[arg(short, long)]
        rate: Option<String>,
    },
    /// Mark a labor entry paid or unpaid
    Status {
        /// Labor entry ID
        id: String,
        /// New status (paid, unpaid)
        status: String,
    },
    /// Delete a labor entry
    Delete {
        /// Labor entry ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all labor entries
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub(crate) fn parse_payment_status(value: &str) -> BackofficeResult<PaymentStatus> {
    PaymentStatus::parse(value).ok_or_else(|| {
        BackofficeError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: paid, unpaid",
            value
        ))
    })
}

/// Handle a labor command
pub fn handle_labor_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LaborCommands,
) -> BackofficeResult<()> {
    let service = LaborService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        LaborCommands::Add {
            name,
            hours,
            rate,
            date,
            status,
        } => {
            let input = CreateLaborInput {
                name,
                date: parse_date_or_today(date.as_deref(), "date")?,
                hours: parse_amount(&hours, "hours")?,
                rate: parse_money(&rate, "rate")?,
                status: status.as_deref().map(parse_payment_status).transpose()?,
            };
            let item = service.create(input)?;

            println!("Added labor entry: {}", item.name);
            println!("  Total: {}", item.total.format_with_symbol(symbol));
            println!("  ID: {}", item.id);
        }

        LaborCommands::List { filter } => {
            let items = service.list(&filter.to_filter())?;
            print!("{}", format_labor_list(&items, symbol));
        }

        LaborCommands::Show { id } => {
            let item = service.find(&id)?;
            print!("{}", format_labor_details(&item, symbol));
        }

        LaborCommands::Edit {
            id,
            name,
            date,
            hours,
            rate,
        } => {
            if name.is_none() && date.is_none() && hours.is_none() && rate.is_none() {
                println!("No changes specified. Use --name, --date, --hours or --rate.");
                return Ok(());
            }

            let update = LaborUpdate {
                name,
                date: date.as_deref().map(|d| parse_date(d, "date")).transpose()?,
                hours: hours.as_deref().map(|h| parse_amount(h, "hours")).transpose()?,
                rate: rate.as_deref().map(|r| parse_money(r, "rate")).transpose()?,
            };
            let item = service.update(&id, update)?;
            println!(
                "Updated labor entry: {} ({})",
                item.name,
                item.total.format_with_symbol(symbol)
            );
        }

        LaborCommands::Status { id, status } => {
            let item = service.set_status(&id, parse_payment_status(&status)?)?;
            println!("Labor entry '{}' is now {}", item.name, item.status);
        }

        LaborCommands::Delete { id, yes } => {
            match service.delete(&id, &StdinConfirm::new(yes))? {
                Some(item) => println!("Deleted labor entry: {}", item.name),
                None => println!("Cancelled."),
            }
        }

        LaborCommands::DeleteAll { yes } => {
            let outcome = service.delete_all(&StdinConfirm::new(yes))?;
            print_bulk_outcome(outcome, "labor entries");
        }
    }

    Ok(())
}
