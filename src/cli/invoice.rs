//! Invoice CLI commands

use clap::{Args, Subcommand};

use super::{parse_date, parse_date_or_today, print_bulk_outcome, ListArgs, StdinConfirm};
use crate::config::Settings;
use crate::display::invoice::{format_invoice_details, format_invoice_list, format_unbilled_items};
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{ClientInfo, InvoiceStatus};
use crate::services::{CreateInvoiceInput, InvoiceService, InvoiceUpdate};
use crate::storage::Storage;

/// Client contact details
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub vat: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

/// Invoice subcommands
#[derive(Subcommand)]
pub enum InvoiceCommands {
    /// Show the unpaid labor and materials that a draft would bill
    Unbilled,
    /// Create the draft invoice
    Create {
        /// Client name
        #[arg(short, long)]
        client: String,
        /// Invoice number (default: next in sequence)
        #[arg(short, long)]
        number: Option<String>,
        /// Invoice date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[command(flatten)]
        details: ClientArgs,
    },
    /// List invoices
    List {
        #[command(flatten)]
        filter: ListArgs,
    },
    /// Show an invoice with its items
    Show {
        /// Invoice ID or number
        id: String,
    },
    /// Edit an invoice's number, dates or client details
    Edit {
        /// Invoice ID or number
        id: String,
        #[arg(short, long)]
        number: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(short, long)]
        client: Option<String>,
        #[command(flatten)]
        details: ClientArgs,
    },
    /// Finalize (paid) or reopen (draft) an invoice
    Status {
        /// Invoice ID or number
        id: String,
        /// New status (draft, paid)
        status: String,
    },
    /// Delete an invoice, moving its items back to unpaid
    Delete {
        /// Invoice ID or number
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all invoices
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_invoice_status(value: &str) -> BackofficeResult<InvoiceStatus> {
    InvoiceStatus::parse(value).ok_or_else(|| {
        BackofficeError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: draft, paid",
            value
        ))
    })
}

/// Handle an invoice command
pub fn handle_invoice_command(
    storage: &Storage,
    settings: &Settings,
    cmd: InvoiceCommands,
) -> BackofficeResult<()> {
    let service = InvoiceService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        InvoiceCommands::Unbilled => {
            let items = service.unbilled_items()?;
            print!("{}", format_unbilled_items(&items, symbol));
        }

        InvoiceCommands::Create {
            client,
            number,
            date,
            due,
            details,
        } => {
            let invoice_number = match number {
                Some(n) => n,
                None => service.suggest_next_number(settings)?,
            };
            let input = CreateInvoiceInput {
                invoice_number,
                date: parse_date_or_today(date.as_deref(), "date")?,
                due_date: due.as_deref().map(|d| parse_date(d, "due date")).transpose()?,
                client: ClientInfo {
                    name: client,
                    address: details.address,
                    vat_info: details.vat,
                    postal_code: details.postal_code,
                    phone: details.phone,
                    email: details.email,
                },
            };
            let invoice = service.create_draft(input)?;
            let view = service.find(&invoice.id.to_string())?;

            println!("Created draft invoice {}", view.invoice_number);
            println!(
                "  Items: {}  Total: {}",
                view.items.len(),
                view.total.format_with_symbol(symbol)
            );
            println!("  ID: {}", view.id);
        }

        InvoiceCommands::List { filter } => {
            let invoices = service.list(&filter.to_filter())?;
            print!("{}", format_invoice_list(&invoices, symbol));
        }

        InvoiceCommands::Show { id } => {
            let invoice = service.find(&id)?;
            print!("{}", format_invoice_details(&invoice, symbol));
        }

        InvoiceCommands::Edit {
            id,
            number,
            date,
            due,
            client,
            details,
        } => {
            let update = InvoiceUpdate {
                invoice_number: number,
                date: date.as_deref().map(|d| parse_date(d, "date")).transpose()?,
                due_date: due.as_deref().map(|d| parse_date(d, "due date")).transpose()?,
                client_name: client,
                address: details.address,
                vat_info: details.vat,
                postal_code: details.postal_code,
                phone: details.phone,
                email: details.email,
            };
            let invoice = service.update(&id, update)?;
            println!("Updated invoice {}", invoice.invoice_number);
        }

        InvoiceCommands::Status { id, status } => {
            let invoice = service.set_status(&id, parse_invoice_status(&status)?)?;
            println!(
                "Invoice {} is now {} ({})",
                invoice.invoice_number,
                invoice.status,
                invoice.total.format_with_symbol(symbol)
            );
        }

        InvoiceCommands::Delete { id, yes } => {
            match service.delete(&id, &StdinConfirm::new(yes))? {
                Some(invoice) => println!("Deleted invoice {}", invoice.invoice_number),
                None => println!("Cancelled."),
            }
        }

        InvoiceCommands::DeleteAll { yes } => {
            let outcome = service.delete_all(&StdinConfirm::new(yes))?;
            print_bulk_outcome(outcome, "invoices");
        }
    }

    Ok(())
}
