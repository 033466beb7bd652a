//! Material CLI commands

use clap::Subcommand;

use super::labor::parse_payment_status;
use super::{
    parse_amount, parse_date, parse_date_or_today, parse_money, print_bulk_outcome, ListArgs,
    StdinConfirm,
};
use crate::config::Settings;
use crate::display::material::{format_material_details, format_material_list};
use crate::error::BackofficeResult;
use crate::services::{CreateMaterialInput, MaterialService, MaterialUpdate};
use crate::storage::Storage;

/// Material subcommands
#[derive(Subcommand)]
pub enum MaterialCommands {
    /// Record a material purchase
    Add {
        /// Material name
        name: String,
        /// Quantity bought
        quantity: String,
        /// Price per unit (e.g., "12.50")
        unit_price: String,
        /// Purchase date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Payment status (paid, unpaid)
        #[arg(short, long)]
        status: Option<String>,
        /// Link to the product or receipt
        #[arg(short, long)]
        link: Option<String>,
    },
    /// List materials
    List {
        #[command(flatten)]
        filter: ListArgs,
    },
    /// Show a material with its comments
    Show {
        /// Material ID
        id: String,
    },
    /// Edit a material
    Edit {
        /// Material ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        quantity: Option<String>,
        #[arg(short = 'p', long)]
        unit_price: Option<String>,
        /// New link ("" removes it)
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Mark a material paid or unpaid
    Status {
        /// Material ID
        id: String,
        /// New status (paid, unpaid)
        status: String,
    },
    /// Add a comment to a material
    Comment {
        /// Material ID
        id: String,
        /// Comment text
        text: String,
        /// Comment author
        #[arg(short, long, default_value = "User")]
        author: String,
        /// Link attached to the comment
        #[arg(short, long)]
        link: Option<String>,
    },
    /// Delete a material
    Delete {
        /// Material ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete all materials
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle a material command
pub fn handle_material_command(
    storage: &Storage,
    settings: &Settings,
    cmd: MaterialCommands,
) -> BackofficeResult<()> {
    let service = MaterialService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        MaterialCommands::Add {
            name,
            quantity,
            unit_price,
            date,
            status,
            link,
        } => {
            let input = CreateMaterialInput {
                name,
                date: parse_date_or_today(date.as_deref(), "date")?,
                quantity: parse_amount(&quantity, "quantity")?,
                unit_price: parse_money(&unit_price, "unit price")?,
                status: status.as_deref().map(parse_payment_status).transpose()?,
                link_url: link,
            };
            let item = service.create(input)?;

            println!("Added material: {}", item.name);
            println!("  Total: {}", item.total.format_with_symbol(symbol));
            println!("  ID: {}", item.id);
        }

        MaterialCommands::List { filter } => {
            let items = service.list(&filter.to_filter())?;
            print!("{}", format_material_list(&items, symbol));
        }

        MaterialCommands::Show { id } => {
            let item = service.find(&id)?;
            print!("{}", format_material_details(&item, symbol));
        }

        MaterialCommands::Edit {
            id,
            name,
            date,
            quantity,
            unit_price,
            link,
        } => {
            if name.is_none()
                && date.is_none()
                && quantity.is_none()
                && unit_price.is_none()
                && link.is_none()
            {
                println!("No changes specified. Use --name, --date, --quantity, --unit-price or --link.");
                return Ok(());
            }

            let update = MaterialUpdate {
                name,
                date: date.as_deref().map(|d| parse_date(d, "date")).transpose()?,
                quantity: quantity
                    .as_deref()
                    .map(|q| parse_amount(q, "quantity"))
                    .transpose()?,
                unit_price: unit_price
                    .as_deref()
                    .map(|p| parse_money(p, "unit price"))
                    .transpose()?,
                link_url: link,
            };
            let item = service.update(&id, update)?;
            println!(
                "Updated material: {} ({})",
                item.name,
                item.total.format_with_symbol(symbol)
            );
        }

        MaterialCommands::Status { id, status } => {
            let item = service.set_status(&id, parse_payment_status(&status)?)?;
            println!("Material '{}' is now {}", item.name, item.status);
        }

        MaterialCommands::Comment {
            id,
            text,
            author,
            link,
        } => {
            let item = service.add_comment(&id, &author, &text, link)?;
            println!(
                "Added comment to '{}' ({} comments)",
                item.name,
                item.comments.len()
            );
        }

        MaterialCommands::Delete { id, yes } => {
            match service.delete(&id, &StdinConfirm::new(yes))? {
                Some(item) => println!("Deleted material: {}", item.name),
                None => println!("Cancelled."),
            }
        }

        MaterialCommands::DeleteAll { yes } => {
            let outcome = service.delete_all(&StdinConfirm::new(yes))?;
            print_bulk_outcome(outcome, "materials");
        }
    }

    Ok(())
}
