use jiff::civil::Date;
use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::types::{CurrencyPrice, Message, Store, Ticket};

use super::{days_ago, format_date, format_severity_colored, format_status_colored};

/// A row in the ticket list table
#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Updated")]
    updated: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Reply")]
    reply: String,
}

/// Narrow row: drops the date and last-reply columns
#[derive(Tabled)]
struct CompactTicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "Created")]
    created: String,
}

/// Render tickets as a table
pub fn ticket_table(tickets: &[Ticket], today: Date, compact: bool) -> String {
    let mut table = if compact {
        Table::new(tickets.iter().map(|t| CompactTicketRow {
            id: t.ticket_id.clone(),
            severity: format_severity_colored(t.urgency),
            status: format_status_colored(t.status()),
            title: t.title.clone(),
        }))
    } else {
        Table::new(tickets.iter().map(|t| TicketRow {
            id: t.ticket_id.clone(),
            severity: format_severity_colored(t.urgency),
            status: format_status_colored(t.status()),
            title: t.title.clone(),
            updated: format_date(&t.date_updated),
            age: days_ago(&t.date_updated, today),
            reply: t.reply_label().to_string(),
        }))
    };
    table.with(Style::rounded());
    table.to_string()
}

/// Print the visible tickets followed by a paging footer
pub fn print_ticket_table(tickets: &[Ticket], total: usize, today: Date, compact: bool) {
    if total == 0 {
        println!("No tickets");
        return;
    }
    println!("{}", ticket_table(tickets, today, compact));
    if tickets.len() < total {
        println!(
            "{}",
            format!(
                "Showing {} of {} tickets (use --page or --all for more)",
                tickets.len(),
                total
            )
            .dimmed()
        );
    }
}

/// Print a ticket header and its thread, oldest message first
pub fn print_thread(ticket: Option<&Ticket>, ticket_id: &str, messages: &[Message]) {
    match ticket {
        Some(t) => {
            println!(
                "{} {} {}",
                ticket_id.cyan(),
                format_severity_colored(t.urgency),
                format_status_colored(t.status())
            );
            println!("{}", t.title.bold());
            println!("Updated: {}", format_date(&t.date_updated));
        }
        None => println!("{}", ticket_id.cyan()),
    }

    if messages.is_empty() {
        println!("\nNo messages");
        return;
    }

    for message in messages {
        let who = if message.is_from_support() {
            message.name.magenta().bold().to_string()
        } else {
            message.name.bold().to_string()
        };
        println!("\n{} {}", who, format_date(&message.date_created).dimmed());
        for line in message.message.lines() {
            println!("  {line}");
        }
    }
}

pub fn print_store_table(stores: &[Store]) {
    if stores.is_empty() {
        println!("No stores");
        return;
    }
    let mut table = Table::new(stores.iter().map(|s| StoreRow {
        id: s.store_id.clone(),
        name: s.name.clone(),
        url: s.url.clone().unwrap_or_else(|| "-".to_string()),
        created: format_date(&s.date_created),
    }));
    table.with(Style::rounded());
    println!("{table}");
}

pub fn print_price(price: &CurrencyPrice) {
    println!(
        "1 {} = {} {}",
        price.currency.cyan(),
        price.price.bold(),
        price.fiat
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Urgency;
    use jiff::civil::date;

    fn ticket(id: &str, title: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            title: title.to_string(),
            date_created: "2024-03-01T10:00:00Z".to_string(),
            date_updated: "2024-03-08T10:00:00Z".to_string(),
            is_active: true,
            urgency: Urgency::High,
            last_reply: "support".to_string(),
        }
    }

    #[test]
    fn test_wide_table_has_all_columns() {
        let table = ticket_table(&[ticket("t-1", "Refund")], date(2024, 3, 10), false);
        assert!(table.contains("Updated"));
        assert!(table.contains("2024-03-08 10:00"));
        assert!(table.contains("2 days ago"));
        assert!(table.contains("awaiting you"));
        assert!(table.contains("Refund"));
    }

    #[test]
    fn test_compact_table_drops_secondary_columns() {
        let table = ticket_table(&[ticket("t-1", "Refund")], date(2024, 3, 10), true);
        assert!(table.contains("t-1"));
        assert!(!table.contains("Updated"));
        assert!(!table.contains("awaiting you"));
    }
}
