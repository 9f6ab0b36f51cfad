//! Terminal rendering for schemas, rows, sessions, and notifications

use crate::api::{Row, SchemaResponse};
use crate::quota::WARNING_THRESHOLD;
use crate::session::Session;
use crate::workflow::{Notification, NotificationKind};
use colored::{ColoredString, Colorize};
use prettytable::{row, Cell, Row as TableRow, Table};

/// Rows shown in a data preview before truncating
pub const PREVIEW_ROWS: usize = 10;

/// One line per notification, colored by severity
pub fn print_notifications(notifications: &[Notification]) {
    for n in notifications {
        println!("{}", notification_line(n));
    }
}

fn notification_line(n: &Notification) -> ColoredString {
    match n.kind {
        NotificationKind::Success => format!("✔ {}", n.message).green(),
        NotificationKind::Warning => format!("⚠ {}", n.message).yellow(),
        NotificationKind::Error => format!("✘ {}", n.message).red(),
    }
}

/// Print an error the way the steps surface failures inline
pub fn print_error(err: &anyhow::Error) {
    println!("{}", notification_line(&Notification::error(err.to_string())));
}

/// Remaining-request count, highlighted once it is low
pub fn remaining_badge(remaining: u32) -> ColoredString {
    let text = remaining.to_string();
    let low = crate::quota::DAILY_LIMIT.saturating_sub(WARNING_THRESHOLD);
    if remaining == 0 {
        text.red().bold()
    } else if remaining <= low {
        text.yellow().bold()
    } else {
        text.green().bold()
    }
}

/// Column name, type, and allowed values of a schema
pub fn schema_table(schema: &SchemaResponse) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Name", "Type", "Values"]);
    for (i, field) in schema.schema.iter().enumerate() {
        let values = field
            .values
            .as_ref()
            .map(|v| v.join(", "))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![i + 1, field.name, field.field_type, values]);
    }
    table
}

/// The first `limit` rows, columns taken from the first row
pub fn rows_table(rows: &[Row], limit: usize) -> Table {
    let mut table = Table::new();
    let Some(first) = rows.first() else {
        return table;
    };

    let headers: Vec<&String> = first.keys().collect();
    table.add_row(TableRow::new(
        headers.iter().map(|h| Cell::new(h)).collect(),
    ));
    for row in rows.iter().take(limit) {
        let cells = headers
            .iter()
            .map(|h| {
                let text = match row.get(h.as_str()) {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Cell::new(&text)
            })
            .collect();
        table.add_row(TableRow::new(cells));
    }
    table
}

/// Stored session metadata as a two-column table
pub fn session_table(session: &Session) -> Table {
    let mut table = Table::new();
    let unknown = "-".to_string();
    table.add_row(row!["Session ID", session.id.as_ref().unwrap_or(&unknown)]);
    table.add_row(row!["User ID", session.user_id.as_ref().unwrap_or(&unknown)]);
    table.add_row(row!["Provider", session.provider.as_ref().unwrap_or(&unknown)]);
    table.add_row(row![
        "Signed in as",
        session.provider_uid.as_ref().unwrap_or(&unknown)
    ]);
    table.add_row(row!["Created", session.created_at.as_ref().unwrap_or(&unknown)]);
    table.add_row(row!["Expires", session.expire.as_ref().unwrap_or(&unknown)]);
    table
}

/// Print a schema with a heading
pub fn print_schema(schema: &SchemaResponse) {
    println!(
        "\nSchema: {} columns, model {}\n",
        schema.column_count, schema.model_used
    );
    schema_table(schema).printstd();
    println!();
}

/// Print a data preview with a heading
pub fn print_rows_preview(rows: &[Row]) {
    println!("\nGenerated Data ({} rows)\n", rows.len());
    rows_table(rows, PREVIEW_ROWS).printstd();
    if rows.len() > PREVIEW_ROWS {
        println!("... {} more rows", rows.len() - PREVIEW_ROWS);
    }
    println!();
}
