//! Output formatting for CLI

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = table();
            table.set_header(T::headers());
            table.add_row(item.row());
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No items found.");
                return;
            }
            let mut table = table();
            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
    }
}

/// Print a simple message
pub fn print_message(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "message": message }));
        }
        OutputFormat::Table => {
            println!("{}", message);
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

/// Print info message
pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

/// Render an optional field for a table cell
pub fn cell(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
