// src/ui.rs

use crate::{constants, error::AppResult, models::ResultRecord};
use colored::{ColoredString, Colorize};
use std::sync::LazyLock;

pub static OK: LazyLock<ColoredString> = LazyLock::new(|| "[OK]".green());
pub static ERROR: LazyLock<ColoredString> = LazyLock::new(|| "[X]".red());

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

/// `title (resource_id) [quality]: url`
pub fn format_record(record: &ResultRecord) -> String {
    format!(
        "{} ({}) [{}]: {}",
        record.title, record.resource_id, record.quality, record.m3u8
    )
}

pub fn print_records(records: &[ResultRecord]) {
    print_header(&format!("m3u8 列表 (共 {} 个)", records.len()));
    for record in records {
        println!("{} {}", *OK, format_record(record));
    }
}

pub fn print_records_json(records: &[ResultRecord]) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
