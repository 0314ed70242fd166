//! Command execution against a slot.

use std::io::Write;

use anyhow::{Context, Result};
use lscache_core::utils::format_age;
use lscache_core::StoreFront;
use serde_json::Value;
use tracing::info;

use crate::cli::SlotCommand;

/// Run `command` against `front`, writing results to `out`.
pub fn run(front: &StoreFront, command: &SlotCommand, out: &mut impl Write) -> Result<()> {
    match command {
        SlotCommand::Show => {
            let all = front.read_all();
            writeln!(out, "{}", serde_json::to_string_pretty(&all)?)?;
        }
        SlotCommand::Users => {
            for user in front.user_names() {
                writeln!(out, "{}", user)?;
            }
        }
        SlotCommand::Caches => {
            for name in front.sub_cache_names() {
                writeln!(out, "{}", name)?;
            }
        }
        SlotCommand::List { cache } => {
            let sub_cache = front.open(cache).result().clone();
            for (name, entry) in &sub_cache {
                let age = entry
                    .time_diff()
                    .map(|diff| format_age(&diff))
                    .unwrap_or_else(|| "unknown".to_string());
                writeln!(out, "{}\t{}", name, age)?;
            }
        }
        SlotCommand::Get { cache, entry } => {
            let found = front.open(cache).get(entry);
            writeln!(out, "{}", serde_json::to_string_pretty(&found)?)?;
        }
        SlotCommand::Put { cache, entry, value } => {
            let data = parse_value(value);
            front
                .open(cache)
                .put(Some(entry.as_str()), &data)
                .with_context(|| format!("Failed to store {}/{}", cache, entry))?;
            info!(slot = front.slot_name(), user = front.current_user(), cache = %cache, entry = %entry, "Stored entry");
        }
        SlotCommand::Delete { cache, entry } => {
            let mut named = front.open(cache);
            named
                .delete(entry)
                .with_context(|| format!("Failed to delete {}/{}", cache, entry))?;
            info!(slot = front.slot_name(), cache = %cache, entry = %entry, "Deleted entry");
        }
        SlotCommand::Clear { cache } => {
            front
                .open(cache)
                .clear()
                .with_context(|| format!("Failed to clear {}", cache))?;
            info!(slot = front.slot_name(), cache = %cache, "Cleared cache");
        }
        SlotCommand::Age { cache, entry } => {
            let diff = front.open(cache).time_diff(entry);
            writeln!(out, "{}", serde_json::to_string_pretty(&diff)?)?;
        }
        SlotCommand::Reset => {
            front.remove_slot().context("Failed to remove slot")?;
            info!(slot = front.slot_name(), "Removed slot");
        }
    }
    Ok(())
}

/// Values that are not valid JSON are stored as plain strings.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
