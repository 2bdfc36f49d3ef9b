//! Human-readable rendering of check results.

use crate::capability::{FoodSafetyVerdict, SafetyStatus};

/// Render a verdict the way the CLI prints it.
pub fn format_verdict(verdict: &FoodSafetyVerdict) -> String {
    let marker = match verdict.status {
        SafetyStatus::Safe => "✅",
        SafetyStatus::Unsafe => "❌",
        SafetyStatus::Unknown => "❓",
    };
    let safe = match verdict.is_safe {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };
    format!(
        "\n{} Food Safety Check Result:\nFood Item: {}\nStatus: {}\nSafe for Chickens: {}\nMessage: {}\n",
        marker,
        verdict.food_item,
        verdict.status.as_str().to_uppercase(),
        safe,
        verdict.message
    )
}
