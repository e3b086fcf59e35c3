// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human and JSON output for command results.

use barberbook_core::BarberError;
use serde::Serialize;

pub fn line(text: impl std::fmt::Display) {
    println!("{text}");
}

pub fn json<T: Serialize>(value: &T) -> Result<(), BarberError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| BarberError::Internal(format!("failed to encode output: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Whole currency units from minor units, e.g. `2550` -> `25.50`.
pub fn money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats_minor_units() {
        assert_eq!(money(2550), "25.50");
        assert_eq!(money(5), "0.05");
        assert_eq!(money(-120), "-1.20");
    }
}
