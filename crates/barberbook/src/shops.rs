// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barberbook shops` subcommands.

use barberbook_core::BarberError;
use clap::Subcommand;

use crate::app::App;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum ShopsCommand {
    /// Connected customers and running offers.
    Stats { shop_id: String },
    /// The shop's price list.
    Prices { shop_id: String },
}

pub async fn run(app: &App, cmd: ShopsCommand, json: bool) -> Result<(), BarberError> {
    match cmd {
        ShopsCommand::Stats { shop_id } => {
            let stats = app.shops.shop_stats(&shop_id).await?;
            if json {
                return output::json(&stats);
            }
            output::line(format!("customers:     {}", stats.customer_count));
            output::line(format!("active offers: {}", stats.active_offers_count));
            Ok(())
        }
        ShopsCommand::Prices { shop_id } => {
            let prices = app.shops.prices(&shop_id).await?;
            if json {
                return output::json(&prices);
            }
            for item in prices {
                let duration = item
                    .duration_minutes
                    .map(|m| format!("{m} min"))
                    .unwrap_or_default();
                output::line(format!(
                    "{:<24} {:>8}  {}",
                    item.name,
                    output::money(item.price_cents),
                    duration
                ));
            }
            Ok(())
        }
    }
}
