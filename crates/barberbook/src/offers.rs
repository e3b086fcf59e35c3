// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barberbook offers` subcommands.

use barberbook_core::BarberError;
use barberbook_offers::{NewOffer, OfferFilter};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Subcommand, ValueEnum};

use crate::app::App;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum OffersCommand {
    /// List a shop's offers.
    List {
        shop_id: String,
        #[arg(long, default_value = "all")]
        filter: FilterArg,
    },
    /// Create an offer. Dates are YYYY-MM-DD or RFC 3339.
    Create {
        shop_id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        discount: u8,
        #[arg(long)]
        start: String,
        /// A bare date includes the whole day.
        #[arg(long)]
        end: String,
    },
    /// Switch an offer on or off.
    Toggle { offer_id: String, state: Switch },
    /// Redeem an offer for a customer after checking the scanned code.
    Redeem {
        offer_id: String,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        code: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterArg {
    All,
    Active,
    Inactive,
}

impl From<FilterArg> for OfferFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Active => Self::Active,
            FilterArg::Inactive => Self::Inactive,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

pub(crate) fn parse_date(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, BarberError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        BarberError::Validation(format!("'{value}' is not a date (YYYY-MM-DD)"))
    })?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .unwrap_or_default();
    Ok(date.and_time(time).and_utc())
}

/// Offers may only be issued for a shop that exists.
async fn require_shop(app: &App, shop_id: &str) -> Result<(), BarberError> {
    match app.shops.shop(shop_id).await? {
        Some(_) => Ok(()),
        None => Err(BarberError::NotFound {
            entity: "shop",
            id: shop_id.to_string(),
        }),
    }
}

pub async fn run(app: &App, cmd: OffersCommand, json: bool) -> Result<(), BarberError> {
    match cmd {
        OffersCommand::List { shop_id, filter } => {
            let offers = app.offers.list(&shop_id, filter.into()).await?;
            if json {
                return output::json(&offers);
            }
            let counts = app.offers.counts(&shop_id).await?;
            output::line(format!(
                "{} active, {} inactive, {} total",
                counts.active, counts.inactive, counts.total
            ));
            for offer in offers {
                output::line(format!(
                    "{}  {:<8}  {:>3}%  {} .. {}  {}  {}",
                    offer.id,
                    offer.code,
                    offer.discount,
                    offer.start_date.format("%Y-%m-%d"),
                    offer.end_date.format("%Y-%m-%d"),
                    if offer.active { "on " } else { "off" },
                    offer.title,
                ));
            }
            Ok(())
        }
        OffersCommand::Create {
            shop_id,
            title,
            description,
            discount,
            start,
            end,
        } => {
            require_shop(app, &shop_id).await?;
            let input = NewOffer {
                title,
                description,
                discount,
                start_date: parse_date(&start, false)?,
                end_date: parse_date(&end, true)?,
            };
            let offer = app.offers.create(&shop_id, input).await?;
            if json {
                return output::json(&offer);
            }
            output::line(format!("created offer {} with code {}", offer.id, offer.code));
            Ok(())
        }
        OffersCommand::Toggle { offer_id, state } => {
            let offer = app
                .offers
                .toggle_status(&offer_id, matches!(state, Switch::On))
                .await?;
            if json {
                return output::json(&offer);
            }
            output::line(format!(
                "offer {} is now {}",
                offer.id,
                if offer.active { "on" } else { "off" }
            ));
            Ok(())
        }
        OffersCommand::Redeem {
            offer_id,
            customer,
            code,
        } => {
            let redemption = app.offers.redeem_with_code(&offer_id, &customer, &code).await?;
            if json {
                return output::json(&redemption);
            }
            output::line(format!(
                "offer {} redeemed by {}",
                redemption.offer_id, redemption.customer_id
            ));
            Ok(())
        }
    }
}
