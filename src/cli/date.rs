use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};
use now::DateTimeNow;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateSelection {
    #[arg(
        long = "date",
        global = true,
        help = "Day to work with instead of today. Examples are \"yesterday\", \"2 days ago\", \"15/03/2025\""
    )]
    date: Option<String>,
    #[arg(long, global = true, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DateSelection {
    /// Parses the selected day relative to `now`. [None] means today.
    pub fn parse(&self, now: DateTime<Local>) -> Result<Option<NaiveDate>> {
        let Some(date) = &self.date else {
            return Ok(None);
        };
        match parse_date_string(date, now, self.date_style.into()) {
            Ok(v) => Ok(Some(v.with_timezone(&Local).beginning_of_day().date_naive())),
            Err(e) => Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate date {date}: {e}"),
                )
                .into()),
        }
    }
}
