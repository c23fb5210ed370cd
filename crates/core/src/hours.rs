//! Store opening schedule.
//!
//! The kitchen opens in the evening every day and closes later on Friday and
//! Saturday. Status is evaluated against a caller-supplied local timestamp so
//! the service, not this crate, decides what "now" means.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Weekly opening hours, in minutes after local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHours {
    open_min: u32,
    close_min_weekday: u32,
    close_min_weekend: u32,
}

/// Whether the store is open right now, with a customer-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    /// True while orders are being accepted.
    pub open: bool,
    /// pt-BR status line shown in the chat greeting.
    pub message: String,
}

impl Default for StoreHours {
    /// Opens 18:00 every day; closes 23:30 Sunday through Thursday and
    /// midnight on Friday and Saturday.
    fn default() -> Self {
        Self {
            open_min: 18 * 60,
            close_min_weekday: 23 * 60 + 30,
            close_min_weekend: 24 * 60,
        }
    }
}

impl StoreHours {
    /// Build a custom schedule. Times are minutes after midnight; a closing
    /// time of 1440 means the turn of the day.
    #[must_use]
    pub const fn new(open_min: u32, close_min_weekday: u32, close_min_weekend: u32) -> Self {
        Self {
            open_min,
            close_min_weekday,
            close_min_weekend,
        }
    }

    const fn close_min(&self, weekday: Weekday) -> u32 {
        if matches!(weekday, Weekday::Fri | Weekday::Sat) {
            self.close_min_weekend
        } else {
            self.close_min_weekday
        }
    }

    fn label(minutes: u32) -> String {
        format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
    }

    /// Evaluate the schedule at the given local time.
    #[must_use]
    pub fn status_at(&self, local: NaiveDateTime) -> StoreStatus {
        let minute = local.hour() * 60 + local.minute();
        let close = self.close_min(local.weekday());

        if minute >= self.open_min && minute < close {
            StoreStatus {
                open: true,
                message: format!("Estamos abertos até às {}!", Self::label(close)),
            }
        } else if minute < self.open_min {
            StoreStatus {
                open: false,
                message: format!(
                    "Estamos fechados agora. Abrimos às {}.",
                    Self::label(self.open_min)
                ),
            }
        } else {
            StoreStatus {
                open: false,
                message: format!(
                    "Estamos fechados. Voltamos amanhã às {}.",
                    Self::label(self.open_min)
                ),
            }
        }
    }
}
