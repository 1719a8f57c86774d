use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` is a message that should be delivered to a
/// phone number owned by a `User` at the `remind_at` timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `User` that created this `Reminder` and is allowed
    /// to view and delete it
    pub user_id: ID,
    /// Phone number that should receive the `message`
    pub destination: String,
    pub message: String,
    /// The timestamp in millis at which the `message` should be
    /// delivered to the `destination`
    pub remind_at: i64,
    pub status: ReminderStatus,
    pub created_at: i64,
}

impl Reminder {
    pub fn new(user_id: ID, destination: String, message: String, remind_at: i64, now: i64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            destination,
            message,
            remind_at,
            status: ReminderStatus::Pending,
            created_at: now,
        }
    }

    /// A destination is a phone number in national or international
    /// notation, possibly with separators. It needs to contain enough
    /// digits to be routable.
    pub fn has_valid_destination(&self) -> bool {
        let digits = self
            .destination
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count();
        (10..=15).contains(&digits)
    }

    /// Whether a sweep at `now` should pick up this `Reminder`
    pub fn is_due(&self, now: i64) -> bool {
        self.status == ReminderStatus::Pending && self.remind_at <= now
    }
}

impl Entity for Reminder {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// Delivery state of a `Reminder`. A `Reminder` starts out as `Pending`,
/// is claimed by exactly one sweep run which moves it to `InProgress`, and
/// is then finalized to either `Sent` or `Failed` depending on the outcome
/// of the delivery attempt. There is no transition back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    InProgress,
    Sent,
    Failed,
}

impl ReminderStatus {
    /// `Sent` and `Failed` are terminal, no transition
    /// will ever move a `Reminder` out of them
    pub fn is_valid_transition(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Sent)
                | (Self::InProgress, Self::Failed)
        )
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Sent => "sent",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum InvalidStatusError {
    #[error("Status: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for ReminderStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidStatusError::Unrecognized(s.to_string())),
        }
    }
}
