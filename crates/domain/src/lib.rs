mod reminder;
mod shared;

pub use reminder::{Reminder, ReminderStatus};
pub use shared::entity::{Entity, ID};
