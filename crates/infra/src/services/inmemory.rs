use super::{NotificationChannel, NotificationError};
use std::sync::Mutex;

/// Channel that records messages instead of delivering them, used by
/// tests. Destinations registered with `reject_destination` fail the
/// same way a provider rejection would.
pub struct InMemoryNotificationChannel {
    sent: Mutex<Vec<(String, String)>>,
    rejected_destinations: Mutex<Vec<String>>,
}

impl InMemoryNotificationChannel {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            rejected_destinations: Mutex::new(Vec::new()),
        }
    }

    pub fn reject_destination(&self, destination: &str) {
        self.rejected_destinations
            .lock()
            .unwrap()
            .push(destination.to_string());
    }

    /// Every `(destination, message)` pair that has been delivered
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryNotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NotificationChannel for InMemoryNotificationChannel {
    async fn send(&self, destination: &str, message: &str) -> Result<(), NotificationError> {
        if self
            .rejected_destinations
            .lock()
            .unwrap()
            .iter()
            .any(|d| d == destination)
        {
            return Err(NotificationError::Rejected(format!(
                "Provider rejected destination: {}",
                destination
            )));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), message.to_string()));
        Ok(())
    }
}
