use crate::error::WayfourthError;
use crate::shared::{
    auth::protect_sweep_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, warn};
use wayfourth_reminders_api_structs::dtos::ReminderDeliveryDTO;
use wayfourth_reminders_api_structs::process_reminders::*;
use wayfourth_reminders_domain::{Reminder, ReminderStatus, ID};
use wayfourth_reminders_infra::{NotificationError, WayfourthContext};

pub async fn process_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<WayfourthContext>,
) -> Result<HttpResponse, WayfourthError> {
    protect_sweep_route(&http_req, &ctx)?;

    let usecase = ProcessRemindersUseCase {};

    execute(usecase, &ctx)
        .await
        .map(|deliveries| {
            let details = deliveries
                .into_iter()
                .map(|d| ReminderDeliveryDTO {
                    id: d.reminder_id,
                    success: d.success,
                    error: d.error,
                })
                .collect();
            HttpResponse::Ok().json(APIResponse::new(details))
        })
        .map_err(WayfourthError::from)
}

/// One sweep over the due reminders. Claims every pending reminder whose
/// `remind_at` has passed, attempts delivery for each of them in parallel
/// and finalizes each one to `sent` or `failed`.
#[derive(Debug)]
pub struct ProcessRemindersUseCase {}

/// Outcome of a single delivery attempt within a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDelivery {
    pub reminder_id: ID,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for WayfourthError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessRemindersUseCase {
    type Response = Vec<ReminderDelivery>;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessReminders";

    async fn execute(&mut self, ctx: &WayfourthContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        // If the claim query fails nothing has been touched and the whole
        // sweep reports a top level error
        let due = ctx
            .repos
            .reminders
            .claim_due(now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if due.is_empty() {
            return Ok(Vec::new());
        }

        let send_timeout = Duration::from_millis(ctx.config.send_timeout_millis);
        let mut delivery_futures = Vec::with_capacity(due.len());
        for reminder in due {
            delivery_futures.push(deliver(reminder, send_timeout, ctx));
        }

        Ok(join_all(delivery_futures).await)
    }
}

async fn deliver(
    reminder: Reminder,
    send_timeout: Duration,
    ctx: &WayfourthContext,
) -> ReminderDelivery {
    let outcome = match timeout(
        send_timeout,
        ctx.channel.send(&reminder.destination, &reminder.message),
    )
    .await
    {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(NotificationError::Timeout),
    };

    let (status, mut error) = match &outcome {
        Ok(()) => (ReminderStatus::Sent, None),
        Err(e) => {
            warn!("Failed to deliver reminder: {}. Reason: {}", reminder.id, e);
            (ReminderStatus::Failed, Some(e.to_string()))
        }
    };

    if let Err(e) = ctx.repos.reminders.finalize(&reminder.id, status).await {
        // The delivery attempt resolved but its outcome could not be
        // persisted. The reminder stays in_progress, so it will not be
        // claimed again and cannot double-send, but the record needs
        // manual attention.
        error!(
            "Reminder: {} resolved to status: {} but the status write failed: {:?}",
            reminder.id, status, e
        );
        error = Some(format!("Status write failed: {}", e));
    }

    ReminderDelivery {
        reminder_id: reminder.id,
        success: outcome.is_ok(),
        error,
    }
}
