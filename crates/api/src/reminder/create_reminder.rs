use crate::error::WayfourthError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use wayfourth_reminders_api_structs::create_reminder::*;
use wayfourth_reminders_domain::{Reminder, ID};
use wayfourth_reminders_infra::WayfourthContext;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<WayfourthContext>,
) -> Result<HttpResponse, WayfourthError> {
    let user_id = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id,
        destination: body.destination,
        message: body.message,
        remind_at: body.remind_at,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(WayfourthError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: ID,
    pub destination: String,
    pub message: String,
    pub remind_at: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidDestination(String),
    EmptyMessage,
    RemindAtInPast(i64),
    StorageError,
}

impl From<UseCaseError> for WayfourthError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidDestination(destination) => Self::BadClientData(format!(
                "The destination: {}, is not a valid phone number.",
                destination
            )),
            UseCaseError::EmptyMessage => {
                Self::BadClientData("The reminder message cannot be empty".into())
            }
            UseCaseError::RemindAtInPast(remind_at) => Self::BadClientData(format!(
                "The remind at timestamp: {}, is already in the past.",
                remind_at
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &WayfourthContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();

        if self.message.trim().is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }
        if self.remind_at <= now {
            return Err(UseCaseError::RemindAtInPast(self.remind_at));
        }

        let reminder = Reminder::new(
            self.user_id.clone(),
            self.destination.clone(),
            self.message.clone(),
            self.remind_at,
            now,
        );
        if !reminder.has_valid_destination() {
            return Err(UseCaseError::InvalidDestination(self.destination.clone()));
        }

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reminder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfourth_reminders_domain::ReminderStatus;

    fn usecase_with(destination: &str, message: &str, remind_at: i64) -> CreateReminderUseCase {
        CreateReminderUseCase {
            user_id: Default::default(),
            destination: destination.into(),
            message: message.into(),
            remind_at,
        }
    }

    #[actix_web::test]
    async fn creates_pending_reminder() {
        let ctx = WayfourthContext::create_inmemory();
        let remind_at = ctx.sys.get_timestamp_millis() + 1000 * 60;

        let mut usecase = usecase_with("+15551234567", "Take medicine", remind_at);
        let res = usecase.execute(&ctx).await;

        assert!(res.is_ok());
        let reminder = res.unwrap();
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap(),
            reminder
        );
    }

    #[actix_web::test]
    async fn rejects_invalid_input() {
        let ctx = WayfourthContext::create_inmemory();
        let future = ctx.sys.get_timestamp_millis() + 1000 * 60;
        let past = ctx.sys.get_timestamp_millis() - 1000 * 60;

        let res = usecase_with("911", "Take medicine", future).execute(&ctx).await;
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::InvalidDestination("911".into())
        );

        let res = usecase_with("+15551234567", "   ", future).execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::EmptyMessage);

        let res = usecase_with("+15551234567", "Take medicine", past)
            .execute(&ctx)
            .await;
        assert_eq!(res.unwrap_err(), UseCaseError::RemindAtInPast(past));

        assert!(ctx
            .repos
            .reminders
            .claim_due(future + 1)
            .await
            .unwrap()
            .is_empty());
    }
}
