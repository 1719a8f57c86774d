use crate::error::WayfourthError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use wayfourth_reminders_api_structs::delete_reminder::*;
use wayfourth_reminders_domain::{Reminder, ID};
use wayfourth_reminders_infra::WayfourthContext;

pub async fn delete_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<WayfourthContext>,
) -> Result<HttpResponse, WayfourthError> {
    let user_id = protect_route(&http_req, &ctx)?;

    let usecase = DeleteReminderUseCase {
        user_id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(WayfourthError::from)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for WayfourthError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &WayfourthContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.user_id == self.user_id => ctx
                .repos
                .reminders
                .delete(&reminder.id)
                .await
                .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone())),
            // Reminders owned by somebody else are reported as not found,
            // their existence is not revealed
            _ => Err(UseCaseError::NotFound(self.reminder_id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder_for(user_id: &ID) -> Reminder {
        Reminder::new(
            user_id.clone(),
            "+15551234567".into(),
            "Take medicine".into(),
            1000,
            0,
        )
    }

    #[actix_web::test]
    async fn deletes_own_reminder() {
        let ctx = WayfourthContext::create_inmemory();
        let user_id = ID::new();
        let reminder = reminder_for(&user_id);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = DeleteReminderUseCase {
            user_id,
            reminder_id: reminder.id.clone(),
        }
        .execute(&ctx)
        .await;

        assert!(res.is_ok());
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_none());
    }

    #[actix_web::test]
    async fn rejects_deleting_foreign_reminder() {
        let ctx = WayfourthContext::create_inmemory();
        let owner_id = ID::new();
        let reminder = reminder_for(&owner_id);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let res = DeleteReminderUseCase {
            user_id: ID::new(),
            reminder_id: reminder.id.clone(),
        }
        .execute(&ctx)
        .await;

        assert!(res.is_err());
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_some());
    }
}
