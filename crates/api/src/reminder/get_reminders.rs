use crate::error::WayfourthError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use wayfourth_reminders_api_structs::get_reminders::*;
use wayfourth_reminders_domain::{Reminder, ID};
use wayfourth_reminders_infra::WayfourthContext;

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<WayfourthContext>,
) -> Result<HttpResponse, WayfourthError> {
    let user_id = protect_route(&http_req, &ctx)?;

    let usecase = GetRemindersUseCase { user_id };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(WayfourthError::from)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for WayfourthError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &WayfourthContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.reminders.find_by_user(&self.user_id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn lists_only_own_reminders_ordered_by_remind_at() {
        let ctx = WayfourthContext::create_inmemory();
        let user_id = ID::new();
        let other_user_id = ID::new();

        let late = Reminder::new(
            user_id.clone(),
            "+15551234567".into(),
            "Water plants".into(),
            2000,
            0,
        );
        let early = Reminder::new(
            user_id.clone(),
            "+15551234567".into(),
            "Take medicine".into(),
            1000,
            0,
        );
        let foreign = Reminder::new(
            other_user_id,
            "+15559876543".into(),
            "Call home".into(),
            1500,
            0,
        );
        for reminder in [&late, &early, &foreign].iter() {
            ctx.repos.reminders.insert(reminder).await.unwrap();
        }

        let res = GetRemindersUseCase { user_id }.execute(&ctx).await.unwrap();

        assert_eq!(res.len(), 2);
        assert_eq!(res[0], early);
        assert_eq!(res[1], late);
    }
}
