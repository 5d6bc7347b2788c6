use axum::Router;
use domain_users::{PgUserRepository, UserService, handlers};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgUserRepository::new(state.db.clone());
    let mut service = UserService::new(repository);

    if let Some(events) = &state.events {
        service = service.with_notifier(Arc::new(events.clone()));
    }

    handlers::router(service)
}
