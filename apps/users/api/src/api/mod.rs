use axum::Router;

pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
pub fn routes(state: &crate::state::AppState) -> Router {
    compose(users::router(state))
}

fn compose(users: Router) -> Router {
    Router::new().nest("/users", users) // Links assume /api/users
}

/// Router with the /ready endpoint, merged next to the stateless app router
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::ApiDoc;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum_helpers::{create_router, http::cors::create_permissive_cors_layer};
    use domain_users::{InMemoryUserRepository, UserService, handlers};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        let service = UserService::new(InMemoryUserRepository::new());
        create_router::<ApiDoc>(
            compose(handlers::router(service)),
            create_permissive_cors_layer(),
        )
    }

    async fn json_body(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_users_mounted_under_api_prefix() {
        let app = app();

        let created = app
            .clone()
            .oneshot(
                Request::post("/api/users")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "name": "Ann", "email": "ann@x.com", "age": 30 }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = json_body(created.into_body()).await;
        let self_href = body["_links"]["self"]["href"].as_str().unwrap().to_string();
        assert_eq!(self_href, "/api/users/1");

        // The self link resolves against the mounted router
        let fetched = app
            .oneshot(Request::get(self_href).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(json_body(fetched.into_body()).await["email"], "ann@x.com");
    }

    #[tokio::test]
    async fn test_unknown_route_and_method_use_error_body() {
        let app = app();

        let missing = app
            .clone()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(missing.into_body()).await["error"], "NOT_FOUND");

        let wrong_method = app
            .oneshot(Request::patch("/api/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response.into_body()).await;
        assert!(doc["paths"]["/users/{id}"].is_object());
        assert!(doc["paths"]["/users/email/{email}"].is_object());
    }
}
