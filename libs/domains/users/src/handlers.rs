use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, QueryParams, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, DuplicateResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::links::{
    CollectionLinks, DEFAULT_BASE_PATH, EmbeddedUsers, Link, UserCollection, UserLinkBuilder,
    UserLinks, UserResource,
};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        get_user_by_email,
        update_user,
        delete_user,
    ),
    components(
        schemas(
            User,
            CreateUser,
            UpdateUser,
            UserFilter,
            UserResource,
            UserCollection,
            UserLinks,
            CollectionLinks,
            EmbeddedUsers,
            Link
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            DuplicateResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

struct UsersState<R: UserRepository> {
    service: UserService<R>,
    links: UserLinkBuilder,
}

type SharedState<R> = State<Arc<UsersState<R>>>;

/// Users router, to be nested at `/api/users`
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    router_with_base(service, DEFAULT_BASE_PATH)
}

/// Users router whose links point below `base_path`
pub fn router_with_base<R: UserRepository + 'static>(
    service: UserService<R>,
    base_path: &str,
) -> Router {
    let state = Arc::new(UsersState {
        service,
        links: UserLinkBuilder::new(base_path),
    });

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/email/{email}", get(get_user_by_email))
        .with_state(state)
}

/// List users, optionally filtered by name fragment and age range
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserFilter),
    responses(
        (status = 200, description = "Users with HAL links", body = UserCollection),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(state): SharedState<R>,
    QueryParams(filter): QueryParams<UserFilter>,
) -> UserResult<Json<UserCollection>> {
    let users = state.service.search(filter).await?;
    Ok(Json(state.links.collection(users)))
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserResource),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.service.create(input).await?;
    Ok((StatusCode::CREATED, Json(state.links.resource(user))))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "User found", body = UserResource),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(state): SharedState<R>,
    IdPath(id): IdPath,
) -> UserResult<Json<UserResource>> {
    let user = state
        .service
        .get_by_id(id)
        .await?
        .ok_or(UserError::NotFound(id))?;
    Ok(Json(state.links.resource(user)))
}

/// Get a user by email
#[utoipa::path(
    get,
    path = "/email/{email}",
    tag = TAG,
    params(
        ("email" = String, Path, description = "Exact email address")
    ),
    responses(
        (status = 200, description = "User found", body = UserResource),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user_by_email<R: UserRepository>(
    State(state): SharedState<R>,
    Path(email): Path<String>,
) -> Result<Json<UserResource>, AppError> {
    let user = state
        .service
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with email: {}", email.trim())))?;
    Ok(Json(state.links.resource(user)))
}

/// Partially update a user; absent or blank fields are left unchanged
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User id")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResource),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(state): SharedState<R>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResource>> {
    let user = state.service.update(id, input).await?;
    Ok(Json(state.links.resource(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i64, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(state): SharedState<R>,
    IdPath(id): IdPath,
) -> UserResult<StatusCode> {
    if state.service.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(UserError::NotFound(id))
    }
}
