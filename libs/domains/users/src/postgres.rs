use async_trait::async_trait;
use database::postgres::apply_sql_script;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User},
    repository::UserRepository,
};

const SCHEMA: &str = include_str!("../../../../manifests/migrations/users/0001_create_users.sql");

pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create the `users` table and its indexes when they do not exist yet
    pub async fn ensure_schema(&self) -> UserResult<()> {
        apply_sql_script(&self.db, SCHEMA)
            .await
            .map_err(|e| UserError::Storage(format!("Schema setup failed: {}", e)))?;
        tracing::info!("Users schema is ready");
        Ok(())
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn map_db_err(email: &str, err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email.to_string()),
        _ => UserError::Storage(format!("Database error: {}", err)),
    }
}

fn storage(err: DbErr) -> UserError {
    UserError::Storage(format!("Database error: {}", err))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage)?;

        Ok(model.map(Into::into))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(storage)?;

        Ok(count > 0)
    }

    async fn exists_by_email_excluding_id(&self, email: &str, id: i64) -> UserResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .filter(entity::Column::Id.ne(id))
            .count(&self.db)
            .await
            .map_err(storage)?;

        Ok(count > 0)
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, user: NewUser) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| map_db_err(&email, e))?;

        tracing::debug!(user_id = model.id, "Inserted user row");
        Ok(model.into())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id;
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = entity::Entity::update(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => UserError::NotFound(id),
                e => map_db_err(&email, e),
            })?;

        tracing::debug!(user_id = id, "Updated user row");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(storage)?;

        if result.rows_affected > 0 {
            tracing::debug!(user_id = id, "Deleted user row");
        }
        Ok(result.rows_affected > 0)
    }
}
