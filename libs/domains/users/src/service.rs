use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserEvent, UserFilter, validation_message};
use crate::notifier::{LogNotifier, UserNotifier};
use crate::repository::UserRepository;

/// Validation, email uniqueness and partial-update rules for users.
///
/// Holds no lock of its own: concurrent writers are arbitrated by the
/// store. Failed writes are returned to the caller, never retried.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    notifier: Arc<dyn UserNotifier>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

fn ensure_positive_id(id: i64) -> UserResult<()> {
    if id <= 0 {
        return Err(UserError::Validation(format!(
            "Id must be a positive integer, got: {}",
            id
        )));
    }
    Ok(())
}

fn validate<T: Validate>(input: &T) -> UserResult<()> {
    input
        .validate()
        .map_err(|e| UserError::Validation(validation_message(&e)))
}

impl<R: UserRepository> UserService<R> {
    /// Service that reports events through [`LogNotifier`]
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier: Arc::new(LogNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn UserNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Create a user from trimmed input and announce it.
    #[instrument(skip(self, input), fields(email = %input.email.trim()))]
    pub async fn create(&self, input: CreateUser) -> UserResult<User> {
        validate(&input)?;
        let new_user = input.normalized();

        if self.repository.exists_by_email(&new_user.email).await? {
            return Err(UserError::DuplicateEmail(new_user.email));
        }

        let user = self.repository.insert(new_user).await?;
        tracing::info!(user_id = user.id, "Created user");

        self.notifier.notify(UserEvent::created(&user)).await;
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> UserResult<Option<User>> {
        ensure_positive_id(id)?;
        self.repository.find_by_id(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        if email.trim().is_empty() {
            return Err(UserError::Validation("Email cannot be empty".to_string()));
        }
        self.repository.find_by_email(email.trim()).await
    }

    pub async fn list_all(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Merge `patch` into the stored record.
    ///
    /// The uniqueness check only runs when the email actually changes, so
    /// resubmitting the current email never conflicts with itself.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: UpdateUser) -> UserResult<User> {
        ensure_positive_id(id)?;
        validate(&patch)?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(name) = patch.new_name() {
            user.name = name.to_string();
        }

        if let Some(email) = patch.new_email() {
            if email != user.email {
                if self
                    .repository
                    .exists_by_email_excluding_id(email, id)
                    .await?
                {
                    return Err(UserError::DuplicateEmail(email.to_string()));
                }
                user.email = email.to_string();
            }
        }

        if let Some(age) = patch.age {
            user.age = Some(age);
        }

        user.updated_at = chrono::Utc::now();
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = user.id, "Updated user");
        Ok(user)
    }

    /// Remove a user. Absence is `Ok(false)`, and only a confirmed removal
    /// produces a DELETE event.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> UserResult<bool> {
        ensure_positive_id(id)?;

        let Some(user) = self.repository.find_by_id(id).await? else {
            return Ok(false);
        };

        if !self.repository.delete_by_id(id).await? {
            tracing::warn!(user_id = id, "User disappeared before delete");
            return Ok(false);
        }

        tracing::info!(user_id = id, "Deleted user");
        self.notifier.notify(UserEvent::deleted(&user)).await;
        Ok(true)
    }

    /// Users whose name contains `fragment`, ignoring case
    pub async fn search_by_name(&self, fragment: &str) -> UserResult<Vec<User>> {
        self.search(UserFilter {
            name: Some(fragment.to_string()),
            ..Default::default()
        })
        .await
    }

    /// Users with an age in `min..=max`; users without an age are skipped
    pub async fn search_by_age_range(&self, min: i32, max: i32) -> UserResult<Vec<User>> {
        self.search(UserFilter {
            min_age: Some(min),
            max_age: Some(max),
            ..Default::default()
        })
        .await
    }

    /// Apply every filter that is set over [`Self::list_all`]
    pub async fn search(&self, filter: UserFilter) -> UserResult<Vec<User>> {
        if let (Some(min), Some(max)) = (filter.min_age, filter.max_age) {
            if min > max {
                return Err(UserError::Validation(format!(
                    "Minimum age {} is greater than maximum age {}",
                    min, max
                )));
            }
        }

        let users = self.list_all().await?;
        if filter.is_empty() {
            return Ok(users);
        }
        Ok(users.into_iter().filter(|u| filter.matches(u)).collect())
    }
}
