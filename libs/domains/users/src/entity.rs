use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{NewUser, User};

/// Sea-ORM entity for the `users` table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            age: model.age,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Insert form: the id comes from the sequence
impl From<NewUser> for ActiveModel {
    fn from(input: NewUser) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            age: Set(input.age),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

/// Whole-record replace; `created_at` is never rewritten
impl From<User> for ActiveModel {
    fn from(user: User) -> Self {
        ActiveModel {
            id: Set(user.id),
            name: Set(user.name),
            email: Set(user.email),
            age: Set(user.age),
            created_at: NotSet,
            updated_at: Set(user.updated_at.into()),
        }
    }
}
