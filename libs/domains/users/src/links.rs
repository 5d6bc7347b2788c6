//! HAL-style hypermedia for user responses.
//!
//! Links are derived from the id and the mount point alone, so building
//! them cannot fail.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

pub const DEFAULT_BASE_PATH: &str = "/api/users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub href: String,
}

impl Link {
    fn new(href: String) -> Self {
        Self { href }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub update: Link,
    pub delete: Link,
    #[serde(rename = "all-users")]
    pub all_users: Link,
}

/// A user together with its `_links`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResource {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmbeddedUsers {
    pub users: Vec<UserResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(rename = "create-user")]
    pub create_user: Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserCollection {
    #[serde(rename = "_embedded")]
    pub embedded: EmbeddedUsers,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
}

/// Builds links relative to where the users router is mounted
#[derive(Debug, Clone)]
pub struct UserLinkBuilder {
    base: String,
}

impl Default for UserLinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

impl UserLinkBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn user_href(&self, id: i64) -> String {
        format!("{}/{}", self.base, id)
    }

    pub fn links(&self, id: i64) -> UserLinks {
        UserLinks {
            self_link: Link::new(self.user_href(id)),
            update: Link::new(self.user_href(id)),
            delete: Link::new(self.user_href(id)),
            all_users: Link::new(self.base.clone()),
        }
    }

    pub fn resource(&self, user: User) -> UserResource {
        let links = self.links(user.id);
        UserResource { user, links }
    }

    pub fn collection(&self, users: Vec<User>) -> UserCollection {
        UserCollection {
            embedded: EmbeddedUsers {
                users: users.into_iter().map(|u| self.resource(u)).collect(),
            },
            links: CollectionLinks {
                self_link: Link::new(self.base.clone()),
                create_user: Link::new(self.base.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ann() -> User {
        let now = Utc::now();
        User {
            id: 7,
            name: "Ann".into(),
            email: "ann@x.com".into(),
            age: Some(30),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_resource_serializes_flat_with_links() {
        let json = serde_json::to_value(UserLinkBuilder::default().resource(ann())).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "ann@x.com");
        assert_eq!(json["_links"]["self"]["href"], "/api/users/7");
        assert_eq!(json["_links"]["update"]["href"], "/api/users/7");
        assert_eq!(json["_links"]["delete"]["href"], "/api/users/7");
        assert_eq!(json["_links"]["all-users"]["href"], "/api/users");
    }

    #[test]
    fn test_collection_embeds_users() {
        let json = serde_json::to_value(UserLinkBuilder::default().collection(vec![ann()])).unwrap();

        assert_eq!(json["_embedded"]["users"][0]["name"], "Ann");
        assert_eq!(json["_links"]["create-user"]["href"], "/api/users");
    }

    #[test]
    fn test_custom_base_drops_trailing_slash() {
        let builder = UserLinkBuilder::new("/v2/people/");
        assert_eq!(builder.user_href(3), "/v2/people/3");
    }

    #[test]
    fn test_resource_round_trips_user() {
        let resource = UserLinkBuilder::default().resource(ann());
        let json = serde_json::to_string(&resource).unwrap();
        let parsed: UserResource = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, resource);
    }
}
