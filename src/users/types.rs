//! User resource types shared by the handlers and the upstream client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user as exposed by the upstream API.
///
/// `id` is assigned upstream and is zero on creation requests. Fields the
/// upstream leaves out decode to their zero value; any other upstream fields
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub email: String,
}

/// Body accepted on `POST /users` and `PUT /users/{id}`.
///
/// Unlike [`User`], `email` must be present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub id: i64,
    pub email: String,
}

impl From<UserInput> for User {
    fn from(input: UserInput) -> Self {
        Self {
            id: input.id,
            email: input.email,
        }
    }
}

/// Collection envelope returned by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    pub data: Vec<User>,
}

impl UserList {
    /// First user carrying the given id.
    pub fn find(&self, id: UserId) -> Option<&User> {
        self.data.iter().find(|user| user.id == id.get())
    }
}

/// A validated, strictly positive user identifier taken from a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Raised when a path segment is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid user id '{0}'")]
pub struct InvalidUserId(pub String);

impl FromStr for UserId {
    type Err = InvalidUserId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(InvalidUserId(s.to_string())),
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
