use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "staff" => Ok(Role::Staff),
            other => Err(format!(
                "Invalid role: '{}'. Must be one of: admin, doctor, staff",
                other
            )),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Staff
    }
}

/// A stored user record. The password hash never leaves the process:
/// it is skipped on serialization and the API returns [`PublicUser`].
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outward-facing user fields.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Fields for inserting a new user (hash already computed).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated registration input. Email is lowercased here so uniqueness
/// checks and logins are case-insensitive everywhere downstream.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<Registration, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let name = self.name.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        }

        let email = self.email.as_deref().map(str::trim).unwrap_or("");
        if email.is_empty() || !email.contains('@') {
            errors.insert("email".to_string(), "A valid email is required".to_string());
        }

        let password = self.password.as_deref().unwrap_or("");
        if password.len() < 6 {
            errors.insert(
                "password".to_string(),
                "Password must be at least 6 characters".to_string(),
            );
        }

        let role = match self.role.as_deref() {
            None | Some("") => Role::default(),
            Some(raw) => match raw.parse() {
                Ok(role) => role,
                Err(msg) => {
                    errors.insert("role".to_string(), msg);
                    Role::default()
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Registration {
            name: name.to_string(),
            email: email.to_lowercase(),
            password: password.to_string(),
            role,
        })
    }
}

/// Validated login input, email lowercased.
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<Credentials, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let email = self.email.as_deref().map(str::trim).unwrap_or("");
        if email.is_empty() {
            errors.insert("email".to_string(), "Email is required".to_string());
        }

        let password = self.password.as_deref().unwrap_or("");
        if password.is_empty() {
            errors.insert("password".to_string(), "Password is required".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Credentials {
            email: email.to_lowercase(),
            password: password.to_string(),
        })
    }
}
