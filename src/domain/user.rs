/// User entity owned by the CRUD collaborator
///
/// Users exist so habit records have an owner; the analytics engine only
/// ever sees their ids. The password field is stored as supplied by an
/// explicit pre-insert transformation chosen by the caller - there is no
/// hidden lifecycle hook and no hashing logic in this crate.

use serde::Serialize;

use crate::domain::{DomainError, UserId};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    pub name: String,
    /// Unique across all users
    pub email: String,
    pub age: Option<u32>,
    /// Authorization role, defaults to "user"
    pub role: String,
    /// Opaque credential as produced by the pre-insert transform
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    /// Rebuild a user from stored data (used when loading from the database)
    pub fn from_existing(
        id: UserId,
        name: String,
        email: String,
        age: Option<u32>,
        role: String,
        password: String,
    ) -> Self {
        Self {
            id,
            name,
            email,
            age,
            role,
            password,
        }
    }

    /// Apply a partial update, validating every supplied field first
    ///
    /// Fields left as `None` keep their current value. All validation
    /// happens before anything is written, so a rejected update leaves the
    /// user untouched. The password is not updatable through this path.
    pub fn apply_update(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        age: Option<u32>,
        role: Option<String>,
    ) -> Result<(), DomainError> {
        if let Some(ref name) = name {
            validate_name(name)?;
        }
        let email = match email {
            Some(email) => Some(validate_email(&email)?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(age) = age {
            self.age = Some(age);
        }
        if let Some(role) = role {
            self.role = role;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidUserField(
            "Name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate and normalize an email address, returning the trimmed form
fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::InvalidUserField(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email.to_string())
}

/// A user awaiting insertion - no id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub role: String,
    pub password: String,
}

impl NewUser {
    /// Create a new user with validation
    ///
    /// `role` defaults to "user" when omitted.
    pub fn new(
        name: String,
        email: String,
        age: Option<u32>,
        role: Option<String>,
        password: String,
    ) -> Result<Self, DomainError> {
        validate_name(&name)?;
        let email = validate_email(&email)?;

        if password.is_empty() {
            return Err(DomainError::InvalidUserField(
                "Password cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            email,
            age,
            role: role.unwrap_or_else(|| "user".to_string()),
            password,
        })
    }

    /// Apply the pre-insert credential transformation
    ///
    /// The CRUD collaborator calls this explicitly before handing the user
    /// to the store, replacing the implicit before-create hook the rest of
    /// the system must not rely on.
    pub fn transform_password<F>(mut self, transform: F) -> Self
    where
        F: FnOnce(&str) -> String,
    {
        self.password = transform(&self.password);
        self
    }
}
