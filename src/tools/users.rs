/// Tools for user management
///
/// This module implements the user_create, user_list, user_update and
/// user_delete MCP tools. Credential handling stays outside this crate:
/// user_create takes an explicit pre-insert transformation and applies it
/// before the user reaches the store, so there is no hidden hashing hook
/// anywhere below. user_update does not touch the password at all.

use serde::{Deserialize, Serialize};

use crate::domain::{NewUser, User, UserId};
use crate::storage::{HabitStore, StorageError};
use crate::tools::ToolError;

/// Parameters for registering a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub role: Option<String>,
    pub password: String,
}

/// Response from registering a user
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub user: User,
    pub message: String,
}

/// Response from listing users
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<User>,
}

/// Parameters for updating a user's profile fields
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub user_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub role: Option<String>,
}

/// Response from updating a user
#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub user: User,
    pub message: String,
}

/// Parameters for removing a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserParams {
    pub user_id: i64,
}

/// Response from removing a user
#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
}

/// Register a new user
///
/// `transform` is the explicit pre-insert credential step (typically a
/// password hasher) chosen by the caller.
pub fn create_user<S, F>(
    store: &S,
    params: CreateUserParams,
    transform: F,
) -> Result<CreateUserResponse, ToolError>
where
    S: HabitStore,
    F: FnOnce(&str) -> String,
{
    let new_user = NewUser::new(
        params.name,
        params.email,
        params.age,
        params.role,
        params.password,
    )?
    .transform_password(transform);

    let user = store.create_user(&new_user)?;

    let message = format!("User '{}' created with id {}", user.name, user.id);
    Ok(CreateUserResponse { user, message })
}

/// List all registered users
pub fn list_users<S: HabitStore>(store: &S) -> Result<ListUsersResponse, ToolError> {
    let users = store.list_users()?;
    Ok(ListUsersResponse { users })
}

/// Update a user's profile fields
///
/// Email uniqueness is re-checked when the email changes, mirroring the
/// check on registration. The password is out of scope here.
pub fn update_user<S: HabitStore>(
    store: &S,
    params: UpdateUserParams,
) -> Result<UpdateUserResponse, ToolError> {
    let mut user = store.get_user(UserId(params.user_id))?;

    if let Some(ref email) = params.email {
        if let Some(existing) = store.find_user_by_email(email.trim())? {
            if existing.id != user.id {
                return Err(StorageError::DuplicateEmail {
                    email: email.trim().to_string(),
                }
                .into());
            }
        }
    }

    user.apply_update(params.name, params.email, params.age, params.role)?;
    store.update_user(&user)?;

    let message = format!("User {} updated", user.id);
    Ok(UpdateUserResponse { user, message })
}

/// Remove a user together with all of their habit records
pub fn delete_user<S: HabitStore>(
    store: &S,
    params: DeleteUserParams,
) -> Result<DeleteUserResponse, ToolError> {
    let user_id = UserId(params.user_id);
    store.delete_user(user_id)?;

    Ok(DeleteUserResponse {
        message: format!("User {} deleted along with their habit records", user_id),
    })
}
