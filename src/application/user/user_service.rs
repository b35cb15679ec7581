use crate::domain::{
    UserId,
    commands::{CreateUser, UpdateUser},
    user::{NewUser, User},
};

use super::super::dependencies::{ServiceDependencies, get_existing_user};
use super::super::errors::{ApplicationError, Result};

/// ユーザーを登録する
///
/// メールアドレスは全ユーザーで一意。
pub async fn create_user(deps: &ServiceDependencies, cmd: CreateUser) -> Result<User> {
    ensure_email_free(deps, &cmd.email, None).await?;

    let user = deps
        .user_repository
        .insert(NewUser {
            name: cmd.name,
            email: cmd.email,
        })
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(user_id = %user.id, "user created");

    Ok(user)
}

/// ユーザーを部分更新する
///
/// 空白のフィールドは無視する。他のユーザーが使っているメールアドレスへの変更は不可。
pub async fn update_user(deps: &ServiceDependencies, cmd: UpdateUser) -> Result<User> {
    let user = get_existing_user(deps, cmd.user_id).await?;

    if let Some(email) = cmd.patch.effective_email() {
        ensure_email_free(deps, email, Some(user.id)).await?;
    }

    let updated = cmd.patch.apply(&user);
    deps.user_repository
        .update(&updated)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(user_id = %updated.id, "user updated");

    Ok(updated)
}

pub async fn find_user(deps: &ServiceDependencies, user_id: UserId) -> Result<User> {
    get_existing_user(deps, user_id).await
}

pub async fn list_users(deps: &ServiceDependencies) -> Result<Vec<User>> {
    deps.user_repository
        .find_all()
        .await
        .map_err(ApplicationError::RepositoryError)
}

pub async fn delete_user(deps: &ServiceDependencies, user_id: UserId) -> Result<()> {
    let deleted = deps
        .user_repository
        .delete(user_id)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    if !deleted {
        return Err(ApplicationError::UserNotFound(user_id));
    }

    tracing::info!(user_id = %user_id, "user deleted");

    Ok(())
}

async fn ensure_email_free(
    deps: &ServiceDependencies,
    email: &str,
    owner: Option<UserId>,
) -> Result<()> {
    let existing = deps
        .user_repository
        .find_by_email(email)
        .await
        .map_err(ApplicationError::RepositoryError)?;

    match existing {
        Some(user) if Some(user.id) != owner => {
            Err(ApplicationError::EmailAlreadyExists(email.to_string()))
        }
        _ => Ok(()),
    }
}
