use chrono::Utc;

use crate::domain::{
    commands::AddComment,
    comment::{Comment, NewComment},
};

use super::super::booking::validate_bookings_for_comment;
use super::super::dependencies::{ServiceDependencies, get_existing_item, get_existing_user};
use super::super::errors::{ApplicationError, Result};

/// アイテムにコメントを投稿する
///
/// ビジネスルール：
/// - 投稿者とアイテムが存在すること
/// - 投稿者がそのアイテムを借り、貸出期間が終了していること
pub async fn add_comment(deps: &ServiceDependencies, cmd: AddComment) -> Result<Comment> {
    let author = get_existing_user(deps, cmd.author_id).await?;
    let item = get_existing_item(deps, cmd.item_id).await?;

    validate_bookings_for_comment(deps, author.id, item.id).await?;

    let comment = deps
        .comment_repository
        .insert(NewComment {
            text: cmd.text,
            item_id: item.id,
            author_id: author.id,
            created: Utc::now(),
        })
        .await
        .map_err(ApplicationError::RepositoryError)?;

    tracing::info!(comment_id = %comment.id, item_id = %item.id, "comment added");

    Ok(comment)
}
