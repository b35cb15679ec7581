use crate::domain::UserId;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use super::error::ApiError;

pub const SHARER_USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// 呼び出し元ユーザー（`X-Sharer-User-Id` ヘッダー）
///
/// ヘッダーがない、または数値でない場合は400。
#[derive(Debug, Clone, Copy)]
pub struct SharerUserId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SHARER_USER_ID_HEADER)
            .ok_or_else(|| {
                ApiError::InvalidRequest(format!("{} header is required", SHARER_USER_ID_HEADER))
            })?
            .to_str()
            .map_err(|_| {
                ApiError::InvalidRequest(format!(
                    "{} header is not valid text",
                    SHARER_USER_ID_HEADER
                ))
            })?;

        let id = raw.trim().parse::<i64>().map_err(|_| {
            ApiError::InvalidRequest(format!(
                "{} header must be a number, got '{}'",
                SHARER_USER_ID_HEADER, raw
            ))
        })?;

        Ok(SharerUserId(UserId::new(id)))
    }
}

/// `axum::Json` と同じだが、拒否を [`ApiError`] に変換する
///
/// 不正なJSONや型の合わないフィールドは422ではなく400になる。
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` の拒否を [`ApiError`] に変換する
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` の拒否を [`ApiError`] に変換する
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
