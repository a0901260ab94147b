use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::backend::content::db::mark_info_seen;
use crate::backend::content::info::pick_info_for_user;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::CurrentUser;
use crate::backend::subscription::today;

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub id: i64,
    pub category: String,
    pub text: String,
    pub source: Option<String>,
}

/// GET /info/random/
///
/// Returns an unseen daily fact in the caller's language and marks it seen.
pub async fn get_random_info(
    State(pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<InfoQuery>,
) -> BackendResult<Json<InfoResponse>> {
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let info = pick_info_for_user(&pool, user.id, category)
        .await?
        .ok_or_else(|| match category {
            Some(_) => BackendError::not_found("No infos match the category."),
            None => BackendError::not_found("No infos available."),
        })?;

    mark_info_seen(&pool, user.id, info.id, today()).await?;

    Ok(Json(InfoResponse {
        id: info.id,
        text: info.text(&user.language_code),
        category: info.category,
        source: info.source,
    }))
}
