//! Session lookup for the API routes.
//!
//! Sessions are created by the identity provider integration and stored in the
//! `sessions` table. A request presents its token either in the session cookie or as
//! an `Authorization: Bearer` header.

use crate::{
    modules::{database::StoreError, error::ApiError},
    types::tables::SessionRow,
};
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::HeaderMap};
use bountyboard_libs::FieldList;
use chrono::{DateTime, Utc};
use http::{
    header::{AUTHORIZATION, COOKIE},
    request::Parts,
};
use sqlx::{postgres::Postgres, Pool};
use std::sync::Arc;

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "session_token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            username: row.username,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn find(&self, token: &str) -> Result<Option<Session>, StoreError>;
}

pub struct PgSessionStore {
    pool: Pool<Postgres>,
}

impl PgSessionStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let query = format!(
            r#"SELECT {} FROM "sessions" WHERE "session_token" = $1 AND "expires_at" > CURRENT_TIMESTAMP"#,
            SessionRow::field_list()
        );
        let row: Option<SessionRow> = sqlx::query_as(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Session::from))
    }
}

/// Request extension giving the session extractor its store and cookie name.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<dyn SessionStore>,
    cookie_name: Arc<str>,
}

impl Sessions {
    pub fn new(store: Arc<dyn SessionStore>, cookie_name: &str) -> Self {
        Self {
            store,
            cookie_name: Arc::from(cookie_name),
        }
    }
}

fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get_all(AUTHORIZATION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.trim().split_once(' '))
        .find(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Rejects the request with 403 unless it carries a live session.
#[derive(Debug)]
pub struct AuthenticatedSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sessions = parts.extensions.get::<Sessions>().cloned().ok_or_else(|| {
            tracing::error!("session store is not registered on the router");
            ApiError::Internal(String::from("session store is not configured"))
        })?;

        let token = extract_token(&parts.headers, &sessions.cookie_name).ok_or_else(|| {
            tracing::warn!("request to {} without session token", parts.uri.path());
            ApiError::Forbidden
        })?;

        match sessions.store.find(&token).await {
            Ok(Some(session)) if session.expires_at > Utc::now() => {
                Ok(AuthenticatedSession(session))
            }
            Ok(_) => {
                tracing::warn!("unknown or expired session presented to {}", parts.uri.path());
                Err(ApiError::Forbidden)
            }
            Err(e) => {
                tracing::error!("session lookup failed cause: {:?}", e);
                Err(e.into())
            }
        }
    }
}
