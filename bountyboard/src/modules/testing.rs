//! In-memory stores and a request helper for the handler tests.

use crate::{
    cmd::server::{create_router, RouterContext},
    modules::{
        catalog::Catalog,
        database::{ContributorStore, StoreError},
        registration::RegistrationClient,
        session::{Session, SessionStore, Sessions, DEFAULT_SESSION_COOKIE_NAME},
    },
    types::tables::{Issue, Participant, Solution},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bountyboard_libs::{
    leaderboard::{AvatarUrlTemplate, Standing},
    summary::{self, ClaimedIssue, SolutionRef, UserSummary},
};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tower::ServiceExt;

pub const VALID_TOKEN: &str = "valid-token";

const REPOSITORIES: &str = r#"[
    {
        "id": "compiler",
        "name": "Compiler",
        "description": "toy compiler for the systems course",
        "languages": ["Rust"],
        "issues": [
            {"id": "C-1", "title": "Constant folding pass", "url": "https://example.com/c/1", "languages": ["Rust"], "bounty": 100, "isClaimed": true, "claimedBy": "alice"},
            {"id": "C-2", "title": "Register allocator", "url": "https://example.com/c/2", "languages": ["Rust"], "bounty": 50, "multiplierActive": true, "multiplierValue": 3.0, "isClaimed": true, "isCompleted": true, "claimedBy": "bob"},
            {"id": "C-3", "title": "Lexer error recovery", "url": "https://example.com/c/3", "languages": ["Rust"], "bounty": 80}
        ]
    }
]"#;

const BADGES: &str = r#"[
    {"id": "first-merge", "name": "First Merge", "description": "first merged pull request", "category": "contribution", "tier": "bronze", "unlocked": true},
    {"id": "five-merges", "name": "Five Merges", "description": "five merged pull requests", "category": "contribution", "tier": "silver", "requires": ["first-merge"]},
    {"id": "mentor", "name": "Mentor", "description": "reviewed ten pull requests", "category": "community", "tier": "gold", "requires": ["five-merges"]}
]"#;

pub struct InMemorySessionStore {
    sessions: HashMap<String, Session>,
    failure: Option<String>,
}

impl InMemorySessionStore {
    pub fn seeded() -> Self {
        let now = Utc::now();
        let sessions = HashMap::from([
            (
                VALID_TOKEN.to_string(),
                Session {
                    username: String::from("alice"),
                    expires_at: now + Duration::hours(1),
                },
            ),
            (
                String::from("expired-token"),
                Session {
                    username: String::from("alice"),
                    expires_at: now - Duration::hours(1),
                },
            ),
        ]);
        Self {
            sessions,
            failure: None,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn find(&self, token: &str) -> Result<Option<Session>, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Database(sqlx::Error::Protocol(message.clone())));
        }
        Ok(self.sessions.get(token).cloned())
    }
}

fn participant(username: &str, full_name: &str, roll: &str, active: bool, bounty: i64) -> Participant {
    Participant {
        username: username.to_string(),
        full_name: full_name.to_string(),
        roll_number: roll.to_string(),
        is_active: active,
        bounty,
    }
}

fn issue(id: i64, repo_id: i64, completed: bool) -> Issue {
    Issue {
        id,
        repo_id,
        url: format!("https://example.com/issues/{}", id),
        completed,
    }
}

pub struct InMemoryContributorStore {
    participants: Vec<Participant>,
    issues: HashMap<String, Vec<Issue>>,
    solutions: HashMap<String, Vec<Solution>>,
    failure: Option<String>,
    lookups: AtomicUsize,
}

impl InMemoryContributorStore {
    pub fn seeded() -> Self {
        let participants = vec![
            participant("alice", "Alice Liddell", "CS21B001", true, 150),
            participant("bob", "Bob Builder", "CS21B002", true, 90),
            participant("carol", "Carol Danvers", "CS21B003", true, 90),
            participant("mallory", "Mallory Moriarty", "CS21B004", false, 500),
        ];
        let issues = HashMap::from([(
            String::from("alice"),
            vec![issue(1, 100, true), issue(2, 200, false), issue(3, 300, false)],
        )]);
        let solutions = HashMap::from([(
            String::from("alice"),
            vec![
                Solution { repo_id: 100 },
                Solution { repo_id: 100 },
                Solution { repo_id: 200 },
            ],
        )]);

        Self {
            participants,
            issues,
            solutions,
            failure: None,
            lookups: AtomicUsize::new(0),
        }
    }

    /// Number of summary lookups that reached the store.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Database(sqlx::Error::Protocol(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContributorStore for InMemoryContributorStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }

    async fn user_summary(&self, username: &str) -> Result<UserSummary, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let participant = self
            .participants
            .iter()
            .find(|p| p.username == username && p.is_active)
            .cloned()
            .ok_or(StoreError::AccountNotFound)?;
        let issues: Vec<ClaimedIssue> = self
            .issues
            .get(username)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();
        let solutions: Vec<SolutionRef> = self
            .solutions
            .get(username)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(summary::summarize(participant.into(), issues, &solutions))
    }

    async fn standings(&self, limit: u32) -> Result<Vec<Standing>, StoreError> {
        self.check()?;

        let mut active: Vec<Participant> = self
            .participants
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.bounty.cmp(&a.bounty).then_with(|| a.username.cmp(&b.username)));

        Ok(active
            .into_iter()
            .take(limit as usize)
            .map(Standing::from)
            .collect())
    }
}

pub struct TestApp {
    pub store: Arc<InMemoryContributorStore>,
    registration: Option<Arc<RegistrationClient>>,
    session_failure: Option<String>,
    repositories: &'static str,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryContributorStore::seeded()),
            registration: None,
            session_failure: None,
            repositories: REPOSITORIES,
        }
    }

    /// Every session lookup fails with a database error carrying `message`.
    pub fn failing_sessions(self, message: &str) -> Self {
        Self {
            session_failure: Some(message.to_string()),
            ..self
        }
    }

    pub fn without_repositories(self) -> Self {
        Self {
            repositories: "[]",
            ..self
        }
    }

    /// Every store call fails with a database error carrying `message`.
    pub fn failing(self, message: &str) -> Self {
        let mut store = InMemoryContributorStore::seeded();
        store.failure = Some(message.to_string());
        Self {
            store: Arc::new(store),
            ..self
        }
    }

    pub fn with_registration(self, base_url: &str) -> Self {
        let client = RegistrationClient::new(base_url).unwrap();
        Self {
            registration: Some(Arc::new(client)),
            ..self
        }
    }

    pub fn router(&self) -> Router {
        let catalog = Catalog::from_json(self.repositories, BADGES).unwrap();
        let mut session_store = InMemorySessionStore::seeded();
        session_store.failure = self.session_failure.clone();
        let sessions = Sessions::new(Arc::new(session_store), DEFAULT_SESSION_COOKIE_NAME);

        create_router(RouterContext {
            store: self.store.clone(),
            sessions,
            catalog: Arc::new(catalog),
            avatar: Arc::new(AvatarUrlTemplate::default()),
            registration: self.registration.clone(),
        })
    }
}

/// Sends one request through the router. The token goes into the session cookie and an
/// empty response body comes back as `Value::Null`.
pub async fn send(
    router: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(
            header::COOKIE,
            format!("{}={}", DEFAULT_SESSION_COOKIE_NAME, token),
        );
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(router, request).await
}

/// Sends a request built by the caller. The response body must be empty or JSON.
pub async fn send_request(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}
