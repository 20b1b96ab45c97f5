//! Shared test helpers: in-memory store, scripted oracle, router setup

#![allow(dead_code)]

use async_trait::async_trait;
use siren_server::db::{init_memory_pool, SqliteCaseStore};
use siren_server::oracle::{ExtractionOracle, OracleError};
use siren_server::{build_router, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the scripted oracle answers
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Timeout,
    Network,
    NoCandidate,
}

/// Oracle stand-in that answers every prompt the same way
pub struct ScriptedOracle {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl ScriptedOracle {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        })
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Self::new(Script::Reply(reply.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionOracle for ScriptedOracle {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Timeout => Err(OracleError::Timeout),
            Script::Network => Err(OracleError::Network("connection refused".to_string())),
            Script::NoCandidate => Err(OracleError::NoCandidate(
                "candidates array empty".to_string(),
            )),
        }
    }
}

/// Fresh in-memory store
pub async fn memory_store() -> Arc<SqliteCaseStore> {
    let pool = init_memory_pool()
        .await
        .expect("Failed to create in-memory database");
    Arc::new(SqliteCaseStore::new(pool))
}

/// Number of rows in the `ecases` table
pub async fn case_count(store: &SqliteCaseStore) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM ecases")
        .fetch_one(store.pool())
        .await
        .expect("Failed to count cases")
}

/// Router wired to an in-memory store and the given oracle
pub async fn test_app(oracle: Arc<ScriptedOracle>) -> (axum::Router, Arc<SqliteCaseStore>) {
    let store = memory_store().await;
    let state = AppState::new(store.clone(), oracle);
    (build_router(state), store)
}

/// Reply the oracle gives for the Building B example
pub const FENCED_FIRE_REPLY: &str = r#"```json
{
  "department": "fire",
  "priority": "high",
  "location": "Building B",
  "summary": "Fire incident with two cars burning"
}
```"#;
