//! Stubs and builders for constructing the full application stack.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::app::{App, Repositories};
use crate::infrastructure::clock::{FixedClock, FixedRandom, SeededRandom};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory::InMemorySessionStore;
use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse, RandomPort};

/// Answers every request with its own prompt.
#[derive(Default)]
pub struct EchoLlm {
    calls: AtomicUsize,
}

impl EchoLlm {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmPort for EchoLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LlmResponse::text(request.prompt_text()))
    }
}

/// Fails every request like an unreachable server.
pub struct UnreachableLlm;

#[async_trait]
impl LlmPort for UnreachableLlm {
    async fn generate(&self, _request: LlmRequest) -> Result<LlmResponse, LlmError> {
        Err(LlmError::RequestFailed(
            "error sending request: connection refused".into(),
        ))
    }
}

/// A fully wired app plus handles to its stubs.
pub struct TestApp {
    pub app: Arc<App>,
    pub store: Arc<InMemorySessionStore>,
}

pub struct TestAppBuilder {
    llm: Arc<dyn LlmPort>,
    random: Arc<dyn RandomPort>,
    config: EngineConfig,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            llm: Arc::new(EchoLlm::default()),
            random: Arc::new(SeededRandom::new(7)),
            config: EngineConfig::default(),
        }
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmPort>) -> Self {
        self.llm = llm;
        self
    }

    /// Every die shows `value` (clamped to the die's faces).
    pub fn with_fixed_roll(mut self, value: i32) -> Self {
        self.random = Arc::new(FixedRandom(value));
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(InMemorySessionStore::new());
        let clock = Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap(),
        ));
        let app = App::new(
            Repositories::shared(store.clone()),
            self.llm,
            clock,
            self.random,
            &self.config,
        );
        TestApp {
            app: Arc::new(app),
            store,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
