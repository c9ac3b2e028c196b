//! Scripted collaborators shared by the theme integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tessera_test_support::fixtures::scenario_schema;
use tessera_theme::{
    BrandFetcher, BrandId, FetchError, InMemoryStyleRoot, ManagerDependencies, ThemeCache,
    ThemeManager,
};
use tokio::sync::Semaphore;

/// Fetcher answering from a fixed map, optionally holding each fetch until released.
pub struct ScriptedFetcher {
    payloads: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
    gate: Semaphore,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self {
            payloads: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
        }
    }

    /// Fetches block until [`Self::release`] hands out permits.
    pub fn gated() -> Self {
        Self {
            gate: Semaphore::new(0),
            ..Self::new()
        }
    }

    pub fn with_payload(mut self, brand: &str, payload: Value) -> Self {
        self.payloads.insert(brand.to_string(), payload);
        self
    }

    pub fn release(&self, fetches: usize) {
        self.gate.add_permits(fetches);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex").clone()
    }

    pub fn calls_for(&self, brand: &str) -> usize {
        self.calls().iter().filter(|call| *call == brand).count()
    }
}

#[async_trait]
impl BrandFetcher for ScriptedFetcher {
    async fn fetch(&self, brand_id: &BrandId) -> Result<Value, FetchError> {
        self.calls
            .lock()
            .expect("calls mutex")
            .push(brand_id.to_string());
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        self.payloads
            .get(brand_id.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: format!("scripted://themes/{brand_id}.json"),
                status: 404,
            })
    }
}

/// Fetcher whose task dies mid-fetch.
pub struct PanickingFetcher;

#[async_trait]
impl BrandFetcher for PanickingFetcher {
    async fn fetch(&self, brand_id: &BrandId) -> Result<Value, FetchError> {
        panic!("fetcher crashed while loading {brand_id}");
    }
}

/// Manager over the scenario schema, an in-memory root, and `fetcher`.
pub fn manager_with(
    fetcher: Arc<ScriptedFetcher>,
) -> Result<(ThemeManager, InMemoryStyleRoot), Box<dyn std::error::Error>> {
    manager_sharing(fetcher, ThemeCache::new())
}

/// Manager like [`manager_with`] that resolves brands through `cache`.
pub fn manager_sharing(
    fetcher: Arc<dyn BrandFetcher>,
    cache: ThemeCache,
) -> Result<(ThemeManager, InMemoryStyleRoot), Box<dyn std::error::Error>> {
    let root = InMemoryStyleRoot::new();
    let deps = ManagerDependencies::new(
        Arc::new(scenario_schema()?),
        fetcher,
        Box::new(root.clone()),
    )
    .with_cache(cache);
    Ok((ThemeManager::new(deps), root))
}

/// Poll `condition` until it holds or a second passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
