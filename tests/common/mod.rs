// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;
use stepquest::config::Config;
use stepquest::models::{ActivitySample, Challenge, Coordinate, Credential, Route};
use stepquest::provider::{ProviderError, ProviderGateway, TokenGrant};
use stepquest::routes::create_router;
use stepquest::services::{AuthSession, ProgressEngine};
use stepquest::store::PrefsStore;
use stepquest::AppState;

/// Scripted provider gateway: counts calls, can be told to fail, and hands
/// out numbered tokens so tests can tell grants apart.
pub struct MockProvider {
    pub exchange_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub fail_exchange: AtomicBool,
    pub fail_refresh: AtomicBool,
    pub fail_fetch: AtomicBool,
    /// Hold each refresh open this long, to widen any race window.
    pub refresh_delay_ms: AtomicUsize,
    pub samples: Mutex<Vec<ActivitySample>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            exchange_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            fail_exchange: AtomicBool::new(false),
            fail_refresh: AtomicBool::new(false),
            fail_fetch: AtomicBool::new(false),
            refresh_delay_ms: AtomicUsize::new(0),
            samples: Mutex::new(Vec::new()),
        }
    }
}

impl MockProvider {
    #[allow(dead_code)]
    pub fn with_samples(samples: Vec<ActivitySample>) -> Self {
        let provider = Self::default();
        *provider.samples.lock().unwrap() = samples;
        provider
    }
}

#[async_trait]
impl ProviderGateway for MockProvider {
    fn required_scopes(&self) -> &[&'static str] {
        &["steps.read", "location.read"]
    }

    fn authorization_url(&self) -> String {
        "https://provider.example/authorize?client_id=test".to_string()
    }

    async fn exchange_authorization_code(
        &self,
        _code: &str,
    ) -> Result<TokenGrant, ProviderError> {
        let n = self.exchange_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if self.fail_exchange.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 400,
                body: "invalid_grant".to_string(),
            });
        }

        Ok(TokenGrant {
            access_token: format!("access-{}", n),
            refresh_token: Some(format!("refresh-{}", n)),
            expires_in_secs: 3600,
        })
    }

    async fn refresh_access_token(
        &self,
        _refresh_token: &str,
    ) -> Result<TokenGrant, ProviderError> {
        let n = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;

        let delay = self.refresh_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay as u64)).await;
        }

        if self.fail_refresh.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 401,
                body: "invalid_grant".to_string(),
            });
        }

        Ok(TokenGrant {
            access_token: format!("access-r{}", n),
            // Refresh grants do not rotate the refresh token
            refresh_token: None,
            expires_in_secs: 3600,
        })
    }

    async fn fetch_daily_activity(
        &self,
        _access_token: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<ActivitySample>, ProviderError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 503,
                body: "backend unavailable".to_string(),
            });
        }

        Ok(self.samples.lock().unwrap().clone())
    }
}

/// A callback query granting everything [`MockProvider`] requires.
#[allow(dead_code)]
pub const VALID_CALLBACK: &str = "code=auth-code-1&scope=steps.read%20location.read";

/// A callback query where the user declined the location scope.
#[allow(dead_code)]
pub const PARTIAL_SCOPE_CALLBACK: &str = "code=auth-code-1&scope=steps.read";

/// Per-day samples adding up to `total_steps`, one bucket per day.
#[allow(dead_code)]
pub fn daily_samples(total_steps: u64, days: u64) -> Vec<ActivitySample> {
    let per_day = total_steps / days;
    let mut remainder = total_steps - per_day * days;
    let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    (0..days)
        .map(|i| {
            let extra = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            ActivitySample {
                day_start: first + Duration::days(i as i64),
                step_count: per_day + extra,
            }
        })
        .collect()
}

/// A challenge whose route is (almost exactly) `target_km` long.
#[allow(dead_code)]
pub fn challenge_of_length(target_km: f64) -> Challenge {
    let start = Coordinate {
        latitude: 0.0,
        longitude: 0.0,
    };
    let probe = Route::new(
        start,
        Coordinate {
            latitude: 0.0,
            longitude: 1.0,
        },
    );
    let degrees = target_km / probe.total_distance_km();

    Challenge {
        route: Route::new(
            start,
            Coordinate {
                latitude: 0.0,
                longitude: degrees,
            },
        ),
        start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        start_name: "Start".to_string(),
        end_name: "End".to_string(),
    }
}

/// Seed a persisted credential; `fresh` controls whether the access token is
/// still inside its expiry window.
#[allow(dead_code)]
pub fn seed_credential(store: &PrefsStore, fresh: bool) {
    let expires_at = if fresh {
        Utc::now() + Duration::hours(1)
    } else {
        Utc::now() - Duration::hours(1)
    };

    store
        .save_credential(&Credential {
            authorization_code: None,
            access_token: Some("seed-access".to_string()),
            refresh_token: Some("seed-refresh".to_string()),
            expires_at: Some(expires_at),
        })
        .expect("seed credential");
}

/// Build a session + engine pair over a shared mock provider and store.
#[allow(dead_code)]
pub fn create_core(
    provider: Arc<MockProvider>,
    store: PrefsStore,
) -> (Arc<AuthSession>, ProgressEngine) {
    let auth = Arc::new(
        AuthSession::restore(provider.clone(), store.clone()).expect("restore session"),
    );
    let engine = ProgressEngine::new(auth.clone(), provider, store, 1000.0)
        .expect("create engine");

    (auth, engine)
}

/// Create a test app with an in-memory store and mock provider.
/// Returns the router, the shared state and the provider for scripting.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MockProvider>) {
    let config = Config::test_default();
    let prefs = PrefsStore::in_memory();
    let provider = Arc::new(MockProvider::default());

    let auth = Arc::new(
        AuthSession::restore(provider.clone(), prefs.clone()).expect("restore session"),
    );
    let engine = Arc::new(
        ProgressEngine::new(
            auth.clone(),
            provider.clone(),
            prefs.clone(),
            config.steps_per_km,
        )
        .expect("create engine"),
    );

    let state = Arc::new(AppState {
        config,
        prefs,
        auth,
        engine,
    });

    (create_router(state.clone()), state, provider)
}
