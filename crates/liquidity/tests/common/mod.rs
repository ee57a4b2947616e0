//! Shared fixtures for the integration tests: a scripted in-memory transport
//! and a fake session provider.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use stablepay_liquidity::api::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, LiquidityApiClient};
use stablepay_liquidity::auth::AuthProviderTrait;
use stablepay_liquidity::cache::QueryCache;
use stablepay_liquidity::config::ClientConfig;
use stablepay_liquidity::errors::{Error, Result};
use stablepay_liquidity::DashboardService;

pub const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

/// Answers requests from per-route queues. The last scripted answer of a
/// route repeats; unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Result<HttpResponse>>>>,
    requests: Mutex<Vec<HttpRequest>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn route(method: HttpMethod, path: &str) -> String {
        format!("{} {}", method.as_str(), path)
    }

    fn push(&self, method: HttpMethod, path: &str, answer: Result<HttpResponse>) {
        self.routes
            .lock()
            .unwrap()
            .entry(Self::route(method, path))
            .or_default()
            .push_back(answer);
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.push(
            method,
            path,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn respond_raw(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(
            method,
            path,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    /// Holds every answer on this route back for `delay`.
    pub fn delay(&self, method: HttpMethod, path: &str, delay: Duration) {
        self.delays
            .lock()
            .unwrap()
            .insert(Self::route(method, path), delay);
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: Error) {
        self.push(method, path, Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = Self::route(request.method, &request.path);
        self.requests.lock().unwrap().push(request);

        let delay = self.delays.lock().unwrap().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Ok(HttpResponse {
                status: 404,
                body: json!({ "message": format!("No route for {}", key) }).to_string(),
            }),
        }
    }
}

/// Session provider whose state the test controls.
pub struct FakeAuth {
    signed_in: AtomicBool,
    token: Mutex<Option<String>>,
    redirects: AtomicUsize,
}

impl FakeAuth {
    pub fn signed_in() -> Arc<Self> {
        Arc::new(Self {
            signed_in: AtomicBool::new(true),
            token: Mutex::new(Some("test-token".to_string())),
            redirects: AtomicUsize::new(0),
        })
    }

    pub fn signed_out() -> Arc<Self> {
        let auth = Self::signed_in();
        auth.signed_in.store(false, Ordering::SeqCst);
        auth
    }

    pub fn without_token() -> Arc<Self> {
        let auth = Self::signed_in();
        *auth.token.lock().unwrap() = None;
        auth
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProviderTrait for FakeAuth {
    fn is_signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    async fn get_token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn on_unauthorized(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_retry_base_delay(Duration::from_millis(1))
}

pub fn service(transport: Arc<ScriptedTransport>, auth: Arc<FakeAuth>) -> DashboardService {
    let client = LiquidityApiClient::new(transport, auth);
    DashboardService::new(client, Arc::new(QueryCache::new()), test_config())
}

pub fn provider_info_body(balance: f64, can_withdraw: bool, days: u32) -> Value {
    json!({
        "success": true,
        "data": {
            "currentBalance": balance,
            "totalDeposited": balance,
            "totalEarnings": 0,
            "totalWithdrawn": 0,
            "canWithdraw": can_withdraw,
            "daysUntilWithdrawal": days,
            "isProvider": true,
            "chain": "base",
            "token": "USDC",
            "deposits": [],
            "withdrawals": []
        }
    })
}

pub fn transactions_body() -> Value {
    json!({
        "ok": true,
        "data": [
            {
                "id": "t1",
                "type": "deposit",
                "amount": 500,
                "status": "completed",
                "timestamp": "2025-01-10T12:00:00Z",
                "txHash": "0xaaa",
                "description": "USDC deposit"
            },
            {
                "id": "t2",
                "type": "earning",
                "amount": 1.25,
                "status": "completed",
                "timestamp": "2025-01-11T00:00:00Z",
                "description": "Daily yield"
            },
            {
                "id": "t3",
                "type": "withdrawal",
                "amount": 100,
                "status": "pending",
                "timestamp": "2025-01-12T08:30:00Z",
                "tx_hash": "0xbbb",
                "description": "Withdrawal, to cold wallet"
            }
        ]
    })
}

pub fn notifications_body() -> Value {
    json!([
        {
            "id": "n1",
            "type": "success",
            "title": "Deposit credited",
            "message": "500 USDC credited",
            "timestamp": "2025-01-10T12:01:00Z",
            "read": false
        },
        {
            "id": "n2",
            "type": "info",
            "title": "Weekly summary",
            "message": "Your summary is ready",
            "timestamp": "2025-01-11T09:00:00Z",
            "read": false
        },
        {
            "id": "n3",
            "type": "warning",
            "title": "Lock period",
            "message": "Funds locked",
            "timestamp": "2025-01-09T09:00:00Z",
            "read": true
        }
    ])
}
