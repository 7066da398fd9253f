//! In-process stand-in for the widget and firewall-management services.
//!
//! Widget CRUD lives under `/api`, the session-based firewall API under
//! `/web_api`. Both keep their data in memory for the lifetime of the
//! `MockState` they are built from.

pub mod firewall;
pub mod widget;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use tokio::{net::TcpListener, sync::RwLock};

pub use firewall::{FirewallStore, Host};
pub use widget::{Widget, WidgetNew};

pub const DEFAULT_USER: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";

/// Shared state behind every route.
#[derive(Clone)]
pub struct MockState {
    pub(crate) widgets: Arc<RwLock<HashMap<String, Widget>>>,
    pub(crate) firewall: Arc<RwLock<FirewallStore>>,
    pub(crate) credentials: Arc<(String, String)>,
    logins: Arc<AtomicUsize>,
}

impl MockState {
    pub fn new(user: &str, password: &str) -> Self {
        Self {
            widgets: Arc::new(RwLock::new(HashMap::new())),
            firewall: Arc::new(RwLock::new(FirewallStore::default())),
            credentials: Arc::new((user.to_string(), password.to_string())),
            logins: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of successful logins served so far.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub(crate) fn record_login(&self) {
        self.logins.fetch_add(1, Ordering::SeqCst);
    }

    /// Forget every issued session id, as if they all timed out server-side.
    pub async fn expire_sessions(&self) {
        self.firewall.write().await.sessions.clear();
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new(DEFAULT_USER, DEFAULT_PASSWORD)
    }
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .nest("/api", widget::routes())
        .nest("/web_api", firewall::routes())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Serve `state` on a random local port from a background thread with its
/// own current-thread runtime. Returns once the port is bound.
pub fn spawn(state: MockState) -> Result<SocketAddr, std::io::Error> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        let served = runtime.block_on(async {
            let listener = TcpListener::from_std(std_listener)?;
            run_with_state(listener, state).await
        });
        if let Err(e) = served {
            tracing::error!(%addr, error = %e, "mock server stopped");
        }
    });

    Ok(addr)
}
