//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jokes_api::users::{
    DeleteSummary, InMemoryUserStore, StoreResult, UpdateSummary, User, UserFilter, UserStore,
};
use jokes_api::{HttpServer, ServerConfig, Shutdown};
use tokio::net::TcpListener;

/// A server running on an ephemeral port with an in-memory user store.
pub struct TestServer {
    pub addr: SocketAddr,
    pub users: Arc<InMemoryUserStore>,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Default configuration minus static files.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.static_files.enabled = false;
    config
}

/// In-memory store that waits `latency` before every operation.
pub struct SlowUserStore {
    inner: Arc<InMemoryUserStore>,
    latency: Duration,
}

#[async_trait]
impl UserStore for SlowUserStore {
    async fn create_user(&self, user: User) -> StoreResult<()> {
        tokio::time::sleep(self.latency).await;
        self.inner.create_user(user).await
    }

    async fn find_users(&self, filter: UserFilter) -> StoreResult<Vec<User>> {
        tokio::time::sleep(self.latency).await;
        self.inner.find_users(filter).await
    }

    async fn update_users_age(
        &self,
        name: Option<String>,
        age: Option<i64>,
    ) -> StoreResult<UpdateSummary> {
        tokio::time::sleep(self.latency).await;
        self.inner.update_users_age(name, age).await
    }

    async fn delete_users_below_age(&self, threshold: Option<i64>) -> StoreResult<DeleteSummary> {
        tokio::time::sleep(self.latency).await;
        self.inner.delete_users_below_age(threshold).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }
}

pub async fn start_server(config: ServerConfig) -> TestServer {
    start_server_with_latency(config, Duration::ZERO).await
}

/// Like [`start_server`], but every user store call is delayed.
pub async fn start_server_with_latency(mut config: ServerConfig, latency: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let users = Arc::new(InMemoryUserStore::new());
    let store: Arc<dyn UserStore> = if latency.is_zero() {
        users.clone()
    } else {
        Arc::new(SlowUserStore {
            inner: users.clone(),
            latency,
        })
    };
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    TestServer {
        addr,
        users,
        client,
        shutdown,
    }
}
