#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use photoism_server::app;
use photoism_server::testing::{test_config, test_state, MemoryStore};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serves the app in-process over a fresh in-memory store.
    /// The server task lives as long as the calling test's runtime.
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let (store, state) = test_state();
        let router = app(state, &test_config());
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            store,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/signup"))
            .json(&json!({ "username": username, "email": email, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Signs up and logs in, returning the token pair
    pub async fn register(&self, email: &str) -> Result<Tokens> {
        let res = self.signup("tester", email, "password123").await?;
        anyhow::ensure!(res.status() == StatusCode::NO_CONTENT, "signup failed: {}", res.status());

        let res = self.login(email, "password123").await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        Tokens::from_body(&res.json::<Value>().await?)
    }
}

pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

impl Tokens {
    pub fn from_body(body: &Value) -> Result<Self> {
        let access = body["tokens"]["accessToken"]
            .as_str()
            .context("missing accessToken")?
            .to_string();
        let refresh = body["tokens"]["refreshToken"]
            .as_str()
            .context("missing refreshToken")?
            .to_string();
        Ok(Self { access, refresh })
    }
}

/// Asserts the shared error body shape and returns it
pub async fn error_body(res: reqwest::Response, status: StatusCode, path: &str) -> Result<Value> {
    assert_eq!(res.status(), status);
    let body = res.json::<Value>().await?;
    assert_eq!(body["path"], path, "unexpected path in {}", body);
    assert!(body["message"].is_string(), "missing message in {}", body);
    assert!(body["time"].is_string(), "missing time in {}", body);
    assert!(body["inputErrors"].is_array(), "missing inputErrors in {}", body);
    Ok(body)
}
