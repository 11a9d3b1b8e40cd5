#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use jobly_api::auth::{generate_jwt, Claims};

pub const TEST_SECRET: &str = "jobly-integration-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();
static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        apply_schema()?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Inherit environment so the server sees DATABASE_URL; run against the test database
        let child = Command::new(env!("CARGO_BIN_EXE_jobly-api"))
            .env("APP_ENV", "test")
            .env("PORT", port.to_string())
            .env("SECRET_KEY", TEST_SECRET)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Creates the tables in the test database through the CLI.
fn apply_schema() -> Result<()> {
    let status = Command::new(env!("CARGO_BIN_EXE_jobly"))
        .arg("schema")
        .env("APP_ENV", "test")
        .status()
        .context("failed to run jobly schema")?;
    anyhow::ensure!(status.success(), "jobly schema exited with {}", status);
    Ok(())
}

/// HTTP client for the spawned server with ready-made tokens.
pub struct Api {
    pub base_url: String,
    pub client: reqwest::Client,
    pub admin_token: String,
    pub user_token: String,
}

/// `None` when DATABASE_URL is not set; the caller should return early.
pub async fn api() -> Result<Option<Api>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;

    Ok(Some(Api {
        base_url: server.base_url.clone(),
        client: reqwest::Client::new(),
        admin_token: token("admin", true)?,
        user_token: token("u1", false)?,
    }))
}

pub fn token(username: &str, is_admin: bool) -> Result<String> {
    Ok(generate_jwt(&Claims::new(username, is_admin, 1), TEST_SECRET)?)
}

/// Lowercase handle, unique across runs and parallel tests.
pub fn unique_handle(prefix: &str) -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.subsec_nanos()).unwrap_or(0);
    format!(
        "{}-{}-{}-{}",
        prefix,
        std::process::id() % 100_000,
        nanos % 1_000_000,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

impl Api {
    pub async fn send(&self, method: Method, path: &str, token: Option<&str>, body: Option<&Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let json = if text.is_empty() { Value::Null } else { serde_json::from_str(&text)? };
        Ok((status, json))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn admin(&self, method: Method, path: &str, body: Option<&Value>) -> Result<(StatusCode, Value)> {
        self.send(method, path, Some(&self.admin_token), body).await
    }

    /// Creates a company and returns its handle.
    pub async fn create_company(&self, prefix: &str, num_employees: i32) -> Result<String> {
        let handle = unique_handle(prefix);
        let body = serde_json::json!({
            "handle": handle,
            "name": format!("Company {}", handle),
            "description": "Integration test company",
            "numEmployees": num_employees,
            "logoUrl": "http://example.com/logo.png"
        });
        let (status, payload) = self.admin(Method::POST, "/companies", Some(&body)).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create company failed: {} {}", status, payload);
        Ok(handle)
    }

    pub async fn remove_company(&self, handle: &str) -> Result<()> {
        self.admin(Method::DELETE, &format!("/companies/{}", handle), None).await?;
        Ok(())
    }
}
