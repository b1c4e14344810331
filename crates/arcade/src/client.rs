//! HTTP client for the Arcade API.

use std::future::Future;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::protocol::{
    AuthorizationResponse, AuthorizeRequest, ExecuteToolRequest, ExecuteToolResponse, Page,
    ToolDefinition, qualified_name,
};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.arcade.dev";

/// Request timeout. Must exceed the longest auth status long poll.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Longest wait the auth status endpoint accepts, in seconds.
pub const MAX_WAIT_SECS: u64 = 59;

/// Tools requested per page when listing.
pub const PAGE_SIZE: usize = 100;

const TOOL_FORMAT: &str = "openai";

/// Builder for creating an Arcade client.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Arcade API client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Create a client from `ARCADE_API_KEY` and optional `ARCADE_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ARCADE_API_KEY").map_err(|_| Error::MissingApiKey)?;
        let mut builder = Self::builder(api_key);
        if let Ok(base_url) = std::env::var("ARCADE_BASE_URL") {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List up to `limit` tools of a toolkit, following pagination.
    pub async fn list_tools(&self, toolkit: &str, limit: usize) -> Result<Vec<ToolDefinition>> {
        let tools = collect_pages(limit, move |page_size, offset| {
            self.list_tools_page(toolkit, page_size, offset)
        })
        .await?;
        info!(toolkit, count = tools.len(), "listed tools");
        Ok(tools)
    }

    /// Fetch one page of a toolkit's tools.
    pub async fn list_tools_page(
        &self,
        toolkit: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Page<ToolDefinition>> {
        let url = self.url_with_params(
            "/v1/formatted_tools",
            &[
                ("toolkit", toolkit.to_string()),
                ("format", TOOL_FORMAT.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )?;
        self.send(self.http.get(url)).await
    }

    /// Fetch a single tool by name.
    pub async fn get_tool(&self, name: &str) -> Result<ToolDefinition> {
        let url = self.url_with_params(
            &format!("/v1/formatted_tools/{}", qualified_name(name)),
            &[("format", TOOL_FORMAT.to_string())],
        )?;
        match self.send(self.http.get(url)).await {
            Err(Error::Api { status: 404, .. }) => Err(Error::ToolNotFound(name.to_string())),
            other => other,
        }
    }

    /// Start (or look up) the authorization of a tool for a user.
    pub async fn authorize(&self, tool_name: &str, user_id: &str) -> Result<AuthorizationResponse> {
        let body = AuthorizeRequest {
            tool_name: qualified_name(tool_name),
            user_id: user_id.to_string(),
            next_uri: None,
        };
        let response: AuthorizationResponse = self.post("/v1/tools/authorize", &body).await?;
        debug!(tool_name, status = ?response.status, "authorization requested");
        Ok(response)
    }

    /// Current status of an authorization, long-polling up to `wait` seconds.
    pub async fn auth_status(&self, id: &str, wait: Option<u64>) -> Result<AuthorizationResponse> {
        let mut params = vec![("id", id.to_string())];
        if let Some(wait) = wait {
            params.push(("wait", wait.min(MAX_WAIT_SECS).to_string()));
        }
        let url = self.url_with_params("/v1/auth/status", &params)?;
        self.send(self.http.get(url)).await
    }

    /// Block until an authorization leaves the pending state.
    ///
    /// Returns the final response, whatever its status.
    pub async fn wait_for_completion(
        &self,
        response: AuthorizationResponse,
    ) -> Result<AuthorizationResponse> {
        poll_until_settled(response, move |id| async move {
            self.auth_status(&id, Some(MAX_WAIT_SECS)).await
        })
        .await
    }

    /// Execute a tool for a user.
    pub async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ExecuteToolResponse> {
        let body = ExecuteToolRequest {
            tool_name: qualified_name(tool_name),
            input,
            user_id: user_id.to_string(),
        };
        info!(tool_name, "executing tool");
        let response: ExecuteToolResponse = self.post("/v1/tools/execute", &body).await?;
        debug!(tool_name, success = response.success, "tool executed");
        Ok(response)
    }

    // --- Internal methods ---

    fn url_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let base = format!("{}{path}", self.base_url);
        Url::parse_with_params(&base, params).map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        self.send(self.http.post(url).json(body)).await
    }

    async fn send<R>(&self, request: RequestBuilder) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        decode(response).await
    }
}

/// Fetch pages of at most [`PAGE_SIZE`] until `limit` items are collected.
///
/// Stops early on an empty or short page, or once `total_count` is reached.
async fn collect_pages<T, F, Fut>(limit: usize, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items: Vec<T> = Vec::new();

    while items.len() < limit {
        let page_size = (limit - items.len()).min(PAGE_SIZE);
        let page = fetch(page_size, items.len()).await?;
        let received = page.items.len();
        items.extend(page.items);

        let exhausted = page
            .total_count
            .is_some_and(|total| items.len() as u64 >= total);
        if received == 0 || received < page_size || exhausted {
            break;
        }
    }

    items.truncate(limit);
    Ok(items)
}

/// Re-query an authorization by id while it is still waiting on the user.
async fn poll_until_settled<F, Fut>(
    mut response: AuthorizationResponse,
    mut poll: F,
) -> Result<AuthorizationResponse>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<AuthorizationResponse>>,
{
    while response.status.is_waiting() {
        let id = response.id.clone().ok_or(Error::MissingAuthorizationId)?;
        debug!(id = id.as_str(), "waiting for authorization");
        response = poll(id).await?;
    }
    Ok(response)
}

async fn decode<R>(response: Response) -> Result<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(api_error(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| Error::InvalidResponse(e.to_string()))
}

fn api_error(status: StatusCode, body: String) -> Error {
    Error::Api {
        status: status.as_u16(),
        body,
    }
}
