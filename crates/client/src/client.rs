//! The HTTP JSON-RPC state client.

use crate::error::{ClientError, ClientResult};
use crate::models::{RpcRequest, RpcResponse, StoragePage};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chainq_query::{StateStore, StoreError};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Entries requested per bulk-iteration page.
pub const DEFAULT_PAGE_SIZE: usize = 200;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for a chain-state store speaking JSON-RPC 2.0 over HTTP.
#[derive(Debug)]
pub struct StateClient {
    base_address: Url,
    http_client: Client,
    page_size: usize,
}

/// Configurable builder for [`StateClient`].
pub struct StateClientBuilder {
    url: Url,
    timeout: Duration,
    user: Option<String>,
    pass: Option<String>,
    page_size: usize,
}

impl StateClientBuilder {
    /// Starts a builder for the given endpoint.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url,
            timeout: DEFAULT_HTTP_TIMEOUT,
            user: None,
            pass: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables HTTP basic auth.
    #[must_use]
    pub fn basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }

    /// Enables basic auth only when both credentials are present.
    #[must_use]
    pub fn with_optional_auth(mut self, user: Option<String>, pass: Option<String>) -> Self {
        self.user = user;
        self.pass = pass;
        self
    }

    /// Overrides the bulk-iteration page size.
    #[must_use]
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builds the client.
    pub fn build(self) -> ClientResult<StateClient> {
        if self.page_size == 0 {
            return Err(ClientError::config("page size must be non-zero"));
        }

        let mut builder = Client::builder().timeout(self.timeout);

        if let (Some(user), Some(pass)) = (self.user, self.pass) {
            let encoded = general_purpose::STANDARD.encode(format!("{user}:{pass}"));
            let mut headers = reqwest::header::HeaderMap::new();
            let value = format!("Basic {encoded}")
                .parse()
                .map_err(|_| ClientError::config("credentials form an invalid header"))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        Ok(StateClient {
            base_address: self.url,
            http_client: builder.build()?,
            page_size: self.page_size,
        })
    }
}

impl StateClient {
    /// Creates a configurable builder.
    #[must_use]
    pub fn builder(url: Url) -> StateClientBuilder {
        StateClientBuilder::new(url)
    }

    /// Sends one request and parses the JSON-RPC envelope.
    async fn send(&self, request: &RpcRequest) -> ClientResult<RpcResponse> {
        let response = self
            .http_client
            .post(self.base_address.clone())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let content = response.text().await?;

        serde_json::from_str(&content)
            .map_err(|e| ClientError::invalid_response(format!("{e}: {content}")))
    }

    /// Sends an RPC request and returns the result payload.
    ///
    /// A JSON-RPC error object surfaces as [`ClientError::Rpc`]; a null
    /// result is returned as-is, since for most calls null is a value.
    pub async fn rpc_send(&self, method: &str, params: Vec<Value>) -> ClientResult<Value> {
        let request = RpcRequest::new(method, params);
        tracing::debug!(method, "sending rpc request");
        let response = self.send(&request).await?;

        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }

    /// Connectivity probe, used before the first real query.
    pub async fn health(&self) -> ClientResult<Value> {
        self.rpc_send("system_health", vec![]).await
    }

    /// Resolves a single storage value.
    pub async fn get_storage(
        &self,
        module: &str,
        item: &str,
        keys: &[String],
    ) -> ClientResult<Value> {
        self.rpc_send(
            "state_getStorage",
            vec![json!(module), json!(item), json!(keys)],
        )
        .await
    }

    /// Walks a keyed collection page by page and returns every entry in
    /// delivery order.
    pub async fn get_storage_entries(
        &self,
        module: &str,
        item: &str,
        keys: &[String],
    ) -> ClientResult<Vec<(String, Value)>> {
        let mut entries = Vec::new();
        let mut start_key: Option<String> = None;

        loop {
            let mut params = vec![
                json!(module),
                json!(item),
                json!(keys),
                json!(self.page_size),
            ];
            if let Some(key) = &start_key {
                params.push(json!(key));
            }

            let result = self.rpc_send("state_getStorageMap", params).await?;
            let page: StoragePage = serde_json::from_value(result)?;
            entries.extend(page.entries);

            match page.next {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        Ok(entries)
    }

    /// Resolves a named constant. `None` means the constant does not
    /// exist; this is the one call where null denotes absence.
    pub async fn constant(&self, module: &str, name: &str) -> ClientResult<Option<Value>> {
        let value = self
            .rpc_send("state_getConstant", vec![json!(module), json!(name)])
            .await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }
}

#[async_trait]
impl StateStore for StateClient {
    async fn query(&self, module: &str, item: &str, keys: &[String]) -> Result<Value, StoreError> {
        self.get_storage(module, item, keys)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn query_map(
        &self,
        module: &str,
        item: &str,
        keys: &[String],
    ) -> Result<Vec<(String, Value)>, StoreError> {
        self.get_storage_entries(module, item, keys)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn get_constant(&self, module: &str, name: &str) -> Result<Value, StoreError> {
        match self.constant(module, name).await {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(StoreError::NotFound {
                module: module.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}
