//! 通用 HTTP 请求封装。
//!
//! 单次请求、无重试；超时沿用 reqwest 默认值。

use crate::ApiError;
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Instant;
use wine_telemetry::{
    new_request_id, record_http_failure, record_request_sent, record_request_succeeded,
    record_transport_failure,
};

/// 每个请求携带的追踪头。
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// REST 客户端；克隆开销很小，内部连接池共享。
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|err| ApiError::InvalidUrl(format!("{base_url}: {err}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .user_agent(concat!("wine-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// 不带 token 的副本，用于登录等匿名接口。
    pub fn anonymous(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// 发送请求并解码 JSON 响应。
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method, path, body).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// 发送请求并忽略成功响应体。
    pub async fn request_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, body).await.map(|_| ())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<(), T>(Method::DELETE, path, None).await
    }

    pub async fn send_post<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request_empty(Method::POST, path, Some(body)).await
    }

    pub async fn send_put<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request_empty(Method::PUT, path, Some(body)).await
    }

    pub async fn send_patch<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.request_empty(Method::PATCH, path, Some(body)).await
    }

    pub async fn send_delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_empty::<()>(Method::DELETE, path, None).await
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request_id = new_request_id();
        let mut builder = self
            .http
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        record_request_sent();
        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                record_transport_failure();
                tracing::warn!(
                    %method,
                    path,
                    request_id = %request_id,
                    error = %err,
                    "request failed"
                );
                return Err(ApiError::Transport(err.to_string()));
            }
        };
        let latency_ms = started.elapsed().as_millis() as u64;
        let status = response.status();
        tracing::debug!(
            %method,
            path,
            request_id = %request_id,
            status = status.as_u16(),
            latency_ms,
            "request finished"
        );

        if status.is_success() {
            record_request_succeeded(latency_ms);
            return Ok(response);
        }
        record_http_failure(latency_ms);
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(
            status.as_u16(),
            status.canonical_reason(),
            &body,
        ))
    }
}
