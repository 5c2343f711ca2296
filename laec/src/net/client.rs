//! JSON-over-HTTP client for the LAEC services.
//!
//! Every request built here passes through the [`RequestAuthenticator`]
//! before it is sent.

use super::{
    authenticator::RequestAuthenticator,
    errors::{ApiError, ApiResult},
};
use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};

/// API client for the lab and user services
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    authenticator: RequestAuthenticator,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    ///
    /// * `base_url` - Gateway URL, e.g. `http://localhost:8080`
    /// * `client` - Shared HTTP client (timeouts are configured on it)
    /// * `authenticator` - Hook that attaches the bearer token
    pub fn new(
        base_url: impl Into<String>,
        client: reqwest::Client,
        authenticator: RequestAuthenticator,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            authenticator,
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// GET a JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.json(self.request(Method::GET, path)).await
    }

    /// GET a JSON resource with query parameters
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.json(self.request(Method::GET, path).query(query)).await
    }

    /// POST a JSON body and decode the JSON answer
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::POST, path).json(body)).await
    }

    /// PUT a JSON body and decode the JSON answer
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::PUT, path).json(body)).await
    }

    /// PUT with query parameters, ignoring the response body
    pub async fn put_empty<Q>(&self, path: &str, query: &Q) -> ApiResult<()>
    where
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path).query(query))
            .await
            .map(|_| ())
    }

    /// PATCH a JSON body and decode the JSON answer
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.json(self.request(Method::PATCH, path).json(body)).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, path)).await.map(|_| ())
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let mut request = builder.build()?;
        self.authenticator.apply(&mut request);

        let method = request.method().clone();
        let path = request.url().path().to_string();
        log::debug!("{} {}", method, path);

        let response = self.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
        log::warn!("{} {} failed with status {}", method, path, status);
        Err(ApiError::from_status(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new(
            "http://localhost:8080/",
            reqwest::Client::new(),
            RequestAuthenticator::anonymous(),
        );
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/turmas"), "http://localhost:8080/api/turmas");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            reqwest::Client::new(),
            RequestAuthenticator::anonymous(),
        );
        let result: ApiResult<Vec<serde_json::Value>> = client.get("/api/turmas").await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
