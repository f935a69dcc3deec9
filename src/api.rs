//! REST client for the shopping-list backend.
//!
//! [`ListApi`] is the seam the controller talks through; [`HttpApi`] is the
//! reqwest implementation used by the binary and the integration tests.

use crate::config::ClientConfig;
use crate::errors::{Operation, SyncError};
use crate::models::{ErrorBody, Item, ItemPatch, NewItem, RemoteSummary};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

#[async_trait]
pub trait ListApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<String>, SyncError>;
    async fn items(&self) -> Result<Vec<Item>, SyncError>;
    async fn create_item(&self, item: &NewItem) -> Result<Item, SyncError>;
    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Item, SyncError>;
    async fn delete_item(&self, id: i64) -> Result<(), SyncError>;
    async fn clear(&self) -> Result<(), SyncError>;
    async fn summary(&self) -> Result<RemoteSummary, SyncError>;
}

#[derive(Debug, Clone)]
pub struct HttpApi {
    base: Url,
    client: Client,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self, SyncError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Self::with_client(&config.base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, SyncError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, SyncError> {
        Ok(self.base.join(path)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, SyncError> {
        let url = self.endpoint(path)?;
        debug!("{method} {url}");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        Ok(request.send().await?)
    }
}

fn json_body<T: Serialize>(body: &T) -> Result<Option<serde_json::Value>, SyncError> {
    Ok(Some(serde_json::to_value(body)?))
}

async fn read_json<T: DeserializeOwned>(
    response: Response,
    operation: Operation,
) -> Result<T, SyncError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(error_from_body(operation, status, &bytes));
    }
    Ok(serde_json::from_slice(&bytes)?)
}

async fn expect_success(response: Response, operation: Operation) -> Result<(), SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let bytes = response.bytes().await?;
    Err(error_from_body(operation, status, &bytes))
}

fn error_from_body(operation: Operation, status: reqwest::StatusCode, bytes: &[u8]) -> SyncError {
    let body: ErrorBody = serde_json::from_slice(bytes).unwrap_or_default();
    SyncError::http(operation, status, body.error)
}

#[async_trait]
impl ListApi for HttpApi {
    async fn categories(&self) -> Result<Vec<String>, SyncError> {
        let response = self.send(Method::GET, "categorias", None).await?;
        read_json(response, Operation::LoadCategories).await
    }

    async fn items(&self) -> Result<Vec<Item>, SyncError> {
        let response = self.send(Method::GET, "itens", None).await?;
        read_json(response, Operation::LoadItems).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item, SyncError> {
        let response = self.send(Method::POST, "itens", json_body(item)?).await?;
        read_json(response, Operation::AddItem).await
    }

    async fn update_item(&self, id: i64, patch: &ItemPatch) -> Result<Item, SyncError> {
        let path = format!("itens/{id}");
        let response = self.send(Method::PUT, &path, json_body(patch)?).await?;
        read_json(response, Operation::UpdateItem).await
    }

    async fn delete_item(&self, id: i64) -> Result<(), SyncError> {
        let path = format!("itens/{id}");
        let response = self.send(Method::DELETE, &path, None).await?;
        expect_success(response, Operation::DeleteItem).await
    }

    async fn clear(&self) -> Result<(), SyncError> {
        let response = self.send(Method::DELETE, "limpar", None).await?;
        expect_success(response, Operation::ClearList).await
    }

    async fn summary(&self) -> Result<RemoteSummary, SyncError> {
        let response = self.send(Method::GET, "resumo", None).await?;
        read_json(response, Operation::LoadSummary).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_joined_under_base_path() {
        let api = HttpApi::with_client("http://localhost:5000/api", Client::new()).unwrap();
        assert_eq!(api.base_url().as_str(), "http://localhost:5000/api/");
        assert_eq!(
            api.endpoint("itens/3").unwrap().as_str(),
            "http://localhost:5000/api/itens/3"
        );

        let api = HttpApi::with_client("http://localhost:5000/api/", Client::new()).unwrap();
        assert_eq!(
            api.endpoint("limpar").unwrap().as_str(),
            "http://localhost:5000/api/limpar"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = HttpApi::with_client("not a url", Client::new()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidUrl(_)));
    }

    #[test]
    fn error_body_without_erro_uses_default() {
        let err = error_from_body(
            Operation::UpdateItem,
            reqwest::StatusCode::NOT_FOUND,
            b"<html>not found</html>",
        );
        assert_eq!(err.to_string(), "Failed to update item");

        let err = error_from_body(
            Operation::UpdateItem,
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"erro": "Valores numéricos inválidos"}"#.as_bytes(),
        );
        assert_eq!(err.to_string(), "Valores numéricos inválidos");
    }
}
