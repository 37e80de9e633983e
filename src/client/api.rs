//! HTTP transport for the record API.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use thiserror::Error;

/// Characters kept verbatim in an id path segment (matches the JS
/// `encodeURIComponent` unreserved set closely enough for key values).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Api(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Seam between the controller and the wire, so the controller is testable
/// without a server.
#[async_trait]
pub trait RecordTransport: Send + Sync {
    async fn fetch_table(&self, table_id: &str) -> Result<Vec<Value>, ClientError>;
    async fn create_record(&self, table_id: &str, payload: &Value) -> Result<Value, ClientError>;
    async fn update_record(
        &self,
        table_id: &str,
        id: &str,
        payload: &Value,
    ) -> Result<Value, ClientError>;
    async fn delete_record(&self, table_id: &str, id: &str) -> Result<(), ClientError>;
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base_url` up to and including `/api`, e.g. `http://localhost:4000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn encode_segment(id: &str) -> String {
        utf8_percent_encode(id, SEGMENT).to_string()
    }

    /// Non-2xx responses carry the server's message; 204 yields no body.
    async fn handle(response: reqwest::Response) -> Result<Option<Value>, ClientError> {
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(if message.is_empty() {
                "record API error".into()
            } else {
                message
            }));
        }
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl RecordTransport for ApiClient {
    async fn fetch_table(&self, table_id: &str) -> Result<Vec<Value>, ClientError> {
        let response = self.http.get(self.url(table_id)).send().await?;
        match Self::handle(response).await? {
            Some(Value::Array(rows)) => Ok(rows),
            Some(other) => Err(ClientError::Api(format!("expected an array, got {other}"))),
            None => Ok(Vec::new()),
        }
    }

    async fn create_record(&self, table_id: &str, payload: &Value) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(self.url(table_id))
            .json(payload)
            .send()
            .await?;
        Self::handle(response)
            .await?
            .ok_or_else(|| ClientError::Api("empty create response".into()))
    }

    async fn update_record(
        &self,
        table_id: &str,
        id: &str,
        payload: &Value,
    ) -> Result<Value, ClientError> {
        let path = format!("{table_id}/{}", Self::encode_segment(id));
        let response = self.http.put(self.url(&path)).json(payload).send().await?;
        Self::handle(response)
            .await?
            .ok_or_else(|| ClientError::Api("empty update response".into()))
    }

    async fn delete_record(&self, table_id: &str, id: &str) -> Result<(), ClientError> {
        let path = format!("{table_id}/{}", Self::encode_segment(id));
        let response = self.http.delete(self.url(&path)).send().await?;
        Self::handle(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ApiClient;

    #[test]
    fn key_segments_survive_encoding() {
        let encoded = ApiClient::encode_segment("ID_SUCURSAL=1|ID_PRODUCTO=2");
        assert_eq!(encoded, "ID_SUCURSAL%3D1%7CID_PRODUCTO%3D2");
    }
}
