use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::RecordId,
    error::ApiErrorBody,
    protocol::{ListResponse, OptionsResponse, Record, SimilarResponse},
};
use tracing::debug;
use url::Url;

use crate::{config::TableSettings, error::FetchError, request_builder::ListRequest};

/// The latest successful answer of the list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub rows: Vec<Record>,
    pub total_count: u64,
}

impl From<ListResponse> for ResultPage {
    fn from(value: ListResponse) -> Self {
        Self {
            rows: value.data,
            total_count: value.total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarRecords {
    pub records: Vec<Record>,
    pub message: Option<String>,
}

impl From<SimilarResponse> for SimilarRecords {
    fn from(value: SimilarResponse) -> Self {
        Self {
            records: value.similar,
            message: value.message.filter(|message| !message.trim().is_empty()),
        }
    }
}

/// Remote side of the listing view.
#[async_trait]
pub trait ListingsBackend: Send + Sync {
    async fn fetch_page(&self, request: &ListRequest) -> Result<ResultPage, FetchError>;
    async fn fetch_options(&self, field: &str) -> Result<Vec<String>, FetchError>;
    async fn fetch_record(&self, id: &RecordId) -> Result<Record, FetchError>;
    async fn fetch_similar(&self, record: &Record) -> Result<SimilarRecords, FetchError>;
}

/// [`ListingsBackend`] over the REST API:
///
/// - `GET <api_root>/<resource>/?<list params>`
/// - `GET <api_root>/options/<field>/`
/// - `GET <api_root>/<resource>/<id>/`
/// - `GET <api_root>/<resource>/<id>/similar/`
pub struct HttpListingsBackend {
    http: Client,
    api_root: Url,
    resource: String,
}

impl HttpListingsBackend {
    pub fn new(settings: &TableSettings) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &TableSettings) -> anyhow::Result<Self> {
        let api_root = Url::parse(&settings.api_root)
            .with_context(|| format!("invalid api root '{}'", settings.api_root))?;
        if api_root.cannot_be_a_base() {
            return Err(anyhow!("api root '{}' cannot carry a path", settings.api_root));
        }
        Ok(Self {
            http,
            api_root,
            resource: settings.resource.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
            // The API routes all end with a slash.
            path.push("");
        }
        url
    }

    pub fn list_url(&self) -> Url {
        self.endpoint(&[self.resource.as_str()])
    }

    pub fn options_url(&self, field: &str) -> Url {
        self.endpoint(&["options", field])
    }

    pub fn record_url(&self, id: &RecordId) -> Url {
        self.endpoint(&[self.resource.as_str(), id.to_string().as_str()])
    }

    pub fn similar_url(&self, id: &RecordId) -> Url {
        self.endpoint(&[self.resource.as_str(), id.to_string().as_str(), "similar"])
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(ApiErrorBody::into_text);
            return Err(FetchError::Server {
                status: status.as_u16(),
                detail,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| FetchError::Body(err.to_string()))
    }
}

#[async_trait]
impl ListingsBackend for HttpListingsBackend {
    async fn fetch_page(&self, request: &ListRequest) -> Result<ResultPage, FetchError> {
        let url = self.list_url();
        debug!(%url, query = %request.to_query_string(), "fetching listing page");
        let body: ListResponse = self
            .get_json(self.http.get(url).query(request.params()))
            .await?;
        Ok(body.into())
    }

    async fn fetch_options(&self, field: &str) -> Result<Vec<String>, FetchError> {
        let body: OptionsResponse = self.get_json(self.http.get(self.options_url(field))).await?;
        Ok(body.options)
    }

    async fn fetch_record(&self, id: &RecordId) -> Result<Record, FetchError> {
        self.get_json(self.http.get(self.record_url(id))).await
    }

    async fn fetch_similar(&self, record: &Record) -> Result<SimilarRecords, FetchError> {
        let id = record.id.as_ref().ok_or(FetchError::MissingId)?;
        let body: SimilarResponse = self.get_json(self.http.get(self.similar_url(id))).await?;
        Ok(body.into())
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
