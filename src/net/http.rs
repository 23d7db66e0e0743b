use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::factory::FactoryStructure;
use crate::session::UploadVerdict;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

/// Posts JSON documents to the simulation engine.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: Client,
    upload_url: String,
}

impl HttpUploader {
    pub fn new(config: &SessionConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(map_http_error)?;
        Ok(Self {
            client,
            upload_url: config.upload_url(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Uploads a structure. A 2xx body of exactly "Invalid Graph" is a rejection.
    #[instrument(skip_all, fields(url = %self.upload_url))]
    pub async fn upload(&self, structure: &FactoryStructure) -> Result<UploadVerdict, TransportError> {
        let body = post_json(&self.client, &self.upload_url, structure).await?;
        let verdict = UploadVerdict::from_body(&body);
        debug!(?verdict, "upload answered");
        Ok(verdict)
    }
}

/// Posts `payload` and returns the response body of a 2xx answer.
pub(crate) async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    payload: &T,
) -> Result<String, TransportError> {
    let response = client
        .post(url)
        .json(payload)
        .send()
        .await
        .map_err(map_http_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            code: status.as_u16(),
        });
    }
    response.text().await.map_err(map_http_error)
}

pub(crate) fn map_http_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Http(format!("request timeout: {}", error))
    } else if error.is_connect() {
        TransportError::Http(format!("connection error: {}", error))
    } else {
        TransportError::Http(error.to_string())
    }
}
