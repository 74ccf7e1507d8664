//! HTTP client for a remote text-recognition engine.

use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, ImageFormat};
use log::warn;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::TextRecognizer;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct RemoteVisionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Hard request timeout; expiry degrades to an empty result.
    pub timeout: Duration,
}

impl RemoteVisionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

pub struct RemoteVisionClient {
    client: Client,
    config: RemoteVisionConfig,
}

impl RemoteVisionClient {
    pub fn new(config: RemoteVisionConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[derive(Deserialize)]
struct RecognitionResponse {
    #[serde(default)]
    text: String,
}

impl TextRecognizer for RemoteVisionClient {
    fn name(&self) -> &str {
        "remote-vision"
    }

    fn recognize(&self, image: &DynamicImage) -> Option<String> {
        let mut payload: Vec<u8> = Vec::new();
        if let Err(error) = image.write_to(&mut Cursor::new(&mut payload), ImageFormat::Png) {
            warn!("[Vision] Failed to encode recognition payload: {error}");
            return None;
        }

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "image/png")
            .body(payload);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        match request
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<RecognitionResponse>())
        {
            Ok(response) => Some(response.text),
            Err(error) => {
                warn!("[Vision] Recognition request failed: {error}");
                None
            }
        }
    }
}
