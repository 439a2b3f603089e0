//! HTTP client for the local completion server
//!
//! Speaks the llama.cpp server protocol: POST a prompt to `/completion`,
//! read the generated text from the `content` field of the JSON response.

use crate::error::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    stop: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionResponse {
    content: String,
}

pub struct CompletionClient {
    client: Client,
    base_url: Url,
    retries: usize,
}

impl CompletionClient {
    pub fn new(base_url: &str, timeout_secs: u64, retries: usize) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            retries,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid completion server URL: {}", e)))
    }

    /// Request a completion for `prompt`, retrying transient failures with a
    /// short linear backoff. Generation stops after `n_predict` tokens or at
    /// the first `stop` sequence; the returned text is trimmed.
    pub async fn complete(&self, prompt: &str, n_predict: u32, stop: &[String]) -> Result<String> {
        let url = self.endpoint("/completion")?;
        let request = CompletionRequest {
            prompt,
            n_predict,
            stop,
        };

        let mut last_err: Option<Error> = None;
        for attempt in 0..=self.retries {
            let response = self.client.post(url.clone()).json(&request).send().await;
            match response {
                Ok(response) => match response.error_for_status() {
                    Ok(ok) => {
                        let parsed: CompletionResponse = ok.json().await?;
                        return Ok(parsed.content.trim().to_string());
                    }
                    Err(e) => last_err = Some(Error::Inference(e.to_string())),
                },
                Err(e) => last_err = Some(Error::Inference(e.to_string())),
            }

            if attempt < self.retries {
                tokio::time::sleep(Duration::from_millis(200 * (attempt + 1) as u64)).await;
            }
        }

        Err(last_err
            .unwrap_or_else(|| Error::Inference("Completion request failed".to_string())))
    }
}
