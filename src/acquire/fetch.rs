use std::time::Duration;

use url::Url;

use crate::foundation::error::{ReelError, ReelResult};

/// Blocking transport used by remote background strategies.
pub trait ImageFetcher: Send + Sync {
    /// GET `url` and return the body, failing on transport errors, timeouts and non-success
    /// statuses.
    fn fetch(&self, url: &Url, timeout: Duration) -> ReelResult<Vec<u8>>;
}

/// [`ImageFetcher`] backed by a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Build a client sending `user_agent` with every request.
    pub fn new(user_agent: &str) -> ReelResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ReelError::acquisition(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url, timeout: Duration) -> ReelResult<Vec<u8>> {
        let resp = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .map_err(|e| ReelError::acquisition(format!("GET {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReelError::acquisition(format!(
                "GET {url} returned {status}"
            )));
        }

        let body = resp
            .bytes()
            .map_err(|e| ReelError::acquisition(format!("GET {url} body read failed: {e}")))?;
        Ok(body.to_vec())
    }
}
