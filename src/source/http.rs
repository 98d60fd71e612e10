//! HTTP経由の取得（モックAPI / 本番API）

use crate::error::Result;
use cbio_common::{AssetSource, Error};
use std::time::Duration;

const TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// ベースURL配下のサブパスを指すソース（クライアントは共有）
    pub fn scoped(&self, segment: &str) -> Self {
        Self {
            client: self.client.clone(),
            base: format!("{}/{}", self.base, segment.trim_matches('/')),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// 絶対URLを取得
    pub async fn get_url(&self, url: &str) -> cbio_common::Result<Vec<u8>> {
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(Error::Fetch(format!("{}: HTTP {}", url, status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }
}

impl AssetSource for HttpSource {
    async fn fetch_bytes(&self, path: &str) -> cbio_common::Result<Vec<u8>> {
        self.get_url(&self.url(path)).await
    }

    fn asset_url(&self, path: &str) -> String {
        self.url(path)
    }
}
