//! 報告書データの取得（fetch API）
//!
//! 共通ローダーの `AssetSource` をブラウザのfetchで実装する。

use cbio_common::loader::{load_listed_report, load_report_listing, REPORTS_ENDPOINT};
use cbio_common::{load_report_data, AssetSource, Error, LoaderConfig, Report, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// 静的アセットの配置先
pub const DATA_BASE: &str = "/data";

/// ベースURL配下のアセットをfetchで取得する
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
}

impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// `/api/...` 用（オリジン直下）
    pub fn api() -> Self {
        Self::new("")
    }

    /// `/data/<car>/...` 用
    pub fn data() -> Self {
        Self::new(DATA_BASE)
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn js_error(url: &str, value: JsValue) -> Error {
    Error::Fetch(format!("{}: {:?}", url, value))
}

async fn get(url: &str) -> Result<Response> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| js_error(url, e))?;
    let window = gloo::utils::window();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| js_error(url, e))?;
    let resp: Response = resp_value.dyn_into().map_err(|e| js_error(url, e))?;

    match resp.status() {
        200..=299 => Ok(resp),
        404 => Err(Error::NotFound(url.to_string())),
        status => Err(Error::Fetch(format!("{}: HTTP {}", url, status))),
    }
}

impl AssetSource for HttpSource {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url(path);
        let resp = get(&url).await?;
        let promise = resp.array_buffer().map_err(|e| js_error(&url, e))?;
        let buffer = JsFuture::from(promise).await.map_err(|e| js_error(&url, e))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url(path);
        let resp = get(&url).await?;
        let promise = resp.text().map_err(|e| js_error(&url, e))?;
        let text = JsFuture::from(promise).await.map_err(|e| js_error(&url, e))?;
        text.as_string()
            .ok_or_else(|| Error::Fetch(format!("{}: body is not text", url)))
    }

    fn asset_url(&self, path: &str) -> String {
        self.url(path)
    }
}

/// 一覧を取得（GET /api/reports）
pub async fn fetch_reports() -> Result<Vec<Report>> {
    load_report_listing(&HttpSource::api(), REPORTS_ENDPOINT).await
}

/// 一覧のidから1件を組み立てる
///
/// 一覧で id → CAR を引いてから `/data/<CAR>/data.json` + `imagem{1,2,3}.tif` を読む。
pub async fn fetch_report(config: &LoaderConfig, id: &str) -> Result<Report> {
    load_listed_report(&HttpSource::api(), REPORTS_ENDPOINT, &HttpSource::data(), config, id).await
}

/// 一覧の項目が手元にある場合はそのCARフォルダを直接読む
pub async fn fetch_listed(config: &LoaderConfig, listed: &Report) -> Result<Report> {
    let folder = if listed.car.trim().is_empty() { &listed.id } else { &listed.car };
    load_report_data(&HttpSource::data(), config, folder).await
}
