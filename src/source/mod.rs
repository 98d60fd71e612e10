//! 報告書の取得先（HTTP / データディレクトリ）

pub mod dir;
pub mod http;

pub use dir::DirSource;
pub use http::HttpSource;

use crate::config::DataLocation;
use crate::error::Result;
use cbio_common::loader::{listed_folder, REPORTS_ENDPOINT};
use cbio_common::{load_report_data, load_report_listing, AssetSource, LoaderConfig, Report};

/// データ配置（`/data/<CAR>/...`）
pub const DATA_SEGMENT: &str = "data";

pub enum Backend {
    Http { api: HttpSource, data: HttpSource },
    Dir(DirSource),
}

impl Backend {
    pub fn open(location: &DataLocation) -> Result<Self> {
        match location {
            DataLocation::Http(base) => {
                let api = HttpSource::new(base)?;
                let data = api.scoped(DATA_SEGMENT);
                Ok(Backend::Http { api, data })
            }
            DataLocation::Dir(dir) => Ok(Backend::Dir(DirSource::new(dir.clone())?)),
        }
    }

    pub async fn list_reports(&self) -> Result<Vec<Report>> {
        match self {
            Backend::Http { api, .. } => Ok(load_report_listing(api, REPORTS_ENDPOINT).await?),
            Backend::Dir(dir) => dir.scan_reports(),
        }
    }

    /// 1件を読み込む（3枠の画像・フォールバック込み）
    pub async fn load_report(&self, config: &LoaderConfig, id: &str) -> Result<Report> {
        let report = match self {
            Backend::Http { data, .. } => load_report_data(data, config, id).await?,
            Backend::Dir(dir) => load_report_data(dir, config, id).await?,
        };
        Ok(report)
    }

    /// 一覧のidからフォルダ（= CAR）を引いて読み込む
    pub async fn load_listed(&self, config: &LoaderConfig, reports: &[Report], id: &str) -> Result<Report> {
        self.load_report(config, listed_folder(reports, id)).await
    }

    /// 画像URLのバイト列を取得（フォールバック画像を含む）
    pub async fn fetch_image(&self, url: &str) -> cbio_common::Result<Vec<u8>> {
        match self {
            Backend::Http { api, .. } => {
                if url.starts_with("http://") || url.starts_with("https://") {
                    api.get_url(url).await
                } else {
                    api.fetch_bytes(url).await
                }
            }
            Backend::Dir(dir) => {
                // asset_url はルートを含むパスを返す
                let path = std::path::Path::new(url);
                if path.starts_with(dir.root()) {
                    Ok(tokio::fs::read(path).await?)
                } else {
                    dir.fetch_bytes(url).await
                }
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Backend::Http { api, .. } => api.base().to_string(),
            Backend::Dir(dir) => dir.root().display().to_string(),
        }
    }
}
