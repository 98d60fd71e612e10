//! データディレクトリからの取得
//!
//! レイアウト:
//!
//! ```text
//! <root>/reports.json          （任意。無ければ */data.json を走査）
//! <root>/<CAR>/data.json
//! <root>/<CAR>/imagem{1,2,3}.tif
//! <root>/placeholder/satellite-{1,2,3}.png （任意）
//! ```

use crate::error::{CbioError, Result};
use cbio_common::types::{ReportDescriptor, ReportListing};
use cbio_common::{AssetSource, Error, Report};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const LISTING_FILE: &str = "reports.json";

#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    url_prefix: Option<String>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CbioError::DataDirNotFound(root.display().to_string()));
        }
        Ok(Self { root, url_prefix: None })
    }

    /// 画面に返すURLを `<prefix>/<path>` にする（モックAPI用）
    pub fn with_url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = Some(prefix.trim_end_matches('/').to_string());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 相対パスをルート配下の実パスに変換。`..` などは拒否
    pub fn resolve(&self, path: &str) -> cbio_common::Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(Error::InvalidIdentifier(path.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// 一覧を読み込む。reports.json が無ければ各フォルダの data.json から組み立てる
    pub fn scan_reports(&self) -> Result<Vec<Report>> {
        let listing = self.root.join(LISTING_FILE);
        if listing.is_file() {
            let content = std::fs::read_to_string(&listing)?;
            let parsed: ReportListing = serde_json::from_str(&content)
                .map_err(|e| Error::CollectionUnavailable(format!("{}: {}", listing.display(), e)))?;
            return Ok(parsed.into_reports());
        }

        let mut reports = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || entry.file_name() != "data.json" {
                continue;
            }

            let descriptor = std::fs::read_to_string(path)
                .map_err(CbioError::from)
                .and_then(|content| Ok(serde_json::from_str::<ReportDescriptor>(&content)?));
            match descriptor {
                Ok(descriptor) if !descriptor.car.trim().is_empty() => {
                    reports.push(descriptor.into_report(Vec::new()));
                }
                Ok(_) => log::warn!("{}: CARがありません（スキップ）", path.display()),
                Err(e) => log::warn!("{}: 読み込み失敗（スキップ）: {}", path.display(), e),
            }
        }

        // CARでソート
        reports.sort_by(|a, b| a.car.cmp(&b.car));
        Ok(reports)
    }
}

impl AssetSource for DirSource {
    async fn fetch_bytes(&self, path: &str) -> cbio_common::Result<Vec<u8>> {
        let file = self.resolve(path)?;
        log::debug!("read {}", file.display());
        tokio::fs::read(&file).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(file.display().to_string()),
            _ => Error::Io(e),
        })
    }

    fn asset_url(&self, path: &str) -> String {
        match &self.url_prefix {
            Some(prefix) => format!("{}/{}", prefix, path.trim_start_matches('/')),
            None => self.root.join(path).display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_root() {
        assert!(matches!(
            DirSource::new("/nonexistent/cbio-data"),
            Err(CbioError::DataDirNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let dir = tempdir().unwrap();
        let source = DirSource::new(dir.path()).unwrap();
        assert!(source.resolve("../etc/passwd").is_err());
        assert!(source.resolve("MT-1/../../x").is_err());
        assert!(source.resolve("").is_err());
        assert_eq!(source.resolve("/MT-1/data.json").unwrap(), dir.path().join("MT-1/data.json"));
    }

    #[test]
    fn test_scan_descriptors_when_no_listing() {
        let dir = tempdir().unwrap();
        for car in ["MT-2", "MT-1"] {
            fs::create_dir_all(dir.path().join(car)).unwrap();
            fs::write(
                dir.path().join(car).join("data.json"),
                format!(r#"{{"id":"x","car":"{}","municipality":"Vera","state":"MT"}}"#, car),
            )
            .unwrap();
        }
        fs::create_dir_all(dir.path().join("broken")).unwrap();
        fs::write(dir.path().join("broken/data.json"), "{not json").unwrap();

        let reports = DirSource::new(dir.path()).unwrap().scan_reports().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].car, "MT-1");
        // idはCARで上書き
        assert_eq!(reports[0].id, "MT-1");
    }

    #[test]
    fn test_listing_file_wins() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(LISTING_FILE),
            r#"{"reports":[{"id":"1","car":"MT-9"}]}"#,
        )
        .unwrap();
        let reports = DirSource::new(dir.path()).unwrap().scan_reports().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].car, "MT-9");
    }

    #[test]
    fn test_asset_url_prefix() {
        let dir = tempdir().unwrap();
        let source = DirSource::new(dir.path()).unwrap().with_url_prefix("/data/");
        assert_eq!(source.asset_url("MT-1/imagem1.tif"), "/data/MT-1/imagem1.tif");
    }
}
