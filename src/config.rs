use crate::error::{CbioError, Result};
use cbio_common::print::DEFAULT_PRINT_TIMEOUT_MS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_BASE_URL: &str = "CBIO_BASE_URL";
pub const ENV_DATA_DIR: &str = "CBIO_DATA_DIR";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// モックAPI / 本番APIのベースURL
    pub base_url: Option<String>,
    /// 報告書フォルダ（<CAR>/data.json, imagemN.tif）を並べたディレクトリ
    pub data_dir: Option<PathBuf>,
    pub print_timeout_ms: u32,
    pub print_title: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            data_dir: None,
            print_timeout_ms: DEFAULT_PRINT_TIMEOUT_MS,
            print_title: None,
        }
    }
}

/// 報告書の取得先
#[derive(Debug, Clone, PartialEq)]
pub enum DataLocation {
    Http(String),
    Dir(PathBuf),
}

impl std::fmt::Display for DataLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataLocation::Http(url) => write!(f, "{}", url),
            DataLocation::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CbioError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("cbio-reports").join("config.json"))
    }

    /// 取得先を決める。優先順位: コマンドライン > 環境変数 > 設定ファイル > 既定URL
    ///
    /// 同じ優先度ではデータディレクトリをURLより優先する。
    pub fn resolve_location<E>(
        &self,
        flag_base_url: Option<&str>,
        flag_data_dir: Option<&Path>,
        env: E,
    ) -> DataLocation
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = flag_data_dir {
            return DataLocation::Dir(dir.to_path_buf());
        }
        if let Some(url) = flag_base_url {
            return DataLocation::Http(url.to_string());
        }
        if let Some(dir) = env(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            return DataLocation::Dir(PathBuf::from(dir));
        }
        if let Some(url) = env(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            return DataLocation::Http(url);
        }
        if let Some(dir) = &self.data_dir {
            return DataLocation::Dir(dir.clone());
        }
        if let Some(url) = &self.base_url {
            return DataLocation::Http(url.clone());
        }
        DataLocation::Http(DEFAULT_BASE_URL.to_string())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CbioError::Config(format!("URLは http:// または https:// で始めてください: {}", url)));
        }
        self.base_url = Some(url.trim_end_matches('/').to_string());
        Ok(())
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        if !dir.is_dir() {
            return Err(CbioError::DataDirNotFound(dir.display().to_string()));
        }
        self.data_dir = Some(dir);
        Ok(())
    }
}

/// プロセスの環境変数を読む
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
