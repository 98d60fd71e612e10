use thiserror::Error;

#[derive(Error, Debug)]
pub enum CbioError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データディレクトリが見つかりません: {0}")]
    DataDirNotFound(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("画像変換エラー: {0}")]
    Image(String),

    #[error("出力エラー: {0}")]
    Export(String),

    #[error("報告書がありません: {0}")]
    NoReports(String),

    #[error("サーバーエラー: {0}")]
    Server(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] cbio_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CbioError>;

impl From<dialoguer::Error> for CbioError {
    fn from(err: dialoguer::Error) -> Self {
        CbioError::Prompt(err.to_string())
    }
}

impl From<image::ImageError> for CbioError {
    fn from(err: image::ImageError) -> Self {
        CbioError::Image(err.to_string())
    }
}
