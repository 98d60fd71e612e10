use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cbio")]
#[command(about = "CBIO報告書の一覧・詳細表示・印刷HTML生成・モックAPI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（例: http://localhost:8080）
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// 報告書フォルダを並べたディレクトリ（指定時はHTTPを使わない）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 報告書一覧を表示
    List {
        /// CARで絞り込み（部分一致・大文字小文字を区別しない）
        #[arg(short, long)]
        search: Option<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 報告書1件を読み込んで表示（画像はフォールバック込み）
    Show {
        /// 報告書ID（= CAR）。省略時は一覧から選択
        id: Option<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 印刷用HTMLを生成
    Print {
        /// 報告書ID（複数可）
        #[arg(required = true)]
        ids: Vec<String>,

        /// 出力ファイル（デフォルト: relatorio-<ID>.html / relatorios.html）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 文書タイトル
        #[arg(short, long)]
        title: Option<String>,

        /// GeoTIFFをPNGに変換してHTMLに埋め込む
        #[arg(long)]
        embed_images: bool,

        /// 埋め込み画像の品質 (high/medium/low)
        #[arg(long, default_value = "medium")]
        quality: ImageQuality,

        /// 印刷スクリプトを埋め込む（ブラウザで開くと印刷ダイアログを表示）
        #[arg(long)]
        auto_print: bool,
    },

    /// モックAPIサーバーを起動
    Serve {
        /// ポート番号
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// APIのベースURLを保存
        #[arg(long)]
        set_base_url: Option<String>,

        /// データディレクトリを保存
        #[arg(long)]
        set_data_dir: Option<PathBuf>,
    },
}

/// 埋め込み画像の品質設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageQuality {
    /// 高品質: 1400px
    High,
    /// 中品質: 800px（デフォルト）
    #[default]
    Medium,
    /// 低品質: 500px
    Low,
}

impl ImageQuality {
    /// 最大ピクセル幅
    pub fn max_width(&self) -> u32 {
        match self {
            ImageQuality::High => 1400,
            ImageQuality::Medium => 800,
            ImageQuality::Low => 500,
        }
    }
}

impl std::str::FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(ImageQuality::High),
            "medium" | "med" | "m" => Ok(ImageQuality::Medium),
            "low" | "l" => Ok(ImageQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageQuality::High => write!(f, "high"),
            ImageQuality::Medium => write!(f, "medium"),
            ImageQuality::Low => write!(f, "low"),
        }
    }
}
