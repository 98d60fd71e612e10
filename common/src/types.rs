//! 報告書の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Report / SatelliteImage: 画面・印刷に渡す読み取り専用モデル
//! - ReportDescriptor / ImageDescriptor: `data.json` の生データ（欠損あり）
//! - ReportListing: 一覧エンドポイントの3形式（配列 / {reports} / GeoJSON）

use serde::{Deserialize, Serialize};

/// 経度・緯度のペア。JSONでは `[lon, lat]` 配列
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.lon, c.lat]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lon, self.lat)
    }
}

/// 適格性ステータス
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Eligible,
    NotEligible,
    #[default]
    Pending,
    /// 未知のラベルはそのまま保持
    Other(String),
}

impl ReportStatus {
    pub fn label(&self) -> &str {
        match self {
            ReportStatus::Eligible => "ELEGÍVEL",
            ReportStatus::NotEligible => "NÃO ELEGÍVEL",
            ReportStatus::Pending => "PENDENTE",
            ReportStatus::Other(label) => label,
        }
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self, ReportStatus::Eligible)
    }

    /// CSSクラス名（一覧・印刷で共通）
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportStatus::Eligible => "status-eligible",
            ReportStatus::NotEligible => "status-not-eligible",
            ReportStatus::Pending | ReportStatus::Other(_) => "status-pending",
        }
    }
}

impl From<String> for ReportStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "ELEGÍVEL" | "ELEGIVEL" => ReportStatus::Eligible,
            "NÃO ELEGÍVEL" | "NAO ELEGIVEL" => ReportStatus::NotEligible,
            "PENDENTE" | "EM ANÁLISE" | "EM ANALISE" | "" => ReportStatus::Pending,
            _ => ReportStatus::Other(raw),
        }
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 衛星画像の出どころ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// GeoTIFFラスタを取得できた
    #[default]
    Raster,
    /// 固定のプレースホルダー画像で代替
    Fallback,
}

/// 衛星画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatelliteImage {
    pub id: String,
    pub sensor: String,
    pub image_id: String,
    pub date: String,
    pub central_coordinate: Coordinates,
    pub url: String,
    #[serde(default)]
    pub source: ImageSource,
}

impl SatelliteImage {
    pub fn is_fallback(&self) -> bool {
        self.source == ImageSource::Fallback
    }
}

/// CBIO報告書
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub id: String,
    /// CAR登録コード（業務キー）
    pub car: String,
    pub municipality: String,
    pub state: String,
    pub car_status: String,
    pub registration_date: String,
    pub declared_area: f64,
    pub status: ReportStatus,
    pub consolidated_area: f64,
    pub biomass: String,
    pub analysis_year: i32,
    pub productivity: f64,
    pub harvest_reference: String,
    pub productive_potential: f64,
    pub coordinates: Coordinates,
    pub images: Vec<SatelliteImage>,
}

/// `data.json` の画像メタデータ（全項目任意）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageDescriptor {
    pub id: Option<String>,
    pub sensor: Option<String>,
    pub image_id: Option<String>,
    pub date: Option<String>,
    pub central_coordinate: Option<Coordinates>,
}

/// `data.json` の報告書記述子
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportDescriptor {
    pub id: String,
    pub car: String,
    pub municipality: String,
    pub state: String,
    pub car_status: String,
    pub registration_date: String,
    pub declared_area: f64,
    pub status: ReportStatus,
    pub consolidated_area: f64,
    pub biomass: String,
    pub analysis_year: i32,
    pub productivity: f64,
    pub harvest_reference: String,
    pub productive_potential: f64,
    pub coordinates: Coordinates,
    pub images: Vec<ImageDescriptor>,
}

impl ReportDescriptor {
    /// 組み立て済みの画像を添えてReportに変換する。idは常にCARで上書き
    pub fn into_report(self, images: Vec<SatelliteImage>) -> Report {
        Report {
            id: self.car.clone(),
            car: self.car,
            municipality: self.municipality,
            state: self.state,
            car_status: self.car_status,
            registration_date: self.registration_date,
            declared_area: self.declared_area,
            status: self.status,
            consolidated_area: self.consolidated_area,
            biomass: self.biomass,
            analysis_year: self.analysis_year,
            productivity: self.productivity,
            harvest_reference: self.harvest_reference,
            productive_potential: self.productive_potential,
            coordinates: self.coordinates,
            images,
        }
    }
}

/// GeoJSON Point geometry
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureGeometry {
    pub coordinates: Coordinates,
}

/// GeoJSON Feature（propertiesにReport）
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    pub properties: Report,
    #[serde(default)]
    pub geometry: Option<FeatureGeometry>,
}

/// 一覧エンドポイントのレスポンス
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReportListing {
    Bare(Vec<Report>),
    Wrapped { reports: Vec<Report> },
    FeatureCollection { features: Vec<Feature> },
}

impl ReportListing {
    pub fn into_reports(self) -> Vec<Report> {
        match self {
            ReportListing::Bare(reports) | ReportListing::Wrapped { reports } => reports,
            ReportListing::FeatureCollection { features } => features
                .into_iter()
                .map(|feature| {
                    let mut report = feature.properties;
                    if let Some(geometry) = feature.geometry {
                        report.coordinates = geometry.coordinates;
                    }
                    report
                })
                .collect(),
        }
    }
}
