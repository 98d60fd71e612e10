//! 地図ウィジェット用のマーカー
//!
//! 描画自体はJS側の地図ライブラリに任せ、ここではマーカーとポップアップの
//! 内容だけを組み立てる。

use crate::print::html_escape;
use crate::route::report_path;
use crate::types::{Coordinates, Report};
use serde::Serialize;

/// 既定の地図中心（MT州 Vera 付近）
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lon: -55.815776,
    lat: -12.5147015,
};
pub const DEFAULT_ZOOM: u8 = 8;
pub const DETAIL_ZOOM: u8 = 13;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: String,
    pub car: String,
    /// クリック時の遷移先
    pub path: String,
    pub position: Coordinates,
    pub popup_html: String,
    pub eligible: bool,
}

/// JSブリッジに渡す地図設定
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

pub fn popup_html(report: &Report) -> String {
    format!(
        "<strong>CAR: {}</strong><br/>{} - {}<br/>Área: {} ha",
        html_escape(&report.car),
        html_escape(&report.municipality),
        html_escape(&report.state),
        report.declared_area
    )
}

pub fn markers<'a, I>(reports: I) -> Vec<MapMarker>
where
    I: IntoIterator<Item = &'a Report>,
{
    reports
        .into_iter()
        .map(|report| MapMarker {
            id: report.id.clone(),
            car: report.car.clone(),
            path: report_path(&report.id),
            position: report.coordinates,
            popup_html: popup_html(report),
            eligible: report.status.is_eligible(),
        })
        .collect()
}

/// マーカー群の平均位置。空なら既定の中心
pub fn center_of(markers: &[MapMarker]) -> Coordinates {
    if markers.is_empty() {
        return DEFAULT_CENTER;
    }
    let n = markers.len() as f64;
    let (lon, lat) = markers
        .iter()
        .fold((0.0, 0.0), |(lon, lat), m| (lon + m.position.lon, lat + m.position.lat));
    Coordinates::new(lon / n, lat / n)
}

/// 一覧画面の地図
pub fn overview<'a, I>(reports: I) -> MapView
where
    I: IntoIterator<Item = &'a Report>,
{
    let markers = markers(reports);
    MapView {
        center: center_of(&markers),
        zoom: DEFAULT_ZOOM,
        markers,
    }
}

/// 衛星画像カード用の地図（マーカーなし）
pub fn focus(center: Coordinates) -> MapView {
    MapView {
        center,
        zoom: DETAIL_ZOOM,
        markers: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReportStatus;

    fn report(id: &str, lon: f64, lat: f64, status: ReportStatus) -> Report {
        Report {
            id: id.into(),
            car: format!("MT-{}", id),
            municipality: "Cuiabá".into(),
            state: "MT".into(),
            declared_area: 245.32,
            coordinates: Coordinates::new(lon, lat),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_markers_follow_reports() {
        let reports = vec![
            report("1", -55.8, -12.5, ReportStatus::Eligible),
            report("2", -55.6, -12.3, ReportStatus::NotEligible),
        ];
        let markers = markers(&reports);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].id, "2");
        assert_eq!(markers[1].path, "/report/2");
        assert!(markers[0].eligible);
        assert!(!markers[1].eligible);
        assert_eq!(
            markers[0].popup_html,
            "<strong>CAR: MT-1</strong><br/>Cuiabá - MT<br/>Área: 245.32 ha"
        );
    }

    #[test]
    fn test_popup_escapes_markup() {
        let mut r = report("1", 0.0, 0.0, ReportStatus::Pending);
        r.municipality = "<script>".into();
        assert!(popup_html(&r).contains("&lt;script&gt;"));
    }

    #[test]
    fn test_center() {
        assert_eq!(center_of(&[]), DEFAULT_CENTER);
        let reports = vec![
            report("1", -56.0, -12.0, ReportStatus::Eligible),
            report("2", -55.0, -13.0, ReportStatus::Eligible),
        ];
        let view = overview(&reports);
        assert_eq!(view.center, Coordinates::new(-55.5, -12.5));
        assert_eq!(view.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn test_view_serializes_for_bridge() {
        let json = serde_json::to_string(&focus(Coordinates::new(-55.0, -12.0))).unwrap();
        assert_eq!(json, r#"{"center":[-55.0,-12.0],"zoom":13,"markers":[]}"#);
    }
}
