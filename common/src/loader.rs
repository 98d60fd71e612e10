//! 報告書データ読み込み
//!
//! `load_report_data` は報告書フォルダ（= CAR）から Report を組み立てる。
//!
//! - `data.json` が取れなければ全体を失敗させる（部分的な Report は返さない）
//! - 画像スロット（既定3枠）ごとに `imagemN.tif` を取得し、TIFFとして検証する
//! - スロット単位の失敗はその場で吸収し、同じ位置のフォールバック画像に差し替える
//!
//! 取得手段は `AssetSource` で抽象化し、ブラウザ（fetch）、CLI（HTTP / ディレクトリ）、
//! テスト（メモリ上のマップ）で同じローダーを使う。

use crate::error::{Error, Result};
use crate::raster::{parse_raster, RasterInfo};
use crate::types::{
    Coordinates, ImageDescriptor, ImageSource, Report, ReportDescriptor, ReportListing,
    SatelliteImage,
};
use futures::future::join_all;

/// 一覧API
pub const REPORTS_ENDPOINT: &str = "api/reports";
/// 静的一覧ファイル
pub const STATIC_LISTING: &str = "data/reports.json";

/// 既定のフォールバック画像（スロット番号で対応）
pub const DEFAULT_FALLBACK_IMAGES: [&str; 3] = [
    "/placeholder/satellite-1.png",
    "/placeholder/satellite-2.png",
    "/placeholder/satellite-3.png",
];

pub const DEFAULT_SENSOR: &str = "Sentinel-2";
const MISSING_VALUE: &str = "-";

/// 報告書アセットの取得手段
///
/// パスは `<folder>/<file>` 形式の相対パス。ベースURLやデータディレクトリの
/// 解決は実装側が行う。
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>>;

    async fn fetch_text(&self, path: &str) -> Result<String> {
        let bytes = self.fetch_bytes(path).await?;
        String::from_utf8(bytes).map_err(|e| Error::Fetch(format!("{}: {}", path, e)))
    }

    /// 画面に渡すURL（既定では相対パスをそのまま返す）
    fn asset_url(&self, path: &str) -> String {
        path.to_string()
    }
}

/// ローダー設定
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// 画像スロット数（data.json の内容には依存しない）
    pub image_slots: usize,
    /// スロット番号 → フォールバック画像URL
    pub fallback_images: Vec<String>,
    pub descriptor_name: String,
    /// `{n}` に 1 始まりのスロット番号が入る
    pub raster_pattern: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            image_slots: 3,
            fallback_images: DEFAULT_FALLBACK_IMAGES.iter().map(|s| s.to_string()).collect(),
            descriptor_name: "data.json".to_string(),
            raster_pattern: "imagem{n}.tif".to_string(),
        }
    }
}

impl LoaderConfig {
    pub fn descriptor_path(&self, folder: &str) -> String {
        format!("{}/{}", folder, self.descriptor_name)
    }

    pub fn raster_path(&self, folder: &str, index: usize) -> String {
        let file = self.raster_pattern.replace("{n}", &(index + 1).to_string());
        format!("{}/{}", folder, file)
    }

    pub fn fallback_for(&self, index: usize) -> Option<&str> {
        self.fallback_images.get(index).map(String::as_str)
    }
}

/// 報告書フォルダ名を正規化（前後の空白とスラッシュを除去）
pub fn normalize_folder(folder: &str) -> Result<&str> {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() || trimmed.contains("..") {
        return Err(Error::InvalidIdentifier(folder.to_string()));
    }
    Ok(trimmed)
}

/// 報告書を1件読み込む
pub async fn load_report_data<S>(source: &S, config: &LoaderConfig, folder: &str) -> Result<Report>
where
    S: AssetSource,
{
    let folder = normalize_folder(folder)?;
    let descriptor = fetch_descriptor(source, &config.descriptor_path(folder))
        .await
        .map_err(|e| Error::DataUnavailable {
            id: folder.to_string(),
            reason: e.to_string(),
        })?;

    if descriptor.car.trim().is_empty() {
        return Err(Error::DataUnavailable {
            id: folder.to_string(),
            reason: "descriptor has no CAR code".to_string(),
        });
    }

    let slots = (0..config.image_slots).map(|index| load_slot(source, config, folder, &descriptor, index));
    let images: Vec<SatelliteImage> = join_all(slots).await.into_iter().flatten().collect();

    log::debug!(
        "loaded report {} ({} images, {} fallback)",
        descriptor.car,
        images.len(),
        images.iter().filter(|i| i.is_fallback()).count()
    );

    Ok(descriptor.into_report(images))
}

async fn fetch_descriptor<S>(source: &S, path: &str) -> Result<ReportDescriptor>
where
    S: AssetSource,
{
    let text = source.fetch_text(path).await?;
    Ok(serde_json::from_str(&text)?)
}

async fn fetch_raster<S>(source: &S, path: &str) -> Result<RasterInfo>
where
    S: AssetSource,
{
    let bytes = source.fetch_bytes(path).await?;
    parse_raster(&bytes)
}

/// 1スロット分の画像を組み立てる。フォールバックURLも無い場合のみ None
async fn load_slot<S>(
    source: &S,
    config: &LoaderConfig,
    folder: &str,
    descriptor: &ReportDescriptor,
    index: usize,
) -> Option<SatelliteImage>
where
    S: AssetSource,
{
    let path = config.raster_path(folder, index);
    let meta = descriptor.images.get(index);

    match fetch_raster(source, &path).await {
        Ok(info) => Some(build_image(
            meta,
            index,
            info.center().unwrap_or(descriptor.coordinates),
            source.asset_url(&path),
            ImageSource::Raster,
        )),
        Err(err) => match config.fallback_for(index) {
            Some(url) => {
                log::warn!("raster {} unavailable, using fallback {}: {}", path, url, err);
                Some(build_image(
                    meta,
                    index,
                    descriptor.coordinates,
                    url.to_string(),
                    ImageSource::Fallback,
                ))
            }
            None => {
                log::warn!("raster {} unavailable and slot {} has no fallback: {}", path, index + 1, err);
                None
            }
        },
    }
}

fn build_image(
    meta: Option<&ImageDescriptor>,
    index: usize,
    default_center: Coordinates,
    url: String,
    source: ImageSource,
) -> SatelliteImage {
    let text = |value: Option<&String>, default: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    SatelliteImage {
        id: text(meta.and_then(|m| m.id.as_ref()), &(index + 1).to_string()),
        sensor: text(meta.and_then(|m| m.sensor.as_ref()), DEFAULT_SENSOR),
        image_id: text(meta.and_then(|m| m.image_id.as_ref()), MISSING_VALUE),
        date: text(meta.and_then(|m| m.date.as_ref()), MISSING_VALUE),
        central_coordinate: meta
            .and_then(|m| m.central_coordinate)
            .unwrap_or(default_center),
        url,
        source,
    }
}

/// 報告書一覧を読み込む（配列 / {reports} / GeoJSON のいずれにも対応）
pub async fn load_report_listing<S>(source: &S, path: &str) -> Result<Vec<Report>>
where
    S: AssetSource,
{
    let text = source
        .fetch_text(path)
        .await
        .map_err(|e| Error::CollectionUnavailable(e.to_string()))?;
    let listing: ReportListing =
        serde_json::from_str(&text).map_err(|e| Error::CollectionUnavailable(e.to_string()))?;
    Ok(listing.into_reports())
}

/// 一覧からidで検索
pub fn find_report<'a>(reports: &'a [Report], id: &str) -> Option<&'a Report> {
    reports.iter().find(|r| r.id == id)
}

/// 一覧のid（CARと一致するとは限らない）を報告書フォルダ名（= CAR）に引く
///
/// 一覧に無いidはそのままフォルダ名として扱う。
pub fn listed_folder<'a>(reports: &'a [Report], id: &'a str) -> &'a str {
    find_report(reports, id)
        .map(|r| r.car.as_str())
        .filter(|car| !car.trim().is_empty())
        .unwrap_or(id)
}

/// 一覧でidをフォルダに解決してから `load_report_data` で読み込む
///
/// 一覧が取れない場合は id をフォルダ名として読み込みを試みる。
pub async fn load_listed_report<L, D>(
    listing: &L,
    listing_path: &str,
    data: &D,
    config: &LoaderConfig,
    id: &str,
) -> Result<Report>
where
    L: AssetSource,
    D: AssetSource,
{
    let reports = match load_report_listing(listing, listing_path).await {
        Ok(reports) => reports,
        Err(e) => {
            log::warn!("listing unavailable, loading {} as a folder: {}", id, e);
            Vec::new()
        }
    };
    let folder = listed_folder(&reports, id);
    log::debug!("report {} resolved to folder {}", id, folder);
    load_report_data(data, config, folder).await
}


#[cfg(test)]
mod tests {
    use super::memory::MemorySource;
    use super::*;
    use crate::raster::fixtures::geotiff;
    use futures::executor::block_on;

    const CAR: &str = "MT-5108501-70D4821B80A84D2FB942A46B2DC16B41";

    fn descriptor_json() -> String {
        format!(
            r#"{{
                "id": "pasta-1",
                "car": "{CAR}",
                "municipality": "Vera",
                "state": "MT",
                "status": "ELEGÍVEL",
                "coordinates": [-55.815776, -12.5147015],
                "images": [
                    {{"id": "a", "sensor": "S2A", "imageId": "S2A_1", "date": "04/09/2017", "centralCoordinate": [-55.8, -12.5]}},
                    {{"sensor": "S2B", "imageId": "S2B_2", "date": "10/10/2017"}},
                    {{"id": "c", "sensor": "L8", "imageId": "LC08_3", "date": "01/11/2017"}}
                ]
            }}"#
        )
    }

    fn full_source() -> MemorySource {
        MemorySource::default()
            .with("pasta-1/data.json", descriptor_json())
            .with("pasta-1/imagem1.tif", geotiff(10, 10, None))
            .with("pasta-1/imagem2.tif", geotiff(10, 10, None))
            .with("pasta-1/imagem3.tif", geotiff(10, 10, None))
    }

    #[test]
    fn test_id_is_car_not_folder() {
        let report = block_on(load_report_data(&full_source(), &LoaderConfig::default(), "pasta-1"))
            .expect("load failed");
        assert_eq!(report.id, CAR);
        assert_eq!(report.car, CAR);
        assert_ne!(report.id, "pasta-1");
    }

    #[test]
    fn test_all_rasters_available() {
        let report =
            block_on(load_report_data(&full_source(), &LoaderConfig::default(), "pasta-1")).unwrap();
        assert_eq!(report.images.len(), 3);
        for (i, image) in report.images.iter().enumerate() {
            assert_eq!(image.url, format!("/data/pasta-1/imagem{}.tif", i + 1));
            assert_eq!(image.source, ImageSource::Raster);
        }
        assert_eq!(report.images[0].sensor, "S2A");
        assert_eq!(report.images[0].central_coordinate, Coordinates::new(-55.8, -12.5));
    }

    #[test]
    fn test_failed_slot_uses_fallback_at_same_index() {
        let mut source = full_source();
        source.files.remove("pasta-1/imagem2.tif");
        let config = LoaderConfig::default();

        let report = block_on(load_report_data(&source, &config, "pasta-1")).unwrap();
        assert_eq!(report.images.len(), 3);

        let second = &report.images[1];
        assert_eq!(second.url, DEFAULT_FALLBACK_IMAGES[1]);
        assert_eq!(second.source, ImageSource::Fallback);
        assert_eq!(second.sensor, "S2B");
        assert_eq!(second.image_id, "S2B_2");
        assert_eq!(second.date, "10/10/2017");

        assert_eq!(report.images[0].source, ImageSource::Raster);
        assert_eq!(report.images[2].source, ImageSource::Raster);
    }

    #[test]
    fn test_corrupt_raster_is_absorbed() {
        let source = full_source().with("pasta-1/imagem3.tif", b"not a tiff".to_vec());
        let report = block_on(load_report_data(&source, &LoaderConfig::default(), "pasta-1")).unwrap();
        assert_eq!(report.images[2].url, DEFAULT_FALLBACK_IMAGES[2]);
        assert_eq!(report.images[2].sensor, "L8");
    }

    #[test]
    fn test_missing_descriptor_fails_whole_report() {
        let mut source = full_source();
        source.files.remove("pasta-1/data.json");
        let err = block_on(load_report_data(&source, &LoaderConfig::default(), "pasta-1")).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { ref id, .. } if id == "pasta-1"));
    }

    #[test]
    fn test_invalid_descriptor_json_fails() {
        let source = full_source().with("pasta-1/data.json", "{ not json");
        let err = block_on(load_report_data(&source, &LoaderConfig::default(), "pasta-1")).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn test_descriptor_without_car_fails() {
        let source = full_source().with("pasta-1/data.json", r#"{"municipality": "Vera"}"#);
        let err = block_on(load_report_data(&source, &LoaderConfig::default(), "pasta-1")).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let err = block_on(load_report_data(&full_source(), &LoaderConfig::default(), "  ")).unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
        assert!(normalize_folder("../etc").is_err());
        assert_eq!(normalize_folder("/MT-1/").unwrap(), "MT-1");
    }

    #[test]
    fn test_missing_metadata_gets_defaults() {
        let source = MemorySource::default()
            .with("p/data.json", format!(r#"{{"car": "{CAR}", "coordinates": [-55.0, -12.0]}}"#))
            .with(
                "p/imagem1.tif",
                geotiff(100, 100, Some(([0.01, 0.01, 0.0], [0.0, 0.0, 0.0, -56.0, -11.0, 0.0]))),
            );
        let report = block_on(load_report_data(&source, &LoaderConfig::default(), "p")).unwrap();
        assert_eq!(report.images.len(), 3);

        let first = &report.images[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.sensor, DEFAULT_SENSOR);
        assert_eq!(first.date, "-");
        // ジオリファレンスから中心を算出
        assert!((first.central_coordinate.lon - (-55.5)).abs() < 1e-9);
        assert!((first.central_coordinate.lat - (-11.5)).abs() < 1e-9);

        let second = &report.images[1];
        assert_eq!(second.id, "2");
        assert_eq!(second.central_coordinate, Coordinates::new(-55.0, -12.0));
        assert!(second.is_fallback());
    }

    #[test]
    fn test_slot_without_fallback_is_dropped() {
        let config = LoaderConfig {
            image_slots: 4,
            ..LoaderConfig::default()
        };
        let report = block_on(load_report_data(&full_source(), &config, "pasta-1")).unwrap();
        // 4枠目はラスタもフォールバックも無い
        assert_eq!(report.images.len(), 3);
    }

    #[test]
    fn test_slot_count_is_not_descriptor_driven() {
        let config = LoaderConfig {
            image_slots: 2,
            ..LoaderConfig::default()
        };
        let report = block_on(load_report_data(&full_source(), &config, "pasta-1")).unwrap();
        assert_eq!(report.images.len(), 2);
    }

    #[test]
    fn test_load_listing_variants() {
        let source = MemorySource::default()
            .with("api/reports", r#"[{"id": "1", "car": "MT-1"}, {"id": "2", "car": "MT-2"}]"#)
            .with("data/reports.json", r#"{"reports": [{"id": "1", "car": "MT-1"}]}"#);

        let api = block_on(load_report_listing(&source, REPORTS_ENDPOINT)).unwrap();
        assert_eq!(api.len(), 2);
        assert_eq!(find_report(&api, "2").map(|r| r.car.as_str()), Some("MT-2"));
        assert!(find_report(&api, "9").is_none());

        let fixed = block_on(load_report_listing(&source, STATIC_LISTING)).unwrap();
        assert_eq!(fixed.len(), 1);

        let err = block_on(load_report_listing(&source, "missing.json")).unwrap_err();
        assert!(matches!(err, Error::CollectionUnavailable(_)));
    }

    #[test]
    fn test_listed_folder() {
        let listing = vec![
            Report { id: "1".into(), car: "MT-1".into(), ..Default::default() },
            Report { id: "2".into(), car: String::new(), ..Default::default() },
        ];
        assert_eq!(listed_folder(&listing, "1"), "MT-1");
        assert_eq!(listed_folder(&listing, "2"), "2");
        assert_eq!(listed_folder(&listing, "MT-9"), "MT-9");
    }

    #[test]
    fn test_listing_id_differs_from_car() {
        let source = full_source().with(REPORTS_ENDPOINT, r#"[{"id": "1", "car": "pasta-1"}]"#);
        let config = LoaderConfig::default();

        // フォルダ "1" は存在しない
        let direct = block_on(load_report_data(&source, &config, "1")).unwrap_err();
        assert!(matches!(direct, Error::DataUnavailable { .. }));

        let report = block_on(load_listed_report(&source, REPORTS_ENDPOINT, &source, &config, "1")).unwrap();
        assert_eq!(report.car, CAR);
        assert_eq!(report.id, CAR);
        assert_eq!(report.images.len(), 3);
        assert_eq!(report.images[0].url, "/data/pasta-1/imagem1.tif");
    }

    #[test]
    fn test_listed_report_without_listing_uses_id_as_folder() {
        let config = LoaderConfig::default();
        let report =
            block_on(load_listed_report(&full_source(), REPORTS_ENDPOINT, &full_source(), &config, "pasta-1")).unwrap();
        assert_eq!(report.car, CAR);
    }

    #[test]
    fn test_config_paths() {
        let config = LoaderConfig::default();
        assert_eq!(config.descriptor_path("MT-1"), "MT-1/data.json");
        assert_eq!(config.raster_path("MT-1", 0), "MT-1/imagem1.tif");
        assert_eq!(config.raster_path("MT-1", 2), "MT-1/imagem3.tif");
        assert_eq!(config.fallback_for(2), Some(DEFAULT_FALLBACK_IMAGES[2]));
        assert_eq!(config.fallback_for(3), None);
    }
}
