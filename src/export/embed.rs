//! 画像の埋め込み（GeoTIFF → PNG data URL）

use crate::cli::ImageQuality;
use crate::error::Result;
use crate::source::Backend;
use base64::Engine;
use cbio_common::Report;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// 画像バイト列をPNGのdata URLに変換（幅は品質設定の上限まで縮小）
pub fn png_data_url(bytes: &[u8], quality: ImageQuality) -> Result<String> {
    let decoded = image::load_from_memory(bytes)?;
    // 16bit / float のGeoTIFFもPNGに書けるよう8bit RGBAへ
    let mut rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());

    let max_width = quality.max_width();
    if rgba.width() > max_width {
        let height = (rgba.height() as u64 * max_width as u64 / rgba.width() as u64).max(1) as u32;
        rgba = rgba.resize_exact(max_width, height, FilterType::Triangle);
    }

    let mut buf = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buf)
    ))
}

/// 報告書の画像URLをdata URLに置き換える。失敗した画像は元のURLのまま
pub async fn embed_report_images(backend: &Backend, mut report: Report, quality: ImageQuality) -> Report {
    for image in report.images.iter_mut() {
        let converted = match backend.fetch_image(&image.url).await {
            Ok(bytes) => png_data_url(&bytes, quality),
            Err(e) => Err(e.into()),
        };
        match converted {
            Ok(data_url) => image.url = data_url,
            Err(e) => log::warn!("{}: 画像を埋め込めません: {}", image.url, e),
        }
    }
    report
}
