//! GeoTIFFヘッダ解析
//!
//! 衛星画像ラスタが「取得できて、かつTIFFとして読める」ことを確認する。
//! ピクセルは読まない。IFD0のタグは kamadak-exif で読み、以下だけを使う:
//!
//! - 256 ImageWidth / 257 ImageLength
//! - 33550 ModelPixelScaleTag
//! - 33922 ModelTiepointTag
//!
//! ジオリファレンスがあればラスタ中心の座標を計算でき、
//! `data.json` に中心座標が無い画像の既定値として使う。

use crate::error::{Error, Result};
use crate::types::Coordinates;
use exif::{Context, Exif, In, Tag, Value};
use std::io::Cursor;

const TAG_MODEL_PIXEL_SCALE: Tag = Tag(Context::Tiff, 33550);
const TAG_MODEL_TIEPOINT: Tag = Tag(Context::Tiff, 33922);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// ラスタ座標 (i, j) と地理座標 (x, y) の対応
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoReference {
    pub pixel_scale_x: f64,
    pub pixel_scale_y: f64,
    pub tie_i: f64,
    pub tie_j: f64,
    pub tie_x: f64,
    pub tie_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterInfo {
    pub byte_order: ByteOrder,
    pub width: u32,
    pub height: u32,
    pub georef: Option<GeoReference>,
}

impl RasterInfo {
    /// ラスタ中心の地理座標（ジオリファレンスがある場合のみ）
    pub fn center(&self) -> Option<Coordinates> {
        let g = self.georef?;
        let ci = self.width as f64 / 2.0;
        let cj = self.height as f64 / 2.0;
        Some(Coordinates::new(
            g.tie_x + (ci - g.tie_i) * g.pixel_scale_x,
            g.tie_y - (cj - g.tie_j) * g.pixel_scale_y,
        ))
    }
}

/// 先頭4バイトでTIFFかを判定する。PNG/JPEG内のExifはラスタとして扱わない
fn sniff_header(bytes: &[u8]) -> Result<ByteOrder> {
    let header = bytes
        .get(0..4)
        .ok_or_else(|| Error::InvalidRaster("header shorter than 4 bytes".into()))?;
    let (order, magic) = match header {
        [b'I', b'I', a, b] => (ByteOrder::LittleEndian, u16::from_le_bytes([*a, *b])),
        [b'M', b'M', a, b] => (ByteOrder::BigEndian, u16::from_be_bytes([*a, *b])),
        _ => return Err(Error::InvalidRaster("missing II/MM byte order mark".into())),
    };
    match magic {
        42 => Ok(order),
        43 => Err(Error::UnsupportedRaster("BigTIFF".into())),
        other => Err(Error::InvalidRaster(format!("bad magic number {}", other))),
    }
}

fn dimension(exif: &Exif, tag: Tag) -> Result<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .filter(|&v| v > 0)
        .ok_or_else(|| Error::InvalidRaster(format!("missing {}", tag)))
}

/// DOUBLE配列のタグを読む。型か個数が合わなければ InvalidRaster
fn doubles(exif: &Exif, tag: Tag, min: usize) -> Result<Option<Vec<f64>>> {
    let Some(field) = exif.get_field(tag, In::PRIMARY) else {
        return Ok(None);
    };
    match &field.value {
        Value::Double(values) if values.len() >= min => Ok(Some(values[..min].to_vec())),
        _ => Err(Error::InvalidRaster(format!(
            "tag {} must hold at least {} doubles",
            tag.number(),
            min
        ))),
    }
}

/// TIFF/GeoTIFFのヘッダとIFD0を解析する
pub fn parse_raster(bytes: &[u8]) -> Result<RasterInfo> {
    let byte_order = sniff_header(bytes)?;
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .map_err(|e| Error::InvalidRaster(e.to_string()))?;

    let width = dimension(&exif, Tag::ImageWidth)?;
    let height = dimension(&exif, Tag::ImageLength)?;

    let scale = doubles(&exif, TAG_MODEL_PIXEL_SCALE, 3)?;
    let tiepoint = doubles(&exif, TAG_MODEL_TIEPOINT, 6)?;
    let georef = match (scale, tiepoint) {
        (Some(s), Some(t)) => Some(GeoReference {
            pixel_scale_x: s[0],
            pixel_scale_y: s[1],
            tie_i: t[0],
            tie_j: t[1],
            tie_x: t[3],
            tie_y: t[4],
        }),
        _ => None,
    };

    Ok(RasterInfo {
        byte_order,
        width,
        height,
        georef,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::geotiff;
    use super::*;

    #[test]
    fn test_parse_plain_tiff() {
        let info = parse_raster(&geotiff(640, 480, None)).expect("parse failed");
        assert_eq!(info.byte_order, ByteOrder::LittleEndian);
        assert_eq!(info.width, 640);
        assert_eq!(info.height, 480);
        assert!(info.georef.is_none());
        assert!(info.center().is_none());
    }

    #[test]
    fn test_parse_geotiff_center() {
        let bytes = geotiff(
            200,
            100,
            Some(([0.001, 0.002, 0.0], [0.0, 0.0, 0.0, -56.0, -12.0, 0.0])),
        );
        let info = parse_raster(&bytes).unwrap();
        let center = info.center().expect("georef expected");
        assert!((center.lon - (-55.9)).abs() < 1e-9);
        assert!((center.lat - (-12.1)).abs() < 1e-9);
    }

    #[test]
    fn test_reject_non_tiff() {
        let err = parse_raster(b"\x89PNG\r\n\x1a\n0000").unwrap_err();
        assert!(matches!(err, Error::InvalidRaster(_)));

        let err = parse_raster(b"II").unwrap_err();
        assert!(matches!(err, Error::InvalidRaster(_)));
    }

    #[test]
    fn test_reject_bigtiff() {
        let mut bytes = geotiff(10, 10, None);
        bytes[2] = 43;
        assert!(matches!(
            parse_raster(&bytes).unwrap_err(),
            Error::UnsupportedRaster(_)
        ));
    }

    #[test]
    fn test_reject_truncated_ifd() {
        let bytes = geotiff(10, 10, None);
        let err = parse_raster(&bytes[..14]).unwrap_err();
        assert!(matches!(err, Error::InvalidRaster(_)));
    }

    #[test]
    fn test_reject_offsets_past_end() {
        // IFDオフセットがファイル末尾の外を指す
        let mut bytes = geotiff(10, 10, None);
        bytes[4..8].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        assert!(matches!(parse_raster(&bytes).unwrap_err(), Error::InvalidRaster(_)));

        // ModelPixelScale の値オフセットが範囲外
        let mut bytes = geotiff(10, 10, Some(([1.0, 1.0, 0.0], [0.0; 6])));
        let value_offset = 8 + 2 + 2 * 12 + 8;
        bytes[value_offset..value_offset + 4].copy_from_slice(&0xFFFF_FFF8u32.to_le_bytes());
        assert!(matches!(parse_raster(&bytes).unwrap_err(), Error::InvalidRaster(_)));
    }

    #[test]
    fn test_big_endian_header() {
        let mut out = Vec::new();
        out.extend_from_slice(b"MM");
        out.extend_from_slice(&42u16.to_be_bytes());
        out.extend_from_slice(&8u32.to_be_bytes());
        out.extend_from_slice(&2u16.to_be_bytes());
        for (tag, value) in [(256u16, 32u32), (257u16, 16u32)] {
            out.extend_from_slice(&tag.to_be_bytes());
            out.extend_from_slice(&4u16.to_be_bytes());
            out.extend_from_slice(&1u32.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes());
        }
        out.extend_from_slice(&0u32.to_be_bytes());

        let info = parse_raster(&out).unwrap();
        assert_eq!(info.byte_order, ByteOrder::BigEndian);
        assert_eq!((info.width, info.height), (32, 16));
    }
}
