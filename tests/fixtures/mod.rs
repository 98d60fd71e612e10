//! テスト用データディレクトリ

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub const CAR: &str = "MT-5108501-70D4821B80A84D2FB942A46B2DC16B41";

/// imageクレートで書いた本物のTIFF
pub fn tiff_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 110, 60]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Tiff)
        .expect("TIFF encode failed");
    buf
}

pub fn descriptor_json(car: &str) -> String {
    format!(
        r#"{{
            "id": "ignored",
            "car": "{car}",
            "municipality": "Vera",
            "state": "MT",
            "carStatus": "Ativo",
            "registrationDate": "14/04/2021",
            "declaredArea": 173.78,
            "status": "ELEGÍVEL",
            "consolidatedArea": 80.75,
            "biomass": "Soja",
            "analysisYear": 2023,
            "productivity": 3.773,
            "harvestReference": "22/23",
            "productivePotential": 304.67,
            "coordinates": [-55.815776, -12.5147015],
            "images": [
                {{ "id": "1", "sensor": "S2A", "imageId": "S2A_A", "date": "04/09/2017" }},
                {{ "id": "2", "sensor": "S2B", "imageId": "S2B_B", "date": "05/09/2017" }},
                {{ "id": "3", "sensor": "L8", "imageId": "L8_C", "date": "06/09/2017" }}
            ]
        }}"#
    )
}

/// <root>/<CAR>/data.json と imagem1.tif だけを置く（2, 3 は欠落）
pub fn write_report(root: &Path, car: &str) {
    let folder = root.join(car);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join("data.json"), descriptor_json(car)).unwrap();
    fs::write(folder.join("imagem1.tif"), tiff_bytes(16, 8)).unwrap();
}

/// API風の一覧（idはCARと異なる）
pub fn write_listing(root: &Path, entries: &[(&str, &str)]) {
    let reports: Vec<String> = entries
        .iter()
        .map(|(id, car)| format!(r#"{{"id":"{}","car":"{}","municipality":"Vera","state":"MT"}}"#, id, car))
        .collect();
    fs::write(root.join("reports.json"), format!("[{}]", reports.join(","))).unwrap();
}
