//! 端末表示用の整形

use cbio_common::fields::{
    analysis_fields, format_number, image_fields, property_fields, Field, ANALYSIS_SECTION,
    IMAGES_SECTION, PROPERTY_SECTION,
};
use cbio_common::Report;

/// 一覧の表（CAR / 市 / 面積 / ステータス）
pub fn report_table(reports: &[&Report]) -> String {
    let car_width = reports
        .iter()
        .map(|r| r.car.chars().count())
        .max()
        .unwrap_or(0)
        .max("CAR".len());

    let mut out = format!(
        "{:<car_width$}  {:<24}  {:>10}  {}\n",
        "CAR",
        "Município",
        "Área (ha)",
        "Status",
        car_width = car_width
    );
    for report in reports {
        let place = format!("{} - {}", report.municipality, report.state);
        out.push_str(&format!(
            "{:<car_width$}  {:<24}  {:>10}  {}\n",
            report.car,
            place,
            format_number(report.declared_area),
            report.status.label(),
            car_width = car_width
        ));
    }
    out
}

fn push_fields(out: &mut String, fields: &[Field]) {
    let width = fields.iter().map(|f| f.label.chars().count()).max().unwrap_or(0);
    for field in fields {
        let pad = width - field.label.chars().count();
        out.push_str(&format!("  {}{}  {}\n", field.label, " ".repeat(pad), field.value));
    }
}

/// 詳細表示（Dados da Propriedade / Dados da Análise / Imagens e Sensores）
pub fn report_detail(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", PROPERTY_SECTION));
    push_fields(&mut out, &property_fields(report));
    out.push_str(&format!("\n{}\n", ANALYSIS_SECTION));
    push_fields(&mut out, &analysis_fields(report));

    out.push_str(&format!("\n{}\n", IMAGES_SECTION));
    for (i, image) in report.images.iter().enumerate() {
        let note = if image.is_fallback() { " (Imagem ilustrativa)" } else { "" };
        out.push_str(&format!(" Imagem {}{}\n", i + 1, note));
        push_fields(&mut out, &image_fields(image));
        out.push_str(&format!("  URL  {}\n", image.url));
    }
    out
}
