//! 詳細画面・印刷で表示する項目

use crate::types::{Report, SatelliteImage};

pub const PROPERTY_SECTION: &str = "Dados da Propriedade";
pub const ANALYSIS_SECTION: &str = "Dados da Análise";
pub const IMAGES_SECTION: &str = "Imagens e Sensores";

/// 表示用の1行
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label,
            value: if value.trim().is_empty() { "-".to_string() } else { value },
        }
    }
}

/// 数値の表示（整数値は小数点なし）
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

pub fn property_fields(report: &Report) -> Vec<Field> {
    vec![
        Field::new("CAR", report.car.as_str()),
        Field::new("Município", report.municipality.as_str()),
        Field::new("UF", report.state.as_str()),
        Field::new("Status do CAR", report.car_status.as_str()),
        Field::new("Data de Registro", report.registration_date.as_str()),
        Field::new("Área Declarada do CAR (ha)", format_number(report.declared_area)),
        Field::new("Status", report.status.label()),
    ]
}

pub fn analysis_fields(report: &Report) -> Vec<Field> {
    vec![
        Field::new("Área Consolidada (ha)", format_number(report.consolidated_area)),
        Field::new("Biomassa", report.biomass.as_str()),
        Field::new("Ano de Referência da Análise", report.analysis_year.to_string()),
        Field::new("Produtividade CONAB (kg/ha)", format_number(report.productivity)),
        Field::new("Safra de Referência (CONAB)", report.harvest_reference.as_str()),
        Field::new("Potencial Produtivo (ton)", format_number(report.productive_potential)),
    ]
}

pub fn image_fields(image: &SatelliteImage) -> Vec<Field> {
    vec![
        Field::new("Sensores", image.sensor.as_str()),
        Field::new("ID da Imagem", image.image_id.as_str()),
        Field::new("Data", image.date.as_str()),
        Field::new("Coordenada Central", image.central_coordinate.to_string()),
    ]
}
