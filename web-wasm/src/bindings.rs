//! JavaScript Bridge バインディング
//!
//! 地図描画（OpenLayers）とGeoTIFFのPNG化はJS側に委譲する。
//! 境界を越えるデータはJSON文字列で渡す。

use cbio_common::map::MapView;
use wasm_bindgen::prelude::*;

// ============================================
// JavaScript関数のextern宣言
// ============================================

#[wasm_bindgen(module = "/js/map-bridge.js")]
extern "C" {
    /// 一覧画面の地図を描画（マーカークリックで詳細へ遷移）
    ///
    /// # Arguments
    /// * `element_id` - 地図を描くコンテナのid
    /// * `view_json` - MapViewのJSON文字列
    #[wasm_bindgen(js_name = "renderOverviewMap", catch)]
    pub fn render_overview_map_js(element_id: &str, view_json: &str) -> Result<(), JsValue>;

    /// 画像カード用の地図を描画（操作不可・中心のみ）
    #[wasm_bindgen(js_name = "renderFocusMap", catch)]
    pub fn render_focus_map_js(element_id: &str, view_json: &str) -> Result<(), JsValue>;

    /// 地図インスタンスを破棄（未作成なら何もしない）
    #[wasm_bindgen(js_name = "destroyMap")]
    pub fn destroy_map_js(element_id: &str);

    /// GeoTIFFのURLをPNGのdata URLに変換
    ///
    /// # Returns
    /// data URL文字列
    #[wasm_bindgen(js_name = "rasterToDataUrl", catch)]
    pub async fn raster_to_data_url_js(url: &str) -> Result<JsValue, JsValue>;
}

// ============================================
// ヘルパー関数
// ============================================

pub fn view_to_json(view: &MapView) -> Result<String, String> {
    serde_json::to_string(view).map_err(|e| format!("JSON serialization failed: {}", e))
}

/// 一覧地図を描画。失敗はログのみ
pub fn render_overview(element_id: &str, view: &MapView) {
    let result = view_to_json(view)
        .map_err(JsValue::from)
        .and_then(|json| render_overview_map_js(element_id, &json));
    if let Err(e) = result {
        log::warn!("overview map render failed: {:?}", e);
    }
}

pub fn render_focus(element_id: &str, view: &MapView) {
    let result = view_to_json(view)
        .map_err(JsValue::from)
        .and_then(|json| render_focus_map_js(element_id, &json));
    if let Err(e) = result {
        log::warn!("focus map render failed: {:?}", e);
    }
}

/// ブラウザが直接表示できないTIFFか（クエリは無視）
pub fn is_raster_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default().to_ascii_lowercase();
    path.ends_with(".tif") || path.ends_with(".tiff")
}

/// ラスタをブラウザで表示できる形に変換。失敗時は元のURLのまま
pub async fn printable_image_url(url: &str) -> String {
    if !is_raster_url(url) {
        return url.to_string();
    }
    match raster_to_data_url_js(url).await {
        Ok(value) => value.as_string().unwrap_or_else(|| url.to_string()),
        Err(e) => {
            log::warn!("raster conversion failed for {}: {:?}", url, e);
            url.to_string()
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_png_url_passes_through() {
        let url = printable_image_url("/placeholder/satellite-1.png").await;
        assert_eq!(url, "/placeholder/satellite-1.png");
    }
}
