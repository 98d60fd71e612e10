//! 印刷ウィンドウ
//!
//! ポップアップは同期的に開く（ユーザー操作の直後でないとブロックされる）。
//! 画像の変換を待ってから文書を書き込み、印刷は文書側のスクリプトが行う。

use crate::bindings::printable_image_url;
use cbio_common::{render_document, PrintOptions, Report};
use wasm_bindgen::prelude::*;

pub const POPUP_BLOCKED: &str = "Não foi possível abrir a janela de impressão. Verifique o bloqueador de pop-ups.";

/// 印刷用の空ウィンドウを開く。ブロックされたらエラー
pub fn open_print_window() -> Result<web_sys::Window, String> {
    let window = gloo::utils::window();
    match window.open_with_url_and_target("", "_blank") {
        Ok(Some(popup)) => Ok(popup),
        Ok(None) => Err(POPUP_BLOCKED.to_string()),
        Err(e) => {
            log::error!("window.open failed: {:?}", e);
            Err(POPUP_BLOCKED.to_string())
        }
    }
}

fn write_document(popup: &web_sys::Window, html: &str) -> Result<(), String> {
    let document = popup
        .document()
        .ok_or_else(|| "Janela de impressão sem documento".to_string())?;
    document
        .write(&js_sys::Array::of1(&JsValue::from_str(html)))
        .map_err(|e| format!("{:?}", e))?;
    document.close().map_err(|e| format!("{:?}", e))
}

/// GeoTIFFをブラウザで表示できるURLに差し替える
async fn with_printable_images(mut report: Report) -> Report {
    for image in report.images.iter_mut() {
        image.url = printable_image_url(&image.url).await;
    }
    report
}

fn generated_at() -> String {
    js_sys::Date::new_0()
        .to_locale_string("pt-BR", &JsValue::UNDEFINED)
        .into()
}

/// 開いたウィンドウに報告書を書き込む
pub async fn fill_print_window(popup: web_sys::Window, reports: Vec<Report>) -> Result<(), String> {
    let mut prepared = Vec::with_capacity(reports.len());
    for report in reports {
        prepared.push(with_printable_images(report).await);
    }
    let refs: Vec<&Report> = prepared.iter().collect();
    let options = PrintOptions {
        generated_at: Some(generated_at()),
        logo_url: Some("/logo.png".to_string()),
        ..Default::default()
    };
    log::info!("printing {} report(s)", refs.len());
    write_document(&popup, &render_document(&refs, &options))
}
