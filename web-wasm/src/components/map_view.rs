//! 地図コンポーネント（描画はJSブリッジ）

use crate::bindings::{destroy_map_js, render_focus, render_overview};
use cbio_common::map::{focus, overview};
use cbio_common::{Coordinates, Report};
use leptos::prelude::*;

pub const OVERVIEW_MAP_ID: &str = "overview-map";

/// 一覧画面の地図。絞り込み結果が変わるたびにマーカーを描き直す
#[component]
pub fn OverviewMap(reports: Memo<Vec<Report>>) -> impl IntoView {
    Effect::new(move |_| {
        let view = reports.with(|r| overview(r));
        render_overview(OVERVIEW_MAP_ID, &view);
    });
    on_cleanup(|| destroy_map_js(OVERVIEW_MAP_ID));

    view! {
        <div id=OVERVIEW_MAP_ID class="map-container"></div>
    }
}

/// 衛星画像カードの地図
#[component]
pub fn FocusMap(element_id: String, center: Coordinates) -> impl IntoView {
    let target = element_id.clone();
    Effect::new(move |_| {
        render_focus(&target, &focus(center));
    });
    let cleanup_id = element_id.clone();
    on_cleanup(move || destroy_map_js(&cleanup_id));

    view! {
        <div id=element_id class="focus-map"></div>
    }
}
