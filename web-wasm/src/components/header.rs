//! ヘッダーコンポーネント

use leptos::prelude::*;

pub const LOGO_URL: &str = "/logo.png";

#[component]
pub fn Header(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <header class="header no-print">
            <img class="logo" src=LOGO_URL alt="Logo" />
            <h1>{title}</h1>
            <div class="header-actions">{children()}</div>
        </header>
    }
}
