//! メインアプリケーションコンポーネント

use crate::components::toast::ToastHost;
use crate::pages::{index::IndexPage, not_found::NotFound, report::ReportPage};
use cbio_common::{LoaderConfig, ReportCache, Route};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::JsValue;

/// 通知の表示時間
const TOAST_MS: u32 = 4000;

/// クライアント側ルーティング（History API）
#[derive(Clone, Copy)]
pub struct Router {
    pub route: ReadSignal<Route>,
    set_route: WriteSignal<Route>,
}

impl Router {
    /// pushState して画面を切り替える
    pub fn navigate(&self, path: &str) {
        let window = gloo::utils::window();
        if let Ok(history) = window.history() {
            if let Err(e) = history.push_state_with_url(&JsValue::NULL, "", Some(path)) {
                log::warn!("pushState failed: {:?}", e);
            }
        }
        self.set_route.set(Route::parse(path));
    }
}

fn current_route() -> Route {
    let pathname = gloo::utils::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string());
    Route::parse(&pathname)
}

/// 通知の種類
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Error => "error",
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub message: String,
}

/// 一時通知のキュー
#[derive(Clone, Copy)]
pub struct Toasts {
    pub items: RwSignal<Vec<Toast>>,
    next_id: RwSignal<u64>,
}

impl Toasts {
    fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(0),
        }
    }

    pub fn push(&self, kind: ToastKind, title: &str, message: impl Into<String>) {
        let id = self.next_id.get_untracked() + 1;
        self.next_id.set(id);
        self.items.update(|items| {
            items.push(Toast {
                id,
                kind,
                title: title.to_string(),
                message: message.into(),
            })
        });

        let items = self.items;
        Timeout::new(TOAST_MS, move || {
            items.update(|items| items.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn error(&self, title: &str, message: impl Into<String>) {
        self.push(ToastKind::Error, title, message);
    }

    pub fn info(&self, title: &str, message: impl Into<String>) {
        self.push(ToastKind::Info, title, message);
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|t| t.id != id));
    }
}

/// 詳細画面で読み込んだ報告書
#[derive(Clone, Copy)]
pub struct Cache(pub RwSignal<ReportCache>);

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let (route, set_route) = signal(current_route());
    let router = Router { route, set_route };
    provide_context(router);
    provide_context(Toasts::new());
    provide_context(Cache(RwSignal::new(ReportCache::new())));
    provide_context(LoaderConfig::default());

    // 戻る／進む
    let _popstate = window_event_listener(leptos::ev::popstate, move |_| {
        set_route.set(current_route());
    });

    view! {
        <div class="app">
            {move || match route.get() {
                Route::List => view! { <IndexPage /> }.into_any(),
                Route::Report(id) => view! { <ReportPage id=id /> }.into_any(),
                Route::NotFound => view! { <NotFound /> }.into_any(),
            }}
            <ToastHost />
        </div>
    }
}
