//! 一覧画面: 検索・地図・一覧・まとめて印刷

use crate::api::{fetch_listed, fetch_reports};
use crate::app::{Cache, Router, Toasts};
use crate::components::{header::Header, map_view::OverviewMap, report_list::ReportList, search_bar::SearchBar};
use crate::print::{fill_print_window, open_print_window};
use cbio_common::print::DEFAULT_TITLE;
use cbio_common::{filter_reports, report_path, LoaderConfig, Report, RequestGuard, Selection};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, PartialEq)]
enum ListState {
    Loading,
    Ready,
    Failed(String),
}

#[component]
pub fn IndexPage() -> impl IntoView {
    let router = expect_context::<Router>();
    let toasts = expect_context::<Toasts>();
    let cache = expect_context::<Cache>();
    let config = expect_context::<LoaderConfig>();

    let reports = RwSignal::new(Vec::<Report>::new());
    let state = RwSignal::new(ListState::Loading);
    let (term, set_term) = signal(String::new());
    let selection = RwSignal::new(Selection::default());

    let filtered = Memo::new(move |_| {
        let term = term.get();
        reports.with(|all| filter_reports(all, &term).into_iter().cloned().collect::<Vec<_>>())
    });

    // 一覧の取得（画面を離れたら結果を捨てる）
    let guard = RequestGuard::new();
    let ticket = guard.issue();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel_all()
    });
    spawn_local(async move {
        let result = fetch_reports().await;
        match ticket.accept(result) {
            Some(Ok(list)) => {
                log::info!("loaded {} report(s)", list.len());
                reports.set(list);
                state.set(ListState::Ready);
            }
            Some(Err(e)) => {
                log::error!("report listing failed: {}", e);
                toasts.error("Erro ao carregar relatórios", e.to_string());
                state.set(ListState::Failed(e.to_string()));
            }
            None => log::debug!("discarded stale report listing"),
        }
    });

    let on_open = move |id: String| router.navigate(&report_path(&id));

    let on_print = move |_: ()| {
        let selected: Vec<Report> =
            reports.with_untracked(|all| selection.with_untracked(|s| s.resolve(all).into_iter().cloned().collect()));
        if selected.is_empty() {
            return;
        }
        let popup = match open_print_window() {
            Ok(popup) => popup,
            Err(message) => {
                toasts.error("Impressão bloqueada", message);
                return;
            }
        };
        let config = config.clone();
        spawn_local(async move {
            let mut full = Vec::with_capacity(selected.len());
            for report in selected {
                let cached = cache.0.with_untracked(|c| c.get(&report.id).cloned());
                let loaded = match cached {
                    Some(hit) => hit,
                    None => match fetch_listed(&config, &report).await {
                        Ok(loaded) => {
                            cache.0.update(|c| c.insert(&report.id, loaded.clone()));
                            loaded
                        }
                        Err(e) => {
                            // 一覧のデータだけで印刷する
                            log::warn!("report {} not loaded for print: {}", report.id, e);
                            report
                        }
                    },
                };
                full.push(loaded);
            }
            if let Err(message) = fill_print_window(popup, full).await {
                toasts.error("Erro na impressão", message);
            }
        });
    };

    view! {
        <div class="container">
            <Header title=DEFAULT_TITLE>
                <span class="report-count">{move || format!("{} relatório(s)", filtered.with(|r| r.len()))}</span>
            </Header>

            <SearchBar term=term set_term=set_term />

            {move || match state.get() {
                ListState::Loading => view! { <p class="text-muted">"Carregando relatórios..."</p> }.into_any(),
                ListState::Failed(message) => view! {
                    <div class="error-state">
                        <p>"Não foi possível carregar os relatórios."</p>
                        <p class="text-muted">{message}</p>
                    </div>
                }
                .into_any(),
                ListState::Ready => view! {
                    <div class="index-layout">
                        <OverviewMap reports=filtered />
                        <ReportList reports=filtered selection=selection on_open=on_open on_print=on_print.clone() />
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
