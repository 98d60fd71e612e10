//! 詳細画面

use crate::api::fetch_report;
use crate::app::{Cache, Router, Toasts};
use crate::components::field_panel::FieldPanel;
use crate::components::header::Header;
use crate::components::satellite_images::SatelliteImages;
use crate::print::{fill_print_window, open_print_window};
use cbio_common::fields::{analysis_fields, property_fields, ANALYSIS_SECTION, PROPERTY_SECTION};
use cbio_common::{LoaderConfig, Report, RequestGuard};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, PartialEq)]
enum DetailState {
    Loading,
    Ready(Report),
    Failed(String),
}

#[component]
pub fn ReportPage(id: String) -> impl IntoView {
    let router = expect_context::<Router>();
    let toasts = expect_context::<Toasts>();
    let cache = expect_context::<Cache>();
    let config = expect_context::<LoaderConfig>();

    let state = RwSignal::new(DetailState::Loading);
    let guard = RequestGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.cancel_all()
    });

    // force=true でキャッシュを無視して再取得
    let load = {
        let id = id.clone();
        move |force: bool| {
            if force {
                cache.0.update(|c| {
                    c.invalidate(&id);
                });
            } else if let Some(hit) = cache.0.with_untracked(|c| c.get(&id).cloned()) {
                log::debug!("report {} served from cache", id);
                state.set(DetailState::Ready(hit));
                return;
            }

            state.set(DetailState::Loading);
            let ticket = guard.issue();
            let id = id.clone();
            let config = config.clone();
            spawn_local(async move {
                let result = fetch_report(&config, &id).await;
                match ticket.accept(result) {
                    Some(Ok(report)) => {
                        cache.0.update(|c| c.insert(&id, report.clone()));
                        state.set(DetailState::Ready(report));
                    }
                    Some(Err(e)) => {
                        log::error!("report {} failed: {}", id, e);
                        toasts.error(
                            "Erro ao carregar relatório",
                            "Não foi possível carregar o relatório solicitado.",
                        );
                        state.set(DetailState::Failed(e.to_string()));
                    }
                    None => log::debug!("discarded stale response for {}", id),
                }
            });
        }
    };
    load(false);

    let on_print = move |_| {
        let report = match state.get_untracked() {
            DetailState::Ready(report) => report,
            _ => return,
        };
        match open_print_window() {
            Ok(popup) => {
                toasts.info("Impressão iniciada", "Preparando documento para impressão...");
                spawn_local(async move {
                    if let Err(message) = fill_print_window(popup, vec![report]).await {
                        toasts.error("Erro na impressão", message);
                    }
                });
            }
            Err(message) => toasts.error("Impressão bloqueada", message),
        }
    };

    let title = format!("CAR {}", id);

    view! {
        <div class="container">
            <Header title=title>
                <button class="btn btn-ghost" on:click=move |_| router.navigate("/")>"Voltar"</button>
                <button class="btn btn-secondary" on:click=move |_| load(true)>"Atualizar"</button>
                <button
                    class="btn btn-primary"
                    disabled=move || !matches!(state.get(), DetailState::Ready(_))
                    on:click=on_print
                >
                    "Imprimir"
                </button>
            </Header>

            {move || match state.get() {
                DetailState::Loading => view! { <p class="text-center">"Carregando relatório..."</p> }.into_any(),
                DetailState::Failed(message) => view! {
                    <div class="error-state">
                        <p>"Relatório não encontrado"</p>
                        <p class="text-muted">{message}</p>
                    </div>
                }
                .into_any(),
                DetailState::Ready(report) => view! {
                    <div class="report-content">
                        <FieldPanel
                            title=PROPERTY_SECTION
                            fields=property_fields(&report)
                            status=report.status.clone()
                        />
                        <FieldPanel title=ANALYSIS_SECTION fields=analysis_fields(&report) />
                        <SatelliteImages images=report.images.clone() />
                    </div>
                }
                .into_any(),
            }}
        </div>
    }
}
