//! 報告書一覧コンポーネント

use cbio_common::fields::format_number;
use cbio_common::{Report, Selection};
use leptos::prelude::*;

#[component]
pub fn ReportList<FO, FP>(
    /// 検索で絞り込んだ後の一覧
    reports: Memo<Vec<Report>>,
    selection: RwSignal<Selection>,
    on_open: FO,
    on_print: FP,
) -> impl IntoView
where
    FO: Fn(String) + 'static + Clone + Send,
    FP: Fn(()) + 'static + Clone + Send,
{
    let all_selected = move || reports.with(|r| selection.with(|s| s.all_selected(r)));

    view! {
        <div class="report-list">
            <div class="report-list-toolbar">
                <label class="select-all">
                    <input
                        type="checkbox"
                        prop:checked=all_selected
                        on:change=move |_| {
                            reports.with_untracked(|r| selection.update(|s| s.toggle_all(r)));
                        }
                    />
                    <span>"Selecionar Todos"</span>
                </label>
                <button
                    class="btn btn-secondary"
                    disabled=move || selection.with(|s| s.is_empty())
                    on:click={
                        let on_print = on_print.clone();
                        move |_| on_print(())
                    }
                >
                    "Imprimir Selecionados"
                </button>
            </div>

            <Show
                when=move || reports.with(|r| !r.is_empty())
                fallback=|| view! { <p class="text-muted">"Nenhum relatório encontrado"</p> }
            >
                <For
                    each=move || reports.get()
                    key=|report| report.id.clone()
                    children={
                        let on_open = on_open.clone();
                        move |report| {
                            view! { <ReportCard report=report selection=selection on_open=on_open.clone() /> }
                        }
                    }
                />
            </Show>
        </div>
    }
}

#[component]
fn ReportCard<FO>(report: Report, selection: RwSignal<Selection>, on_open: FO) -> impl IntoView
where
    FO: Fn(String) + 'static + Clone + Send,
{
    let id = report.id.clone();
    let data_id = id.clone();
    let checked_id = id.clone();
    let toggle_id = id.clone();

    view! {
        <div
            class="report-card"
            data-report-id=data_id
            on:click=move |_| on_open(id.clone())
        >
            <input
                type="checkbox"
                prop:checked=move || selection.with(|s| s.is_selected(&checked_id))
                on:click=|ev| ev.stop_propagation()
                on:change=move |_| selection.update(|s| s.toggle(&toggle_id))
            />
            <div class="report-card-body">
                <div class="report-card-title">
                    <h3>"CAR: " {report.car.clone()}</h3>
                    <span class=format!("status-badge {}", report.status.css_class())>
                        {report.status.label().to_string()}
                    </span>
                </div>
                <div class="report-card-grid">
                    <div>
                        <p>"Município: " {report.municipality.clone()} " - " {report.state.clone()}</p>
                        <p>"Área: " {format_number(report.declared_area)} " ha"</p>
                    </div>
                    <div>
                        <p>"Cultura: " {report.biomass.clone()}</p>
                        <p>"Ano de Análise: " {report.analysis_year}</p>
                    </div>
                </div>
            </div>
        </div>
    }
}
