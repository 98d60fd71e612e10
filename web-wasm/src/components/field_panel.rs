//! 項目パネル（Dados da Propriedade / Dados da Análise）

use cbio_common::fields::Field;
use cbio_common::ReportStatus;
use leptos::prelude::*;

#[component]
pub fn FieldPanel(
    title: &'static str,
    fields: Vec<Field>,
    /// 指定時は「Status」行をバッジ表示にする
    #[prop(optional)]
    status: Option<ReportStatus>,
) -> impl IntoView {
    let rows = fields
        .into_iter()
        .map(|field| {
            let value = match (&status, field.label) {
                (Some(status), "Status") => view! {
                    <span class=format!("status-badge {}", status.css_class())>{field.value}</span>
                }
                .into_any(),
                _ => view! { <span>{field.value}</span> }.into_any(),
            };
            view! {
                <div class="field-row">
                    <span class="field-label">{field.label}</span>
                    {value}
                </div>
            }
        })
        .collect_view();

    view! {
        <section class="field-panel">
            <h2>{title}</h2>
            <div class="field-grid">{rows}</div>
        </section>
    }
}
