//! 通知（トースト）表示

use crate::app::Toasts;
use leptos::prelude::*;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = expect_context::<Toasts>();

    view! {
        <div class="toast-host">
            <For
                each=move || toasts.items.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=format!("toast toast-{}", toast.kind.as_str()) on:click=move |_| toasts.dismiss(id)>
                            <strong>{toast.title}</strong>
                            <p>{toast.message}</p>
                        </div>
                    }
                }
            />
        </div>
    }
}
