//! 検索バーコンポーネント

use leptos::prelude::*;

#[component]
pub fn SearchBar(term: ReadSignal<String>, set_term: WriteSignal<String>) -> impl IntoView {
    view! {
        <div class="search-bar">
            <input
                type="search"
                id="search"
                placeholder="Buscar por CAR..."
                prop:value=move || term.get()
                on:input=move |ev| {
                    set_term.set(event_target_value(&ev));
                }
            />
        </div>
    }
}
