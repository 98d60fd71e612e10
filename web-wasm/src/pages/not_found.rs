use crate::app::Router;
use leptos::prelude::*;

#[component]
pub fn NotFound() -> impl IntoView {
    let router = expect_context::<Router>();
    log::warn!("route not found: {:?}", router.route.get_untracked());

    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"Página não encontrada"</p>
            <a href="/" on:click=move |ev| {
                ev.prevent_default();
                router.navigate("/");
            }>"Voltar ao início"</a>
        </div>
    }
}
