//! 衛星画像カード

use crate::bindings::printable_image_url;
use crate::components::map_view::FocusMap;
use cbio_common::fields::{image_fields, IMAGES_SECTION};
use cbio_common::SatelliteImage;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 画像本体。TIFFはdata URLに変換してから表示する
#[component]
fn ImagePreview(url: String, alt: String) -> impl IntoView {
    let src = RwSignal::new(None::<String>);
    spawn_local(async move {
        src.set(Some(printable_image_url(&url).await));
    });

    view! {
        {move || match src.get() {
            Some(src) => view! { <img class="satellite-image" src=src alt=alt.clone() /> }.into_any(),
            None => view! { <div class="satellite-image loading">"Carregando imagem..."</div> }.into_any(),
        }}
    }
}

#[component]
pub fn SatelliteImages(images: Vec<SatelliteImage>) -> impl IntoView {
    let cards = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            let rows = image_fields(&image)
                .into_iter()
                .map(|field| view! { <p><span class="field-label">{field.label} ":"</span> " " {field.value}</p> })
                .collect_view();
            let fallback = image.is_fallback();
            let alt = format!("Imagem {} ({})", index + 1, image.sensor);
            view! {
                <div class="image-card">
                    <h3>"Imagem " {index + 1}</h3>
                    <ImagePreview url=image.url.clone() alt=alt />
                    <FocusMap element_id=format!("focus-map-{}", index + 1) center=image.central_coordinate />
                    <Show when=move || fallback>
                        <p class="fallback-note">"Imagem ilustrativa"</p>
                    </Show>
                    <div class="image-fields">{rows}</div>
                </div>
            }
        })
        .collect_view();

    view! {
        <section class="satellite-images">
            <h2>{IMAGES_SECTION}</h2>
            <div class="image-grid">{cards}</div>
        </section>
    }
}
