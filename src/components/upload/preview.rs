//! Selection preview.
//!
//! Hidden entirely while nothing is selected. File names are rendered as
//! text nodes, so markup in a name shows up literally.

use leptos::prelude::*;
use leptos_icons::Icon;

use cloudshelf_core::PreviewRow;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/upload/upload.module.css");

#[component]
pub fn SelectionPreview() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let rows = move || {
        ctx.triggers.selection.track();
        ctx.manager().preview()
    };
    let on_remove = Callback::new(move |index: usize| ctx.manager().remove_at(index));

    move || {
        rows().map(|rows| {
            view! {
                <ul class=css::preview aria-label="Selected files">
                    {rows
                        .into_iter()
                        .map(|row| view! { <PreviewItem row=row on_remove=on_remove /> })
                        .collect_view()}
                </ul>
            }
        })
    }
}

/// One selected file with its remove control.
#[component]
pub fn PreviewItem(row: PreviewRow, on_remove: Callback<usize>) -> impl IntoView {
    let index = row.index;

    view! {
        <li class=css::previewItem>
            <span class=css::previewIcon title=row.category.label()>
                <Icon icon=ic::category_icon(row.category) />
            </span>
            <span class=css::previewName>{row.name}</span>
            <span class=css::previewSize>{row.size}</span>
            <button
                class=css::removeButton
                title="Remove"
                aria-label="Remove file"
                on:click=move |_| on_remove.run(index)
            >
                <Icon icon=ic::CLOSE />
            </button>
        </li>
    }
}
