//! Upload panel: drop zone, picker and the upload/cancel/clear controls.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;
use web_sys::{FileList, HtmlInputElement};

use crate::app::AppContext;
use crate::backend::BrowserFile;
use crate::components::icons as ic;

use super::SelectionPreview;

stylance::import_crate_style!(css, "src/components/upload/upload.module.css");

#[component]
pub fn UploadPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let (drag_over, set_drag_over) = signal(false);

    let select_files = move |list: Option<FileList>| {
        if let Some(list) = list {
            ctx.manager().select(BrowserFile::from_list(&list));
        }
    };

    let on_input_change = move |ev: ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        select_files(input.files());
    };

    let on_drag_over = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_drag_over.set(true);
    };

    let on_drag_leave = move |_: ev::DragEvent| {
        set_drag_over.set(false);
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        select_files(ev.data_transfer().and_then(|dt| dt.files()));
    };

    let open_picker = move |_: ev::MouseEvent| {
        if let Some(input) = ctx.file_input.get() {
            input.click();
        }
    };

    let is_uploading = Signal::derive(move || {
        ctx.triggers.upload.track();
        ctx.manager().is_uploading()
    });
    let has_selection = Signal::derive(move || {
        ctx.triggers.selection.track();
        ctx.manager().selection_len() > 0
    });

    let on_upload = move |_: ev::MouseEvent| {
        let manager = ctx.manager();
        spawn_local(async move {
            // the outcome is shown by the progress panel and the status line
            let _ = manager.upload().await;
        });
    };

    let on_cancel = move |_: ev::MouseEvent| {
        ctx.manager().cancel_upload();
    };

    let on_clear = move |_: ev::MouseEvent| {
        ctx.manager().clear_selection();
    };

    let zone_class = move || {
        if drag_over.get() {
            format!("{} {}", css::dropZone, css::dragOver)
        } else {
            css::dropZone.to_string()
        }
    };

    view! {
        <section class=css::panel>
            <div
                class=zone_class
                role="button"
                tabindex="0"
                aria-label="Choose files to upload"
                on:click=open_picker
                on:dragover=on_drag_over
                on:dragleave=on_drag_leave
                on:drop=on_drop
            >
                <span class=css::zoneIcon><Icon icon=ic::UPLOAD /></span>
                <p class=css::zoneText>"Drag files here or click to choose"</p>
            </div>
            <input
                node_ref=ctx.file_input
                class=css::hiddenInput
                type="file"
                multiple
                on:change=on_input_change
            />

            <SelectionPreview />

            <div class=css::actions>
                <button
                    class=css::primary
                    on:click=on_upload
                    disabled=move || is_uploading.get()
                >
                    "Upload"
                </button>
                <Show when=move || is_uploading.get()>
                    <button class=css::secondary on:click=on_cancel>
                        "Cancel"
                    </button>
                </Show>
                <Show when=move || has_selection.get() && !is_uploading.get()>
                    <button class=css::secondary on:click=on_clear>
                        "Clear"
                    </button>
                </Show>
            </div>
        </section>
    }
}
