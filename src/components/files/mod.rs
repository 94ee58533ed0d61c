//! Stored files table.
//!
//! Rebuilt from the manager's [`FileTable`](cloudshelf_core::FileTable) on
//! every reload. Each row links to the file's download URL and offers a
//! delete action behind a confirmation prompt.

use leptos::{ev, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen_futures::spawn_local;

use cloudshelf_core::FileRow;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/files/files.module.css");

#[component]
pub fn FileList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let table = move || {
        ctx.triggers.files.track();
        ctx.manager().file_table()
    };

    let on_delete = Callback::new(move |filename: String| {
        let prompt = format!("Are you sure you want to delete \"{}\"?", filename);
        if !window().confirm_with_message(&prompt).unwrap_or(false) {
            return;
        }
        let manager = ctx.manager();
        spawn_local(async move {
            // failures surface as a notice
            let _ = manager.delete_file(&filename).await;
        });
    });

    view! {
        <section class=css::panel>
            <h2 class=css::heading>"Files"</h2>
            {move || match table() {
                None => view! { <p class=css::placeholder>"Loading files..."</p> }.into_any(),
                Some(table) if table.is_empty() => {
                    view! { <p class=css::placeholder>"No files yet"</p> }.into_any()
                }
                Some(table) => view! {
                    <table class=css::table>
                        <thead>
                            <tr>
                                <th class=css::iconCell></th>
                                <th>"Name"</th>
                                <th class=css::sizeCell>"Size"</th>
                                <th class=css::dateCell>"Uploaded"</th>
                                <th class=css::actionCell></th>
                            </tr>
                        </thead>
                        <tbody>
                            {table
                                .rows()
                                .iter()
                                .cloned()
                                .map(|row| view! { <FileListRow row=row on_delete=on_delete /> })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
fn FileListRow(row: FileRow, on_delete: Callback<String>) -> impl IntoView {
    let filename = row.filename.clone();
    let handle_delete = move |_: ev::MouseEvent| on_delete.run(filename.clone());

    view! {
        <tr class=css::row>
            <td class=css::iconCell title=row.category.label()>
                <Icon icon=ic::category_icon(row.category) />
            </td>
            <td class=css::name>{row.filename}</td>
            <td class=css::sizeCell>{row.size}</td>
            <td class=css::dateCell>{row.uploaded}</td>
            <td class=css::actionCell>
                <a class=css::action href=row.download_url title="Download">
                    <Icon icon=ic::DOWNLOAD />
                </a>
                <button class=css::deleteAction on:click=handle_delete title="Delete">
                    <Icon icon=ic::DELETE />
                </button>
            </td>
        </tr>
    }
}
