//! Progress panel.

use leptos::prelude::*;

use cloudshelf_core::{UploadPhase, UploadView};

use crate::app::AppContext;

stylance::import_crate_style!(css, "src/components/upload/upload.module.css");

/// Progress of the current (or last) upload.
///
/// Shown from the moment an upload starts. Stays up after a failure; hides
/// itself a short while after a success.
#[component]
pub fn ProgressPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");

    let upload = move || {
        ctx.triggers.upload.track();
        ctx.manager().upload_view()
    };

    move || {
        let state = upload();
        state.visible.then(|| progress_view(state))
    }
}

fn progress_view(upload: UploadView) -> impl IntoView {
    let panel_class = match upload.phase {
        UploadPhase::Succeeded => format!("{} {}", css::progress, css::progressDone),
        UploadPhase::Failed => format!("{} {}", css::progress, css::progressFailed),
        UploadPhase::Idle | UploadPhase::InFlight => css::progress.to_string(),
    };
    let percent = format!("{}%", upload.percent);

    view! {
        <section class=panel_class aria-live="polite">
            <h3 class=css::progressTitle>{upload.title()}</h3>
            <div
                class=css::track
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=upload.percent.to_string()
            >
                <div class=css::fill style:width=percent.clone()></div>
            </div>
            <div class=css::progressMeta>
                <span>{percent}</span>
                <span>{upload.files_label()}</span>
                <span>{upload.speed_label()}</span>
            </div>
        </section>
    }
}
