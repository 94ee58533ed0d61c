//! Status line component.
//!
//! Displays the manager's latest notice: the upload result, a failed load
//! or delete, or a validation message.

use leptos::prelude::*;
use leptos_icons::Icon;

use cloudshelf_core::NoticeLevel;

use crate::app::AppContext;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/status/status.module.css");

/// Single-line status region. Empty when there is no notice.
#[component]
pub fn StatusLine() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided at root");

    let notice = move || {
        ctx.triggers.notice.track();
        ctx.manager().notice()
    };

    view! {
        <div class=css::bar role="status" aria-live="polite">
            {move || notice().map(|notice| {
                let (class, icon) = match notice.level {
                    NoticeLevel::Success => (css::success, ic::SUCCESS),
                    NoticeLevel::Error => (css::error, ic::WARNING),
                };
                view! {
                    <span class=class>
                        <span class=css::icon><Icon icon=icon /></span>
                        <span class=css::text>{notice.text}</span>
                    </span>
                }
            })}
        </div>
    }
}
