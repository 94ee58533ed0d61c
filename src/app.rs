//! Root application module.
//!
//! Contains the App component and the [`AppContext`] that hands the
//! [`FileManager`] to every component, plus one reactive trigger per
//! region the manager reports changes for.

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use cloudshelf_core::{Change, FileManager};

use crate::backend::{BrowserBackend, BrowserClock};
use crate::components::{FileList, ProgressPanel, StatusLine, UploadPanel};
use crate::config::{APP_NAME, load_config};

stylance::import_crate_style!(css, "src/app.module.css");

/// The manager as instantiated in the browser.
pub type Manager = FileManager<BrowserBackend, BrowserClock>;

// ============================================================================
// ChangeTriggers
// ============================================================================

/// One trigger per UI region.
///
/// The manager keeps its state outside the reactive graph; views `track()`
/// the trigger of the region they render and the manager's observer
/// `notify()`s it.
#[derive(Clone, Copy)]
pub struct ChangeTriggers {
    pub selection: Trigger,
    pub upload: Trigger,
    pub files: Trigger,
    pub notice: Trigger,
}

impl ChangeTriggers {
    fn new() -> Self {
        Self {
            selection: Trigger::new(),
            upload: Trigger::new(),
            files: Trigger::new(),
            notice: Trigger::new(),
        }
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide context.
///
/// `Copy`: the manager sits in a local [`StoredValue`], everything else is
/// a reactive handle.
#[derive(Clone, Copy)]
pub struct AppContext {
    manager: StoredValue<Rc<Manager>, LocalStorage>,
    pub triggers: ChangeTriggers,
    /// The hidden `<input type="file">`, reset whenever the selection clears.
    pub file_input: NodeRef<leptos::html::Input>,
}

impl AppContext {
    pub fn new() -> Self {
        let triggers = ChangeTriggers::new();
        let file_input = NodeRef::<leptos::html::Input>::new();

        let manager = FileManager::new(load_config(), BrowserBackend, BrowserClock).on_change(
            move |change| match change {
                Change::Selection => triggers.selection.notify(),
                Change::ResetInput => {
                    if let Some(input) = file_input.get_untracked() {
                        input.set_value("");
                    }
                }
                Change::Upload => triggers.upload.notify(),
                Change::Files => triggers.files.notify(),
                Change::Notice => triggers.notice.notify(),
            },
        );

        Self {
            manager: StoredValue::new_local(Rc::new(manager)),
            triggers,
            file_input,
        }
    }

    pub fn manager(&self) -> Rc<Manager> {
        self.manager.get_value()
    }
}

/// Root application component with error boundary.
///
/// Provides the [`AppContext`] and kicks off the initial file list load.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    let manager = ctx.manager();
    spawn_local(async move {
        // failures surface as a notice
        let _ = manager.load_files().await;
    });

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div class=css::fallback>
                    <h1>"Something went wrong"</h1>
                    <p>"An unexpected error occurred. Please try reloading the page."</p>
                    <ul>
                        {move || errors.get()
                            .into_iter()
                            .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                            .collect::<Vec<_>>()
                        }
                    </ul>
                    <button on:click=move |_| {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }>
                        "Reload Page"
                    </button>
                </div>
            }
        >
            <main class=css::page>
                <header class=css::header>
                    <h1 class=css::title>{APP_NAME}</h1>
                </header>
                <UploadPanel />
                <ProgressPanel />
                <StatusLine />
                <FileList />
            </main>
        </ErrorBoundary>
    }
}
