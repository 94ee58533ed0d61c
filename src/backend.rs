//! Browser transport and clock.
//!
//! Uploads go through `XMLHttpRequest` because fetch reports no upload
//! progress. XHR callbacks are bridged into an unbounded channel that the
//! core consumes as a stream of [`TransportEvent`]s. List and delete
//! requests use `gloo-net`.

use std::future::Future;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use cloudshelf_core::config::{CSRF_HEADER, CSRF_META_NAME, UPLOAD_FIELD};
use cloudshelf_core::{
    AbortHandle, ApiError, Backend, Clock, HttpReply, LocalFile, TransportEvent, UploadError,
};

// =============================================================================
// BrowserFile
// =============================================================================

/// A file picked through the input control or dropped on the page.
#[derive(Clone, Debug)]
pub struct BrowserFile(pub web_sys::File);

impl BrowserFile {
    /// Collect every entry of a `FileList`, in list order.
    pub fn from_list(list: &web_sys::FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(Self)
            .collect()
    }
}

impl LocalFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }

    fn mime_type(&self) -> Option<String> {
        let mime = self.0.type_();
        (!mime.is_empty()).then_some(mime)
    }
}

// =============================================================================
// Upload Transport
// =============================================================================

type XhrCallback = Closure<dyn FnMut(ProgressEvent)>;

/// Handle to a running XHR upload.
///
/// Owns the event callbacks; they are detached from the request on drop.
pub struct XhrAbort {
    xhr: XmlHttpRequest,
    _callbacks: Vec<XhrCallback>,
}

impl AbortHandle for XhrAbort {
    fn abort(&self) {
        if let Err(err) = self.xhr.abort() {
            tracing::warn!(error = ?err, "xhr abort failed");
        }
    }
}

impl Drop for XhrAbort {
    fn drop(&mut self) {
        if let Ok(upload) = self.xhr.upload() {
            upload.set_onprogress(None);
        }
        self.xhr.set_onload(None);
        self.xhr.set_onerror(None);
        self.xhr.set_onabort(None);
    }
}

/// Value of the CSRF meta tag, if the page carries one.
fn csrf_token() -> Option<String> {
    let selector = format!("meta[name=\"{}\"]", CSRF_META_NAME);
    leptos::prelude::document()
        .query_selector(&selector)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"))
        .filter(|token| !token.is_empty())
}

/// The raw browser error goes to the log; the user only sees a fixed message.
fn transport_error(err: JsValue) -> UploadError {
    let text = err.as_string().unwrap_or_else(|| format!("{:?}", err));
    tracing::warn!(error = %text, "browser refused the upload request");
    UploadError::Transport(text)
}

/// Wire the XHR events to `sender`. The channel closes after the first terminal event.
fn attach_callbacks(
    xhr: &XmlHttpRequest,
    sender: &UnboundedSender<TransportEvent>,
) -> Result<Vec<XhrCallback>, UploadError> {
    let progress = {
        let sender = sender.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |ev: ProgressEvent| {
            let total = ev.length_computable().then(|| ev.total() as u64);
            let _ = sender.unbounded_send(TransportEvent::Progress {
                loaded: ev.loaded() as u64,
                total,
            });
        })
    };

    let load = {
        let sender = sender.clone();
        let request = xhr.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let status = request.status().unwrap_or(0);
            let body = request.response_text().ok().flatten().unwrap_or_default();
            let _ = sender.unbounded_send(TransportEvent::Completed(HttpReply::new(status, body)));
            sender.close_channel();
        })
    };

    let error = {
        let sender = sender.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let _ = sender.unbounded_send(TransportEvent::NetworkError);
            sender.close_channel();
        })
    };

    let abort = {
        let sender = sender.clone();
        Closure::<dyn FnMut(ProgressEvent)>::new(move |_: ProgressEvent| {
            let _ = sender.unbounded_send(TransportEvent::Aborted);
            sender.close_channel();
        })
    };

    xhr.upload()
        .map_err(transport_error)?
        .set_onprogress(Some(progress.as_ref().unchecked_ref()));
    xhr.set_onload(Some(load.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(error.as_ref().unchecked_ref()));
    xhr.set_onabort(Some(abort.as_ref().unchecked_ref()));

    Ok(vec![progress, load, error, abort])
}

// =============================================================================
// BrowserBackend
// =============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserBackend;

impl BrowserBackend {
    async fn reply(response: Response) -> Result<HttpReply, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpReply::new(status, body))
    }
}

impl Backend for BrowserBackend {
    type File = BrowserFile;
    type Abort = XhrAbort;
    type Events = UnboundedReceiver<TransportEvent>;

    fn send_files(
        &self,
        url: &str,
        files: &[BrowserFile],
    ) -> Result<(XhrAbort, UnboundedReceiver<TransportEvent>), UploadError> {
        let form = FormData::new().map_err(transport_error)?;
        for file in files {
            form.append_with_blob_and_filename(UPLOAD_FIELD, &file.0, &file.0.name())
                .map_err(transport_error)?;
        }

        let xhr = XmlHttpRequest::new().map_err(transport_error)?;
        xhr.open("POST", url).map_err(transport_error)?;
        if let Some(token) = csrf_token() {
            xhr.set_request_header(CSRF_HEADER, &token)
                .map_err(transport_error)?;
        }

        let (sender, receiver) = unbounded();
        let callbacks = attach_callbacks(&xhr, &sender)?;
        xhr.send_with_opt_form_data(Some(&form))
            .map_err(transport_error)?;

        let handle = XhrAbort {
            xhr,
            _callbacks: callbacks,
        };
        Ok((handle, receiver))
    }

    async fn get(&self, url: &str) -> Result<HttpReply, ApiError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::reply(response).await
    }

    async fn delete(&self, url: &str) -> Result<HttpReply, ApiError> {
        let response = Request::delete(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::reply(response).await
    }
}

// =============================================================================
// BrowserClock
// =============================================================================

/// Wall clock over `Date.now()` with `setTimeout`-based sleeps.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        TimeoutFuture::new(ms)
    }
}
