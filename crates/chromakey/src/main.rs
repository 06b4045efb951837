use chromakey_io::{
    ActionBar, FileUpload, KeyControls, ProcessingClient, ResultView, StagedCanvas,
};
use chromakey_session::{
    DEBOUNCE_DELAY_MS, DisplayPoint, DisplaySize, Session, UploadedFile, View,
};
use dioxus::core::Task;
use dioxus::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("console logger unavailable: {e}").into());
    }
    dioxus::launch(app);
}

/// Root application component.
///
/// Holds the [`Session`] in a signal and owns the two suspension points:
/// the debounce timer (one cancellable task slot) and the network
/// exchange (a detached task per request that is never cancelled).
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    let mut session = use_signal(Session::new);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut debounce = use_signal(|| Option::<Task>::None);
    let client = ProcessingClient::default();

    let mut cancel_debounce = move || {
        if let Some(task) = debounce.take() {
            task.cancel();
        }
    };

    // --- Reprocess scheduling ---
    // Re-arms the trailing debounce window. The exchange runs in its own
    // task, so re-arming never aborts a request already on the wire.
    let mut schedule = move || {
        let Some(ticket) = session.write().trigger() else {
            return;
        };
        cancel_debounce();
        let task = spawn(async move {
            gloo_timers::future::TimeoutFuture::new(DEBOUNCE_DELAY_MS).await;
            // Clear the slot before this task finishes so a later cancel
            // can never hit a recycled task id.
            debounce.set(None);

            let Some(request) = session.write().fire(ticket) else {
                return;
            };
            spawn(async move {
                let result = client.send(&request).await;
                session.write().on_result(result);
            });
        });
        debounce.set(Some(task));
    };

    // --- Handlers ---
    let on_upload = move |file: UploadedFile| {
        let staged = session.write().stage(&file).map(|_| ());
        match staged {
            Ok(()) => {
                notice.set(None);
                schedule();
            }
            Err(e) => {
                log::warn!("rejected upload: {e}");
                notice.set(Some(e.to_string()));
            }
        }
    };

    let on_sample = move |(point, displayed): (DisplayPoint, DisplaySize)| {
        let sampled = session.write().sample_at(point, displayed);
        match sampled {
            Ok(color) => {
                log::debug!("sampled {color}");
                schedule();
            }
            Err(e) => log::warn!("sampling failed: {e}"),
        }
    };

    let on_sensitivity = move |value: u32| {
        session.write().set_sensitivity(value);
        schedule();
    };

    let on_smoothing = move |value: u32| {
        session.write().set_smoothing(value);
        schedule();
    };

    let on_download = move |()| {
        let saved = chromakey_io::download::save_result(&session.read());
        if let Err(e) = saved {
            log::warn!("download failed: {e}");
            notice.set(Some(format!("Download failed: {e}")));
        }
    };

    let on_reset = move |()| {
        cancel_debounce();
        session.write().reset();
        notice.set(None);
    };

    // --- Snapshot for rendering ---
    let current = session.read();
    let view = current.view();
    let staged = current
        .staged()
        .map(|s| (s.shared_png(), s.name().to_owned(), s.dimensions()));
    let color = current.color();
    let parameters = current.parameters();
    let result = current.result();
    let loading = current.is_loading();
    let failure = current.error().map(ToString::to_string);
    drop(current);

    // --- Layout ---
    let body = match (view, staged) {
        (View::Workspace, Some((png, name, dimensions))) => rsx! {
            main { class: "workspace",
                div { class: "column",
                    StagedCanvas {
                        png,
                        name,
                        dimensions,
                        on_sample,
                    }
                    KeyControls {
                        color,
                        parameters,
                        on_sensitivity,
                        on_smoothing,
                    }
                }
                div { class: "column",
                    ResultView {
                        image: result.clone(),
                        loading,
                        error: failure,
                    }
                    ActionBar {
                        can_download: result.is_some(),
                        on_download,
                        on_reset,
                    }
                    FileUpload { on_upload, compact: true }
                }
            }
        },
        _ => rsx! {
            main { class: "landing",
                FileUpload { on_upload }
            }
        },
    };

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { "Chroma Key" }
                p { class: "text-muted",
                    "Click a color in your image to make it transparent"
                }
            }

            if let Some(ref message) = notice() {
                div { class: "banner banner-error", role: "alert",
                    span { "{message}" }
                    button {
                        class: "banner-dismiss",
                        aria_label: "Dismiss",
                        onclick: move |_| notice.set(None),
                        "\u{d7}"
                    }
                }
            }

            {body}
        }
    }
}
