//! The keyed result over a checkerboard, with the loading overlay.

use std::sync::Arc;

use dioxus::prelude::*;

/// Props for the [`ResultView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultViewProps {
    /// The newest accepted result as a `data:` URL.
    image: Option<Arc<str>>,
    /// Whether the newest request is still unresolved.
    loading: bool,
    /// Failure of the newest request, already formatted for display.
    error: Option<String>,
}

/// Shows the keyed image against a transparency checkerboard.
///
/// A failed request leaves the previous image in place and adds an
/// error banner above it.
#[component]
pub fn ResultView(props: ResultViewProps) -> Element {
    rsx! {
        div { class: "panel result",
            if let Some(ref err) = props.error {
                div { class: "banner banner-error", role: "alert", "{err}" }
            }

            div { class: "checkerboard",
                if let Some(ref src) = props.image {
                    img {
                        class: "result-image",
                        src: "{src}",
                        alt: "Keyed result",
                    }
                } else if !props.loading {
                    p { class: "text-muted placeholder", "The keyed image appears here" }
                }

                if props.loading {
                    div { class: "loading-overlay", aria_busy: "true",
                        div { class: "spinner" }
                        span { "Processing..." }
                    }
                }
            }
        }
    }
}
