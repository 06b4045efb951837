//! Download and reset buttons.

use dioxus::prelude::*;

/// Props for the [`ActionBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ActionBarProps {
    /// Whether a result is available to download.
    can_download: bool,
    on_download: EventHandler<()>,
    on_reset: EventHandler<()>,
}

#[component]
pub fn ActionBar(props: ActionBarProps) -> Element {
    let on_download = props.on_download;
    let on_reset = props.on_reset;

    rsx! {
        div { class: "actions",
            button {
                class: if props.can_download { "btn btn-primary" } else { "btn btn-disabled" },
                disabled: !props.can_download,
                onclick: move |_| on_download.call(()),
                "Download PNG"
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| on_reset.call(()),
                "Start over"
            }
        }
    }
}
