//! Key color readout and the sensitivity/smoothing sliders.

use chromakey_session::types::{SENSITIVITY_RANGE, SMOOTHING_RANGE};
use chromakey_session::{Parameters, ReferenceColor};
use dioxus::prelude::*;

/// Props for the [`KeyControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct KeyControlsProps {
    /// The sampled key color.
    color: ReferenceColor,
    /// Current slider values.
    parameters: Parameters,
    /// Called on every sensitivity slider movement.
    on_sensitivity: EventHandler<u32>,
    /// Called on every smoothing slider movement.
    on_smoothing: EventHandler<u32>,
}

#[component]
pub fn KeyControls(props: KeyControlsProps) -> Element {
    let hex = props.color.hex();
    let on_sensitivity = props.on_sensitivity;
    let on_smoothing = props.on_smoothing;

    rsx! {
        div { class: "panel controls",
            div { class: "color-readout",
                span { class: "color-swatch", style: "background-color: {hex}" }
                span { class: "color-hex", "{hex}" }
            }

            {render_slider(
                "sensitivity",
                "Sensitivity",
                "How close a color must be to the key to be removed",
                props.parameters.sensitivity,
                (*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end()),
                move |v| on_sensitivity.call(v),
            )}

            {render_slider(
                "smoothing",
                "Smoothing",
                "Softens the edges of the removed region",
                props.parameters.smoothing,
                (*SMOOTHING_RANGE.start(), *SMOOTHING_RANGE.end()),
                move |v| on_smoothing.call(v),
            )}
        }
    }
}

/// Render a labeled integer range slider with its current value.
fn render_slider(
    id: &str,
    label: &str,
    description: &str,
    value: u32,
    (min, max): (u32, u32),
    on_input: impl Fn(u32) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let description = description.to_string();

    rsx! {
        div { class: "slider",
            div { class: "slider-header",
                label { r#for: "{id}", "{label}" }
                span { class: "slider-value", "{value}" }
            }
            p { class: "text-muted small", "{description}" }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "1",
                value: "{value}",
                oninput: move |e| {
                    match e.value().parse::<u32>() {
                        Ok(v) => on_input(v),
                        Err(err) => log::warn!("slider parse failure: {err:?} from {:?}", e.value()),
                    }
                },
            }
        }
    }
}
