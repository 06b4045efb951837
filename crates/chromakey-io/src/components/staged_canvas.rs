//! The staged image, clickable for color sampling.

use std::sync::Arc;

use chromakey_session::{Dimensions, DisplayPoint, DisplaySize};
use dioxus::prelude::*;

use crate::raster;

/// DOM id of the staged `<img>`, used to measure its laid-out size.
const CANVAS_ID: &str = "staged-canvas";

/// Props for the [`StagedCanvas`] component.
#[derive(Props, Clone)]
pub struct StagedCanvasProps {
    /// PNG bytes of the staged pixels. Shared so renders never copy them.
    png: Arc<[u8]>,
    /// Original file name, shown as alt text.
    name: String,
    /// Intrinsic size, used for the caption.
    dimensions: Dimensions,
    /// Called with the click point and the rendered size of the image.
    on_sample: EventHandler<(DisplayPoint, DisplaySize)>,
}

impl PartialEq for StagedCanvasProps {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.png, &other.png) && self.name == other.name
    }
}

/// Shows the staged image at responsive size and reports clicks in
/// on-screen coordinates together with the size it is displayed at.
#[component]
pub fn StagedCanvas(props: StagedCanvasProps) -> Element {
    // Track the current blob URL so it is revoked on re-render and on
    // unmount even if onload never fires.
    let mut prev_blob_url: Signal<Option<String>> = use_signal(|| None);
    {
        let prev_blob_url = prev_blob_url;
        use_drop(move || {
            if let Some(ref url) = *prev_blob_url.peek() {
                raster::revoke_blob_url(url);
            }
        });
    }

    if let Some(ref prev) = prev_blob_url.take() {
        raster::revoke_blob_url(prev);
    }

    let on_sample = props.on_sample;
    let onclick = move |evt: MouseEvent| {
        let at = evt.element_coordinates();
        match displayed_size(CANVAS_ID) {
            Some(size) => on_sample.call((DisplayPoint::new(at.x, at.y), size)),
            None => log::warn!("staged image has no layout box; click ignored"),
        }
    };

    let Dimensions { width, height } = props.dimensions;
    match raster::png_to_blob_url(&props.png) {
        Ok(url) => {
            prev_blob_url.set(Some(url.clone()));
            rsx! {
                figure { class: "panel",
                    img {
                        id: CANVAS_ID,
                        class: "staged-image",
                        src: "{url}",
                        alt: "{props.name}",
                        draggable: false,
                        onclick: onclick,
                    }
                    figcaption { class: "text-muted small",
                        "{props.name} ({width}\u{d7}{height}). Click a pixel to pick the key color."
                    }
                }
            }
        }
        Err(e) => rsx! {
            p { class: "text-error", "Failed to display {props.name}: {e}" }
        },
    }
}

/// Laid-out size of the element with `id`, in CSS pixels.
fn displayed_size(id: &str) -> Option<DisplaySize> {
    let element = web_sys::window()?.document()?.get_element_by_id(id)?;
    let rect = element.get_bounding_client_rect();
    Some(DisplaySize::new(rect.width(), rect.height()))
}
