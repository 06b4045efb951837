//! File upload component with drag-and-drop and file picker.

use chromakey_session::UploadedFile;
use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the first dropped or picked file.
    on_upload: EventHandler<UploadedFile>,
    /// Render as a slim "replace image" strip instead of the full drop
    /// target.
    #[props(default)]
    compact: bool,
}

/// A drag-and-drop zone with a file picker button.
///
/// Reads the first file and hands it over unvalidated: deciding whether
/// it is an image belongs to the session, so a rejected file never
/// disturbs the current workspace.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut read_error = use_signal(|| Option::<String>::None);

    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        match file.read_bytes().await {
            Ok(bytes) => {
                read_error.set(None);
                props
                    .on_upload
                    .call(UploadedFile::from_name(name, bytes.to_vec()));
            }
            Err(e) => {
                log::warn!("failed to read {name}: {e}");
                read_error.set(Some(format!("Failed to read file: {e}")));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = match (props.compact, dragging()) {
        (false, false) => "drop-zone",
        (false, true) => "drop-zone dragover",
        (true, false) => "drop-zone compact",
        (true, true) => "drop-zone compact dragover",
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref err) = read_error() {
                p { class: "text-error", "{err}" }
            }

            if props.compact {
                span { class: "text-muted", "Drop another image here or " }
            } else {
                p { class: "drop-title", "Drop an image here" }
                p { class: "text-muted", "or" }
            }

            label { class: "btn btn-primary",
                input {
                    r#type: "file",
                    accept: "image/*",
                    class: "hidden",
                    onchange: handle_files,
                }
                if props.compact { "Replace image" } else { "Choose File" }
            }

            if !props.compact {
                p { class: "text-muted small", "JPG, PNG, WEBP, BMP, GIF" }
            }
        }
    }
}
