// ============================================================================
// ATTACHMENTS VIEW - Subida de archivos y enlaces de descarga
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{
    append_child, field_value, on_enter, read_selected_file, set_field_value, set_text_content, text_element, ElementBuilder,
};
use crate::utils::format::format_file_size;
use crate::utils::i18n::tr;
use crate::viewmodels::lookup::user_name;
use crate::viewmodels::AttachmentsViewModel;

pub fn render_attachments(vm: &AttachmentsViewModel) -> Result<Element, JsValue> {
    let file_input = ElementBuilder::new("input")?
        .class("file-input")
        .attr("type", "file")?
        .build();

    let upload = {
        let vm = vm.clone();
        let input = file_input.clone();
        ElementBuilder::new("button")?
            .class("btn-primary")
            .text(&tr(if vm.is_uploading() { "loading" } else { "upload" }))
            .flag("disabled", vm.is_uploading())?
            .on_click(move |_| {
                let vm = vm.clone();
                let input = input.clone();
                spawn_local(async move {
                    match read_selected_file(&input).await {
                        Ok(Some(file)) => {
                            log::info!("📎 [ATTACHMENTS] Subiendo {} ({} bytes)", file.file_name, file.bytes.len());
                            if vm.upload(file).await {
                                set_field_value(&input, "");
                            }
                        }
                        Ok(None) => log::debug!("📎 [ATTACHMENTS] Ningún archivo seleccionado"),
                        Err(e) => log::error!("❌ [ATTACHMENTS] No se pudo leer el archivo: {:?}", e),
                    }
                });
            })?
            .build()
    };

    // Búsqueda por nombre de archivo
    let search = ElementBuilder::new("input")?
        .class("search-input")
        .attr("type", "search")?
        .attr("placeholder", &tr("search"))?
        .attr("value", &vm.list().scope().search)?
        .build();
    {
        let list = vm.list().clone();
        let input = search.clone();
        on_enter(&search, move || {
            let list = list.clone();
            let text = field_value(&input);
            spawn_local(async move { list.search(&text).await });
        })?;
    }

    let page = ElementBuilder::new("div")?
        .class("attachments-page")
        .child(text_element("h2", "page-title", &tr("attachments"))?)?
        .child(ElementBuilder::new("div")?.class("upload-bar").child(file_input)?.child(upload)?.build())?
        .child(search)?
        .build();

    let state = vm.list().state();
    let body = match state.latest() {
        _ if state.error().is_some() => text_element("p", "error", &tr("load_failed"))?,
        None => text_element("p", "list-loading", &tr("loading"))?,
        Some(rows) if rows.is_empty() => text_element("p", "list-empty", &tr("empty"))?,
        Some(rows) => {
            let list = ElementBuilder::new("ul")?.class("attachment-list").build();
            for attachment in rows {
                let link = ElementBuilder::new("a")?
                    .attr("href", &vm.download_url(attachment))?
                    .attr("target", "_blank")?
                    .attr("download", &attachment.file_name)?
                    .text(&attachment.file_name)
                    .build();
                let uploader = text_element("span", "uploader", "…")?;
                {
                    let client = vm.list().context().client.clone();
                    let uploader_id = attachment.uploaded_by_id.clone();
                    let cell = uploader.clone();
                    spawn_local(async move {
                        let name = user_name(&client, uploader_id.as_deref()).await;
                        set_text_content(&cell, &name);
                    });
                }
                let item = ElementBuilder::new("li")?
                    .child(link)?
                    .child(text_element("span", "file-size", &format_file_size(attachment.file_size))?)?
                    .child(uploader)?
                    .build();
                append_child(&list, &item)?;
            }
            list
        }
    };
    append_child(&page, &body)?;
    Ok(page)
}
