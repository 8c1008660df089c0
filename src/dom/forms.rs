// ============================================================================
// FORMS - Campos de formulario con label y error
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{append_child, field_value, on_event, set_field_value, ElementBuilder};
use crate::models::FileUpload;
use crate::utils::i18n::tr;

/// Tipo de control de un campo
#[derive(Clone, Copy)]
pub enum Control<'a> {
    Input(&'a str),
    TextArea,
    Select(&'a [(&'a str, &'a str)]),
}

/// `<div class="form-group">` con label, control y mensaje de error opcional.
/// `on_change` recibe el valor en cada `input`.
pub fn form_group<F>(
    name: &str,
    label_key: &str,
    control: Control<'_>,
    value: &str,
    error_key: Option<&str>,
    on_change: F,
) -> Result<Element, JsValue>
where
    F: Fn(String) + 'static,
{
    let label = ElementBuilder::new("label")?
        .attr("for", name)?
        .text(&tr(label_key))
        .build();

    let field = match control {
        Control::Input(input_type) => ElementBuilder::new("input")?
            .attr("type", input_type)?
            .attr("id", name)?
            .attr("name", name)?
            .build(),
        Control::TextArea => ElementBuilder::new("textarea")?
            .attr("id", name)?
            .attr("rows", "4")?
            .build(),
        Control::Select(options) => {
            let select = ElementBuilder::new("select")?.attr("id", name)?.build();
            for (option_value, option_label) in options {
                let option = ElementBuilder::new("option")?
                    .attr("value", option_value)?
                    .text(option_label)
                    .build();
                append_child(&select, &option)?;
            }
            select
        }
    };
    set_field_value(&field, value);

    let field_ref = field.clone();
    let event = if matches!(control, Control::Select(_)) { "change" } else { "input" };
    on_event(&field, event, move |_| on_change(field_value(&field_ref)))?;

    let group = ElementBuilder::new("div")?
        .class(if error_key.is_some() { "form-group has-error" } else { "form-group" })
        .child(label)?
        .child(field)?
        .build();

    if let Some(key) = error_key {
        let error = ElementBuilder::new("span").map(|b| b.class("field-error").text(&tr(key)).build())?;
        append_child(&group, &error)?;
    }
    Ok(group)
}

/// Lee el primer archivo seleccionado en un `<input type="file">`
pub async fn read_selected_file(input: &Element) -> Result<Option<FileUpload>, JsValue> {
    let input = input
        .dyn_ref::<HtmlInputElement>()
        .ok_or_else(|| JsValue::from_str("Element is not an input"))?;
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };

    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let content_type = Some(file.type_()).filter(|t| !t.is_empty());

    Ok(Some(FileUpload {
        file_name: file.name(),
        content_type,
        bytes,
    }))
}
