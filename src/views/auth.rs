// ============================================================================
// AUTH VIEWS - Login, registro y perfil
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

use crate::dom::{append_child, button, clear_children, form_group, text_element, Control, ElementBuilder};
use crate::models::RegisterInput;
use crate::state::Route;
use crate::utils::i18n::tr;
use crate::viewmodels::lookup::current_user;
use crate::viewmodels::AuthViewModel;
use crate::views::layout::show_errors;

/// Pantalla de login
pub fn render_login(vm: &AuthViewModel) -> Result<Element, JsValue> {
    log::info!("🎬 [LOGIN] render_login()");
    let form = vm.login_form();
    let values = form.values();
    let errors = ElementBuilder::new("div")?.class("form-errors").build();
    show_errors(&errors, &form.errors());

    let email_group = {
        let form = form.clone();
        form_group("email", "email", Control::Input("email"), &values.email, None, move |v| {
            form.update(|f| f.email = v)
        })?
    };
    let password_group = {
        let form = form.clone();
        form_group("password", "password", Control::Input("password"), &values.password, None, move |v| {
            form.update(|f| f.password = v)
        })?
    };

    let submit = {
        let vm = vm.clone();
        let errors = errors.clone();
        button("btn-primary btn-login", &tr("login"), move |_| {
            let vm = vm.clone();
            let errors = errors.clone();
            spawn_local(async move {
                if let Err(e) = vm.submit_login().await {
                    if let Some(fields) = e.validation() {
                        show_errors(&errors, fields);
                    }
                }
            });
        })?
    };

    let nav = vm.context().navigator.clone();
    let register_link = button("btn-link", &tr("no_account"), move |_| nav.navigate(Route::Register))?;

    Ok(ElementBuilder::new("div")?
        .class("login-screen")
        .child(
            ElementBuilder::new("div")?
                .class("login-container")
                .child(text_element("h1", "login-title", &tr("login_title"))?)?
                .child(email_group)?
                .child(password_group)?
                .child(errors)?
                .child(submit)?
                .child(register_link)?
                .build(),
        )?
        .build())
}

/// Pantalla de registro
pub fn render_register(vm: &AuthViewModel) -> Result<Element, JsValue> {
    let form = vm.register_form();
    let values = form.values();
    let errors = ElementBuilder::new("div")?.class("form-errors").build();
    show_errors(&errors, &form.errors());

    let field = |name: &str, label: &str, kind: &'static str, value: &str, set: fn(&mut RegisterInput, String)| {
        let form = form.clone();
        form_group(name, label, Control::Input(kind), value, None, move |v| form.update(|i| set(i, v)))
    };
    let first_name = field("firstName", "first_name", "text", &values.first_name, |i, v| i.first_name = v)?;
    let last_name = field("lastName", "last_name", "text", &values.last_name, |i, v| i.last_name = v)?;
    let email = field("email", "email", "email", &values.email, |i, v| i.email = v)?;
    let password = field("password", "password", "password", &values.password, |i, v| i.password = v)?;

    let submit = {
        let vm = vm.clone();
        let errors = errors.clone();
        button("btn-primary", &tr("register"), move |_| {
            let vm = vm.clone();
            let errors = errors.clone();
            spawn_local(async move {
                if let Err(e) = vm.submit_register().await {
                    if let Some(fields) = e.validation() {
                        show_errors(&errors, fields);
                    }
                }
            });
        })?
    };

    let nav = vm.context().navigator.clone();
    let login_link = button("btn-link", &tr("have_account"), move |_| nav.navigate(Route::Login))?;

    Ok(ElementBuilder::new("div")?
        .class("login-screen")
        .child(
            ElementBuilder::new("div")?
                .class("login-container")
                .child(text_element("h1", "login-title", &tr("register_title"))?)?
                .children([first_name, last_name, email, password, errors, submit, login_link])?
                .build(),
        )?
        .build())
}

/// Perfil del usuario actual
pub fn render_profile(vm: &AuthViewModel) -> Result<Element, JsValue> {
    let details = ElementBuilder::new("div")?
        .class("profile-details")
        .text(&tr("loading"))
        .build();

    {
        let client = vm.context().client.clone();
        let details = details.clone();
        spawn_local(async move {
            clear_children(&details);
            match current_user(&client).await {
                Ok(user) => {
                    let name = user.display_name().unwrap_or_else(|| "—".to_string());
                    let email = user.email.unwrap_or_default();
                    for (class, text) in [("profile-name", name), ("profile-email", email)] {
                        if let Err(e) = text_element("p", class, &text).and_then(|line| append_child(&details, &line)) {
                            log::error!("❌ [PROFILE] render: {:?}", e);
                        }
                    }
                }
                Err(e) => {
                    log::warn!("⚠️ [PROFILE] {}", e);
                    if let Err(e) = text_element("p", "error", &tr("load_failed")).and_then(|line| append_child(&details, &line)) {
                        log::error!("❌ [PROFILE] render: {:?}", e);
                    }
                }
            }
        });
    }

    let auth = vm.clone();
    Ok(ElementBuilder::new("div")?
        .class("profile-page")
        .child(text_element("h2", "page-title", &tr("profile"))?)?
        .child(details)?
        .child(button("btn-secondary", &tr("logout"), move |_| auth.logout())?)?
        .build())
}
