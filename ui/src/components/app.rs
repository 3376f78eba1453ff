use dioxus::prelude::*;

use orderdesk_common::session::{gate, GateDecision, IdentityProvider, Session};

use super::identity::{is_plausible_email, use_identity, LocalIdentity};
use super::notifications::use_notification_session;
use super::orders_page::OrdersPage;

#[derive(Clone, Debug, PartialEq, Routable)]
pub enum Route {
    #[route("/")]
    Dashboard {},
    #[redirect("/orders", || Route::Dashboard {})]
    #[route("/login")]
    Login {},
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| Signal::new(LocalIdentity::load()));

    rsx! { Router::<Route> {} }
}

/// Route component: the session gate in front of the dashboard.
#[component]
fn Dashboard() -> Element {
    let identity = use_identity();
    let nav = use_navigator();

    let session = identity.read().current_session();
    match gate(session) {
        GateDecision::Render(session) => rsx! { SessionShell { session } },
        GateDecision::Redirect(path) => {
            let target = path.parse::<Route>().unwrap_or(Route::Login {});
            nav.replace(target);
            rsx! {}
        }
    }
}

/// Everything that lives for one authenticated session.
///
/// Owns the push subscription; unmounting it (sign out) tears the listener down.
#[component]
fn SessionShell(session: Session) -> Element {
    let mut identity = use_identity();
    let notifications = use_notification_session();

    rsx! {
        div { class: "orderdesk-app",
            header { class: "app-header",
                h1 { "OrderDesk" }
                div { class: "user-info",
                    span { class: "user-email", "{session.email}" }
                    button {
                        onclick: move |_| identity.write().sign_out(),
                        "Sign out"
                    }
                }
            }
            main {
                OrdersPage { notifications }
            }
        }
    }
}

#[component]
fn Login() -> Element {
    let mut identity = use_identity();
    let nav = use_navigator();
    let mut email_input = use_signal(String::new);
    let mut login_error = use_signal(|| None::<String>);

    let can_submit = use_memo(move || is_plausible_email(email_input.read().trim()));

    if identity.read().current_session().is_some() {
        nav.replace(Route::Dashboard {});
        return rsx! {};
    }

    let submit = move |_| {
        let email = email_input.read().trim().to_string();
        let signed_in = identity.write().sign_in(&email);
        match signed_in {
            Some(_) => {
                nav.replace(Route::Dashboard {});
            }
            None => login_error.set(Some("Enter a valid email address".into())),
        }
    };

    rsx! {
        div { class: "orderdesk-app",
            div { class: "login",
                h1 { "Sign in to OrderDesk" }
                div { class: "form-group",
                    label { "Email:" }
                    input {
                        r#type: "email",
                        placeholder: "you@restaurant.com",
                        value: "{email_input}",
                        oninput: move |evt| {
                            email_input.set(evt.value());
                            login_error.set(None);
                        },
                    }
                    if let Some(err) = login_error.read().as_ref() {
                        span { class: "field-error", "{err}" }
                    }
                }
                button {
                    disabled: !can_submit(),
                    onclick: submit,
                    "Sign in"
                }
            }
        }
    }
}
