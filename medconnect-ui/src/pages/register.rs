//! Register Page
//!
//! Only patient and doctor accounts can sign up.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::global::use_global_state;
use crate::state::models::{RegisterRequest, Role};
use crate::state::AppRoute;

const REGISTERED: &str = "Registration successful! Please log in.";
const REGISTRATION_FAILED: &str = "Registration failed";

#[component]
pub fn Register() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (role, set_role) = create_signal(Role::Patient);
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_submitting.set(true);

        let req = RegisterRequest {
            name: name.get().trim().to_string(),
            email: email.get().trim().to_string(),
            password: password.get(),
            role: role.get(),
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::register(&req).await {
                Ok(_) => {
                    state.show_success(REGISTERED);
                    navigate(AppRoute::Login.path(), Default::default());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Registration failed: {}", e).into());
                    state.show_error(&e.user_message(REGISTRATION_FAILED));
                }
            }
            set_submitting.set(false);
        });
    };

    let on_role = move |ev| {
        if let Ok(role) = event_target_value(&ev).parse::<Role>() {
            if role != Role::Admin {
                set_role.set(role);
            }
        }
    };

    view! {
        <div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow p-8">
            <h1 class="text-2xl font-bold mb-6 text-center">"Register"</h1>

            <form on:submit=on_submit class="space-y-4">
                <input
                    type="text"
                    placeholder="Full name"
                    required=true
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    class="w-full border rounded-lg px-4 py-3"
                />
                <input
                    type="email"
                    placeholder="Email"
                    required=true
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    class="w-full border rounded-lg px-4 py-3"
                />
                <input
                    type="password"
                    placeholder="Password"
                    required=true
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    class="w-full border rounded-lg px-4 py-3"
                />
                <select on:change=on_role class="w-full border rounded-lg px-4 py-3">
                    <option value="patient" selected=move || role.get() == Role::Patient>"Patient"</option>
                    <option value="doctor" selected=move || role.get() == Role::Doctor>"Doctor"</option>
                </select>
                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-green-600 hover:bg-green-700 disabled:bg-gray-400
                           text-white rounded-lg py-3 font-semibold"
                >
                    {move || if submitting.get() { "Registering..." } else { "Register" }}
                </button>
            </form>

            <p class="mt-4 text-center text-sm text-gray-600">
                "Already registered? "
                <A href=AppRoute::Login.path() class="text-blue-600">"Login"</A>
            </p>
        </div>
    }
}
