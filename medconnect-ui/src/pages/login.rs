//! Login Page

use leptos::*;
use leptos_router::*;

use crate::api::{self, ApiResult};
use crate::state::global::{use_global_state, GlobalState};
use crate::state::models::{LoginRequest, User};
use crate::state::AppRoute;

const LOGIN_FAILED: &str = "Login failed";

/// Store the token, then ask who it belongs to
async fn sign_in(state: GlobalState, req: &LoginRequest) -> ApiResult<User> {
    let token = api::login(req).await?;
    state.set_token(&token.access_token);
    api::me().await
}

#[component]
pub fn Login() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);
    let (failure, set_failure) = create_signal(None::<String>);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_submitting.set(true);
        set_failure.set(None);

        let req = LoginRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            match sign_in(state, &req).await {
                Ok(user) => {
                    let home = AppRoute::dashboard(user.role);
                    state.set_user(user);
                    navigate(home.path(), Default::default());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Login failed: {}", e).into());
                    // No token stays stored after a failed login
                    state.sign_out();
                    set_failure.set(Some(e.user_message(LOGIN_FAILED)));
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-md mx-auto mt-16 bg-white rounded-xl shadow p-8">
            <h1 class="text-2xl font-bold mb-6 text-center">"Login"</h1>

            {move || failure.get().map(|msg| view! {
                <div class="mb-4 px-4 py-3 rounded-lg bg-red-100 text-red-700">{msg}</div>
            })}

            <form on:submit=on_submit class="space-y-4">
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
                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full bg-blue-600 hover:bg-blue-700 disabled:bg-gray-400
                           text-white rounded-lg py-3 font-semibold"
                >
                    {move || if submitting.get() { "Signing in..." } else { "Login" }}
                </button>
            </form>

            <p class="mt-4 text-center text-sm text-gray-600">
                "No account? "
                <A href=AppRoute::Register.path() class="text-blue-600">"Register"</A>
            </p>
        </div>
    }
}
