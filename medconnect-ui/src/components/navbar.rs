//! Navbar Component
//!
//! Header with the role-aware logo link, the avatar and logout.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::global::use_global_state;
use crate::state::AppRoute;

#[component]
pub fn Navbar() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    // Refetch the account whenever the token changes
    let navigate_on_expiry = navigate.clone();
    create_effect(move |_| {
        if state.token.get().is_none() {
            return;
        }
        let navigate = navigate_on_expiry.clone();
        spawn_local(async move {
            match api::me().await {
                Ok(user) => state.set_user(user),
                Err(e) => {
                    if state.handle_failure(&e, "Error fetching user") {
                        navigate(AppRoute::Login.path(), Default::default());
                    }
                }
            }
        });
    });

    let logo_href = move || AppRoute::home(state.role.get()).path().to_string();
    let avatar = move || {
        let path = state.user.get().and_then(|u| u.profile_image);
        api::image_url(&api::get_api_base(), path.as_deref())
    };

    let on_logout = move |_| {
        state.logout();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <nav class="bg-white shadow">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    <A href=logo_href class="flex items-center space-x-2">
                        <span class="text-2xl">"🩺"</span>
                        <span class="text-xl font-bold text-blue-700">"MedConnect"</span>
                    </A>

                    <Show when=move || state.is_signed_in()>
                        <div class="flex items-center space-x-4">
                            <A href=AppRoute::Profile.path()>
                                <img
                                    src=avatar
                                    alt="Profile"
                                    class="w-10 h-10 rounded-full object-cover border"
                                />
                            </A>
                            <button
                                on:click=on_logout.clone()
                                class="px-4 py-2 rounded-lg bg-red-500 hover:bg-red-600 text-white"
                            >
                                "Logout"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </nav>
    }
}
