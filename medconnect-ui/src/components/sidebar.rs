//! Sidebar Component
//!
//! Role-gated links. "Doctors" is rendered for admins only.

use leptos::*;
use leptos_router::*;

use crate::state::global::use_global_state;
use crate::state::route::sidebar_links;
use crate::state::AppRoute;

#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let on_logout = move |_| {
        state.logout();
        navigate(AppRoute::Login.path(), Default::default());
    };

    view! {
        <aside class="w-56 bg-white shadow rounded-xl p-4 space-y-1 h-fit">
            {move || {
                state
                    .role
                    .get()
                    .map(|role| {
                        sidebar_links(role)
                            .into_iter()
                            .map(|(label, route)| view! {
                                <A
                                    href=route.path()
                                    class="block px-4 py-2 rounded-lg text-gray-700 hover:bg-blue-50"
                                    active_class="bg-blue-100 text-blue-700"
                                >
                                    {label}
                                </A>
                            })
                            .collect_view()
                    })
            }}
            <button
                on:click=on_logout
                class="w-full text-left px-4 py-2 rounded-lg text-red-600 hover:bg-red-50"
            >
                "Logout"
            </button>
        </aside>
    }
}
