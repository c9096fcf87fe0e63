//! App Root Component
//!
//! Routing, the global state provider, and the signed-in chrome.

use leptos::*;
use leptos_router::*;

use crate::components::{Navbar, Sidebar, Toast};
use crate::pages::{
    AdminDashboard, AdminDoctors, DoctorDashboard, Login, PatientDashboard, Profile, Register,
};
use crate::state::global::{provide_global_state, use_global_state};
use crate::state::AppRoute;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen flex flex-col">
                <Navbar />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path=AppRoute::Login.path() view=Login />
                        <Route path=AppRoute::Register.path() view=Register />
                        <Route path=AppRoute::PatientDashboard.path() view=|| view! { <Shell><PatientDashboard /></Shell> } />
                        <Route path=AppRoute::DoctorDashboard.path() view=|| view! { <Shell><DoctorDashboard /></Shell> } />
                        <Route path=AppRoute::AdminDashboard.path() view=|| view! { <Shell><AdminDashboard /></Shell> } />
                        <Route path=AppRoute::AdminDoctors.path() view=|| view! { <Shell><AdminDoctors /></Shell> } />
                        <Route path=AppRoute::Profile.path() view=|| view! { <Shell><Profile /></Shell> } />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Role dashboard when signed in, else the login page
#[component]
fn Home() -> impl IntoView {
    let state = use_global_state();
    let target = AppRoute::home(state.role.get_untracked());
    view! { <Redirect path=target.path() /> }
}

/// Sidebar beside a signed-in page. Signed-out visitors go to login.
#[component]
fn Shell(children: ChildrenFn) -> impl IntoView {
    let state = use_global_state();

    view! {
        <Show
            when=move || state.is_signed_in()
            fallback=|| view! { <Redirect path=AppRoute::Login.path() /> }
        >
            <div class="flex gap-8">
                <Sidebar />
                <div class="flex-1">{children()}</div>
            </div>
        </Show>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <A href="/" class="mt-4 px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg">
                "Go Home"
            </A>
        </div>
    }
}
