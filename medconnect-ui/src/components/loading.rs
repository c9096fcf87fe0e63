//! Loading Component

use leptos::*;

/// Full-page loading spinner
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-12 space-x-3 text-gray-500">
            <div class="loading-spinner w-8 h-8" />
            <span>"Loading..."</span>
        </div>
    }
}
