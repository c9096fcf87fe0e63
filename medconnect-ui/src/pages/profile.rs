//! Profile Page
//!
//! View and edit name, email, password and avatar. A selected image is
//! previewed from a local read before anything is uploaded.

use leptos::*;
use leptos_router::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::api;
use crate::components::Loading;
use crate::state::global::use_global_state;
use crate::state::models::UserProfile;
use crate::state::AppRoute;

const PROFILE_UPDATED: &str = "Profile updated!";
const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

#[component]
pub fn Profile() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (loading, set_loading) = create_signal(true);
    let profile = create_rw_signal(None::<UserProfile>);
    let (editing, set_editing) = create_signal(false);
    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let image = create_rw_signal(None::<web_sys::File>);
    let (preview, set_preview) = create_signal(None::<String>);
    let (saving, set_saving) = create_signal(false);

    let reset_form = move |p: &UserProfile| {
        set_name.set(p.name.clone());
        set_email.set(p.email.clone());
        set_password.set(String::new());
        image.set(None);
        set_preview.set(None);
    };

    let mount_navigate = navigate.clone();
    create_effect(move |_| {
        let navigate = mount_navigate.clone();
        spawn_local(async move {
            match api::profile().await {
                Ok(p) => {
                    reset_form(&p);
                    profile.set(Some(p));
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error fetching profile") {
                        navigate(AppRoute::Login.path(), Default::default());
                    }
                }
            }
            set_loading.set(false);
        });
    });

    // Local read only, nothing is sent until Save
    let on_file = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Ok(reader) = web_sys::FileReader::new() else {
            return;
        };

        let onload = {
            let reader = reader.clone();
            Closure::wrap(Box::new(move |_: web_sys::Event| {
                if let Some(url) = reader.result().ok().and_then(|r| r.as_string()) {
                    set_preview.set(Some(url));
                }
            }) as Box<dyn FnMut(_)>)
        };
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        if reader.read_as_data_url(&file).is_ok() {
            image.set(Some(file));
        }
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let file = image.get_untracked();
            let result = api::update_profile(
                name.get_untracked().trim(),
                email.get_untracked().trim(),
                &password.get_untracked(),
                file.as_ref(),
            )
            .await;

            match result {
                Ok(updated) => {
                    // Keep the navbar avatar in step
                    state.user.update(|user| {
                        if let Some(user) = user {
                            user.name = updated.name.clone();
                            user.email = updated.email.clone();
                            user.profile_image = updated.profile_image.clone();
                        }
                    });
                    reset_form(&updated);
                    profile.set(Some(updated));
                    set_editing.set(false);
                    state.show_success(PROFILE_UPDATED);
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error updating profile") {
                        navigate(AppRoute::Login.path(), Default::default());
                    } else {
                        state.show_error(&e.user_message(PROFILE_UPDATE_FAILED));
                    }
                }
            }
            set_saving.set(false);
        });
    };

    let on_cancel = move |_| {
        if let Some(p) = profile.get_untracked() {
            reset_form(&p);
        }
        set_editing.set(false);
    };

    let avatar = move || {
        preview.get().unwrap_or_else(|| {
            let path = profile.get().and_then(|p| p.profile_image);
            api::image_url(&api::get_api_base(), path.as_deref())
        })
    };

    view! {
        <div class="max-w-2xl space-y-6">
            <h1 class="text-3xl font-bold">"My Profile"</h1>

            {move || {
                if loading.get() {
                    return view! { <Loading /> }.into_view();
                }
                let Some(p) = profile.get() else {
                    return view! { <p class="text-gray-500">"Profile unavailable"</p> }.into_view();
                };
                view! {
                    <section class="bg-white rounded-xl shadow p-6 flex items-center space-x-6">
                        <img src=avatar alt="Profile" class="w-24 h-24 rounded-full object-cover border" />
                        <div>
                            <p class="text-xl font-semibold">{p.name}</p>
                            <p class="text-gray-600">{p.email}</p>
                            <p class="text-sm text-gray-400">
                                {format!("Member since {}", p.created_at.format("%Y-%m-%d"))}
                            </p>
                        </div>
                    </section>
                }.into_view()
            }}

            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <button
                        on:click=move |_| set_editing.set(true)
                        class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                    >
                        "Edit Profile"
                    </button>
                }
            >
                <form on:submit=on_save.clone() class="bg-white rounded-xl shadow p-6 space-y-4">
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        class="w-full border rounded-lg px-4 py-2"
                    />
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        class="w-full border rounded-lg px-4 py-2"
                    />
                    <input
                        type="password"
                        placeholder="New password (leave blank to keep)"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full border rounded-lg px-4 py-2"
                    />
                    <input type="file" accept="image/*" on:change=on_file />
                    <div class="flex space-x-2">
                        <button
                            type="submit"
                            disabled=move || saving.get()
                            class="px-4 py-2 rounded-lg bg-green-600 hover:bg-green-700 disabled:bg-gray-400 text-white"
                        >
                            {move || if saving.get() { "Saving..." } else { "Save" }}
                        </button>
                        <button
                            type="button"
                            on:click=on_cancel
                            class="px-4 py-2 rounded-lg bg-gray-200 hover:bg-gray-300"
                        >
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
        </div>
    }
}
