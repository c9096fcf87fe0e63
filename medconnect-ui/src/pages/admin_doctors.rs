//! Admin Doctors Page
//!
//! Every doctor profile. Approving flips that one row in place.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::components::Loading;
use crate::state::global::use_global_state;
use crate::state::list::{approval_label, patch_row};
use crate::state::models::DoctorProfile;
use crate::state::AppRoute;

const APPROVE_FAILED: &str = "Failed to approve doctor";

#[component]
pub fn AdminDoctors() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (loading, set_loading) = create_signal(true);
    let doctors = create_rw_signal(Vec::<DoctorProfile>::new());

    let mount_navigate = navigate.clone();
    create_effect(move |_| {
        let navigate = mount_navigate.clone();
        spawn_local(async move {
            match api::all_doctors().await {
                Ok(list) => doctors.set(list),
                Err(e) => {
                    if state.handle_failure(&e, "Error fetching doctors") {
                        navigate(AppRoute::Login.path(), Default::default());
                    }
                }
            }
            set_loading.set(false);
        });
    });

    let approve = move |id: i64| {
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::approve_doctor(id).await {
                Ok(_) => doctors.update(|rows| {
                    patch_row(rows, id, |d| d.approved = true);
                }),
                Err(e) => {
                    if state.handle_failure(&e, "Error approving doctor") {
                        navigate(AppRoute::Login.path(), Default::default());
                    } else {
                        state.show_error(&e.user_message(APPROVE_FAILED));
                    }
                }
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Doctors"</h1>

            <section class="bg-white rounded-xl shadow p-6">
                {move || {
                    if loading.get() {
                        return view! { <Loading /> }.into_view();
                    }
                    let rows = doctors.get();
                    if rows.is_empty() {
                        return view! { <p class="text-gray-500">"No doctors registered"</p> }.into_view();
                    }
                    let approve = approve.clone();
                    view! {
                        <table class="w-full text-left">
                            <thead>
                                <tr class="border-b text-gray-500">
                                    <th class="py-2">"ID"</th>
                                    <th>"Name"</th>
                                    <th>"Email"</th>
                                    <th>"Specialization"</th>
                                    <th>"Experience"</th>
                                    <th>"Fees"</th>
                                    <th>"Status"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|d| {
                                    let approve = approve.clone();
                                    let id = d.id;
                                    let label = approval_label(&d);
                                    view! {
                                        <tr class="border-b">
                                            <td class="py-2">{d.id}</td>
                                            <td>{d.user.name}</td>
                                            <td>{d.user.email}</td>
                                            <td>{d.specialization}</td>
                                            <td>{format!("{} yrs", d.experience)}</td>
                                            <td>{format!("₹{}", d.fees)}</td>
                                            <td>{label}</td>
                                            <td>
                                                {(!d.approved).then(|| view! {
                                                    <button
                                                        on:click=move |_| approve(id)
                                                        class="px-3 py-1 rounded bg-green-600 hover:bg-green-700 text-white"
                                                    >
                                                        "Approve"
                                                    </button>
                                                })}
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }}
            </section>
        </div>
    }
}
