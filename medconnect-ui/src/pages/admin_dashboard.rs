//! Admin Dashboard
//!
//! Every appointment in the clinic, read-only.

use leptos::*;
use leptos_router::*;

use super::format_date;
use crate::api;
use crate::components::Loading;
use crate::state::global::use_global_state;
use crate::state::models::{Appointment, Role};
use crate::state::AppRoute;

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (loading, set_loading) = create_signal(true);
    let (name, set_name) = create_signal(None::<String>);
    let appointments = create_rw_signal(Vec::<Appointment>::new());

    create_effect(move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = match api::me().await {
                Ok(user) => {
                    set_name.set(Some(user.name));
                    api::appointments(Role::Admin).await.map(|list| appointments.set(list))
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                if state.handle_failure(&e, "Error fetching admin data") {
                    navigate(AppRoute::Login.path(), Default::default());
                }
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">
                {move || format!("Welcome, {}!", name.get().unwrap_or_else(|| Role::Admin.label().to_string()))}
            </h1>

            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"All Appointments"</h2>
                {move || {
                    if loading.get() {
                        return view! { <Loading /> }.into_view();
                    }
                    let rows = appointments.get();
                    if rows.is_empty() {
                        return view! { <p class="text-gray-500">"No appointments yet"</p> }.into_view();
                    }
                    view! {
                        <table class="w-full text-left">
                            <thead>
                                <tr class="border-b text-gray-500">
                                    <th class="py-2">"ID"</th>
                                    <th>"Patient"</th>
                                    <th>"Doctor"</th>
                                    <th>"Date"</th>
                                    <th>"Time"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|a| view! {
                                    <tr class="border-b">
                                        <td class="py-2">{a.id}</td>
                                        <td>{a.patient.name}</td>
                                        <td>{a.doctor.user.name}</td>
                                        <td>{format_date(a.date)}</td>
                                        <td>{a.time_slot}</td>
                                        <td class="capitalize">{a.status.to_string()}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view()
                }}
            </section>
        </div>
    }
}
