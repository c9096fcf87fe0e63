//! Doctor Dashboard
//!
//! Exactly one of three branches: the profile creation form when no profile
//! exists, the pending-approval notice, or the appointments table with
//! Confirm and Reject on pending rows.

use leptos::*;
use leptos_router::*;

use super::format_date;
use crate::api;
use crate::components::Loading;
use crate::state::forms::DoctorProfileForm;
use crate::state::global::use_global_state;
use crate::state::list::patch_row;
use crate::state::models::{Appointment, AppointmentStatus, DoctorProfile, Role};
use crate::state::AppRoute;

const PROFILE_SUBMITTED: &str = "Profile submitted! Waiting for admin approval.";
const PROFILE_SUBMIT_FAILED: &str = "Failed to submit profile";
const STATUS_UPDATE_FAILED: &str = "Failed to update appointment status";

#[component]
pub fn DoctorDashboard() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (loading, set_loading) = create_signal(true);
    let (name, set_name) = create_signal(None::<String>);
    let profile = create_rw_signal(None::<DoctorProfile>);
    let appointments = create_rw_signal(Vec::<Appointment>::new());
    let (show_form, set_show_form) = create_signal(false);
    let form = create_rw_signal(DoctorProfileForm::default());
    let (submitted, set_submitted) = create_signal(None::<&'static str>);

    let expired = {
        let navigate = navigate.clone();
        move || navigate(AppRoute::Login.path(), Default::default())
    };

    // Profile, then appointments only for an approved profile
    let load_profile = {
        let expired = expired.clone();
        move || {
            let expired = expired.clone();
            async move {
                match api::my_doctor_profile().await {
                    Ok(None) => {
                        web_sys::console::info_1(&"No doctor profile yet".into());
                        profile.set(None);
                    }
                    Ok(Some(found)) => {
                        let approved = found.approved;
                        profile.set(Some(found));
                        if approved {
                            match api::appointments(Role::Doctor).await {
                                Ok(list) => appointments.set(list),
                                Err(e) => {
                                    if state.handle_failure(&e, "Error fetching appointments") {
                                        expired();
                                    }
                                }
                            }
                        }
                    }
                    Err(e) => {
                        if state.handle_failure(&e, "Error fetching doctor profile") {
                            expired();
                        }
                    }
                }
            }
        }
    };

    let mount_load = load_profile.clone();
    let mount_expired = expired.clone();
    create_effect(move |_| {
        let load_profile = mount_load.clone();
        let expired = mount_expired.clone();
        spawn_local(async move {
            match api::me().await {
                Ok(user) => {
                    set_name.set(Some(user.name));
                    load_profile().await;
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error fetching doctor data") {
                        expired();
                    }
                }
            }
            set_loading.set(false);
        });
    });

    let submit_expired = expired.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = match form.get().to_request() {
            Ok(req) => req,
            Err(msg) => {
                state.show_error(&msg);
                return;
            }
        };
        let load_profile = load_profile.clone();
        let expired = submit_expired.clone();
        spawn_local(async move {
            match api::create_doctor_profile(&req).await {
                Ok(_) => {
                    set_submitted.set(Some(PROFILE_SUBMITTED));
                    set_show_form.set(false);
                    load_profile().await;
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error submitting profile") {
                        expired();
                    } else {
                        state.show_error(&e.user_message(PROFILE_SUBMIT_FAILED));
                    }
                }
            }
        });
    };

    // One row changes, no refetch
    let set_status = move |id: i64, status: AppointmentStatus| {
        let expired = expired.clone();
        spawn_local(async move {
            match api::update_appointment_status(id, status).await {
                Ok(_) => {
                    appointments.update(|rows| {
                        patch_row(rows, id, |a| a.status = status);
                    });
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error updating appointment status") {
                        expired();
                    } else {
                        state.show_error(&e.user_message(STATUS_UPDATE_FAILED));
                    }
                }
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">
                {move || format!("Welcome, Dr. {}", name.get().unwrap_or_else(|| Role::Doctor.label().to_string()))}
            </h1>

            {move || submitted.get().map(|msg| view! {
                <div class="px-4 py-3 rounded-lg bg-green-100 text-green-700">{msg}</div>
            })}

            {move || {
                if loading.get() {
                    return view! { <Loading /> }.into_view();
                }
                match profile.get() {
                    None => {
                        let on_submit = on_submit.clone();
                        view! {
                            <section class="bg-white rounded-xl shadow p-6 space-y-4">
                                <p class="text-gray-700">"You haven't created your profile yet."</p>
                                <button
                                    on:click=move |_| set_show_form.update(|shown| *shown = !*shown)
                                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                                >
                                    {move || if show_form.get() { "Close Form" } else { "Create Profile" }}
                                </button>
                                <Show when=move || show_form.get()>
                                    <form on:submit=on_submit.clone() class="grid md:grid-cols-4 gap-4">
                                        <input
                                            type="text"
                                            placeholder="Specialization"
                                            prop:value=move || form.get().specialization
                                            on:input=move |ev| form.update(|f| f.specialization = event_target_value(&ev))
                                            class="border rounded-lg px-3 py-2"
                                        />
                                        <input
                                            type="number"
                                            placeholder="Experience (years)"
                                            prop:value=move || form.get().experience
                                            on:input=move |ev| form.update(|f| f.experience = event_target_value(&ev))
                                            class="border rounded-lg px-3 py-2"
                                        />
                                        <input
                                            type="number"
                                            placeholder="Fees"
                                            prop:value=move || form.get().fees
                                            on:input=move |ev| form.update(|f| f.fees = event_target_value(&ev))
                                            class="border rounded-lg px-3 py-2"
                                        />
                                        <button type="submit" class="bg-green-600 hover:bg-green-700 text-white rounded-lg px-4 py-2">
                                            "Submit"
                                        </button>
                                    </form>
                                </Show>
                            </section>
                        }.into_view()
                    }
                    Some(p) if !p.approved => view! {
                        <section class="bg-yellow-50 border border-yellow-200 rounded-xl p-6">
                            <p class="text-yellow-800">
                                "Your profile is awaiting admin approval. Appointments will appear once approved."
                            </p>
                        </section>
                    }.into_view(),
                    Some(_) => {
                        let set_status = set_status.clone();
                        view! { <DoctorAppointments appointments=appointments set_status=set_status /> }.into_view()
                    }
                }
            }}
        </div>
    }
}

#[component]
fn DoctorAppointments<F>(appointments: RwSignal<Vec<Appointment>>, set_status: F) -> impl IntoView
where
    F: Fn(i64, AppointmentStatus) + Clone + 'static,
{
    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <h2 class="text-xl font-semibold mb-4">"Appointments"</h2>
            {move || {
                let rows = appointments.get();
                if rows.is_empty() {
                    return view! { <p class="text-gray-500">"No appointments yet"</p> }.into_view();
                }
                let set_status = set_status.clone();
                view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="border-b text-gray-500">
                                <th class="py-2">"ID"</th>
                                <th>"Date"</th>
                                <th>"Time"</th>
                                <th>"Patient"</th>
                                <th>"Status"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {rows.into_iter().map(|a| {
                                let id = a.id;
                                let confirm = set_status.clone();
                                let reject = set_status.clone();
                                view! {
                                    <tr class="border-b">
                                        <td class="py-2">{a.id}</td>
                                        <td>{format_date(a.date)}</td>
                                        <td>{a.time_slot}</td>
                                        <td>{a.patient.name}</td>
                                        <td class="capitalize">{a.status.to_string()}</td>
                                        <td class="space-x-2">
                                            {a.status.is_actionable_by_doctor().then(|| view! {
                                                <button
                                                    on:click=move |_| confirm(id, AppointmentStatus::Confirmed)
                                                    class="px-3 py-1 rounded bg-green-600 hover:bg-green-700 text-white"
                                                >
                                                    "Confirm"
                                                </button>
                                                <button
                                                    on:click=move |_| reject(id, AppointmentStatus::Rejected)
                                                    class="px-3 py-1 rounded bg-red-500 hover:bg-red-600 text-white"
                                                >
                                                    "Reject"
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
    }
}
