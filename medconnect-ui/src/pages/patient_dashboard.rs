//! Patient Dashboard
//!
//! Upcoming appointments with a Cancel action on pending and confirmed rows,
//! and a booking form over the approved doctors.

use leptos::*;
use leptos_router::*;

use super::format_date;
use crate::api;
use crate::components::Loading;
use crate::state::forms::BookingForm;
use crate::state::global::use_global_state;
use crate::state::list::patch_row;
use crate::state::models::{Appointment, AppointmentStatus, DoctorProfile, Role};
use crate::state::AppRoute;

const BOOK_FAILED: &str = "Failed to book appointment";
const CANCELLED: &str = "Appointment cancelled successfully!";
const CANCEL_FAILED: &str = "Failed to cancel appointment.";

#[component]
pub fn PatientDashboard() -> impl IntoView {
    let state = use_global_state();
    let navigate = use_navigate();

    let (loading, set_loading) = create_signal(true);
    let (name, set_name) = create_signal(None::<String>);
    let appointments = create_rw_signal(Vec::<Appointment>::new());
    let doctors = create_rw_signal(Vec::<DoctorProfile>::new());
    let (show_form, set_show_form) = create_signal(false);
    let form = create_rw_signal(BookingForm::default());

    let expired = {
        let navigate = navigate.clone();
        move || navigate(AppRoute::Login.path(), Default::default())
    };

    let refetch = {
        let expired = expired.clone();
        move || {
            let expired = expired.clone();
            async move {
                match api::appointments(Role::Patient).await {
                    Ok(list) => {
                        appointments.set(list);
                        true
                    }
                    Err(e) => {
                        if state.handle_failure(&e, "Error fetching appointments") {
                            expired();
                            return false;
                        }
                        true
                    }
                }
            }
        }
    };

    // Fetch on mount. Later fetches are skipped once a 401 signed us out.
    let mount_refetch = refetch.clone();
    let mount_expired = expired.clone();
    create_effect(move |_| {
        let refetch = mount_refetch.clone();
        let expired = mount_expired.clone();
        spawn_local(async move {
            if refetch().await {
                match api::approved_doctors().await {
                    Ok(list) => doctors.set(list),
                    Err(e) => {
                        web_sys::console::error_1(&format!("Error fetching doctors: {}", e).into())
                    }
                }
                match api::me().await {
                    Ok(user) => set_name.set(Some(user.name)),
                    Err(e) => {
                        if state.handle_failure(&e, "Error fetching patient data") {
                            expired();
                        }
                    }
                }
            }
            set_loading.set(false);
        });
    });

    let book_refetch = refetch.clone();
    let on_book = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = match form.get().to_request() {
            Ok(req) => req,
            Err(msg) => {
                state.show_error(&msg);
                return;
            }
        };
        let refetch = book_refetch.clone();
        let expired = expired.clone();
        spawn_local(async move {
            match api::book_appointment(&req).await {
                Ok(_) => {
                    form.set(BookingForm::default());
                    set_show_form.set(false);
                    refetch().await;
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error booking appointment") {
                        expired();
                    } else {
                        state.show_error(&e.user_message(BOOK_FAILED));
                    }
                }
            }
        });
    };

    let cancel = move |id: i64| {
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message("Are you sure you want to cancel this appointment?")
                    .ok()
            })
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let refetch = refetch.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            match api::cancel_appointment(id).await {
                Ok(_) => {
                    appointments.update(|rows| {
                        patch_row(rows, id, |a| a.status = AppointmentStatus::Cancelled);
                    });
                    state.show_success(CANCELLED);
                    // A failed refetch keeps the local patch
                    refetch().await;
                }
                Err(e) => {
                    if state.handle_failure(&e, "Error cancelling appointment") {
                        navigate(AppRoute::Login.path(), Default::default());
                    } else {
                        state.show_error(CANCEL_FAILED);
                    }
                }
            }
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">
                    {move || format!("Welcome, {}", name.get().unwrap_or_else(|| Role::Patient.label().to_string()))}
                </h1>
                <button
                    on:click=move |_| set_show_form.update(|shown| *shown = !*shown)
                    class="px-4 py-2 rounded-lg bg-blue-600 hover:bg-blue-700 text-white"
                >
                    {move || if show_form.get() { "Close Form" } else { "Book Appointment" }}
                </button>
            </div>

            <Show when=move || show_form.get()>
                <form on:submit=on_book.clone() class="bg-white rounded-xl shadow p-6 grid md:grid-cols-4 gap-4">
                    <select
                        on:change=move |ev| form.update(|f| f.doctor_id = event_target_value(&ev))
                        class="border rounded-lg px-3 py-2"
                    >
                        <option value="">"Select a doctor"</option>
                        {move || doctors.get().into_iter().map(|d| view! {
                            <option value=d.id.to_string()>
                                {format!("{} ({}, ₹{})", d.user.name, d.specialization, d.fees)}
                            </option>
                        }).collect_view()}
                    </select>
                    <input
                        type="date"
                        prop:value=move || form.get().date
                        on:input=move |ev| form.update(|f| f.date = event_target_value(&ev))
                        class="border rounded-lg px-3 py-2"
                    />
                    <input
                        type="text"
                        placeholder="Time slot, e.g. 10:30 AM"
                        prop:value=move || form.get().time_slot
                        on:input=move |ev| form.update(|f| f.time_slot = event_target_value(&ev))
                        class="border rounded-lg px-3 py-2"
                    />
                    <button type="submit" class="bg-green-600 hover:bg-green-700 text-white rounded-lg px-4 py-2">
                        "Book"
                    </button>
                </form>
            </Show>

            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-xl font-semibold mb-4">"Upcoming Appointments"</h2>
                {move || {
                    if loading.get() {
                        return view! { <Loading /> }.into_view();
                    }
                    let rows = appointments.get();
                    if rows.is_empty() {
                        return view! { <p class="text-gray-500">"No upcoming appointments"</p> }.into_view();
                    }
                    let cancel = cancel.clone();
                    view! {
                        <table class="w-full text-left">
                            <thead>
                                <tr class="border-b text-gray-500">
                                    <th class="py-2">"ID"</th>
                                    <th>"Date"</th>
                                    <th>"Time"</th>
                                    <th>"Doctor"</th>
                                    <th>"Status"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {rows.into_iter().map(|a| {
                                    let cancel = cancel.clone();
                                    let id = a.id;
                                    view! {
                                        <tr class="border-b">
                                            <td class="py-2">{a.id}</td>
                                            <td>{format_date(a.date)}</td>
                                            <td>{a.time_slot}</td>
                                            <td>{a.doctor.user.name}</td>
                                            <td class="capitalize">{a.status.to_string()}</td>
                                            <td>
                                                {a.status.is_cancellable().then(|| view! {
                                                    <button
                                                        on:click=move |_| cancel(id)
                                                        class="px-3 py-1 rounded bg-red-500 hover:bg-red-600 text-white"
                                                    >
                                                        "Cancel"
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
