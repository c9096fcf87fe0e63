//! MedConnect Dashboard
//!
//! Clinic appointment dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Login and registration for patients and doctors
//! - Role dashboards: patients book and cancel, doctors confirm or reject,
//!   admins approve doctors and see every appointment
//! - Profile editing with an avatar upload
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the MedConnect API over HTTP and keeps the
//! session token and role in `localStorage`.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
