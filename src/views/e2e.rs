//! Pages driven through `ApiClient` against a live server on a loopback port

use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use super::admin::AdminDoctors;
use super::auth::{LoginForm, RegisterForm};
use super::doctor::{DoctorBranch, DoctorDashboard, DoctorProfileForm};
use super::nav::Navbar;
use super::patient::{BookingForm, PatientDashboard};
use super::profile::ProfilePage;
use super::{Page, Route};
use crate::api::{bootstrap_admin, build_router, AppState};
use crate::client::{ApiClient, ClinicApi, Session};
use crate::config::{ApiConfig, AuthConfig};
use crate::models::{AppointmentStatus, Role};
use crate::store::Store;

const ADMIN_EMAIL: &str = "admin@clinic.test";
const PASSWORD: &str = "s3cret-pass";

struct Server {
    base_url: String,
    _dir: TempDir,
}

async fn start_server() -> Server {
    let dir = tempdir().unwrap();
    let store = Arc::new(Store::open(&dir.path().join("clinic.db")).unwrap());
    let auth = AuthConfig {
        pbkdf2_iterations: 1_000,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(PASSWORD.to_string()),
        ..AuthConfig::default()
    };
    bootstrap_admin(&store, &auth).unwrap();

    let router = build_router(AppState::new(store, ApiConfig::default(), auth));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Server {
        base_url: format!("http://{}", addr),
        _dir: dir,
    }
}

fn client(server: &Server) -> (ApiClient, Session) {
    let session = Session::in_memory();
    let api = ApiClient::new(server.base_url.clone(), session.clone()).unwrap();
    (api, session)
}

async fn register(api: &ApiClient, name: &str, role: Role) -> String {
    let email = format!("{}@clinic.test", name.to_lowercase());
    let mut form = RegisterForm::new();
    form.name = name.to_string();
    form.email = email.clone();
    form.password = PASSWORD.to_string();
    assert!(form.set_role(role));
    let (route, _) = form.submit(api).await.unwrap();
    assert_eq!(route, Route::Login);
    email
}

async fn login(api: &ApiClient, session: &Session, email: &str) -> Route {
    let mut form = LoginForm::new(session.clone());
    form.email = email.to_string();
    form.password = PASSWORD.to_string();
    form.submit(api).await.unwrap()
}

#[tokio::test]
async fn test_clinic_flow_over_http() {
    let server = start_server().await;

    let (doctor_api, doctor_session) = client(&server);
    let (patient_api, patient_session) = client(&server);
    let (admin_api, admin_session) = client(&server);

    let doctor_email = register(&doctor_api, "Rao", Role::Doctor).await;
    let patient_email = register(&patient_api, "Asha", Role::Patient).await;

    assert_eq!(
        login(&doctor_api, &doctor_session, &doctor_email).await,
        Route::DoctorDashboard
    );
    assert_eq!(
        login(&patient_api, &patient_session, &patient_email).await,
        Route::PatientDashboard
    );
    assert_eq!(
        login(&admin_api, &admin_session, ADMIN_EMAIL).await,
        Route::AdminDashboard
    );

    // Doctor: no profile, then pending approval
    let mut doctor_page = DoctorDashboard::new(doctor_session.clone());
    doctor_page.mount(&doctor_api).await;
    assert_eq!(doctor_page.branch(), DoctorBranch::NoProfile);
    doctor_page.toggle_profile_form();
    doctor_page.form = DoctorProfileForm {
        specialization: "Dermatology".to_string(),
        experience: "9".to_string(),
        fees: "650".to_string(),
    };
    assert_eq!(doctor_page.submit_profile(&doctor_api).await, None);
    assert_eq!(doctor_page.branch(), DoctorBranch::PendingApproval);
    let doctor_id = doctor_page.profile().unwrap().id;

    // Admin approves
    let mut doctors_page = AdminDoctors::new(admin_session.clone());
    doctors_page.mount(&admin_api).await;
    assert_eq!(doctors_page.status_label(doctor_id), Some("Pending"));
    assert_eq!(doctors_page.approve(&admin_api, doctor_id).await, None);
    assert_eq!(doctors_page.status_label(doctor_id), Some("Approved"));

    // Patient books
    let mut patient_page = PatientDashboard::new(patient_session.clone());
    patient_page.mount(&patient_api).await;
    assert_eq!(patient_page.name(), "Asha");
    assert_eq!(patient_page.doctors().len(), 1);
    patient_page.toggle_form();
    patient_page.form = BookingForm {
        doctor_id: Some(doctor_id),
        date: "2025-05-20".to_string(),
        time_slot: "10:30 AM".to_string(),
    };
    assert_eq!(patient_page.book(&patient_api).await, None);
    assert_eq!(patient_page.appointments().len(), 1);
    let appointment_id = patient_page.appointments().items()[0].id;

    // Doctor confirms, then a second decision is refused
    let mut doctor_page = DoctorDashboard::new(doctor_session.clone());
    doctor_page.mount(&doctor_api).await;
    assert_eq!(doctor_page.branch(), DoctorBranch::Approved);
    assert_eq!(
        doctor_page
            .set_status(&doctor_api, appointment_id, AppointmentStatus::Confirmed)
            .await,
        None
    );
    let notice = doctor_page
        .set_status(&doctor_api, appointment_id, AppointmentStatus::Rejected)
        .await
        .unwrap();
    assert!(notice.is_error());

    // Patient cancels the confirmed appointment
    patient_page.mount(&patient_api).await;
    assert_eq!(patient_page.cancellable_ids(), vec![appointment_id]);
    assert!(patient_page
        .cancel(&patient_api, appointment_id, true)
        .await
        .is_some_and(|n| !n.is_error()));
    assert!(patient_page.cancellable_ids().is_empty());
    assert_eq!(
        patient_page.appointments().get(appointment_id).unwrap().status,
        AppointmentStatus::Cancelled
    );
}

#[tokio::test]
async fn test_profile_image_and_session_revocation() {
    let server = start_server().await;
    let (api, session) = client(&server);
    let email = register(&api, "Asha", Role::Patient).await;
    login(&api, &session, &email).await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("avatar.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let mut page = ProfilePage::new(session.clone());
    page.mount(&api).await;
    page.start_editing();
    page.select_image(&path).unwrap();
    assert!(!page.save(&api).await.is_error());

    let user_id = page.profile().unwrap().id;
    let image_url = format!("{}/auth/profile-image/{}", server.base_url, user_id);
    assert_eq!(page.preview(), image_url);

    let response = reqwest::get(&image_url).await.unwrap();
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "image/png"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[0x89, b'P', b'N', b'G']);

    let mut navbar = Navbar::new(session.clone());
    navbar.mount(&api).await;
    assert_eq!(navbar.avatar(), Some(image_url.as_str()));

    // Revoked token: the next page fetch signs out and redirects
    api.revoke_session().await.unwrap();
    assert!(api.me().await.unwrap_err().is_unauthorized());

    let mut page = PatientDashboard::new(session.clone());
    page.mount(&api).await;
    assert_eq!(page.redirect(), Some(Route::Login));
    assert!(!session.is_signed_in().unwrap());
}
