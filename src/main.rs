//! MedConnect CLI
//!
//! Terminal dashboard for the MedConnect API:
//! - Register, log in and out
//! - Show the role's dashboard
//! - Book, cancel, confirm and reject appointments
//! - Manage doctor profiles and approvals
//! - View and update the account profile

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use medconnect::client::{ApiClient, ClinicApi, Session};
use medconnect::config::{generate_default_config, Config};
use medconnect::logging::init_logging;
use medconnect::models::{AppointmentStatus, Role};
use medconnect::views::doctor::DoctorProfileForm;
use medconnect::views::patient::BookingForm;
use medconnect::views::{
    dashboard_page, logout, AdminDoctors, DoctorDashboard, LoginForm, Navbar, Notice, Page,
    PatientDashboard, ProfilePage, RegisterForm, Route, Sidebar,
};

#[derive(Parser)]
#[command(name = "medconnect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Clinic appointment dashboard for patients, doctors and admins")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: [client] api_url from the config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a patient or doctor account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// patient or doctor
        #[arg(long, default_value = "patient")]
        role: Role,
    },

    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out and forget the session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Show the dashboard for the signed-in role
    Dashboard,

    /// View or update the account profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// List every doctor (admin)
    Doctors,

    /// Approve a doctor profile (admin)
    Approve {
        /// Doctor profile id
        id: i64,
    },

    /// Book an appointment (patient)
    Book {
        /// Doctor profile id
        #[arg(long)]
        doctor: i64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Time slot, e.g. "10:00 AM"
        #[arg(long)]
        time: String,
    },

    /// Cancel an appointment (patient)
    Cancel {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Confirm a pending appointment (doctor)
    Confirm { id: i64 },

    /// Reject a pending appointment (doctor)
    Reject { id: i64 },

    /// Create or update the doctor profile (doctor)
    DoctorProfile {
        #[arg(long)]
        specialization: String,
        /// Years of experience
        #[arg(long)]
        experience: String,
        #[arg(long)]
        fees: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// New password; omit to keep the current one
        #[arg(long)]
        password: Option<String>,
        /// Image file to upload as the avatar
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_default(),
    };
    init_logging(&config.logging)?;

    let session = Session::file(&config.client.session_file);
    let api_url = cli.api_url.clone().unwrap_or(config.client.api_url.clone());
    let api = ApiClient::new(api_url, session.clone())?;

    run(cli, &api, &session).await
}

async fn run(cli: Cli, api: &ApiClient, session: &Session) -> anyhow::Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
            role,
        } => {
            let mut form = RegisterForm::new();
            if !form.set_role(role) {
                bail!("Only patient and doctor accounts can register");
            }
            form.name = name;
            form.email = email;
            form.password = password;
            match form.submit(api).await {
                Ok((route, notice)) => println!("{} ({})", notice, route),
                Err(notice) => bail!("{}", notice),
            }
        }

        Commands::Login { email, password } => {
            let mut form = LoginForm::new(session.clone());
            form.email = email;
            form.password = password;
            match form.submit(api).await {
                Ok(route) => println!("Logged in. Dashboard: {}", route),
                Err(notice) => bail!("{}", notice),
            }
        }

        Commands::Logout => {
            if session.is_signed_in()? {
                if let Err(e) = api.revoke_session().await {
                    tracing::warn!(error = %e, "Server-side logout failed");
                }
            }
            let route = logout(session);
            println!("Logged out ({})", route);
        }

        Commands::Whoami => {
            require_role(session)?;
            let user = api.me().await?;
            match format {
                OutputFormat::Json => print_json(&user)?,
                OutputFormat::Table => {
                    println!("{} <{}>", user.name, user.email);
                    println!("Role: {}", user.role);
                    println!("Joined: {}", user.created_at.format("%Y-%m-%d"));
                }
            }
        }

        Commands::Dashboard => {
            let role = require_role(session)?;
            if format == OutputFormat::Json {
                return print_json(&api.appointments(role).await?);
            }
            let mut page = dashboard_page(role, session.clone());
            print_chrome(api, session, role.dashboard()).await?;
            show(page.as_mut(), api).await?;
        }

        Commands::Profile { command } => {
            require_role(session)?;
            let mut page = ProfilePage::new(session.clone());
            mount(&mut page, api).await?;

            match command {
                ProfileCommand::Show => {
                    if format == OutputFormat::Json {
                        return print_json(&api.profile().await?);
                    }
                }
                ProfileCommand::Update {
                    name,
                    email,
                    password,
                    image,
                } => {
                    page.start_editing();
                    if let Some(name) = name {
                        page.form.name = name;
                    }
                    if let Some(email) = email {
                        page.form.email = email;
                    }
                    if let Some(password) = password {
                        page.form.password = password;
                    }
                    if let Some(path) = image {
                        page.select_image(&path)
                            .with_context(|| format!("reading {}", path.display()))?;
                    }
                    let notice = page.save(api).await;
                    check_redirect(&page)?;
                    report(Some(notice))?;
                }
            }
            print!("{}", page.render());
        }

        Commands::Doctors => {
            require_role(session)?;
            if format == OutputFormat::Json {
                return print_json(&api.all_doctors().await?);
            }
            let mut page = AdminDoctors::new(session.clone());
            print_chrome(api, session, Route::AdminDoctors).await?;
            show(&mut page, api).await?;
        }

        Commands::Approve { id } => {
            require_role(session)?;
            let mut page = AdminDoctors::new(session.clone());
            mount(&mut page, api).await?;
            let notice = page.approve(api, id).await;
            check_redirect(&page)?;
            report(notice)?;
            print!("{}", page.render());
        }

        Commands::Book { doctor, date, time } => {
            require_role(session)?;
            let mut page = PatientDashboard::new(session.clone());
            mount(&mut page, api).await?;
            page.toggle_form();
            page.form = BookingForm {
                doctor_id: Some(doctor),
                date,
                time_slot: time,
            };
            let notice = page.book(api).await;
            check_redirect(&page)?;
            report(notice)?;
            print!("{}", page.render());
        }

        Commands::Cancel { id, yes } => {
            require_role(session)?;
            let mut page = PatientDashboard::new(session.clone());
            mount(&mut page, api).await?;
            let confirmed = yes || confirm("Are you sure you want to cancel this appointment?")?;
            let notice = page.cancel(api, id, confirmed).await;
            check_redirect(&page)?;
            report(notice)?;
            print!("{}", page.render());
        }

        Commands::Confirm { id } => {
            set_status(api, session, id, AppointmentStatus::Confirmed).await?;
        }

        Commands::Reject { id } => {
            set_status(api, session, id, AppointmentStatus::Rejected).await?;
        }

        Commands::DoctorProfile {
            specialization,
            experience,
            fees,
        } => {
            require_role(session)?;
            let mut page = DoctorDashboard::new(session.clone());
            mount(&mut page, api).await?;
            page.toggle_profile_form();
            page.form = DoctorProfileForm {
                specialization,
                experience,
                fees,
            };
            let notice = page.submit_profile(api).await;
            check_redirect(&page)?;
            report(notice)?;
            print!("{}", page.render());
        }

        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

async fn set_status(
    api: &ApiClient,
    session: &Session,
    id: i64,
    status: AppointmentStatus,
) -> anyhow::Result<()> {
    require_role(session)?;
    let mut page = DoctorDashboard::new(session.clone());
    mount(&mut page, api).await?;
    let notice = page.set_status(api, id, status).await;
    check_redirect(&page)?;
    report(notice)?;
    print!("{}", page.render());
    Ok(())
}

/// Role persisted by the last login
fn require_role(session: &Session) -> anyhow::Result<Role> {
    match (session.is_signed_in()?, session.role()?) {
        (true, Some(role)) => Ok(role),
        _ => bail!("Not logged in. Run `medconnect login` first."),
    }
}

async fn mount(page: &mut dyn Page, api: &dyn ClinicApi) -> anyhow::Result<()> {
    page.mount(api).await;
    check_redirect(page)
}

async fn show(page: &mut dyn Page, api: &dyn ClinicApi) -> anyhow::Result<()> {
    mount(page, api).await?;
    print!("{}", page.render());
    Ok(())
}

/// Navbar and sidebar above a page
async fn print_chrome(api: &dyn ClinicApi, session: &Session, current: Route) -> anyhow::Result<()> {
    let mut navbar = Navbar::new(session.clone());
    mount(&mut navbar, api).await?;
    print!("{}", navbar.render());
    print!("{}", Sidebar::new(session.clone()).render(current));
    println!();
    Ok(())
}

fn check_redirect(page: &dyn Page) -> anyhow::Result<()> {
    match page.redirect() {
        Some(route) => bail!("Session expired. Please log in again ({}).", route),
        None => Ok(()),
    }
}

fn report(notice: Option<Notice>) -> anyhow::Result<()> {
    match notice {
        Some(Notice::Error(text)) => bail!("{}", text),
        Some(Notice::Success(text)) => println!("{}\n", text),
        None => {}
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
