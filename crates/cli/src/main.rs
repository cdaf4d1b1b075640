//! Console consumer of the clinic client.
//!
//! Thin demonstration surface only: every command delegates to the
//! session manager or to one of the entity stores and prints the result.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use clinic_client::{
    AppointmentStore, ClientConfig, ClientEvents, DepartmentStore, DoctorStore, FileCache,
    HttpGateway, NavTarget, PatientStore, RegisterRequest, SessionCache, SessionManager,
};
use clinic_types::{
    AppointmentDraft, AppointmentStatus, DepartmentDraft, DoctorDraft, PatientDraft, Role,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic administration client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and cache the session
    Login { email: String, password: String },
    /// Sign out and clear the cached session
    Logout,
    /// Show the cached session, restoring it first
    Whoami,
    /// Create a backend user account
    Register {
        email: String,
        password: String,
        /// ADMIN, DOCTOR, or PATIENT
        role: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Patient collection commands
    #[command(subcommand)]
    Patients(PatientCommands),
    /// Doctor collection commands
    #[command(subcommand)]
    Doctors(DoctorCommands),
    /// Department collection commands
    #[command(subcommand)]
    Departments(DepartmentCommands),
    /// Appointment collection commands
    #[command(subcommand)]
    Appointments(AppointmentCommands),
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List all patients
    List,
    /// Register a patient
    Create {
        first_name: String,
        last_name: String,
        national_id: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Assigned doctor id
        #[arg(long)]
        doctor: Option<String>,
        /// Assigned department id
        #[arg(long)]
        department: Option<String>,
    },
    /// Apply a JSON object of partial changes
    Update {
        id: String,
        /// e.g. '{"phone": "+90 500 123 45 67"}'
        changes: String,
    },
    /// Delete a patient
    Delete { id: String },
}

#[derive(Subcommand)]
enum DoctorCommands {
    /// List all doctors
    List,
    /// Register a doctor
    Create {
        user_id: String,
        department_id: String,
        license_number: String,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// Delete a doctor (blocked while patients reference them)
    Delete { id: String },
}

#[derive(Subcommand)]
enum DepartmentCommands {
    /// List all departments
    List,
    /// Create a department
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a department (blocked while patients reference it)
    Delete { id: String },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// List all appointments
    List,
    /// Book an appointment
    Create {
        patient_id: String,
        doctor_id: String,
        department_id: String,
        /// RFC 3339 timestamp, e.g. 2025-12-25T10:00:00Z
        date: String,
        /// SCHEDULED, COMPLETED, CANCELLED, or PENDING
        #[arg(long, default_value = "SCHEDULED")]
        status: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Delete an appointment
    Delete { id: String },
}

/// Event subscriber for a terminal host: there is nothing to navigate,
/// so signals are logged instead.
struct TermEvents;

impl ClientEvents for TermEvents {
    fn navigate(&self, target: NavTarget) {
        tracing::info!(?target, "navigation requested");
    }

    fn session_revoked(&self) {
        tracing::warn!("session revoked by the backend; sign in again");
    }
}

fn parse_status(value: &str) -> anyhow::Result<AppointmentStatus> {
    match value.to_uppercase().as_str() {
        "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
        "COMPLETED" => Ok(AppointmentStatus::Completed),
        "CANCELLED" => Ok(AppointmentStatus::Cancelled),
        "PENDING" => Ok(AppointmentStatus::Pending),
        other => anyhow::bail!("unknown appointment status: {other}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_client=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let base_url =
        std::env::var("CLINIC_API_URL").unwrap_or_else(|_| clinic_client::DEFAULT_BASE_URL.into());
    let cache_file =
        std::env::var("CLINIC_CACHE_FILE").unwrap_or_else(|_| ".clinic-session.json".into());

    let config = ClientConfig::with_base_url(base_url)?;
    let cache: Arc<dyn SessionCache> = Arc::new(FileCache::new(cache_file));
    let events: Arc<dyn ClientEvents> = Arc::new(TermEvents);
    let gateway = Arc::new(HttpGateway::new(&config, cache.clone(), events.clone())?);
    let mut sessions = SessionManager::new(gateway.clone(), cache, events);

    match cli.command {
        Some(Commands::Login { email, password }) => match sessions.login(&email, &password).await
        {
            Ok(session) => println!("Signed in as {} ({})", session.identity, session.role),
            Err(e) => eprintln!("Error signing in: {e}"),
        },
        Some(Commands::Logout) => {
            sessions.logout();
            println!("Signed out.");
        }
        Some(Commands::Whoami) => match sessions.restore_session().await {
            Ok(Some(session)) => {
                let name = session.display_name.as_deref().unwrap_or("-");
                println!(
                    "{} ({}), display name: {}",
                    session.identity, session.role, name
                );
            }
            Ok(None) => println!("Not signed in."),
            Err(e) => eprintln!("Error restoring session: {e}"),
        },
        Some(Commands::Register {
            email,
            password,
            role,
            first_name,
            last_name,
            phone,
        }) => {
            let request = RegisterRequest {
                email,
                password,
                role: Role::from_claim(&role)?,
                first_name,
                last_name,
                phone,
            };
            match sessions.register(&request).await {
                Ok(created) => println!("Registered {} with id {}", created.email, created.id),
                Err(e) => eprintln!("Error registering: {e}"),
            }
        }
        Some(Commands::Patients(command)) => run_patients(command, gateway).await,
        Some(Commands::Doctors(command)) => run_doctors(command, gateway).await,
        Some(Commands::Departments(command)) => run_departments(command, gateway).await,
        Some(Commands::Appointments(command)) => run_appointments(command, gateway).await,
        None => {
            println!("Use 'clinic --help' for commands");
        }
    }

    Ok(())
}

async fn run_patients(command: PatientCommands, gateway: Arc<HttpGateway>) {
    let mut patients = PatientStore::new(gateway);
    match command {
        PatientCommands::List => match patients.fetch_all().await {
            Ok(()) => {
                if patients.items().is_empty() {
                    println!("No patients found.");
                }
                for patient in patients.items() {
                    println!(
                        "ID: {}, Name: {} {}, National ID: {}, Doctor: {}, Department: {}",
                        patient.id,
                        patient.first_name,
                        patient.last_name,
                        patient.national_id,
                        patient.doctor_id.as_deref().unwrap_or("-"),
                        patient.department_id.as_deref().unwrap_or("-"),
                    );
                }
            }
            Err(e) => eprintln!("Error listing patients: {e}"),
        },
        PatientCommands::Create {
            first_name,
            last_name,
            national_id,
            phone,
            email,
            doctor,
            department,
        } => {
            let draft = PatientDraft {
                first_name,
                last_name,
                national_id,
                phone,
                email,
                primary_doctor_id: doctor,
                department_id: department,
                ..Default::default()
            };
            match patients.create(&draft).await {
                Ok(created) => println!("Created patient with id {}", created.id),
                Err(e) => eprintln!("Error creating patient: {e}"),
            }
        }
        PatientCommands::Update { id, changes } => {
            match serde_json::from_str::<serde_json::Value>(&changes) {
                Ok(changes) => match patients.update(&id, &changes).await {
                    Ok(updated) => println!(
                        "Updated patient {} {}",
                        updated.first_name, updated.last_name
                    ),
                    Err(e) => eprintln!("Error updating patient: {e}"),
                },
                Err(e) => eprintln!("Changes are not valid JSON: {e}"),
            }
        }
        PatientCommands::Delete { id } => match patients.remove(&id).await {
            Ok(()) => println!("Deleted patient {id}"),
            Err(e) => eprintln!("Error deleting patient: {e}"),
        },
    }
}

async fn run_doctors(command: DoctorCommands, gateway: Arc<HttpGateway>) {
    let mut doctors = DoctorStore::new(gateway.clone());
    match command {
        DoctorCommands::List => match doctors.fetch_all().await {
            Ok(()) => {
                if doctors.items().is_empty() {
                    println!("No doctors found.");
                }
                for doctor in doctors.items() {
                    println!(
                        "ID: {}, License: {}, Department: {}, Specialization: {}",
                        doctor.id,
                        doctor.license_number,
                        doctor.department_id,
                        doctor.specialization.as_deref().unwrap_or("-"),
                    );
                }
            }
            Err(e) => eprintln!("Error listing doctors: {e}"),
        },
        DoctorCommands::Create {
            user_id,
            department_id,
            license_number,
            specialization,
        } => {
            let draft = DoctorDraft {
                user_id,
                department_id,
                license_number,
                specialization,
                is_active: Some(true),
                ..Default::default()
            };
            match doctors.create(&draft).await {
                Ok(created) => println!("Created doctor with id {}", created.id),
                Err(e) => eprintln!("Error creating doctor: {e}"),
            }
        }
        DoctorCommands::Delete { id } => {
            // Deletion is guarded by the current patient collection.
            let mut patients = PatientStore::new(gateway);
            if let Err(e) = patients.fetch_all().await {
                eprintln!("Error loading patients for the integrity check: {e}");
                return;
            }
            match doctors.remove(&id, patients.items()).await {
                Ok(()) => println!("Deleted doctor {id}"),
                Err(e) => eprintln!("Error deleting doctor: {e}"),
            }
        }
    }
}

async fn run_departments(command: DepartmentCommands, gateway: Arc<HttpGateway>) {
    let mut departments = DepartmentStore::new(gateway.clone());
    match command {
        DepartmentCommands::List => match departments.fetch_all().await {
            Ok(()) => {
                if departments.items().is_empty() {
                    println!("No departments found.");
                }
                for department in departments.items() {
                    println!(
                        "ID: {}, Name: {}, Active: {}",
                        department.id, department.name, department.is_active
                    );
                }
            }
            Err(e) => eprintln!("Error listing departments: {e}"),
        },
        DepartmentCommands::Create { name, description } => {
            let draft = DepartmentDraft {
                name,
                description,
                is_active: Some(true),
            };
            match departments.create(&draft).await {
                Ok(created) => println!("Created department with id {}", created.id),
                Err(e) => eprintln!("Error creating department: {e}"),
            }
        }
        DepartmentCommands::Delete { id } => {
            let mut patients = PatientStore::new(gateway);
            if let Err(e) = patients.fetch_all().await {
                eprintln!("Error loading patients for the integrity check: {e}");
                return;
            }
            match departments.remove(&id, patients.items()).await {
                Ok(()) => println!("Deleted department {id}"),
                Err(e) => eprintln!("Error deleting department: {e}"),
            }
        }
    }
}

async fn run_appointments(command: AppointmentCommands, gateway: Arc<HttpGateway>) {
    let mut appointments = AppointmentStore::new(gateway);
    match command {
        AppointmentCommands::List => match appointments.fetch_all().await {
            Ok(()) => {
                if appointments.items().is_empty() {
                    println!("No appointments found.");
                }
                for appointment in appointments.items() {
                    println!(
                        "ID: {}, Patient: {}, Doctor: {}, At: {}, Status: {}",
                        appointment.id,
                        appointment.patient_id,
                        appointment.doctor_id,
                        appointment.appointment_date.to_rfc3339(),
                        appointment.status,
                    );
                }
            }
            Err(e) => eprintln!("Error listing appointments: {e}"),
        },
        AppointmentCommands::Create {
            patient_id,
            doctor_id,
            department_id,
            date,
            status,
            reason,
        } => {
            let parsed_date = match DateTime::parse_from_rfc3339(&date) {
                Ok(parsed) => parsed.with_timezone(&Utc),
                Err(e) => {
                    eprintln!("Invalid appointment date: {e}");
                    return;
                }
            };
            let parsed_status = match parse_status(&status) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("{e}");
                    return;
                }
            };
            let draft = AppointmentDraft {
                patient_id,
                doctor_id,
                department_id,
                appointment_date: parsed_date,
                status: parsed_status,
                reason,
            };
            match appointments.create(&draft).await {
                Ok(created) => println!("Booked appointment with id {}", created.id),
                Err(e) => eprintln!("Error booking appointment: {e}"),
            }
        }
        AppointmentCommands::Delete { id } => match appointments.remove(&id).await {
            Ok(()) => println!("Deleted appointment {id}"),
            Err(e) => eprintln!("Error deleting appointment: {e}"),
        },
    }
}
