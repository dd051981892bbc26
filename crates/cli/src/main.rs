use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use medtrack_core::config::{bool_from_env_value, data_dir_from_env_value};
use medtrack_core::{
    Colour, CoreConfig, Medication, MedicationId, MedicationService, MedicationStore,
    MedicationTracker, NewMedication, UpcomingDose, UserId, DEFAULT_UPCOMING_LIMIT,
    FREQUENCY_PRESETS,
};

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "MedTrack medication adherence CLI")]
struct Cli {
    /// Data directory (defaults to MEDTRACK_DATA_DIR, then "medtrack_data")
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// User id (defaults to MEDTRACK_USER_ID)
    #[arg(long, global = true)]
    user: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new user record and print its id
    Init {
        /// Start with no medications instead of the seed list
        #[arg(long)]
        empty: bool,
    },
    /// List users with a stored record
    Users,
    /// List medications and today's taken flags
    List,
    /// Add a medication
    Add {
        /// Medication name
        name: String,
        /// Strength, e.g. 500mg
        dosage: String,
        /// Cadence label, e.g. "Twice daily"
        frequency: String,
        /// Dose time (HH:MM), repeat for several slots
        #[arg(long = "time", required = true)]
        times: Vec<String>,
        /// Colour tag
        #[arg(long, default_value = "blue")]
        color: String,
        /// Disable reminders for this medication
        #[arg(long)]
        no_reminder: bool,
    },
    /// Mark a dose slot as taken
    Take {
        /// Medication id
        id: String,
        /// Slot index (0-based position in the medication's times)
        slot: usize,
    },
    /// Show today's adherence
    Progress,
    /// Show the next untaken doses
    Upcoming {
        #[arg(long, default_value_t = DEFAULT_UPCOMING_LIMIT)]
        limit: usize,
    },
    /// Show untaken doses that are due now
    Due,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("MEDTRACK_DATA_DIR").ok()));
    let seed_new_users = bool_from_env_value(std::env::var("MEDTRACK_SEED").ok(), true)?;
    let cfg = Arc::new(CoreConfig::new(data_dir, seed_new_users)?);

    let Some(command) = cli.command else {
        println!("Use 'medtrack --help' for commands");
        return Ok(());
    };

    match command {
        Commands::Init { empty } => {
            let user = UserId::new();
            let store = MedicationStore::new(cfg);
            let tracker = if empty {
                MedicationTracker::new()
            } else {
                MedicationTracker::seeded()?
            };
            store.save(&user, tracker.medications())?;
            println!("Initialised medication record for user: {}", user);
        }
        Commands::Users => {
            let users = MedicationStore::new(cfg).list_users();
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                println!("{}", user);
            }
        }
        command => {
            let user = resolve_user(cli.user)?;
            let mut service = MedicationService::open(cfg, user)?;
            run_user_command(&mut service, command)?;
        }
    }

    Ok(())
}

fn resolve_user(arg: Option<String>) -> Result<UserId, Box<dyn std::error::Error>> {
    let raw = arg
        .or_else(|| std::env::var("MEDTRACK_USER_ID").ok())
        .ok_or("no user given: pass --user or set MEDTRACK_USER_ID (see 'medtrack init')")?;
    Ok(UserId::parse(raw.trim())?)
}

fn run_user_command(
    service: &mut MedicationService,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::List => {
            if service.medications().is_empty() {
                println!("No medications found.");
            }
            for med in service.medications() {
                print_medication(med);
            }
        }
        Commands::Add {
            name,
            dosage,
            frequency,
            times,
            color,
            no_reminder,
        } => {
            if !FREQUENCY_PRESETS.contains(&frequency.trim()) {
                println!(
                    "Note: '{}' is not one of: {}",
                    frequency.trim(),
                    FREQUENCY_PRESETS.join(", ")
                );
            }
            let new = NewMedication::parse(&name, &dosage, &frequency, &times)?
                .with_colour(color.parse::<Colour>()?)
                .with_reminder(!no_reminder);
            let med = service.add_medication(new)?;
            println!("Added medication with ID: {}", med.id());
        }
        Commands::Take { id, slot } => {
            let id = MedicationId::parse(id.trim())?;
            let med = service.mark_medication_taken(id, slot)?;
            let time = med.times()[slot];
            println!("Marked {} {} dose as taken", med.name(), time);
        }
        Commands::Progress => {
            let p = service.todays_progress();
            println!(
                "{} of {} doses taken ({}%)",
                p.taken_doses, p.total_doses, p.progress_percentage
            );
        }
        Commands::Upcoming { limit } => {
            print_doses(&service.upcoming_doses(limit), "All medications taken for today!");
        }
        Commands::Due => {
            let now = chrono::Local::now().time();
            print_doses(&service.due_doses(now), "Nothing due right now.");
        }
        Commands::Init { .. } | Commands::Users => {}
    }
    Ok(())
}

fn print_medication(med: &Medication) {
    println!(
        "ID: {}, Name: {}, Dosage: {}, Frequency: {}, Colour: {}",
        med.id(),
        med.name(),
        med.dosage(),
        med.frequency(),
        med.colour()
    );
    for (slot, time, taken) in med.slots() {
        let mark = if taken { "x" } else { " " };
        println!("  [{}] {} {}", mark, slot, time);
    }
}

fn print_doses(doses: &[UpcomingDose], none_message: &str) {
    if doses.is_empty() {
        println!("{}", none_message);
    }
    for dose in doses {
        println!(
            "{} {} ({}) slot {} [{}]",
            dose.time, dose.name, dose.dosage, dose.slot_index, dose.medication_id
        );
    }
}
