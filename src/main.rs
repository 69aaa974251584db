// Residency Allocator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/residency-allocator
// ```
//
// Or against another snapshot:
//
// ```console
// $ ./target/release/residency-allocator --snapshot /tmp/ciup.json --verbose students --house "Maison du Japon"
// ```

use anyhow::{anyhow, Context};
use clap::Parser;
use residency_allocator::types::config::{CliArgs, Command};
use residency_allocator::{
    AllocationService, AutosavePolicy, Complex, EngineConfig, HouseDraft, HouseId, HouseProfile,
    LoggingConfig, NewStudent, Placement, SortOrder, Student, StudentId, Tenancy, Withdrawal,
};
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match EngineConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Load configuration from CLI arguments and optional config file
    let config = match EngineConfig::from_cli_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else if let Some(dir) = &config.log_directory {
        LoggingConfig::init_prod(dir.clone())
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().init()
    };

    if let Err(e) = logging_result {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!(snapshot = %config.snapshot_path.display(), "Configuration loaded and validated");

    // Handle dry run mode
    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - the snapshot will not be touched.");
        print_configuration_summary(&config);
        return;
    }

    let command = args.command.unwrap_or(Command::Summary);
    if let Err(e) = run(config, command) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open the snapshot and execute one command
fn run(config: EngineConfig, command: Command) -> anyhow::Result<()> {
    let manual = config.autosave == AutosavePolicy::Manual;
    let mutating = is_mutating(&command);

    let mut service = AllocationService::open(config).context("Failed to open the complex")?;

    match command {
        Command::Summary => println!("{}", service.summary()),
        Command::Houses => print_houses(service.complex()),
        Command::Students { house, descending } => {
            let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
            print_students(service.complex(), house.as_deref(), order)?;
        }
        Command::Admit { surname, given_name, nationality, prefer } => {
            let mut new_student = NewStudent::new(surname, given_name, nationality);
            if let Some(name) = prefer {
                let house = service
                    .find_house(&name)
                    .ok_or_else(|| anyhow!("No house named '{}'", name))?;
                new_student = new_student.preferring(house.id);
            }

            let (student_id, placement) =
                service.admit_student(new_student).context("Admission failed")?;
            println!("Admitted {}: {}", student_id, describe_placement(service.complex(), &placement));
        }
        Command::Withdraw { student } => {
            let student_id: StudentId = student
                .parse()
                .map_err(|e| anyhow!("Invalid student identifier '{}': {}", student, e))?;
            let (withdrawal, record) =
                service.withdraw_student(student_id).context("Withdrawal failed")?;
            println!("Withdrew {}", record);
            print_withdrawal(service.complex(), &withdrawal);
        }
        Command::AddHouse { name, director, nationality, location, capacities } => {
            let draft = HouseDraft::new(HouseProfile::new(name, nationality, director, location))
                .with_capacities(capacities);
            let house_id = service.add_house(draft).context("Failed to add house")?;
            if let Some(house) = service.complex().get_house(house_id) {
                println!(
                    "Added {} ({}) with {} rooms and {} beds",
                    house.name(),
                    house.id,
                    house.room_count(),
                    house.total_capacity()
                );
            }
        }
        Command::RemoveHouse { name } => {
            let house_id = service
                .find_house(&name)
                .map(|h| h.id)
                .ok_or_else(|| anyhow!("No house named '{}'", name))?;
            let removal = service.remove_house(house_id).context("Failed to remove house")?;
            println!("Removed {}", removal.name);
            for (student_id, placement) in &removal.rerouted {
                let complex = service.complex();
                println!(
                    "  {} -> {}",
                    student_label(complex, *student_id),
                    describe_placement(complex, placement)
                );
            }
        }
        Command::Events => print_events(service.complex()),
        Command::Reset => {
            service.reset().context("Failed to reset the complex")?;
            println!("Complex reset to the default dataset");
            println!("{}", service.summary());
        }
    }

    if mutating && manual {
        service.save();
    }

    Ok(())
}

fn is_mutating(command: &Command) -> bool {
    matches!(
        command,
        Command::Admit { .. }
            | Command::Withdraw { .. }
            | Command::AddHouse { .. }
            | Command::RemoveHouse { .. }
            | Command::Reset
    )
}

/// Print configuration summary
fn print_configuration_summary(config: &EngineConfig) {
    eprintln!("Configuration:");
    eprintln!("  Snapshot: {}", config.snapshot_path.display());
    eprintln!("  Autosave: {}", config.autosave);
    eprintln!("  House Removal: {}", config.removal_policy);
    eprintln!(
        "  Default Layout: {} room(s) of {} bed(s)",
        config.new_house_room_count, config.new_house_room_capacity
    );
    if let Some(dir) = &config.log_directory {
        eprintln!("  Log Directory: {}", dir.display());
    }
    eprintln!();
}

fn house_name(complex: &Complex, house_id: HouseId) -> String {
    complex
        .get_house(house_id)
        .map(|h| h.name().to_string())
        .unwrap_or_else(|| house_id.to_string())
}

fn student_label(complex: &Complex, student_id: StudentId) -> String {
    complex
        .student(student_id)
        .map(Student::to_string)
        .unwrap_or_else(|| student_id.to_string())
}

fn describe_placement(complex: &Complex, placement: &Placement) -> String {
    match placement {
        Placement::Resident { house, room } => {
            let number = complex
                .get_house(*house)
                .and_then(|h| h.get_room(*room))
                .map(|r| r.number.to_string())
                .unwrap_or_else(|| room.to_string());
            format!("resident of {}, room {}", house_name(complex, *house), number)
        }
        Placement::Waitlisted { house, position } => {
            format!("waitlisted at {} (position {})", house_name(complex, *house), position + 1)
        }
        Placement::AlreadyAssigned { house } => {
            format!("already assigned to {}", house_name(complex, *house))
        }
        Placement::Unplaced => "unplaced (no residential house)".to_string(),
    }
}

fn print_withdrawal(complex: &Complex, withdrawal: &Withdrawal) {
    match withdrawal {
        Withdrawal::Vacated { house, promoted, .. } => {
            println!("  Left a room of {}", house_name(complex, *house));
            match promoted {
                Some(id) => println!("  Promoted from the waitlist: {}", student_label(complex, *id)),
                None => println!("  Nobody was waiting"),
            }
        }
        Withdrawal::LeftWaitlist { house } => {
            println!("  Left the waitlist of {}", house_name(complex, *house))
        }
        Withdrawal::NotPresent => println!("  Was not attached to any house"),
    }
}

fn print_houses(complex: &Complex) {
    for house in complex.houses() {
        println!("{} ({})", house.name(), house.id);
        println!(
            "  Nationality: {}",
            house.profile.nationality.as_deref().unwrap_or("-")
        );
        println!("  Director:    {}", house.profile.director);
        println!("  Rooms:       {} ({} beds)", house.room_count(), house.total_capacity());
        println!(
            "  Residents:   {} ({:.1}%)",
            house.resident_count(),
            house.occupancy_rate()
        );
        println!("  Waitlisted:  {}", house.waitlist_len());
    }
}

fn print_students(complex: &Complex, house: Option<&str>, order: SortOrder) -> anyhow::Result<()> {
    let houses: Vec<_> = match house {
        Some(name) => vec![complex
            .house_by_name(name)
            .ok_or_else(|| anyhow!("No house named '{}'", name))?],
        None => complex.houses().iter().collect(),
    };

    for house in houses {
        println!("{}", house.name());
        for student in house.sorted_students(complex.roster(), order) {
            let status = match student.tenancy {
                Tenancy::Resident { .. } => "resident",
                Tenancy::Waitlisted { .. } => "waitlisted",
                Tenancy::Unassigned => "unassigned",
            };
            println!("  {:<40} {:<10} {}", student.to_string(), status, student.id);
        }
    }

    if house.is_none() {
        let unassigned = complex.roster().unassigned();
        if !unassigned.is_empty() {
            println!("Unassigned");
            for student in unassigned {
                println!("  {:<40} {}", student.to_string(), student.id);
            }
        }
    }

    Ok(())
}

fn print_events(complex: &Complex) {
    for house in complex.houses() {
        if house.agenda.is_empty() {
            continue;
        }
        println!("{}", house.name());
        for event in house.agenda.iter() {
            println!(
                "  {} {}  {} ({} attendee(s))",
                event.day_label(),
                event.time_label(),
                event.name,
                event.attendee_count()
            );
        }
    }
}
