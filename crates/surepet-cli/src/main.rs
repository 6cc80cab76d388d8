// # surepet - Sure Petcare CLI
//
// Command-line front end for the Sure Petcare cloud client. This is a THIN
// integration layer: all decoding and API logic lives in surepet-core and
// surepet-client; this binary only reads configuration, picks a household,
// and formats output.
//
// The vendor API is unofficial and reverse engineered. Use at your own
// risk, and poll sparingly: this client must never put more load on the
// vendor's servers than the official app.
//
// ## Configuration
//
// Credentials are passed via environment variables only, never as command
// line arguments (they would end up in the shell history and process list):
//
// - `SUREPET_EMAIL`: account email address
// - `SUREPET_PASSWORD`: account password
// - `SUREPET_DEVICE_ID`: client device id (an opaque vendor-defined string)
// - `SUREPET_HOUSEHOLD_ID`: household to use when the account has several
//   (optional; defaults to the first household returned)
// - `SUREPET_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export SUREPET_EMAIL=you@example.com
// export SUREPET_PASSWORD=...
// export SUREPET_DEVICE_ID=1234567890
//
// surepet pets
// surepet flaps
// surepet timeline "Flocke"
// surepet watch --interval-secs 300
// ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tokio_stream::StreamExt;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use surepet_client::SureHubClient;
use surepet_core::codes::TagProfile;
use surepet_core::config::SurepetConfig;
use surepet_core::traits::PetcareApi;
use surepet_core::types::{Household, Pet, SessionToken, TimelineEntry};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum SurepetExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<SurepetExitCode> for ExitCode {
    fn from(code: SurepetExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(
    name = "surepet",
    about = "Unofficial command-line client for the Sure Petcare cloud service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the households on the account
    Households,
    /// List pets with their profile and last known location
    Pets,
    /// List flaps with battery voltage and lock state
    Flaps,
    /// Print the movement timeline of one pet
    Timeline {
        /// Pet name (case insensitive; quote names with spaces)
        pet_name: String,
    },
    /// Keep a pet indoors by setting its tag profile
    LockPet {
        /// Pet name (case insensitive; quote names with spaces)
        pet_name: String,
    },
    /// Allow a pet outside by setting its tag profile
    FreePet {
        /// Pet name (case insensitive; quote names with spaces)
        pet_name: String,
    },
    /// Poll for new timeline events and print them as they appear
    Watch {
        /// Poll interval in seconds (10-3600)
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,
    },
}

/// Application configuration read from the environment
struct EnvConfig {
    email: String,
    password: String,
    device_id: String,
    household_id: Option<i64>,
    log_level: String,
}

impl EnvConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| {
                anyhow::anyhow!("{} is required. Set it via: export {}=...", name, name)
            })
        };

        let household_id = match env::var("SUREPET_HOUSEHOLD_ID") {
            Ok(raw) => Some(raw.parse().map_err(|_| {
                anyhow::anyhow!("SUREPET_HOUSEHOLD_ID must be a numeric id. Got: {}", raw)
            })?),
            Err(_) => None,
        };

        Ok(Self {
            email: required("SUREPET_EMAIL")?,
            password: required("SUREPET_PASSWORD")?,
            device_id: required("SUREPET_DEVICE_ID")?,
            household_id,
            log_level: env::var("SUREPET_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the parts the core config does not cover
    fn validate(&self) -> Result<()> {
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SUREPET_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
        Ok(())
    }

    /// Build the client configuration
    fn to_client_config(&self) -> SurepetConfig {
        let mut config =
            SurepetConfig::new(self.email.clone(), self.password.clone(), self.device_id.clone());
        config.household_id = self.household_id;
        config
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let env_config = match EnvConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SurepetExitCode::ConfigError.into();
        }
    };

    // Validate configuration (env-level and client-level) before any I/O
    if let Err(e) = env_config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SurepetExitCode::ConfigError.into();
    }
    let config = env_config.to_client_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SurepetExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SurepetExitCode::ConfigError.into();
    }

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SurepetExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(cli.command, config).await {
            error!("Error: {:#}", e);
            SurepetExitCode::RuntimeError
        } else {
            SurepetExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run one command against the vendor API
async fn run(command: Command, config: SurepetConfig) -> Result<()> {
    let client = SureHubClient::new(config)?;
    let token = client.login().await?;

    let households = client.households(&token).await?;
    if households.is_empty() {
        anyhow::bail!("Account has no households");
    }
    let household_id = match client.configured_household() {
        Some(id) => {
            if !households.iter().any(|h| h.id == id) {
                anyhow::bail!(
                    "Household {} is not accessible with this account; \
                    run `surepet households` for the available ids",
                    id
                );
            }
            id
        }
        None => households[0].id,
    };

    match command {
        Command::Households => run_households(&households, household_id),
        Command::Pets => run_pets(&client, &token, household_id).await?,
        Command::Flaps => run_flaps(&client, &token, household_id).await?,
        Command::Timeline { pet_name } => {
            run_timeline(&client, &token, household_id, &pet_name).await?
        }
        Command::LockPet { pet_name } => {
            run_set_profile(&client, &token, household_id, &pet_name, TagProfile::Indoor).await?
        }
        Command::FreePet { pet_name } => {
            run_set_profile(&client, &token, household_id, &pet_name, TagProfile::Outdoor).await?
        }
        Command::Watch { interval_secs } => {
            run_watch(&client, &token, household_id, interval_secs).await?
        }
    }

    Ok(())
}

fn run_households(households: &[Household], selected: i64) {
    for household in households {
        let marker = if household.id == selected {
            " (active)"
        } else {
            ""
        };
        println!("{}\t{}{}", household.id, household.name, marker);
    }
}

async fn run_pets(client: &SureHubClient, token: &SessionToken, household_id: i64) -> Result<()> {
    let pets = client.pets(token, household_id).await?;
    let tags = client.tags(token).await?;

    for pet in &pets {
        let position = client.pet_position(token, pet.id).await?;
        let profile = tags
            .iter()
            .find(|t| t.id == pet.tag_id)
            .and_then(|t| t.profile());

        match profile {
            Some(profile) => println!(
                "{} ({}) is {}, currently {}",
                pet.name,
                pet.id,
                profile.label(),
                position.describe()
            ),
            None => println!("{} ({}) is currently {}", pet.name, pet.id, position.describe()),
        }
    }

    Ok(())
}

async fn run_flaps(client: &SureHubClient, token: &SessionToken, household_id: i64) -> Result<()> {
    let devices = client.devices(token, household_id).await?;

    for flap in devices.iter().filter(|d| d.is_flap()) {
        let status = client.flap_status(token, flap.id).await?;
        println!(
            "{} ({}) at {:.3}V is {}",
            flap.name,
            flap.id,
            status.battery_per_cell(),
            status.describe_lock()
        );
        if !status.online {
            println!("\twarning: flap is offline, status may be stale");
        }
    }

    Ok(())
}

async fn run_timeline(
    client: &SureHubClient,
    token: &SessionToken,
    household_id: i64,
    pet_name: &str,
) -> Result<()> {
    let pets = client.pets(token, household_id).await?;
    let pet = find_pet(&pets, pet_name)
        .ok_or_else(|| anyhow::anyhow!("No pet named '{}' in this household", pet_name))?;

    let timeline = client.timeline(token, household_id).await?;
    for entry in timeline
        .iter()
        .rev()
        .filter(|e| e.is_movement_of(pet.tag_id))
    {
        for movement in &entry.movements {
            let direction = match movement.direction() {
                Some(direction) => direction.label().to_string(),
                None => format!("unknown direction code {}", movement.direction),
            };
            println!("{} {} {}", fmt_time(movement.created_at), pet.name, direction);
        }
    }

    Ok(())
}

async fn run_set_profile(
    client: &SureHubClient,
    token: &SessionToken,
    household_id: i64,
    pet_name: &str,
    profile: TagProfile,
) -> Result<()> {
    let pets = client.pets(token, household_id).await?;
    let pet = find_pet(&pets, pet_name)
        .ok_or_else(|| anyhow::anyhow!("No pet named '{}' in this household", pet_name))?;

    let devices = client.devices(token, household_id).await?;
    let flap = devices
        .iter()
        .find(|d| d.is_flap())
        .ok_or_else(|| anyhow::anyhow!("Household has no flap device"))?;

    let acknowledged = client
        .set_tag_profile(token, flap.id, pet.tag_id, profile)
        .await?;

    if acknowledged {
        println!("ok");
    } else {
        println!("fail");
    }

    Ok(())
}

async fn run_watch(
    client: &SureHubClient,
    token: &SessionToken,
    household_id: i64,
    interval_secs: u64,
) -> Result<()> {
    if !(10..=3600).contains(&interval_secs) {
        anyhow::bail!(
            "--interval-secs must be between 10 and 3600 seconds. Got: {}",
            interval_secs
        );
    }

    info!(
        "Watching household {} (poll interval {}s); Ctrl-C to stop",
        household_id, interval_secs
    );

    let mut stream = client.watch_timeline(
        token.clone(),
        household_id,
        Duration::from_secs(interval_secs),
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            entry = stream.next() => match entry {
                Some(entry) => print_event(&entry),
                None => break,
            },
        }
    }

    Ok(())
}

fn print_event(entry: &TimelineEntry) {
    println!("{} {}", fmt_time(entry.created_at), entry.decode_event());
    for movement in &entry.movements {
        let direction = match movement.direction() {
            Some(direction) => direction.label().to_string(),
            None => format!("unknown direction code {}", movement.direction),
        };
        println!("\ttag {} {}", movement.tag_id, direction);
    }
}

/// Case-insensitive pet lookup; the first match wins
fn find_pet<'a>(pets: &'a [Pet], name: &str) -> Option<&'a Pet> {
    pets.iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

fn fmt_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    match time {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(name: &str, id: i64, tag_id: i64) -> Pet {
        Pet {
            id,
            name: name.to_string(),
            tag_id,
            photo: None,
        }
    }

    #[test]
    fn find_pet_is_case_insensitive_first_match() {
        let pets = vec![pet("Flocke", 1, 101), pet("Milo", 2, 102), pet("FLOCKE", 3, 103)];

        assert_eq!(find_pet(&pets, "flocke").map(|p| p.id), Some(1));
        assert_eq!(find_pet(&pets, "MILO").map(|p| p.id), Some(2));
        assert!(find_pet(&pets, "Rex").is_none());
    }

    #[test]
    fn fmt_time_handles_missing_timestamps() {
        assert_eq!(fmt_time(None), "-");

        let time = chrono::DateTime::parse_from_rfc3339("2020-03-01T08:15:30Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(fmt_time(Some(time)), "2020-03-01 08:15:30");
    }

    #[test]
    fn log_level_validation() {
        let config = EnvConfig {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
            device_id: "1".to_string(),
            household_id: None,
            log_level: "debug".to_string(),
        };
        assert!(config.validate().is_ok());

        let config = EnvConfig {
            log_level: "loud".to_string(),
            ..config
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn client_config_carries_household_override() {
        let config = EnvConfig {
            email: "a@b.c".to_string(),
            password: "long-enough-password".to_string(),
            device_id: "1234567890".to_string(),
            household_id: Some(42),
            log_level: "info".to_string(),
        };
        let client_config = config.to_client_config();
        assert_eq!(client_config.household_id, Some(42));
        assert_eq!(client_config.credentials.email, "a@b.c");
    }
}
