//! The `exifgate otp` command for managing the TOTP secret.

use clap::{Args, Subcommand};
use exifgate_core::auth::totp::STEP_SECONDS;
use exifgate_core::auth::{current_code, load_or_create_secret, time_step, unix_now, validate};
use exifgate_core::{Config, FileSecretStore, OtpSecret, SecretStore};

/// Arguments for the `otp` command.
#[derive(Args, Debug)]
pub struct OtpArgs {
    #[command(subcommand)]
    pub command: OtpCommand,
}

/// Subcommands for OTP management.
#[derive(Subcommand, Debug)]
pub enum OtpCommand {
    /// Print the code that is valid right now
    Code,

    /// Print the secret and its otpauth:// enrollment URI
    Secret {
        /// Account label shown by authenticator apps
        #[arg(long, default_value = "exifgate")]
        account: String,

        /// Replace the stored secret with a new one
        #[arg(long)]
        rotate: bool,
    },

    /// Check a code against the stored secret
    Verify {
        /// The 6-digit code to check
        code: String,
    },
}

/// Execute the otp command.
pub async fn execute(args: OtpArgs, config: Config) -> anyhow::Result<()> {
    let store = FileSecretStore::new(config.secrets_dir());
    let name = &config.auth.secret_name;

    match args.command {
        OtpCommand::Code => {
            let secret = load_or_create_secret(&store, name)?;
            let now = unix_now();
            println!("{}", current_code(secret.as_bytes(), time_step(now)));
            tracing::debug!("Code valid for another {}s", seconds_left(now));
        }

        OtpCommand::Secret { account, rotate } => {
            let secret = if rotate {
                rotate_secret(&store, name)?
            } else {
                load_or_create_secret(&store, name)?
            };
            println!("{}", secret.to_base32());
            println!("{}", secret.provisioning_uri(&config.auth.issuer, &account));
        }

        OtpCommand::Verify { code } => {
            let secret = load_or_create_secret(&store, name)?;
            if !validate(secret.as_bytes(), code.trim(), unix_now()) {
                anyhow::bail!("Code is not valid.");
            }
            println!("Code is valid.");
        }
    }

    Ok(())
}

/// Generate and store a fresh secret, invalidating enrolled authenticators.
fn rotate_secret(store: &dyn SecretStore, name: &str) -> anyhow::Result<OtpSecret> {
    let secret = OtpSecret::generate();
    store.set(name, &secret.to_base32())?;
    tracing::info!(name, "Rotated TOTP secret");
    Ok(secret)
}

/// Seconds until the current time step ends.
fn seconds_left(now: u64) -> u64 {
    STEP_SECONDS - now % STEP_SECONDS
}
