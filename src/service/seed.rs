use tracing::{info, warn};

use crate::config::Config;
use crate::db::{AccountsStorage, NewAccount, SeedOutcome};
use crate::error::BootstrapError;
use crate::service::password::hash_password;

/// Create the administrator account unless one with the configured username
/// already exists. The seeded account starts with `online = true`.
pub async fn seed_admin(
    storage: &AccountsStorage,
    config: &Config,
) -> Result<SeedOutcome, BootstrapError> {
    let username = config.admin_username.as_str();

    if let Some(existing) = storage.find_by_username(username).await? {
        info!(username, id = existing.id, "admin account already exists, skipping seed");
        return Ok(SeedOutcome::AlreadyPresent { id: existing.id });
    }

    let password_hash = hash_password(&config.admin_password).await?;
    let outcome = storage
        .insert_if_absent(NewAccount {
            username: username.to_string(),
            password_hash,
            online: true,
        })
        .await?;

    match outcome {
        SeedOutcome::Created { id } => {
            info!(username, id, "admin account created");
            if config.uses_default_admin_password() {
                warn!(
                    username,
                    "admin account uses the default password; change it or set ADMIN_PASSWORD"
                );
            }
        }
        SeedOutcome::AlreadyPresent { id } => {
            info!(username, id, "admin account appeared concurrently, skipping seed");
        }
    }
    Ok(outcome)
}
