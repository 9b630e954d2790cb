use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::context::AppContext;
use crate::db::SeedOutcome;
use crate::error::BootstrapError;
use crate::service::seed::seed_admin;

#[derive(Debug, Clone, Copy)]
pub struct ProvisionReport {
    pub admin: SeedOutcome,
}

/// Prepare storage, create the schema, and seed the admin account.
/// Stops at the first failing step.
pub async fn provision(config: &Config) -> Result<ProvisionReport, BootstrapError> {
    prepare_storage(&config.database_url)?;

    let ctx = AppContext::open(config).await?;
    let result = seed_within(&ctx).await;
    ctx.close().await;

    let report = result?;
    info!(
        admin_id = report.admin.id(),
        created = report.admin.created(),
        "provisioning complete"
    );
    Ok(report)
}

async fn seed_within(ctx: &AppContext) -> Result<ProvisionReport, BootstrapError> {
    ctx.ensure_schema().await?;
    let admin = seed_admin(&ctx.accounts(), ctx.config()).await?;
    Ok(ProvisionReport { admin })
}

/// Make sure the directory holding a file-backed SQLite database exists.
pub fn prepare_storage(database_url: &str) -> Result<(), BootstrapError> {
    let Some(db_file) = sqlite_file_path(database_url) else {
        debug!(database_url, "no file-backed storage to prepare");
        return Ok(());
    };
    let Some(dir) = db_file.parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|source| BootstrapError::PrepareStorage {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(path = %dir.display(), "created database directory");
    Ok(())
}

/// Extract the filesystem path from a `sqlite:` URL. In-memory databases
/// have none.
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite:")?;
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_from_sqlite_urls() {
        assert_eq!(sqlite_file_path("sqlite:blog.db"), Some(PathBuf::from("blog.db")));
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/blog/blog.db"),
            Some(PathBuf::from("/var/lib/blog/blog.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite://data/blog.db?mode=rwc"),
            Some(PathBuf::from("data/blog.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/blog"), None);
    }

    #[test]
    fn prepare_storage_creates_missing_directory() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("blog-bootstrap-prepare-{}", std::process::id()));
        let url = format!("sqlite:{}/nested/blog.db", dir.display());

        prepare_storage(&url).expect("prepare storage");
        assert!(dir.join("nested").is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn prepare_storage_fails_when_parent_is_a_file() {
        let mut file = std::env::temp_dir();
        file.push(format!("blog-bootstrap-blocker-{}", std::process::id()));
        std::fs::write(&file, b"").expect("write blocker file");
        let url = format!("sqlite:{}/blog.db", file.display());

        let err = prepare_storage(&url).unwrap_err();
        assert!(matches!(err, BootstrapError::PrepareStorage { .. }));

        let _ = std::fs::remove_file(&file);
    }
}
