use blog_bootstrap::config::Config;
use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

/// A config pointing at a fresh SQLite file under the system temp dir.
pub fn temp_db(tag: &str) -> (PathBuf, Config) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "blog-bootstrap-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let cfg = Config {
        database_url: format!("sqlite:{}", temp_path.display()),
        ..Config::default()
    };
    (temp_path, cfg)
}
