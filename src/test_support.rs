use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(prefix: &str) -> PathBuf {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "plan_graph_{prefix}_{}_{}",
        std::process::id(),
        now_ns
    ))
}

pub fn remove_dir_if_exists(path: &Path) {
    let _ = std::fs::remove_dir_all(path);
}

/// Pins every layout and logging variable so a developer's `.env` or shell
/// cannot leak into CLI runs.
pub fn apply_cli_test_env(command: &mut Command, log_dir: &Path) {
    command.env("PLAN_GRAPH_LABEL_FONT_SIZE", "14");
    command.env("PLAN_GRAPH_LABEL_MAX_WIDTH", "100");
    command.env("PLAN_GRAPH_LABEL_CONTAINER_WIDTH", "120");
    command.env("PLAN_GRAPH_LOG_DIR", log_dir.as_os_str());
    command.env("RUST_LOG", "error");
}
