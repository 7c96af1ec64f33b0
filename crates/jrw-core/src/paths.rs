use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "jrw.yaml";
pub const GIT_DIR: &str = ".git";

/// Written by the Docker runtime at the root of every container filesystem.
pub const CONTAINER_SENTINEL: &str = "/.dockerenv";

pub const DOCKERFILE: &str = "Dockerfile";
pub const UNIT_TESTS_DIR: &str = "tests/unit";
pub const INTEGRATION_TESTS_DIR: &str = "tests/integration";
pub const E2E_TESTS_DIR: &str = "tests/e2e";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}
