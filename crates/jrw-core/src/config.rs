use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "jretirewise".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DockerConfig
// ---------------------------------------------------------------------------

/// Single-platform image built for the developer's machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalImageConfig {
    pub image: String,
    pub tags: Vec<String>,
}

impl Default for LocalImageConfig {
    fn default() -> Self {
        Self {
            image: "jretirewise".to_string(),
            tags: vec!["local-arm64".to_string(), "local".to_string()],
        }
    }
}

/// Cross-platform image built with buildx for the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct K8sImageConfig {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    pub platform: String,
    pub tags: Vec<String>,
    pub push: bool,
}

impl Default for K8sImageConfig {
    fn default() -> Self {
        Self {
            image: "jretirewise".to_string(),
            registry: None,
            platform: "linux/amd64".to_string(),
            tags: vec!["latest".to_string(), "v1.0.0-otel".to_string()],
            push: true,
        }
    }
}

impl K8sImageConfig {
    /// Image repository including the registry prefix, if any.
    pub fn repository(&self) -> String {
        match self.registry.as_deref().map(|r| r.trim_end_matches('/')) {
            Some(registry) if !registry.is_empty() => format!("{registry}/{}", self.image),
            _ => self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    pub binary: String,
    pub dockerfile: String,
    pub context: String,
    pub local: LocalImageConfig,
    pub k8s: K8sImageConfig,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            binary: "docker".to_string(),
            dockerfile: paths::DOCKERFILE.to_string(),
            context: ".".to_string(),
            local: LocalImageConfig::default(),
            k8s: K8sImageConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TestConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// File whose presence means we are already inside the app container.
    pub sentinel: String,
    /// Compose invocation, e.g. `["docker-compose"]` or `["docker", "compose"]`.
    pub compose: Vec<String>,
    pub service: String,
    pub startup_delay_seconds: u64,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            sentinel: paths::CONTAINER_SENTINEL.to_string(),
            compose: vec!["docker-compose".to_string()],
            service: "web".to_string(),
            startup_delay_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub runner: String,
    pub runner_args: Vec<String>,
    pub unit_dir: String,
    pub integration_dir: String,
    pub e2e_dir: String,
    pub container: ContainerConfig,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            runner: "pytest".to_string(),
            runner_args: vec!["-v".to_string()],
            unit_dir: paths::UNIT_TESTS_DIR.to_string(),
            integration_dir: paths::INTEGRATION_TESTS_DIR.to_string(),
            e2e_dir: paths::E2E_TESTS_DIR.to_string(),
            container: ContainerConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub tests: TestConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            project: ProjectConfig::default(),
            docker: DockerConfig::default(),
            tests: TestConfig::default(),
        }
    }
}

impl Config {
    /// Load `jrw.yaml` from `root`, falling back to the built-in defaults
    /// when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Write the default config unless one already exists. Returns true if written.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Self::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let mut push = |level: WarnLevel, message: String| {
            warnings.push(ConfigWarning { level, message });
        };

        if self.docker.binary.trim().is_empty() {
            push(WarnLevel::Error, "docker.binary is empty".to_string());
        }
        if self.docker.local.image.trim().is_empty() {
            push(WarnLevel::Error, "docker.local.image is empty".to_string());
        }
        if self.docker.local.tags.is_empty() {
            push(WarnLevel::Error, "docker.local.tags has no tags".to_string());
        }
        if self.docker.k8s.image.trim().is_empty() {
            push(WarnLevel::Error, "docker.k8s.image is empty".to_string());
        }
        if self.docker.k8s.tags.is_empty() {
            push(WarnLevel::Error, "docker.k8s.tags has no tags".to_string());
        }
        if self.docker.k8s.platform.trim().is_empty() {
            push(WarnLevel::Warning, "docker.k8s.platform is empty".to_string());
        }
        if self.docker.k8s.push && self.docker.k8s.registry.is_none() {
            push(
                WarnLevel::Warning,
                "docker.k8s.push is enabled but no registry is set; \
                 the image will be pushed to the default registry"
                    .to_string(),
            );
        }

        if self.tests.runner.trim().is_empty() {
            push(WarnLevel::Error, "tests.runner is empty".to_string());
        }
        for (key, dir) in [
            ("unit_dir", &self.tests.unit_dir),
            ("integration_dir", &self.tests.integration_dir),
            ("e2e_dir", &self.tests.e2e_dir),
        ] {
            if dir.trim().is_empty() {
                push(WarnLevel::Warning, format!("tests.{key} is empty"));
            }
        }

        let container = &self.tests.container;
        if container.compose.iter().all(|s| s.trim().is_empty()) {
            push(WarnLevel::Error, "tests.container.compose is empty".to_string());
        }
        if container.service.trim().is_empty() {
            push(WarnLevel::Error, "tests.container.service is empty".to_string());
        }
        if container.startup_delay_seconds > 300 {
            push(
                WarnLevel::Warning,
                format!(
                    "tests.container.startup_delay_seconds={} (>300 is unusual)",
                    container.startup_delay_seconds
                ),
            );
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
