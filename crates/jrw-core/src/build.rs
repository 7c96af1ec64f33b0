//! Docker image build dispatch.
//!
//! `local` builds a single-platform image for the developer's machine,
//! `k8s` cross-builds with buildx and pushes for the cluster, and `all`
//! runs both in that order.

use crate::config::DockerConfig;
use crate::error::JrwError;
use crate::plan::{CommandSpec, Step};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const USAGE: &str = "Usage: jrw build {local|k8s|all}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildTarget {
    Local,
    K8s,
    #[default]
    All,
}

impl BuildTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildTarget::Local => "local",
            BuildTarget::K8s => "k8s",
            BuildTarget::All => "all",
        }
    }

    /// Parse an optional positional argument; omitted means `all`.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, JrwError> {
        arg.map_or(Ok(BuildTarget::default()), str::parse)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTarget {
    type Err = JrwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(BuildTarget::Local),
            "k8s" => Ok(BuildTarget::K8s),
            "all" => Ok(BuildTarget::All),
            other => Err(JrwError::InvalidTarget(other.to_string())),
        }
    }
}

/// Plan the build invocations for `target`.
pub fn plan(target: BuildTarget, docker: &DockerConfig) -> Vec<Step> {
    match target {
        BuildTarget::Local => vec![local_step(docker)],
        BuildTarget::K8s => vec![k8s_step(docker)],
        BuildTarget::All => vec![local_step(docker), k8s_step(docker)],
    }
}

fn local_step(docker: &DockerConfig) -> Step {
    let image = &docker.local.image;
    let mut cmd = CommandSpec::new(&docker.binary)
        .arg("build")
        .args(["-f", docker.dockerfile.as_str()]);
    for tag in &docker.local.tags {
        cmd = cmd.arg("-t").arg(format!("{image}:{tag}"));
    }
    Step::exec("local image build", cmd.arg(&docker.context))
}

fn k8s_step(docker: &DockerConfig) -> Step {
    let k8s = &docker.k8s;
    let repo = k8s.repository();
    let mut cmd = CommandSpec::new(&docker.binary).args(["buildx", "build"]);
    if !k8s.platform.is_empty() {
        cmd = cmd.args(["--platform", k8s.platform.as_str()]);
    }
    cmd = cmd.args(["-f", docker.dockerfile.as_str()]);
    for tag in &k8s.tags {
        cmd = cmd.arg("-t").arg(format!("{repo}:{tag}"));
    }
    if k8s.push {
        cmd = cmd.arg("--push");
    }
    Step::exec("k8s image build", cmd.arg(&docker.context))
}
