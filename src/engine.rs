// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: engine  —  the build-graph engine seam
//
//  robobuild only configures; it never compiles. The external build-graph
//  engine (dependency tracking, incremental rebuild, actual compiler
//  invocation) sits behind the narrow `BuildEngine` trait.
//
//  `PlanEngine` is the implementation shipped with the CLI: it records
//  every registration into a JSON build plan the real engine consumes.
// ─────────────────────────────────────────────────────────────────────────────

use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::artifact::ArtifactKind;
use crate::env::BuildEnvironment;
use crate::error::{ConfigError, Result};

/// Opaque handle for one registered artifact, returned to the build script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetHandle {
    pub id:     usize,
    pub kind:   ArtifactKind,
    pub name:   String,
    /// Platform-conventional output file name, e.g. `libtext.so`.
    pub output: String,
}

/// The engine interface: one registration call per artifact kind, each
/// consuming the fully merged environment for that artifact.
pub trait BuildEngine {
    fn register_program(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle;

    fn register_shared_library(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle;

    fn register_static_library(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle;
}

// ─────────────────────────────────────────────────────────────────────────────
//  Plan engine
// ─────────────────────────────────────────────────────────────────────────────

/// One fully configured target inside the emitted plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTarget {
    pub id:            usize,
    pub kind:          ArtifactKind,
    pub name:          String,
    pub output:        String,
    pub sources:       Vec<String>,
    pub compiler:      String,
    pub search_path:   Vec<String>,
    pub flags:         Vec<String>,
    pub defines:       Vec<String>,
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub libraries:     Vec<String>,
    pub runtime_paths: Vec<String>,
    pub link_flags:    Vec<String>,
    pub sysroot:       String,
    /// SHA-256 over the flag-relevant fields; lets the consuming engine
    /// invalidate cached objects when the configuration changes.
    pub env_fingerprint: String,
}

/// Records registrations and serializes them as a JSON build plan.
#[derive(Debug, Default)]
pub struct PlanEngine {
    targets: Vec<PlannedTarget>,
}

impl PlanEngine {
    pub fn new() -> Self {
        PlanEngine::default()
    }

    pub fn targets(&self) -> &[PlannedTarget] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn to_json(&self) -> String {
        // PlannedTarget contains only map/string/number shapes, so
        // serialization cannot fail.
        serde_json::to_string_pretty(&self.targets).unwrap_or_else(|_| "[]".into())
    }

    pub fn write_plan(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()).map_err(|e| ConfigError::PlanWrite {
            path:   path.display().to_string(),
            detail: e.to_string(),
        })
    }

    fn register(
        &mut self,
        kind: ArtifactKind,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle {
        let id = self.targets.len();
        let output = kind.output_name(name);

        let target = PlannedTarget {
            id,
            kind,
            name: name.to_owned(),
            output: output.clone(),
            sources: sources.iter().map(|s| s.display().to_string()).collect(),
            compiler:      env.compiler.clone(),
            search_path:   env.search_path.clone(),
            flags:         env.flags.clone(),
            defines:       env.defines.clone(),
            include_paths: env.include_paths.clone(),
            library_paths: env.library_paths.clone(),
            libraries:     env.library_names.clone(),
            runtime_paths: env.runtime_paths.clone(),
            link_flags:    env.link_flags.clone(),
            sysroot:       env.sysroot.clone(),
            env_fingerprint: fingerprint(env),
        };
        self.targets.push(target);

        TargetHandle {
            id,
            kind,
            name: name.to_owned(),
            output,
        }
    }
}

impl BuildEngine for PlanEngine {
    fn register_program(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle {
        self.register(ArtifactKind::Program, name, sources, env)
    }

    fn register_shared_library(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle {
        self.register(ArtifactKind::SharedLibrary, name, sources, env)
    }

    fn register_static_library(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        env: &BuildEnvironment,
    ) -> TargetHandle {
        self.register(ArtifactKind::StaticLibrary, name, sources, env)
    }
}

/// SHA-256 of the flag-relevant environment fields, hex-encoded.
fn fingerprint(env: &BuildEnvironment) -> String {
    let mut hasher = Sha256::new();
    hasher.update(env.compiler.as_bytes());
    for field in [
        &env.flags,
        &env.defines,
        &env.include_paths,
        &env.library_paths,
        &env.library_names,
        &env.link_flags,
    ] {
        for item in field {
            hasher.update(item.as_bytes());
            hasher.update(b"\x1f");
        }
        hasher.update(b"\x1e");
    }
    hasher.update(env.sysroot.as_bytes());
    hex::encode(hasher.finalize())
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────
