// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: artifact  —  platform-gated artifact builders
//
//  Programs, shared libraries and static libraries share one algorithm:
//  gate on the supported-platform set, clone the environment, pull the
//  named dependencies out of the registry, append the request's explicit
//  extras, add kind-specific link flags, then hand off to the engine.
//
//  Merge order is fixed: resolved dependencies first, then the request's
//  explicit extras. Link order matters, so nothing is deduplicated or
//  reordered.
// ─────────────────────────────────────────────────────────────────────────────

use std::fmt;
use std::path::PathBuf;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::deps::DepRegistry;
use crate::env::BuildEnvironment;
use crate::engine::{BuildEngine, TargetHandle};
use crate::error::Result;
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Program,
    SharedLibrary,
    StaticLibrary,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Program       => "program",
            ArtifactKind::SharedLibrary => "shared-library",
            ArtifactKind::StaticLibrary => "static-library",
        }
    }

    /// Platform-conventional output file name for a target called `name`.
    pub fn output_name(&self, name: &str) -> String {
        match self {
            ArtifactKind::Program       => name.to_owned(),
            ArtifactKind::SharedLibrary => format!("lib{name}.so"),
            ArtifactKind::StaticLibrary => format!("lib{name}.a"),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parameters of one build call. Constructed per call and consumed
/// immediately by `build_artifact`.
#[derive(Debug, Clone)]
pub struct ArtifactRequest {
    pub name:      String,
    pub kind:      ArtifactKind,
    pub sources:   Vec<PathBuf>,
    /// Platforms this artifact is built for; anything else is skipped.
    pub platforms: Vec<Platform>,
    /// Registry names resolved for the current platform, in this order.
    pub deps:      Vec<String>,
    pub extra_include_paths: Vec<String>,
    pub extra_library_paths: Vec<String>,
    pub extra_libraries:     Vec<String>,
    pub extra_runtime_paths: Vec<String>,
}

impl ArtifactRequest {
    pub fn new(kind: ArtifactKind, name: impl Into<String>) -> Self {
        ArtifactRequest {
            name:      name.into(),
            kind,
            sources:   Vec::new(),
            platforms: Vec::new(),
            deps:      Vec::new(),
            extra_include_paths: Vec::new(),
            extra_library_paths: Vec::new(),
            extra_libraries:     Vec::new(),
            extra_runtime_paths: Vec::new(),
        }
    }

    pub fn program(name: impl Into<String>) -> Self {
        ArtifactRequest::new(ArtifactKind::Program, name)
    }

    pub fn shared_library(name: impl Into<String>) -> Self {
        ArtifactRequest::new(ArtifactKind::SharedLibrary, name)
    }

    pub fn static_library(name: impl Into<String>) -> Self {
        ArtifactRequest::new(ArtifactKind::StaticLibrary, name)
    }

    pub fn sources<I: IntoIterator<Item = PathBuf>>(mut self, sources: I) -> Self {
        self.sources.extend(sources);
        self
    }

    pub fn platforms<I: IntoIterator<Item = Platform>>(mut self, platforms: I) -> Self {
        self.platforms.extend(platforms);
        self
    }

    pub fn deps<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn include_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn library_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_library_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn libraries<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_libraries.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn runtime_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_runtime_paths.extend(paths.into_iter().map(Into::into));
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  The builder algorithm
// ─────────────────────────────────────────────────────────────────────────────

/// Configure one artifact and register it with the engine.
///
/// Returns `Ok(None)` when the current platform is not in the request's
/// supported set: that is selective building, not an error, and nothing is
/// registered. Dependency-resolution failures propagate and abort the
/// configuration pass.
pub fn build_artifact<E: BuildEngine>(
    engine: &mut E,
    registry: &DepRegistry,
    env: &BuildEnvironment,
    req: &ArtifactRequest,
) -> Result<Option<TargetHandle>> {
    // ── 1. Platform gate ──────────────────────────────────────────────────
    if !req.platforms.contains(&env.platform) {
        if !quiet_mode() {
            let supported: Vec<&str> = req.platforms.iter().map(|p| p.as_str()).collect();
            println!(
                "{}  skipping {}: platform {} not in supported set [{}]",
                "•".dimmed(),
                req.name.bold(),
                env.platform,
                supported.join(", ").dimmed(),
            );
        }
        return Ok(None);
    }

    // ── 2. Request-scoped environment ─────────────────────────────────────
    let mut env = env.clone();

    // ── 3. Registry dependencies, in request order ────────────────────────
    let resolved = registry.resolve_all(&req.deps, env.platform)?;
    env.append_include_paths(&resolved.include_paths);
    env.append_library_paths(&resolved.library_paths);
    env.append_libraries(&resolved.library_names);
    env.append_runtime_paths(&resolved.runtime_paths);

    // ── 4. Explicit extras, after the registry entries ────────────────────
    env.append_include_paths(&req.extra_include_paths);
    env.append_library_paths(&req.extra_library_paths);
    env.append_libraries(&req.extra_libraries);
    env.append_runtime_paths(&req.extra_runtime_paths);

    // ── 5. Kind-specific link configuration ───────────────────────────────
    if req.kind == ArtifactKind::SharedLibrary {
        env.append_flag("-fPIC");
        let soname = ArtifactKind::SharedLibrary.output_name(&req.name);
        env.append_link_flag(format!("-Wl,-soname,{soname}"));
    }

    // ── 6. Runtime search paths for dynamically linked outputs ────────────
    if matches!(req.kind, ArtifactKind::Program | ArtifactKind::SharedLibrary) {
        let rpaths = env.runtime_paths.clone();
        for path in &rpaths {
            env.append_link_flag(format!("-Wl,-rpath={path}"));
        }
    }

    // ── 7. Hand off to the engine ─────────────────────────────────────────
    let handle = match req.kind {
        ArtifactKind::Program => engine.register_program(&req.name, &req.sources, &env),
        ArtifactKind::SharedLibrary => {
            engine.register_shared_library(&req.name, &req.sources, &env)
        }
        ArtifactKind::StaticLibrary => {
            engine.register_static_library(&req.name, &req.sources, &env)
        }
    };
    Ok(Some(handle))
}

fn quiet_mode() -> bool {
    std::env::var("ROBOBUILD_QUIET").is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::Dependency;
    use crate::engine::PlanEngine;
    use crate::error::ConfigError;
    use crate::platform::BuildType;
    use crate::toolchain::CompilerProfile;
    use pretty_assertions::assert_eq;

    fn env_for(platform: Platform) -> BuildEnvironment {
        let profile = CompilerProfile::build(platform, Some(BuildType::Release));
        BuildEnvironment::compose(&profile)
    }

    fn registry_with_freetype() -> DepRegistry {
        let mut reg = DepRegistry::new();
        reg.register(
            Dependency::new("freetype2")
                .include_paths(Platform::Native, ["/usr/include/freetype2"])
                .library_paths(Platform::Native, ["/usr/lib/x86_64-linux-gnu"])
                .libraries(Platform::Native, ["freetype"])
                .runtime_paths(Platform::Native, Vec::<String>::new()),
        );
        reg
    }

    fn sources() -> Vec<PathBuf> {
        vec![PathBuf::from("src/text.cpp"), PathBuf::from("src/glyphs.cpp")]
    }

    #[test]
    fn unsupported_platform_is_skipped_without_registration() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Android);

        let req = ArtifactRequest::program("tool")
            .sources(sources())
            .platforms([Platform::Native]);

        let handle = build_artifact(&mut engine, &reg, &env, &req).unwrap();
        assert_eq!(handle, None);
        assert!(engine.is_empty());
    }

    #[test]
    fn shared_library_pulls_dependency_and_sets_soname() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Native);

        let req = ArtifactRequest::shared_library("text")
            .sources(sources())
            .platforms([Platform::Native, Platform::Android])
            .deps(["freetype2"]);

        let handle = build_artifact(&mut engine, &reg, &env, &req)
            .unwrap()
            .expect("native is in the supported set");
        assert_eq!(handle.output, "libtext.so");

        let target = &engine.targets()[0];
        assert!(target.include_paths.contains(&"/usr/include/freetype2".to_owned()));
        assert!(target.libraries.contains(&"freetype".to_owned()));
        assert!(target.flags.contains(&"-fPIC".to_owned()));
        assert!(target.link_flags.contains(&"-Wl,-soname,libtext.so".to_owned()));
    }

    #[test]
    fn shared_library_fails_on_platform_without_dependency_entry() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Beagle);

        let req = ArtifactRequest::shared_library("text")
            .sources(sources())
            .platforms([Platform::Native, Platform::Beagle])
            .deps(["freetype2"]);

        match build_artifact(&mut engine, &reg, &env, &req) {
            Err(ConfigError::UnsupportedPlatformForDependency { name, platform, .. }) => {
                assert_eq!(name, "freetype2");
                assert_eq!(platform, Platform::Beagle);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // A failed configuration registers nothing.
        assert!(engine.is_empty());
    }

    #[test]
    fn unknown_dependency_is_fatal() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Native);

        let req = ArtifactRequest::program("tool")
            .sources(sources())
            .platforms([Platform::Native])
            .deps(["no-such-lib"]);

        assert!(matches!(
            build_artifact(&mut engine, &reg, &env, &req),
            Err(ConfigError::UnknownDependency(_))
        ));
    }

    #[test]
    fn registry_entries_come_before_explicit_extras() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Native);

        let req = ArtifactRequest::program("viewer")
            .sources(sources())
            .platforms([Platform::Native])
            .deps(["freetype2"])
            .include_paths(["/opt/viewer/include"])
            .libraries(["m"]);

        build_artifact(&mut engine, &reg, &env, &req).unwrap();
        let target = &engine.targets()[0];

        let ft = target
            .include_paths
            .iter()
            .position(|p| p == "/usr/include/freetype2")
            .unwrap();
        let extra = target
            .include_paths
            .iter()
            .position(|p| p == "/opt/viewer/include")
            .unwrap();
        assert!(ft < extra);

        let freetype = target.libraries.iter().position(|l| l == "freetype").unwrap();
        let libm     = target.libraries.iter().position(|l| l == "m").unwrap();
        assert!(freetype < libm);
    }

    #[test]
    fn program_gets_rpath_link_flags() {
        let mut engine = PlanEngine::new();
        let reg = DepRegistry::new();
        let env = env_for(Platform::Native);

        let req = ArtifactRequest::program("camera_capture")
            .sources(sources())
            .platforms([Platform::Native])
            .runtime_paths(["/opt/robolib/lib"]);

        build_artifact(&mut engine, &reg, &env, &req).unwrap();
        let target = &engine.targets()[0];
        assert!(target
            .link_flags
            .contains(&"-Wl,-rpath=/opt/robolib/lib".to_owned()));
        // A plain program never gets the PIC flag forced.
        assert!(!target.flags.contains(&"-fPIC".to_owned()));
    }

    #[test]
    fn static_library_gets_no_link_directives() {
        let mut engine = PlanEngine::new();
        let reg = DepRegistry::new();
        let env = env_for(Platform::Native);

        let req = ArtifactRequest::static_library("core")
            .sources(sources())
            .platforms([Platform::Native])
            .runtime_paths(["/opt/robolib/lib"]);

        let handle = build_artifact(&mut engine, &reg, &env, &req).unwrap().unwrap();
        assert_eq!(handle.output, "libcore.a");

        let target = &engine.targets()[0];
        assert!(target.link_flags.is_empty());
        assert!(!target.flags.contains(&"-fPIC".to_owned()));
        // Runtime paths are still merged for downstream consumers.
        assert_eq!(target.runtime_paths, vec!["/opt/robolib/lib"]);
    }

    #[test]
    fn request_environment_is_scoped_to_the_call() {
        let mut engine = PlanEngine::new();
        let reg = registry_with_freetype();
        let env = env_for(Platform::Native);
        let libs_before = env.library_names.clone();

        let req = ArtifactRequest::shared_library("text")
            .sources(sources())
            .platforms([Platform::Native])
            .deps(["freetype2"]);
        build_artifact(&mut engine, &reg, &env, &req).unwrap();

        // The caller's environment is untouched by the merge.
        assert_eq!(env.library_names, libs_before);
        assert!(!env.flags.contains(&"-fPIC".to_owned()));
    }
}
