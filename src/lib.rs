// ─────────────────────────────────────────────────────────────────────────────
//  robobuild  —  public library API
// ─────────────────────────────────────────────────────────────────────────────

pub mod artifact;
pub mod deps;
pub mod engine;
pub mod env;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod sources;
pub mod toolchain;

pub use artifact::{build_artifact, ArtifactKind, ArtifactRequest};
pub use deps::{DepRegistry, Dependency, ResolvedDep};
pub use engine::{BuildEngine, PlanEngine, PlannedTarget, TargetHandle};
pub use env::BuildEnvironment;
pub use error::{ConfigError, Result};
pub use manifest::Manifest;
pub use platform::{BuildType, Platform};
pub use toolchain::CompilerProfile;

/// One-shot configuration: profile → environment → artifacts → plan.
///
/// # Usage from a build script
/// ```no_run
/// use robobuild::{
///     build_artifact, ArtifactRequest, BuildEnvironment, BuildType,
///     CompilerProfile, DepRegistry, PlanEngine, Platform,
/// };
///
/// let profile  = CompilerProfile::build(Platform::Native, Some(BuildType::Release));
/// let env      = BuildEnvironment::compose(&profile);
/// let registry = DepRegistry::builtin();
/// let mut engine = PlanEngine::new();
///
/// let text = ArtifactRequest::shared_library("text")
///     .sources(vec!["src/text.cpp".into()])
///     .platforms([Platform::Native, Platform::Android])
///     .deps(["freetype2"]);
///
/// match build_artifact(&mut engine, &registry, &env, &text) {
///     Ok(Some(handle)) => println!("registered {}", handle.output),
///     Ok(None)         => {} // platform not supported by this artifact
///     Err(e)           => { eprintln!("{e}"); std::process::exit(1); }
/// }
/// ```
pub fn configure(
    platform: Platform,
    build_type: Option<BuildType>,
    registry: &DepRegistry,
    requests: &[ArtifactRequest],
) -> Result<(PlanEngine, Vec<TargetHandle>)> {
    let profile = CompilerProfile::build(platform, build_type);
    let env = BuildEnvironment::compose(&profile);

    let mut engine = PlanEngine::new();
    let mut handles = Vec::new();
    for req in requests {
        if let Some(handle) = build_artifact(&mut engine, registry, &env, req)? {
            handles.push(handle);
        }
    }
    Ok((engine, handles))
}
