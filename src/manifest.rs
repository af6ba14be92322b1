// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: manifest  —  robobuild.toml project description
//
//  A project lists its artifacts once in TOML; `configure` turns each
//  entry into an ArtifactRequest by globbing the listed source dirs.
//
//    [project]
//    name = "robolib"
//
//    [[artifact]]
//    name      = "robolib"
//    kind      = "shared-library"
//    sources   = ["src/core", "src/vision"]
//    platforms = ["native", "beagle", "android"]
//    deps      = ["freetype2"]
// ─────────────────────────────────────────────────────────────────────────────

use std::path::Path;

use serde::Deserialize;

use crate::artifact::{ArtifactKind, ArtifactRequest};
use crate::error::{ConfigError, Result};
use crate::platform::Platform;
use crate::sources;

fn default_source_ext() -> String {
    "cpp".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    pub project: ProjectSection,
    #[serde(default, rename = "artifact")]
    pub artifacts: Vec<ArtifactSection>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    /// Extension globbed for artifact sources.
    #[serde(default = "default_source_ext")]
    pub source_ext: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactSection {
    pub name:      String,
    pub kind:      ArtifactKind,
    /// Source directories, relative to the manifest.
    pub sources:   Vec<String>,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub deps:      Vec<String>,
    #[serde(default)]
    pub includes:  Vec<String>,
    #[serde(default)]
    pub libs:      Vec<String>,
    #[serde(default)]
    pub lib_paths: Vec<String>,
    #[serde(default)]
    pub runtime_paths: Vec<String>,
    /// Substrings; matching source files are dropped after the glob.
    #[serde(default)]
    pub exclude:   Vec<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Manifest> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidManifest {
            path:   path.display().to_string(),
            detail: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, path: &Path) -> Result<Manifest> {
        let manifest: Manifest =
            toml::from_str(text).map_err(|e| ConfigError::InvalidManifest {
                path:   path.display().to_string(),
                detail: e.to_string(),
            })?;

        for artifact in &manifest.artifacts {
            if artifact.platforms.is_empty() {
                return Err(ConfigError::InvalidManifest {
                    path:   path.display().to_string(),
                    detail: format!("artifact '{}' lists no platforms", artifact.name),
                });
            }
            if artifact.sources.is_empty() {
                return Err(ConfigError::InvalidManifest {
                    path:   path.display().to_string(),
                    detail: format!("artifact '{}' lists no source dirs", artifact.name),
                });
            }
        }

        Ok(manifest)
    }

    /// Turn every artifact section into a build request, globbing source
    /// dirs relative to `root`.
    pub fn requests(&self, root: &Path) -> Vec<ArtifactRequest> {
        self.artifacts
            .iter()
            .map(|a| {
                let mut files = sources::glob_sources(root, &a.sources, &self.project.source_ext);
                sources::remove_matching(&mut files, &a.exclude);

                ArtifactRequest::new(a.kind, a.name.clone())
                    .sources(files)
                    .platforms(a.platforms.iter().copied())
                    .deps(a.deps.iter().cloned())
                    .include_paths(a.includes.iter().cloned())
                    .library_paths(a.lib_paths.iter().cloned())
                    .libraries(a.libs.iter().cloned())
                    .runtime_paths(a.runtime_paths.iter().cloned())
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────
