// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: env  —  build-environment composition
// ─────────────────────────────────────────────────────────────────────────────

use serde::Serialize;

use crate::platform::Platform;
use crate::toolchain::CompilerProfile;

/// The record handed to the external build-graph engine. Owned by the
/// calling build script; composing one copies the profile fields, so
/// mutating an environment can never touch the profile it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    pub platform:      Platform,
    pub compiler:      String,
    pub search_path:   Vec<String>,
    pub flags:         Vec<String>,
    pub defines:       Vec<String>,
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub library_names: Vec<String>,
    /// Runtime search paths, turned into `-Wl,-rpath=` directives by the
    /// artifact builders for programs and shared libraries.
    pub runtime_paths: Vec<String>,
    pub link_flags:    Vec<String>,
    pub sysroot:       String,
    pub is_debug:      bool,
}

impl BuildEnvironment {
    /// Pure transform from a compiler profile. Total over any valid
    /// profile; injects `NDEBUG` for non-debug builds.
    pub fn compose(profile: &CompilerProfile) -> BuildEnvironment {
        let mut defines = profile.defines.clone();
        if !profile.is_debug {
            defines.push("NDEBUG".to_owned());
        }

        BuildEnvironment {
            platform:      profile.platform,
            compiler:      profile.command.clone(),
            search_path:   profile.search_path.clone(),
            flags:         profile.flags.clone(),
            defines,
            include_paths: profile.include_paths.clone(),
            library_paths: profile.library_paths.clone(),
            library_names: profile.library_names.clone(),
            runtime_paths: Vec::new(),
            link_flags:    Vec::new(),
            sysroot:       profile.sysroot.clone(),
            is_debug:      profile.is_debug,
        }
    }

    // ── Append helpers (the engine's environmentAppend contract) ──────────

    pub fn append_flag(&mut self, flag: impl Into<String>) {
        self.flags.push(flag.into());
    }

    pub fn append_link_flag(&mut self, flag: impl Into<String>) {
        self.link_flags.push(flag.into());
    }

    pub fn append_include_paths(&mut self, paths: &[String]) {
        self.include_paths.extend_from_slice(paths);
    }

    pub fn append_library_paths(&mut self, paths: &[String]) {
        self.library_paths.extend_from_slice(paths);
    }

    pub fn append_libraries(&mut self, names: &[String]) {
        self.library_names.extend_from_slice(names);
    }

    pub fn append_runtime_paths(&mut self, paths: &[String]) {
        self.runtime_paths.extend_from_slice(paths);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────
