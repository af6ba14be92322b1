// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: platform  —  target platforms and build types
// ─────────────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A cross-compilation target. The set is closed: every member has a
/// compiler-profile constructor in `toolchain`, so an unlisted platform
/// can never reach profile construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// The build host itself (x86-64 Linux).
    Native,
    /// BeagleBoard-xM, ARM Cortex-A8, cross-built against a deployed sysroot.
    Beagle,
    /// Android ARM, built against a fixed SDK/NDK pairing.
    Android,
}

impl Platform {
    pub fn all() -> &'static [Platform] {
        &[Platform::Native, Platform::Beagle, Platform::Android]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native  => "native",
            Platform::Beagle  => "beagle",
            Platform::Android => "android",
        }
    }

    /// Comma-separated platform list for diagnostics.
    pub fn supported_names() -> String {
        let names: Vec<&str> = Platform::all().iter().map(|p| p.as_str()).collect();
        names.join(", ")
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native"  => Ok(Platform::Native),
            "beagle"  => Ok(Platform::Beagle),
            "android" => Ok(Platform::Android),
            _ => Err(ConfigError::UnsupportedPlatform(s.to_owned())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug or release. Controls optimization/diagnostic flags and whether
/// `NDEBUG` lands in the composed environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug   => "debug",
            BuildType::Release => "release",
        }
    }

    /// Lenient parse: an unrecognized build type yields `None` rather than
    /// an error. Historically such a build applied neither debug nor
    /// release flags, and existing invocations rely on that, so the caller
    /// is expected to warn and carry on with `None`.
    pub fn parse_lenient(s: &str) -> Option<BuildType> {
        match s.trim().to_lowercase().as_str() {
            "debug"   => Some(BuildType::Debug),
            "release" => Some(BuildType::Release),
            _ => None,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────
