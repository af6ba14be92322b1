// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: toolchain  —  per-platform compiler profiles
//
//  One hard policy table per target platform. Machine-local roots (the
//  cross toolchain install, the BeagleBoard sysroot, the Android SDK/NDK
//  pairing) can be moved with env vars:
//
//    ROBOBUILD_XTOOLS_ROOT        crosstool install for the beagle target
//    ROBOBUILD_BEAGLE_SYSROOT     deployed BeagleBoard root filesystem
//    ROBOBUILD_ANDROID_SDK_ROOT   Android SDK install
//    ROBOBUILD_ANDROID_NDK_ROOT   Android NDK install (r9b layout)
// ─────────────────────────────────────────────────────────────────────────────

use crate::platform::{BuildType, Platform};

/// NDK platform level the android profile is pinned to.
const ANDROID_API: &str = "android-8";
/// GCC version inside the pinned NDK.
const ANDROID_GCC: &str = "4.8";

/// One resolved toolchain. Fully determined by (platform, build type);
/// never mutated after handoff to the environment composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerProfile {
    pub platform:      Platform,
    /// Compiler executable (path or bare name looked up on `search_path`).
    pub command:       String,
    /// Directories searched for the compiler and related tools.
    pub search_path:   Vec<String>,
    /// Compiler flags, in append order.
    pub flags:         Vec<String>,
    /// Preprocessor symbol names.
    pub defines:       Vec<String>,
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub library_names: Vec<String>,
    /// Root filesystem for cross-compilation.
    pub sysroot:       String,
    pub is_debug:      bool,
}

impl CompilerProfile {
    /// Build the profile for a target platform, then apply the build type:
    /// debug appends `-g -O0` and sets `is_debug`, release appends `-O3`.
    ///
    /// `None` applies neither set of flags. That preserves the historical
    /// tolerance for unrecognized build-type strings; callers that parsed
    /// one should already have warned the user.
    pub fn build(platform: Platform, build_type: Option<BuildType>) -> CompilerProfile {
        let builder = match platform {
            Platform::Native  => native(),
            Platform::Beagle  => beagle(),
            Platform::Android => android(),
        };

        match build_type {
            Some(BuildType::Debug)   => builder.flags(["-g", "-O0"]).debug().build(),
            Some(BuildType::Release) => builder.flag("-O3").build(),
            None                     => builder.build(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Profile builder
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulates profile fields once at construction time; the finished
/// `CompilerProfile` is immutable from then on.
struct ProfileBuilder {
    profile: CompilerProfile,
}

impl ProfileBuilder {
    fn new(platform: Platform, command: &str) -> Self {
        ProfileBuilder {
            profile: CompilerProfile {
                platform,
                command:       command.to_owned(),
                search_path:   vec!["/bin".to_owned()],
                flags:         vec!["-std=c++11".to_owned()],
                defines:       Vec::new(),
                include_paths: Vec::new(),
                library_paths: Vec::new(),
                library_names: Vec::new(),
                sysroot:       "/".to_owned(),
                is_debug:      false,
            },
        }
    }

    fn search_dir(mut self, dir: impl Into<String>) -> Self {
        self.profile.search_path.push(dir.into());
        self
    }

    fn flag(mut self, flag: impl Into<String>) -> Self {
        self.profile.flags.push(flag.into());
        self
    }

    fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profile.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    fn define(mut self, symbol: impl Into<String>) -> Self {
        self.profile.defines.push(symbol.into());
        self
    }

    fn include(mut self, dir: impl Into<String>) -> Self {
        self.profile.include_paths.push(dir.into());
        self
    }

    fn library_path(mut self, dir: impl Into<String>) -> Self {
        self.profile.library_paths.push(dir.into());
        self
    }

    fn library(mut self, name: impl Into<String>) -> Self {
        self.profile.library_names.push(name.into());
        self
    }

    fn sysroot(mut self, root: impl Into<String>) -> Self {
        self.profile.sysroot = root.into();
        self
    }

    fn debug(mut self) -> Self {
        self.profile.is_debug = true;
        self
    }

    fn build(self) -> CompilerProfile {
        self.profile
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Platform policy tables
// ─────────────────────────────────────────────────────────────────────────────

fn native() -> ProfileBuilder {
    ProfileBuilder::new(Platform::Native, "/usr/bin/c++")
        .search_dir("/usr/bin")
}

fn beagle() -> ProfileBuilder {
    let sysroot = beagle_sysroot();
    ProfileBuilder::new(Platform::Beagle, "arm-none-linux-gnueabi-g++")
        .search_dir(format!("{}/bin", xtools_root()))
        .define("ARM_BUILD")
        .library_path(format!("{sysroot}/lib"))
        .flags(["-mtune=cortex-a8", "-mfpu=neon"])
        .sysroot(sysroot)
}

// The android toolchain is always pinned to one fixed SDK/NDK pairing and
// gnustl, so every field here assumes the r9b directory layout.
fn android() -> ProfileBuilder {
    let sdk = android_sdk_root();
    let ndk = android_ndk_root();

    let stl      = format!("{ndk}/sources/cxx-stl/gnu-libstdc++/{ANDROID_GCC}");
    let platform = format!("{ndk}/platforms/{ANDROID_API}/arch-arm");

    ProfileBuilder::new(Platform::Android, "arm-linux-androideabi-g++")
        .search_dir(format!("{sdk}/tools"))
        .search_dir(format!("{sdk}/platform-tools"))
        .search_dir(ndk.clone())
        .search_dir(format!(
            "{ndk}/toolchains/arm-linux-androideabi-{ANDROID_GCC}/prebuilt/linux-x86_64/bin"
        ))
        .define("ANDROID")
        .define("ARM_BUILD")
        .include(format!("{platform}/usr/include"))
        .include(format!("{stl}/include"))
        .include(format!("{stl}/libs/armeabi/include"))
        .library_path(format!("{platform}/usr/lib"))
        .library_path(format!("{stl}/libs/armeabi"))
        .library("gnustl_shared")
        .flag("-mfloat-abi=softfp")
        .sysroot(platform)
}

// ─────────────────────────────────────────────────────────────────────────────
//  Machine-local roots
// ─────────────────────────────────────────────────────────────────────────────

/// The deployed BeagleBoard root filesystem. Also the base for the stock
/// beagle dependency entries in `deps`.
pub fn beagle_sysroot() -> String {
    env_or("ROBOBUILD_BEAGLE_SYSROOT", "/home/mark/beagleboardxm/deploy_final")
}

fn xtools_root() -> String {
    env_or("ROBOBUILD_XTOOLS_ROOT", "/home/mark/x-tools/arm-none-linux-gnueabi")
}

fn android_sdk_root() -> String {
    env_or("ROBOBUILD_ANDROID_SDK_ROOT", "/home/mark/code/android-sdk-linux_x86")
}

fn android_ndk_root() -> String {
    env_or("ROBOBUILD_ANDROID_NDK_ROOT", "/home/mark/code/android-ndk-r9b")
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_owned())
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────
