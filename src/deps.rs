// ─────────────────────────────────────────────────────────────────────────────
//  robobuild :: deps  —  named third-party dependency registry
//
//  Build scripts reference dependencies by name ("freetype2", "ffmpeg");
//  the registry maps each name to per-platform include paths, library
//  paths, linked library names and runtime search paths. A dependency
//  does not have to support every platform: a missing platform key is a
//  detectable state, distinct from an empty list, and resolving it is a
//  fatal configuration error.
//
//  The registry is an explicit object populated up front (usually via
//  `DepRegistry::builtin()`), then read-only while artifacts are built.
// ─────────────────────────────────────────────────────────────────────────────

use std::collections::HashMap;

use crate::error::{ConfigError, Result};
use crate::platform::Platform;
use crate::toolchain;

/// One named third-party library, with four per-platform attribute maps.
#[derive(Debug, Clone)]
pub struct Dependency {
    name:          String,
    include_paths: HashMap<Platform, Vec<String>>,
    library_paths: HashMap<Platform, Vec<String>>,
    library_names: HashMap<Platform, Vec<String>>,
    runtime_paths: HashMap<Platform, Vec<String>>,
}

/// The four attribute lists of one dependency on one platform, in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDep {
    pub include_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub library_names: Vec<String>,
    pub runtime_paths: Vec<String>,
}

impl Dependency {
    pub fn new(name: impl Into<String>) -> Self {
        Dependency {
            name:          name.into(),
            include_paths: HashMap::new(),
            library_paths: HashMap::new(),
            library_names: HashMap::new(),
            runtime_paths: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn include_paths<I, S>(mut self, platform: Platform, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_paths
            .insert(platform, paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn library_paths<I, S>(mut self, platform: Platform, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.library_paths
            .insert(platform, paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn libraries<I, S>(mut self, platform: Platform, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.library_names
            .insert(platform, names.into_iter().map(Into::into).collect());
        self
    }

    pub fn runtime_paths<I, S>(mut self, platform: Platform, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.runtime_paths
            .insert(platform, paths.into_iter().map(Into::into).collect());
        self
    }

    /// Platforms present in all four attribute maps.
    pub fn supported_platforms(&self) -> Vec<Platform> {
        Platform::all()
            .iter()
            .copied()
            .filter(|p| {
                self.include_paths.contains_key(p)
                    && self.library_paths.contains_key(p)
                    && self.library_names.contains_key(p)
                    && self.runtime_paths.contains_key(p)
            })
            .collect()
    }

    /// The four lists for `platform`, or the platform-mismatch error if
    /// any of the maps has no entry for it.
    pub fn resolve(&self, platform: Platform) -> Result<ResolvedDep> {
        let missing = || ConfigError::UnsupportedPlatformForDependency {
            name:     self.name.clone(),
            platform,
            supported: self
                .supported_platforms()
                .iter()
                .map(|p| p.as_str().to_owned())
                .collect(),
        };

        Ok(ResolvedDep {
            include_paths: self.include_paths.get(&platform).ok_or_else(missing)?.clone(),
            library_paths: self.library_paths.get(&platform).ok_or_else(missing)?.clone(),
            library_names: self.library_names.get(&platform).ok_or_else(missing)?.clone(),
            runtime_paths: self.runtime_paths.get(&platform).ok_or_else(missing)?.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Registry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DepRegistry {
    table: HashMap<String, Dependency>,
}

impl DepRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        DepRegistry::default()
    }

    /// Insert or overwrite a dependency. All registration must happen
    /// before artifact building starts resolving names.
    pub fn register(&mut self, dep: Dependency) {
        self.table.insert(dep.name.clone(), dep);
    }

    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.table.get(name)
    }

    /// Registered names, sorted for display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn resolve(&self, name: &str, platform: Platform) -> Result<ResolvedDep> {
        let dep = self
            .table
            .get(name)
            .ok_or_else(|| ConfigError::UnknownDependency(name.to_owned()))?;
        dep.resolve(platform)
    }

    /// Resolve every name in request order and concatenate the lists.
    ///
    /// No deduplication and no reordering: the link line is sensitive to
    /// library order, so the merged lists preserve exactly the order the
    /// caller asked for.
    pub fn resolve_all(&self, names: &[String], platform: Platform) -> Result<ResolvedDep> {
        let mut merged = ResolvedDep::default();
        for name in names {
            let dep = self.resolve(name, platform)?;
            merged.include_paths.extend(dep.include_paths);
            merged.library_paths.extend(dep.library_paths);
            merged.library_names.extend(dep.library_names);
            merged.runtime_paths.extend(dep.runtime_paths);
        }
        Ok(merged)
    }

    /// The stock dependency table for the robotics tree. Beagle entries
    /// live under the deployed sysroot; android is only populated where a
    /// prebuilt install actually exists, so resolving the rest on android
    /// fails loudly at configuration time.
    pub fn builtin() -> Self {
        let sysroot = toolchain::beagle_sysroot();
        let mut reg = DepRegistry::new();

        reg.register(
            Dependency::new("freetype2")
                .include_paths(Platform::Native, ["/usr/include", "/usr/include/freetype2"])
                .library_paths(Platform::Native, ["/usr/lib/x86_64-linux-gnu"])
                .libraries(Platform::Native, ["freetype"])
                // freetype lives in the default linker path on the host
                .runtime_paths(Platform::Native, Vec::<String>::new())
                .include_paths(
                    Platform::Beagle,
                    [format!("{sysroot}/include"), format!("{sysroot}/include/freetype2")],
                )
                .library_paths(Platform::Beagle, [format!("{sysroot}/lib")])
                .libraries(Platform::Beagle, ["freetype"])
                .runtime_paths(Platform::Beagle, ["/lib"]),
        );

        reg.register(
            Dependency::new("ffmpeg")
                .include_paths(Platform::Native, ["/home/mark/local_installs/include"])
                .library_paths(Platform::Native, ["/home/mark/local_installs/lib"])
                .libraries(Platform::Native, ["avformat", "avcodec", "avutil", "swscale"])
                .runtime_paths(Platform::Native, ["/home/mark/local_installs/lib"])
                .include_paths(Platform::Beagle, [format!("{sysroot}/include")])
                .library_paths(Platform::Beagle, [format!("{sysroot}/lib")])
                .libraries(Platform::Beagle, ["avformat", "avcodec", "avutil", "swscale"])
                .runtime_paths(Platform::Beagle, ["/lib"])
                .include_paths(
                    Platform::Android,
                    ["/home/mark/software/android-ffmpeg-install/armeabi/include"],
                )
                .library_paths(
                    Platform::Android,
                    ["/home/mark/software/android-ffmpeg-install/armeabi/lib"],
                )
                .libraries(Platform::Android, ["avformat", "avcodec", "avutil", "swscale"])
                .runtime_paths(Platform::Android, Vec::<String>::new()),
        );

        reg.register(
            Dependency::new("gtest")
                .include_paths(Platform::Native, ["/usr/include/gtest"])
                .library_paths(Platform::Native, ["/usr/lib"])
                .libraries(Platform::Native, ["gtest_main", "gtest"])
                .runtime_paths(Platform::Native, Vec::<String>::new())
                .include_paths(Platform::Beagle, [format!("{sysroot}/include")])
                .library_paths(Platform::Beagle, [format!("{sysroot}/lib")])
                .libraries(Platform::Beagle, ["gtest_main", "gtest"])
                .runtime_paths(Platform::Beagle, Vec::<String>::new()),
        );

        reg.register(
            Dependency::new("unicap")
                .include_paths(Platform::Native, ["/usr/include", "/usr/include/unicap"])
                .library_paths(Platform::Native, ["/usr/lib"])
                .libraries(Platform::Native, ["unicap"])
                .runtime_paths(Platform::Native, Vec::<String>::new())
                .include_paths(
                    Platform::Beagle,
                    [format!("{sysroot}/include"), format!("{sysroot}/include/unicap")],
                )
                .library_paths(Platform::Beagle, [format!("{sysroot}/lib")])
                .libraries(Platform::Beagle, ["unicap"])
                .runtime_paths(Platform::Beagle, ["/lib"]),
        );

        reg
    }
}

// ─────────────────────────────────────────────────────────────────────────────
//  Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_registry() -> DepRegistry {
        let mut reg = DepRegistry::new();
        reg.register(
            Dependency::new("freetype2")
                .include_paths(Platform::Native, ["/usr/include/freetype2"])
                .library_paths(Platform::Native, ["/usr/lib"])
                .libraries(Platform::Native, ["freetype"])
                .runtime_paths(Platform::Native, Vec::<String>::new()),
        );
        reg.register(
            Dependency::new("ffmpeg")
                .include_paths(Platform::Native, ["/opt/ffmpeg/include"])
                .library_paths(Platform::Native, ["/opt/ffmpeg/lib"])
                .libraries(Platform::Native, ["avformat", "avcodec", "avutil", "swscale"])
                .runtime_paths(Platform::Native, ["/opt/ffmpeg/lib"]),
        );
        reg
    }

    #[test]
    fn resolve_returns_registered_lists_in_order() {
        let reg = test_registry();
        let dep = reg.resolve("ffmpeg", Platform::Native).unwrap();
        assert_eq!(
            dep.library_names,
            vec!["avformat", "avcodec", "avutil", "swscale"]
        );
        assert_eq!(dep.include_paths, vec!["/opt/ffmpeg/include"]);
        assert_eq!(dep.runtime_paths, vec!["/opt/ffmpeg/lib"]);
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let reg = test_registry();
        match reg.resolve("libusb", Platform::Native) {
            Err(ConfigError::UnknownDependency(name)) => assert_eq!(name, "libusb"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn resolve_missing_platform_fails_with_supported_list() {
        let reg = test_registry();
        match reg.resolve("freetype2", Platform::Beagle) {
            Err(ConfigError::UnsupportedPlatformForDependency { name, platform, supported }) => {
                assert_eq!(name, "freetype2");
                assert_eq!(platform, Platform::Beagle);
                assert_eq!(supported, vec!["native".to_owned()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_list_is_not_a_missing_platform() {
        let reg = test_registry();
        // freetype2 registered an empty runtime-path list on native; that
        // resolves fine, unlike an absent platform key.
        let dep = reg.resolve("freetype2", Platform::Native).unwrap();
        assert!(dep.runtime_paths.is_empty());
    }

    #[test]
    fn resolve_all_preserves_request_order_without_dedup() {
        let reg = test_registry();
        let names = vec![
            "ffmpeg".to_owned(),
            "freetype2".to_owned(),
            "ffmpeg".to_owned(),
        ];
        let merged = reg.resolve_all(&names, Platform::Native).unwrap();
        assert_eq!(
            merged.library_names,
            vec![
                "avformat", "avcodec", "avutil", "swscale",
                "freetype",
                "avformat", "avcodec", "avutil", "swscale",
            ]
        );
        assert_eq!(
            merged.include_paths,
            vec![
                "/opt/ffmpeg/include",
                "/usr/include/freetype2",
                "/opt/ffmpeg/include",
            ]
        );
    }

    #[test]
    fn resolve_all_fails_fast_on_first_bad_name() {
        let reg = test_registry();
        let names = vec!["ffmpeg".to_owned(), "nope".to_owned()];
        assert!(matches!(
            reg.resolve_all(&names, Platform::Native),
            Err(ConfigError::UnknownDependency(_))
        ));
    }

    #[test]
    fn register_overwrites_by_name() {
        let mut reg = test_registry();
        reg.register(
            Dependency::new("freetype2")
                .include_paths(Platform::Native, ["/other/include"])
                .library_paths(Platform::Native, ["/other/lib"])
                .libraries(Platform::Native, ["freetype"])
                .runtime_paths(Platform::Native, Vec::<String>::new()),
        );
        let dep = reg.resolve("freetype2", Platform::Native).unwrap();
        assert_eq!(dep.include_paths, vec!["/other/include"]);
    }

    #[test]
    fn builtin_registry_knows_the_stock_libraries() {
        let reg = DepRegistry::builtin();
        assert_eq!(reg.names(), vec!["ffmpeg", "freetype2", "gtest", "unicap"]);

        // ffmpeg is the only stock dependency with an android entry.
        assert!(reg.resolve("ffmpeg", Platform::Android).is_ok());
        assert!(matches!(
            reg.resolve("freetype2", Platform::Android),
            Err(ConfigError::UnsupportedPlatformForDependency { .. })
        ));
        assert!(matches!(
            reg.resolve("gtest", Platform::Android),
            Err(ConfigError::UnsupportedPlatformForDependency { .. })
        ));
    }

    #[test]
    fn supported_platforms_reflect_all_four_maps() {
        let dep = Dependency::new("partial")
            .include_paths(Platform::Native, ["/usr/include"])
            .library_paths(Platform::Native, ["/usr/lib"])
            .libraries(Platform::Native, ["partial"])
            .runtime_paths(Platform::Native, Vec::<String>::new())
            // beagle entry is incomplete: no library names or runtime paths
            .include_paths(Platform::Beagle, ["/sysroot/include"])
            .library_paths(Platform::Beagle, ["/sysroot/lib"]);

        assert_eq!(dep.supported_platforms(), vec![Platform::Native]);
        assert!(dep.resolve(Platform::Beagle).is_err());
    }
}
