//! Purpose: Build and evaluate the ordered plugin/library search candidates.
//! Exports: `PathCandidate`, `Requirement`, `SearchContext`, `Discovery`, resolvers.
//! Role: Pure filesystem probing shared by `Bootstrap` and the `probe` command.
//! Invariants: Order is custom override, then embedded `vlc/` copy, then platform fallbacks.
//! Invariants: Only existence checks; nothing here writes to disk or the environment.
//! Invariants: An empty custom path behaves exactly like no custom path.
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::platform::{LIBVLC_FILE_NAMES, Platform, SearchStrategy};

const EMBEDDED_DIR: &str = "vlc";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "files", rename_all = "snake_case")]
pub enum Requirement {
    Directory,
    ContainsAny(&'static [&'static str]),
}

impl Requirement {
    pub fn is_met(&self, path: &Path) -> bool {
        match self {
            Requirement::Directory => path.is_dir(),
            Requirement::ContainsAny(files) => {
                path.is_dir() && files.iter().any(|file| path.join(file).is_file())
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PathCandidate {
    pub description: &'static str,
    pub path: PathBuf,
    pub requirement: Requirement,
}

impl PathCandidate {
    pub fn directory(description: &'static str, path: impl Into<PathBuf>) -> Self {
        Self {
            description,
            path: path.into(),
            requirement: Requirement::Directory,
        }
    }

    pub fn containing(
        description: &'static str,
        path: impl Into<PathBuf>,
        files: &'static [&'static str],
    ) -> Self {
        Self {
            description,
            path: path.into(),
            requirement: Requirement::ContainsAny(files),
        }
    }

    pub fn is_met(&self) -> bool {
        self.requirement.is_met(&self.path)
    }
}

/// Inputs to one search pass.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    custom: Option<&'a Path>,
    executable_dir: Option<&'a Path>,
    strategy: &'a dyn SearchStrategy,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        custom: Option<&'a Path>,
        executable_dir: Option<&'a Path>,
        strategy: &'a dyn SearchStrategy,
    ) -> Self {
        Self {
            custom: custom.filter(|path| !path.as_os_str().is_empty()),
            executable_dir,
            strategy,
        }
    }

    pub fn custom(&self) -> Option<&'a Path> {
        self.custom
    }

    pub fn platform(&self) -> Platform {
        self.strategy.platform()
    }

    pub fn plugin_candidates(&self) -> Vec<PathCandidate> {
        let mut candidates = Vec::new();
        if let Some(custom) = self.custom {
            candidates.push(PathCandidate::directory(
                "custom plugins",
                custom.join("plugins"),
            ));
        }
        if let Some(exe_dir) = self.executable_dir {
            candidates.push(PathCandidate::directory(
                "embedded plugins",
                exe_dir.join(EMBEDDED_DIR).join("plugins"),
            ));
        }
        candidates.extend(self.strategy.plugin_fallbacks());
        candidates
    }

    pub fn library_candidates(&self) -> Vec<PathCandidate> {
        let mut candidates = Vec::new();
        if let Some(custom) = self.custom {
            candidates.push(PathCandidate::directory("custom lib", custom.join("lib")));
            candidates.push(PathCandidate::containing(
                "custom root",
                custom,
                LIBVLC_FILE_NAMES,
            ));
        }
        if let Some(exe_dir) = self.executable_dir {
            candidates.push(PathCandidate::directory(
                "embedded lib",
                exe_dir.join(EMBEDDED_DIR).join("lib"),
            ));
        }
        candidates.extend(self.strategy.library_fallbacks());
        candidates
    }

    pub fn resolve_plugin_dir(&self) -> Option<PathBuf> {
        first_match(self.plugin_candidates())
    }

    pub fn resolve_library_dir(&self) -> Option<PathBuf> {
        first_match(self.library_candidates())
    }

    /// Evaluates every candidate, not just up to the first hit.
    pub fn discover(&self) -> Discovery {
        let plugins = evaluate(self.plugin_candidates());
        let libraries = evaluate(self.library_candidates());
        Discovery {
            platform: self.platform(),
            custom_path: self.custom.map(Path::to_path_buf),
            executable_dir: self.executable_dir.map(Path::to_path_buf),
            plugin_dir: first_found(&plugins),
            library_dir: first_found(&libraries),
            plugins,
            libraries,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CandidateStatus {
    #[serde(flatten)]
    pub candidate: PathCandidate,
    pub found: bool,
}

/// Side-effect free report of one search pass.
#[derive(Clone, Debug, Serialize)]
pub struct Discovery {
    pub platform: Platform,
    pub custom_path: Option<PathBuf>,
    pub executable_dir: Option<PathBuf>,
    pub plugin_dir: Option<PathBuf>,
    pub library_dir: Option<PathBuf>,
    pub plugins: Vec<CandidateStatus>,
    pub libraries: Vec<CandidateStatus>,
}

/// Directory of the running executable, where an embedded `vlc/` copy would live.
pub fn default_executable_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(Path::to_path_buf)
}

fn first_match(candidates: Vec<PathCandidate>) -> Option<PathBuf> {
    candidates
        .into_iter()
        .find(PathCandidate::is_met)
        .map(|candidate| candidate.path)
}

fn evaluate(candidates: Vec<PathCandidate>) -> Vec<CandidateStatus> {
    candidates
        .into_iter()
        .map(|candidate| {
            let found = candidate.is_met();
            CandidateStatus { candidate, found }
        })
        .collect()
}

fn first_found(statuses: &[CandidateStatus]) -> Option<PathBuf> {
    statuses
        .iter()
        .find(|status| status.found)
        .map(|status| status.candidate.path.clone())
}

#[cfg(test)]
mod tests {
    use super::{PathCandidate, Requirement, SearchContext};
    use crate::core::platform::{BareSearch, LinuxSearch, MacOsSearch, Platform};
    use std::fs;
    use std::path::Path;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"").expect("write");
    }

    fn empty_linux() -> LinuxSearch {
        LinuxSearch {
            system_lib_dirs: Vec::new(),
        }
    }

    #[test]
    fn requirement_checks_directory_and_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dir = temp.path().join("lib");
        assert!(!Requirement::Directory.is_met(&dir));

        fs::create_dir_all(&dir).expect("mkdir");
        assert!(Requirement::Directory.is_met(&dir));
        assert!(!Requirement::ContainsAny(&["libvlc.so"]).is_met(&dir));

        touch(&dir.join("libvlc.so"));
        assert!(Requirement::ContainsAny(&["libvlc.dll", "libvlc.so"]).is_met(&dir));
    }

    #[test]
    fn custom_plugins_win_over_embedded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let custom = temp.path().join("custom");
        let exe_dir = temp.path().join("app");
        fs::create_dir_all(custom.join("plugins")).expect("mkdir");
        fs::create_dir_all(exe_dir.join("vlc").join("plugins")).expect("mkdir");
        let search = empty_linux();

        let ctx = SearchContext::new(Some(custom.as_path()), Some(exe_dir.as_path()), &search);
        assert_eq!(ctx.resolve_plugin_dir(), Some(custom.join("plugins")));

        let ctx = SearchContext::new(None, Some(exe_dir.as_path()), &search);
        assert_eq!(
            ctx.resolve_plugin_dir(),
            Some(exe_dir.join("vlc").join("plugins"))
        );
    }

    #[test]
    fn custom_lib_dir_wins_over_everything() {
        let temp = tempfile::tempdir().expect("tempdir");
        let custom = temp.path().join("custom");
        let exe_dir = temp.path().join("app");
        let system = temp.path().join("usr-lib");
        fs::create_dir_all(custom.join("lib")).expect("mkdir");
        touch(&custom.join("libvlc.so"));
        fs::create_dir_all(exe_dir.join("vlc").join("lib")).expect("mkdir");
        touch(&system.join("libvlc.so"));
        let search = LinuxSearch {
            system_lib_dirs: vec![system],
        };

        let ctx = SearchContext::new(Some(custom.as_path()), Some(exe_dir.as_path()), &search);
        assert_eq!(ctx.resolve_library_dir(), Some(custom.join("lib")));
    }

    #[test]
    fn custom_root_with_library_binary_resolves_to_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let custom = temp.path().join("vlc-3.0");
        touch(&custom.join("libvlc.dylib"));
        let search = BareSearch::new(Platform::Windows);

        let ctx = SearchContext::new(Some(custom.as_path()), None, &search);
        assert_eq!(ctx.resolve_library_dir(), Some(custom.clone()));
    }

    #[test]
    fn custom_root_without_binary_falls_through_to_embedded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let custom = temp.path().join("custom");
        let exe_dir = temp.path().join("app");
        fs::create_dir_all(&custom).expect("mkdir");
        fs::create_dir_all(exe_dir.join("vlc").join("lib")).expect("mkdir");
        let search = empty_linux();

        let ctx = SearchContext::new(Some(custom.as_path()), Some(exe_dir.as_path()), &search);
        assert_eq!(
            ctx.resolve_library_dir(),
            Some(exe_dir.join("vlc").join("lib"))
        );
    }

    #[test]
    fn linux_picks_first_system_dir_with_libvlc() {
        let temp = tempfile::tempdir().expect("tempdir");
        let first = temp.path().join("lib-a");
        let second = temp.path().join("lib-b");
        let third = temp.path().join("lib-c");
        fs::create_dir_all(&first).expect("mkdir");
        touch(&second.join("libvlc.so"));
        touch(&third.join("libvlc.so"));
        let search = LinuxSearch {
            system_lib_dirs: vec![first, second.clone(), third],
        };

        let ctx = SearchContext::new(None, None, &search);
        assert_eq!(ctx.resolve_library_dir(), Some(second));
        assert_eq!(ctx.resolve_plugin_dir(), None);
    }

    #[test]
    fn macos_bundle_is_last_resort() {
        let temp = tempfile::tempdir().expect("tempdir");
        let bundle = temp.path().join("VLC.app").join("Contents").join("MacOS");
        fs::create_dir_all(bundle.join("plugins")).expect("mkdir");
        fs::create_dir_all(bundle.join("lib")).expect("mkdir");
        let search = MacOsSearch {
            bundle_dir: bundle.clone(),
        };

        let ctx = SearchContext::new(None, Some(temp.path()), &search);
        assert_eq!(ctx.resolve_plugin_dir(), Some(bundle.join("plugins")));
        assert_eq!(ctx.resolve_library_dir(), Some(bundle.join("lib")));
    }

    #[test]
    fn empty_custom_path_is_ignored() {
        let search = empty_linux();
        let ctx = SearchContext::new(Some(Path::new("")), None, &search);
        assert!(ctx.custom().is_none());
        assert!(ctx.plugin_candidates().is_empty());
        assert!(ctx.library_candidates().is_empty());
    }

    #[test]
    fn discover_reports_every_candidate() {
        let temp = tempfile::tempdir().expect("tempdir");
        let custom = temp.path().join("custom");
        let exe_dir = temp.path().join("app");
        fs::create_dir_all(custom.join("lib")).expect("mkdir");
        fs::create_dir_all(exe_dir.join("vlc").join("lib")).expect("mkdir");
        let search = empty_linux();

        let discovery = SearchContext::new(Some(custom.as_path()), Some(exe_dir.as_path()), &search).discover();
        let found: Vec<_> = discovery
            .libraries
            .iter()
            .map(|status| (status.candidate.description, status.found))
            .collect();

        assert_eq!(
            found,
            vec![("custom lib", true), ("custom root", false), ("embedded lib", true)]
        );
        assert_eq!(discovery.library_dir, Some(custom.join("lib")));
        assert_eq!(discovery.plugin_dir, None);
        assert_eq!(discovery.platform, Platform::Linux);
    }

    #[test]
    fn candidate_serializes_requirement() {
        let candidate = PathCandidate::containing("system lib", "/usr/lib", &["libvlc.so"]);
        let value = serde_json::to_value(&candidate).expect("json");
        assert_eq!(value["description"], "system lib");
        assert_eq!(value["path"], "/usr/lib");
        assert_eq!(value["requirement"]["kind"], "contains_any");
        assert_eq!(value["requirement"]["files"][0], "libvlc.so");
    }
}
