//! Purpose: Model the host platform and its libVLC search rules.
//! Exports: `Platform`, `SearchStrategy`, `MacOsSearch`, `LinuxSearch`, `BareSearch`.
//! Role: One strategy per platform supplies the well-known fallback locations.
//! Invariants: Fallbacks are only consulted after custom and embedded candidates.
//! Invariants: Well-known directories live in strategy fields so tests can point them anywhere.
use std::path::PathBuf;

use serde::Serialize;

use crate::core::discovery::PathCandidate;

/// Every file name accepted as "this directory holds libVLC" for a custom root.
pub const LIBVLC_FILE_NAMES: &[&str] = &["libvlc.dylib", "libvlc.so", "libvlc.dll"];

const MACOS_BUNDLE_DIR: &str = "/Applications/VLC.app/Contents/MacOS";
const LINUX_SYSTEM_LIB_DIRS: &[&str] = &["/usr/lib/x86_64-linux-gnu", "/usr/lib64", "/usr/lib"];
const LINUX_LIBVLC_MARKER: &[&str] = &["libvlc.so"];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// File names tried, in order, when loading libvlc.
    pub fn libvlc_names(self) -> &'static [&'static str] {
        match self {
            Platform::MacOs => &["libvlc.dylib", "libvlc.5.dylib"],
            Platform::Windows => &["libvlc.dll"],
            Platform::Linux | Platform::Other => &["libvlc.so", "libvlc.so.5"],
        }
    }

    /// File names of libvlccore, which libvlc links against.
    pub fn libvlccore_names(self) -> &'static [&'static str] {
        match self {
            Platform::MacOs => &["libvlccore.dylib", "libvlccore.9.dylib"],
            Platform::Windows => &["libvlccore.dll"],
            Platform::Linux | Platform::Other => &["libvlccore.so", "libvlccore.so.9"],
        }
    }

    pub fn search_strategy(self) -> Box<dyn SearchStrategy> {
        match self {
            Platform::MacOs => Box::new(MacOsSearch::default()),
            Platform::Linux => Box::new(LinuxSearch::default()),
            Platform::Windows | Platform::Other => Box::new(BareSearch::new(self)),
        }
    }
}

/// Platform-specific tail of the plugin and library search orders.
pub trait SearchStrategy: Send {
    fn platform(&self) -> Platform;

    fn plugin_fallbacks(&self) -> Vec<PathCandidate> {
        Vec::new()
    }

    fn library_fallbacks(&self) -> Vec<PathCandidate> {
        Vec::new()
    }
}

/// Looks inside the VLC.app bundle.
#[derive(Clone, Debug)]
pub struct MacOsSearch {
    pub bundle_dir: PathBuf,
}

impl Default for MacOsSearch {
    fn default() -> Self {
        Self {
            bundle_dir: PathBuf::from(MACOS_BUNDLE_DIR),
        }
    }
}

impl SearchStrategy for MacOsSearch {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn plugin_fallbacks(&self) -> Vec<PathCandidate> {
        vec![PathCandidate::directory(
            "VLC.app bundle plugins",
            self.bundle_dir.join("plugins"),
        )]
    }

    fn library_fallbacks(&self) -> Vec<PathCandidate> {
        vec![PathCandidate::directory(
            "VLC.app bundle lib",
            self.bundle_dir.join("lib"),
        )]
    }
}

/// Scans the distribution library directories for `libvlc.so`.
#[derive(Clone, Debug)]
pub struct LinuxSearch {
    pub system_lib_dirs: Vec<PathBuf>,
}

impl Default for LinuxSearch {
    fn default() -> Self {
        Self {
            system_lib_dirs: LINUX_SYSTEM_LIB_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SearchStrategy for LinuxSearch {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn library_fallbacks(&self) -> Vec<PathCandidate> {
        self.system_lib_dirs
            .iter()
            .map(|dir| PathCandidate::containing("system lib", dir, LINUX_LIBVLC_MARKER))
            .collect()
    }
}

/// No well-known locations; the loader's own search applies.
#[derive(Clone, Debug)]
pub struct BareSearch {
    platform: Platform,
}

impl BareSearch {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl SearchStrategy for BareSearch {
    fn platform(&self) -> Platform {
        self.platform
    }
}
