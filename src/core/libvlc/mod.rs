//! Purpose: Load libVLC dynamically and keep it resident.
//! Exports: `NativeRuntime`, `NativeInfo`, `LibVlc`.
//! Role: The one native initialization entry point behind `Bootstrap`.
//! Invariants: A `LibVlc` loads at most once; a second call is rejected, never re-run.
//! Invariants: Loaded handles are never unloaded while the owner lives.
//! Invariants: All FFI interaction is confined to this module + `sys`.
use std::ffi::{CStr, OsStr};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::core::error::Error;
use crate::core::platform::Platform;

pub mod sys;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NativeInfo {
    /// Library file actually opened, when loaded from a resolved directory.
    pub library_file: Option<PathBuf>,
    pub version: Option<String>,
}

/// Native initialization call. Implementations may assume they are invoked at
/// most once per successful bootstrap.
pub trait NativeRuntime: Send {
    fn initialize(&mut self, library_dir: Option<&Path>) -> Result<NativeInfo, Error>;
}

pub struct LibVlc {
    platform: Platform,
    libraries: LoadStack<Library>,
}

/// Handles in load order (libvlccore first, libvlc last), released in reverse.
struct LoadStack<T>(Vec<T>);

impl<T> LoadStack<T> {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn push(&mut self, item: T) {
        self.0.push(item);
    }

    fn last(&self) -> Option<&T> {
        self.0.last()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Drop for LoadStack<T> {
    fn drop(&mut self) {
        while let Some(item) = self.0.pop() {
            drop(item);
        }
    }
}

impl LibVlc {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            libraries: LoadStack::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.libraries.is_empty()
    }

    fn load_from_dir(&self, dir: &Path) -> Result<(LoadStack<Library>, PathBuf), Error> {
        let mut loaded = LoadStack::new();
        if let Some(core) = first_existing(dir, self.platform.libvlccore_names()) {
            loaded.push(open(core.as_os_str())?);
        }

        let file = first_existing(dir, self.platform.libvlc_names()).ok_or_else(|| {
            Error::init("no libvlc binary in library directory")
                .with_path(dir)
                .with_hint(format!(
                    "Expected one of: {}.",
                    self.platform.libvlc_names().join(", ")
                ))
        })?;
        loaded.push(open(file.as_os_str())?);
        Ok((loaded, file))
    }

    fn load_by_name(&self) -> Result<Library, Error> {
        let mut last_err = None;
        for name in self.platform.libvlc_names() {
            match open(OsStr::new(name)) {
                Ok(library) => return Ok(library),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| Error::init("no libvlc names known for platform")))
    }
}

impl NativeRuntime for LibVlc {
    fn initialize(&mut self, library_dir: Option<&Path>) -> Result<NativeInfo, Error> {
        if self.is_loaded() {
            return Err(Error::init("libvlc is already loaded"));
        }

        let (libraries, library_file) = match library_dir {
            Some(dir) => {
                let (libraries, file) = self.load_from_dir(dir)?;
                (libraries, Some(file))
            }
            None => {
                let mut libraries = LoadStack::new();
                libraries.push(self.load_by_name()?);
                (libraries, None)
            }
        };

        let Some(libvlc) = libraries.last() else {
            return Err(Error::init("libvlc did not load"));
        };
        ensure_entry_point(libvlc)?;
        let version = read_version(libvlc);
        tracing::debug!(version = ?version, "libvlc loaded");

        self.libraries = libraries;
        Ok(NativeInfo {
            library_file,
            version,
        })
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

fn open(name: &OsStr) -> Result<Library, Error> {
    // SAFETY: libVLC's load-time constructors have no preconditions on the caller.
    unsafe { Library::new(name) }.map_err(|err| {
        Error::init("failed to load native library")
            .with_path(name)
            .with_source(err)
    })
}

fn ensure_entry_point(library: &Library) -> Result<(), Error> {
    // SAFETY: the symbol is only checked for presence, never called.
    let symbol: Result<Symbol<'_, sys::LibvlcNew>, _> = unsafe { library.get(sys::LIBVLC_NEW) };
    symbol.map(|_| ()).map_err(|err| {
        Error::init("libvlc_new entry point not found")
            .with_hint("The library does not look like libvlc.")
            .with_source(err)
    })
}

fn read_version(library: &Library) -> Option<String> {
    // SAFETY: `libvlc_get_version` takes no arguments and returns a static C string.
    unsafe {
        let get_version: Symbol<'_, sys::LibvlcGetVersion> =
            library.get(sys::LIBVLC_GET_VERSION).ok()?;
        let ptr = get_version();
        if ptr.is_null() {
            return None;
        }
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}
