//! Purpose: One-time libVLC bootstrap owned by the caller.
//! Exports: `Bootstrap`, `Initialized`, `SharedBootstrap`.
//! Role: Resolve plugin/library directories, publish `VLC_PLUGIN_PATH`, load libVLC once.
//! Invariants: State moves Uninitialized -> Initialized exactly once and never reverts.
//! Invariants: A failed attempt leaves no state behind, so a later call may retry.
//! Invariants: A failed native load puts `VLC_PLUGIN_PATH` back to its previous value.
//! Invariants: `initialize` never returns an error; it logs and reports `false`.
use std::error::Error as StdError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::core::discovery::{Discovery, SearchContext, default_executable_dir};
use crate::core::env::{EnvWriter, PLUGIN_PATH_VAR, default_env_writer};
use crate::core::error::Error;
use crate::core::libvlc::{LibVlc, NativeRuntime};
use crate::core::platform::{Platform, SearchStrategy};

/// Outcome of the successful bootstrap. Immutable once recorded.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Initialized {
    library_dir: Option<PathBuf>,
    plugin_dir: Option<PathBuf>,
    library_file: Option<PathBuf>,
    version: Option<String>,
}

impl Initialized {
    /// `None` means libVLC was resolved by the system loader.
    pub fn library_dir(&self) -> Option<&Path> {
        self.library_dir.as_deref()
    }

    pub fn plugin_dir(&self) -> Option<&Path> {
        self.plugin_dir.as_deref()
    }

    pub fn library_file(&self) -> Option<&Path> {
        self.library_file.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

pub struct Bootstrap {
    strategy: Box<dyn SearchStrategy>,
    executable_dir: Option<PathBuf>,
    env: Box<dyn EnvWriter>,
    runtime: Box<dyn NativeRuntime>,
    state: Option<Initialized>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn for_platform(platform: Platform) -> Self {
        Self {
            strategy: platform.search_strategy(),
            executable_dir: default_executable_dir(),
            env: default_env_writer(platform),
            runtime: Box::new(LibVlc::new(platform)),
            state: None,
        }
    }

    pub fn with_executable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executable_dir = Some(dir.into());
        self
    }

    pub fn without_executable_dir(mut self) -> Self {
        self.executable_dir = None;
        self
    }

    pub fn with_strategy(mut self, strategy: impl SearchStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn with_env_writer(mut self, env: impl EnvWriter + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn with_runtime(mut self, runtime: impl NativeRuntime + 'static) -> Self {
        self.runtime = Box::new(runtime);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&Initialized> {
        self.state.as_ref()
    }

    pub fn library_path(&self) -> Option<&Path> {
        self.state.as_ref().and_then(Initialized::library_dir)
    }

    pub fn plugin_path(&self) -> Option<&Path> {
        self.state.as_ref().and_then(Initialized::plugin_dir)
    }

    pub fn version(&self) -> Option<&str> {
        self.state.as_ref().and_then(Initialized::version)
    }

    pub fn executable_dir(&self) -> Option<&Path> {
        self.executable_dir.as_deref()
    }

    /// Runs the search without touching the environment or loading anything.
    pub fn discover(&self, custom_path: Option<&Path>) -> Discovery {
        self.context(custom_path).discover()
    }

    /// Returns `true` once libVLC is loaded; failures are logged and reported as `false`.
    pub fn initialize(&mut self, custom_path: Option<&Path>) -> bool {
        match self.try_initialize(custom_path) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    cause = ?err.source().map(ToString::to_string),
                    hint = err.hint(),
                    "failed to initialize libvlc"
                );
                false
            }
        }
    }

    pub fn try_initialize(&mut self, custom_path: Option<&Path>) -> Result<&Initialized, Error> {
        let initialized = match self.state.take() {
            Some(initialized) => initialized,
            None => self.run(custom_path)?,
        };
        Ok(&*self.state.insert(initialized))
    }

    fn context<'a>(&'a self, custom_path: Option<&'a Path>) -> SearchContext<'a> {
        SearchContext::new(
            custom_path,
            self.executable_dir.as_deref(),
            self.strategy.as_ref(),
        )
    }

    fn run(&mut self, custom_path: Option<&Path>) -> Result<Initialized, Error> {
        let ctx = self.context(custom_path);
        let plugin_dir = ctx.resolve_plugin_dir();
        let library_dir = ctx.resolve_library_dir();

        // Outer `Some` means the variable was written and must be put back on failure.
        let mut previous_plugin_path = None;
        if let Some(dir) = &plugin_dir {
            tracing::info!(
                plugin_dir = %dir.display(),
                backend = self.env.backend(),
                "setting {PLUGIN_PATH_VAR}"
            );
            let previous = self.env.get(PLUGIN_PATH_VAR);
            self.env.set(PLUGIN_PATH_VAR, dir.as_os_str())?;
            previous_plugin_path = Some(previous);
        }

        match &library_dir {
            Some(dir) => tracing::info!(library_dir = %dir.display(), "using libvlc from directory"),
            None => tracing::info!("using system default libvlc"),
        }
        let native = match self.runtime.initialize(library_dir.as_deref()) {
            Ok(native) => native,
            Err(err) => {
                if let Some(previous) = previous_plugin_path {
                    self.restore_plugin_path(previous);
                }
                return Err(err);
            }
        };

        Ok(Initialized {
            library_dir,
            plugin_dir,
            library_file: native.library_file,
            version: native.version,
        })
    }

    fn restore_plugin_path(&mut self, previous: Option<OsString>) {
        let restored = match &previous {
            Some(value) => self.env.set(PLUGIN_PATH_VAR, value),
            None => self.env.unset(PLUGIN_PATH_VAR),
        };
        if let Err(err) = restored {
            tracing::warn!(error = %err, "failed to restore {PLUGIN_PATH_VAR}");
        }
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

/// `Bootstrap` behind a mutex; concurrent first calls are serialized and
/// only one of them runs discovery and the native load.
pub struct SharedBootstrap {
    inner: Mutex<Bootstrap>,
}

impl SharedBootstrap {
    pub fn new(bootstrap: Bootstrap) -> Self {
        Self {
            inner: Mutex::new(bootstrap),
        }
    }

    pub fn initialize(&self, custom_path: Option<&Path>) -> bool {
        self.lock().initialize(custom_path)
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_initialized()
    }

    pub fn state(&self) -> Option<Initialized> {
        self.lock().state().cloned()
    }

    pub fn into_inner(self) -> Bootstrap {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Bootstrap> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
