//! Purpose: Narrow "set a process environment variable" boundary.
//! Exports: `EnvWriter`, `NativeEnv` (unix), `StdEnv`, `default_env_writer`, `PLUGIN_PATH_VAR`.
//! Role: Publishes the plugin directory before libVLC reads its environment.
//! Invariants: Unix platforms write through libc `setenv` so native readers see the value.
//! Invariants: Backend selection happens here and nowhere else.
use std::ffi::{OsStr, OsString};

use crate::core::error::Error;
use crate::core::platform::Platform;

pub const PLUGIN_PATH_VAR: &str = "VLC_PLUGIN_PATH";

pub trait EnvWriter: Send {
    fn set(&mut self, name: &str, value: &OsStr) -> Result<(), Error>;

    fn unset(&mut self, name: &str) -> Result<(), Error>;

    fn get(&self, name: &str) -> Option<OsString> {
        std::env::var_os(name)
    }

    fn backend(&self) -> &'static str;
}

/// Writes straight into the C runtime environment with `setenv(name, value, 1)`.
#[cfg(unix)]
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeEnv;

#[cfg(unix)]
impl EnvWriter for NativeEnv {
    fn set(&mut self, name: &str, value: &OsStr) -> Result<(), Error> {
        use std::ffi::CString;
        use std::io;
        use std::os::unix::ffi::OsStrExt;

        let c_name = CString::new(name).map_err(|err| {
            Error::init("environment variable name contains NUL").with_source(err)
        })?;
        let c_value = CString::new(value.as_bytes()).map_err(|err| {
            Error::init("environment variable value contains NUL")
                .with_path(value)
                .with_source(err)
        })?;

        // SAFETY: both pointers are valid NUL-terminated strings for the duration of the call.
        // `setenv` bypasses std's environment lock; bootstrapping runs before the caller
        // spawns threads that read the environment.
        let rc = unsafe { libc::setenv(c_name.as_ptr(), c_value.as_ptr(), 1) };
        if rc != 0 {
            return Err(Error::init(format!("setenv({name}) failed"))
                .with_source(io::Error::last_os_error()));
        }
        Ok(())
    }

    fn unset(&mut self, name: &str) -> Result<(), Error> {
        use std::ffi::CString;
        use std::io;

        let c_name = CString::new(name).map_err(|err| {
            Error::init("environment variable name contains NUL").with_source(err)
        })?;
        // SAFETY: valid NUL-terminated name; same single-threaded precondition as `set`.
        let rc = unsafe { libc::unsetenv(c_name.as_ptr()) };
        if rc != 0 {
            return Err(Error::init(format!("unsetenv({name}) failed"))
                .with_source(io::Error::last_os_error()));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "setenv"
    }
}

/// Standard library environment API.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdEnv;

impl EnvWriter for StdEnv {
    fn set(&mut self, name: &str, value: &OsStr) -> Result<(), Error> {
        check_name(name)?;
        if value.as_encoded_bytes().contains(&0) {
            return Err(
                Error::init("environment variable value contains NUL").with_path(value)
            );
        }
        // SAFETY: bootstrapping runs before the caller spawns threads that read the environment.
        unsafe { std::env::set_var(name, value) };
        Ok(())
    }

    fn unset(&mut self, name: &str) -> Result<(), Error> {
        check_name(name)?;
        // SAFETY: same single-threaded precondition as `set`.
        unsafe { std::env::remove_var(name) };
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "std::env"
    }
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(Error::init(format!("invalid environment variable name {name:?}")));
    }
    Ok(())
}

/// Serializes tests that mutate or read the process environment.
#[cfg(test)]
pub(crate) fn test_env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub fn default_env_writer(platform: Platform) -> Box<dyn EnvWriter> {
    match platform {
        Platform::Windows => Box::new(StdEnv),
        _ => native_or_std(),
    }
}

#[cfg(unix)]
fn native_or_std() -> Box<dyn EnvWriter> {
    Box::new(NativeEnv)
}

#[cfg(not(unix))]
fn native_or_std() -> Box<dyn EnvWriter> {
    Box::new(StdEnv)
}
