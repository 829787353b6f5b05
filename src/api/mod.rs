//! Purpose: Define the public Rust API boundary for libVLC bootstrapping.
//! Exports: Bootstrap state, discovery reports, strategy/backend seams, and errors.
//! Role: Additive-only surface used by the CLI and embedding applications.
//! Invariants: Everything an embedder needs is re-exported here.

pub use crate::core::bootstrap::{Bootstrap, Initialized, SharedBootstrap};
pub use crate::core::discovery::{
    CandidateStatus, Discovery, PathCandidate, Requirement, SearchContext, default_executable_dir,
};
#[cfg(unix)]
pub use crate::core::env::NativeEnv;
pub use crate::core::env::{EnvWriter, PLUGIN_PATH_VAR, StdEnv, default_env_writer};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::libvlc::{LibVlc, NativeInfo, NativeRuntime};
pub use crate::core::platform::{
    BareSearch, LIBVLC_FILE_NAMES, LinuxSearch, MacOsSearch, Platform, SearchStrategy,
};
