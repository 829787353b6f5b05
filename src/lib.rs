//! Purpose: Library crate backing the `vlc-bootstrap` CLI and embedding applications.
//! Exports: `api` (public surface), `core` (discovery, environment, native loading, errors).
//! Role: Find libVLC, publish `VLC_PLUGIN_PATH`, and load the library exactly once.
//! Invariants: Bootstrap state is owned by the caller; there is no hidden global.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
pub mod core;
