// Core modules implementing discovery, environment publishing, native loading, and errors.
pub mod bootstrap;
pub mod discovery;
pub mod env;
pub mod error;
pub mod libvlc;
pub mod platform;
