// Raw libVLC entry points resolved from the loaded library.
use std::os::raw::{c_char, c_int, c_void};

pub const LIBVLC_NEW: &[u8] = b"libvlc_new\0";
pub const LIBVLC_GET_VERSION: &[u8] = b"libvlc_get_version\0";

pub type LibvlcNew = unsafe extern "C" fn(argc: c_int, argv: *const *const c_char) -> *mut c_void;

pub type LibvlcGetVersion = unsafe extern "C" fn() -> *const c_char;
