#![forbid(unsafe_code)]

mod codec;
mod error;
mod exceptions;
mod format;
mod io;
mod ops;
mod pack;
mod path;
mod probe;
mod route;
mod stale;
mod tasks;

pub use error::{PakError, PakResult};

pub use ops::{list, pack, unpack, verify};
