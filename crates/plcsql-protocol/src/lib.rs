//! Wire format for typed values exchanged with the database core
//!
//! Every value is framed as `[value tag][payload length][payload]`, with all
//! integers big-endian `i32`. The length word lets a reader step over a
//! payload it cannot interpret, so one bad value never desynchronizes the
//! values that follow it.

mod error;
mod packer;
mod unpacker;
mod value;

pub use error::*;
pub use packer::*;
pub use unpacker::*;
pub use value::*;
