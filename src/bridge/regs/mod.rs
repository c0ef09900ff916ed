pub(crate) mod file;
mod macros;
pub mod map;

pub use file::{ControlFile, ControlRegs, RegisterTarget};
pub use map::{Access, Register, Target, WindowField};
