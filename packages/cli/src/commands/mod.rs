pub mod convert;
pub mod custom;
pub mod init;
pub mod regenerate;

pub use convert::{convert, ConvertArgs};
pub use custom::{custom, CustomArgs};
pub use init::{init, InitArgs};
pub use regenerate::{regenerate, RegenerateArgs};
