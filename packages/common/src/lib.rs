pub mod filesystem;
pub mod naming;
pub mod review;

pub use filesystem::*;
pub use naming::*;
pub use review::*;
