pub mod options;
pub mod partition;

pub use options::*;
pub use partition::*;
