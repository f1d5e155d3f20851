pub mod builder;
pub mod database; // MySQL and in-memory executors
pub mod handler;
pub mod partitioner;
pub mod state; // information_schema lookups

pub use builder::*;
pub use handler::*;
pub use partitioner::*;
pub use state::*;
