// Database abstraction layer for partition statements
pub mod adapter;
pub mod memory;
pub mod mysql;

pub use adapter::DatabaseExecutor;
pub use memory::MemoryExecutor;
pub use mysql::MySqlExecutor;
