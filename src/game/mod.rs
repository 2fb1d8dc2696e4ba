pub mod broadcast;
pub mod coordinator;
pub mod messages;
pub mod registry;
pub mod state;
pub mod ws;

pub use coordinator::CoordinatorHandle;
pub use ws::run_connection;
