// Reference backend for the store API
//
// - DatabaseManager: the storage adapter contract every backing engine implements
// - MemoryDatabase: in-memory adapter used by tests and local runs
// - StoreController: the store endpoints with their ownership rules

pub mod controller;
pub mod database;
pub mod memory;

pub use controller::StoreController;
pub use database::{DatabaseManager, DbError, DbResult, NewUser, User, UserId};
pub use memory::MemoryDatabase;
