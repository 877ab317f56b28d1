pub mod connection;
pub mod entities;
pub mod error;
pub mod providers;
mod scylla_store;
mod sql_store;
pub mod store;

pub use connection::connect;
pub use error::{StoreError, StoreResult};
pub use scylla_store::ScyllaTodoStore;
pub use sql_store::SqlTodoStore;
pub use store::{CursorPage, OwnerFilter, TodoChanges, TodoItem, TodoStore};
