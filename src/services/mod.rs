pub mod clock;
pub mod pagination;
pub mod todo_service;

pub use clock::MillisClock;
pub use todo_service::TodoService;
