#[allow(unused_imports)]
pub mod prelude {
    pub use super::todo_item::Entity as TodoItems;
}

pub mod todo_item;
