//! 产品管理

pub mod handler;
pub mod memory;
pub mod model;
pub mod repository;
pub mod store;

pub use handler::AppState;
pub use memory::MemoryProductStore;
pub use model::{Product, ProductInput};
pub use repository::PgProductStore;
pub use store::{ProductStore, StoreError};
