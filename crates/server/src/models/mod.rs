//! Table records and validated form inputs.
//!
//! Every record is addressed by a fixed partition label plus a unique row
//! key, mirroring the (partition, row) addressing of the table store.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, NewCustomer, UpdateCustomer};
pub use order::{Order, OrderSnapshot};
pub use product::{Product, ProductForm};
