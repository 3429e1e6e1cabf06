//! Categories used to label transactions.

mod core;
mod create_endpoint;

pub use self::core::{
    Category, CategoryId, create_category, create_category_table, get_category, map_category_row,
};
pub use create_endpoint::create_category_endpoint;
