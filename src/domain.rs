//! Domain module - Core value objects and entities
//!
//! Typed values extracted from listing pages (money, capacity) and the
//! product records built from them.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod byte_size;
pub mod money;
pub mod product;
pub mod product_set;
pub mod value_error;

pub use byte_size::{ByteSize, SizeUnit};
pub use money::{Currency, MoneyAmount};
pub use product::{ProductListing, ProductRecord, is_in_stock};
pub use product_set::ProductSet;
pub use value_error::ValueParseError;
