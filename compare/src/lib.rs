//! Side-by-side product comparison.
//!
//! A [`ComparisonSet`] of 2 to 4 products is flattened into
//! [`AttributeRow`]s, one per attribute, and each row is annotated with the
//! index of its best value.

pub mod differ;
pub mod row;
pub mod set;

pub use differ::{ComparedRow, ComparisonTable, best_index, compare, differences_only};
pub use row::{AttributeRow, AttributeType, Product, ProductAttribute, build_rows};
pub use set::{ComparisonSet, MAX_PRODUCTS, MIN_PRODUCTS};
