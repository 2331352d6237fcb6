//! Content Store: the immutable article catalog, its taxonomy, and pure
//! filter/recommendation functions over it.

mod article;
mod catalog;
mod filter;
mod sampling;
pub mod taxonomy;

pub use article::Article;
pub use catalog::{Catalog, DEFAULT_PICK_COUNT, TRENDING_TAG};
pub use filter::{filter_by_category, filter_by_season, filter_by_tag};
pub use sampling::{FirstN, SeededShuffler, Shuffler, ThreadRngShuffler};
pub use taxonomy::{CATEGORIES, PreferenceAxis, SEASONS, TAGS, classify_value};
