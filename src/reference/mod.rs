pub mod fide_list;
mod store;

pub use fide_list::RatingColumn;
pub use store::ReferenceStore;
