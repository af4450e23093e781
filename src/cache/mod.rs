mod structs;

pub use structs::{Cache, is_cacheable_month};
