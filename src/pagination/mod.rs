mod config;
mod iterator;
mod urls;

pub use config::MonthWindow;
pub use iterator::MonthIterator;
pub use urls::{build_archives_url, build_monthly_url, build_profile_url};
