mod archives;

pub use archives::{months_in_window, parse_archive_month};
