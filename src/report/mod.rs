mod table;

pub use table::{band_header, band_row, diagnostics_lines, opponent_header, opponent_row, print_report};
