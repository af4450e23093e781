pub mod connection;
pub mod models;
pub mod reports;
pub mod results;
pub mod runs;
pub mod setup;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
pub use reports::save_report;
pub use results::{list_band_results, list_opponent_results};
pub use runs::{latest_for_player, list_runs};
