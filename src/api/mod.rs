mod chesscom_client;
pub mod parsers;

pub use chesscom_client::ChessComClient;
