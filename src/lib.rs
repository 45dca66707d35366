pub mod comfort;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod readings;
pub mod state;
pub mod summary;
