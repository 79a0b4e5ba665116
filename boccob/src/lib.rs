pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{crawl_options_from_matches, parse_site, report_settings_from_matches};
