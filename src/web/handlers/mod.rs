pub mod pages;

pub use pages::{home_page, not_found_page};
