pub mod posted_on;

pub use posted_on::parse_posted_on;
