pub mod rss;

pub use rss::{render, write_to};
