pub mod dates;
pub mod extract;
pub mod fetch;
pub mod sources;

pub use extract::{Extractor, Heuristics};
pub use fetch::Fetcher;
pub use sources::{BelvedereSource, NewsSource};

pub mod prelude {
    pub use super::sources::NewsSource;
    pub use bn_core::{Article, Error, Result};
}
