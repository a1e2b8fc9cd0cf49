pub mod file;
pub mod http;
pub mod memory;

pub use file::{DirManifestSource, JsonFileCatalogSource, JsonQuestionTextLookup};
pub use http::HttpCatalogSource;
pub use memory::{InMemoryCatalogSource, InMemoryManifestSource, InMemoryQuestionTextLookup};
