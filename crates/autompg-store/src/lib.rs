pub mod clean;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod parse;

pub use clean::{cleaned_path, ensure_cleaned, expand_tabs};
pub use error::{StoreError, StoreResult};
pub use fetch::DEFAULT_URL;
pub use loader::{load, load_from_str, LoadOptions, LoadReport};
pub use parse::{LineError, RawRow};
