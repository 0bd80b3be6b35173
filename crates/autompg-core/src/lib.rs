pub mod corrections;
pub mod dataset;
pub mod error;
pub mod record;

pub use corrections::{correct_manufacturer, Corrections};
pub use dataset::Dataset;
pub use error::{CoreError, CoreResult};
pub use record::{title_case, Record, RecordOrder};
