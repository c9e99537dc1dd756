pub mod ignore_set;
pub mod loaders;
pub mod recipe;
pub mod run_timestamp;
pub mod scan_match;

pub use ignore_set::IgnoreSet;
pub use loaders::{load_ignore_set, RecipeStore};
pub use recipe::Recipe;
pub use run_timestamp::RunTimestamp;
pub use scan_match::ScanMatch;
