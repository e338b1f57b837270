pub mod exact;
pub mod merge;

pub use exact::find_exact_duplicates;
pub use merge::{merge_group, merge_records};
