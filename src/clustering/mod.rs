pub mod duplicate_groups;

pub use duplicate_groups::DuplicateGrouper;
