pub mod address;
pub mod email;
pub mod keys;
pub mod name;
pub mod phone;
pub mod rules;
pub mod screening;
pub mod url;

pub use email::normalize_email;
pub use keys::MatchKeys;
pub use phone::{normalize_phone, split_phone_list};
pub use rules::EquivalenceRules;
pub use screening::{screen_import, ImportScreening};
pub use url::domain_of;
