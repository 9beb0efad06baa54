pub mod api;
pub mod badge;
pub mod leaderboard;
pub mod listing;
pub mod summary;

pub use api::FieldList;
pub use bountyboard_derive::FieldList;
