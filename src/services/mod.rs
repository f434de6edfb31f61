pub mod accounts;
pub mod activity;
pub mod catalog;

pub use accounts::AccountService;
pub use activity::ActivityRecorder;
pub use catalog::CatalogService;
