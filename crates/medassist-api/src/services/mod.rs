// Business logic between the HTTP layer and the stores

pub mod report;
pub mod user;

pub use report::ReportService;
pub use user::{ProfileChanges, UserService};
