pub mod account;
pub mod job;
pub mod response;

pub use account::{AccountDetails, UserType};
pub use job::{JobListing, JobLocation, JobPay, PayFrequency};
pub use response::{BodyStatus, HttpReply};
