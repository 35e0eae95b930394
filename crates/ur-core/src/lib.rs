pub mod clock;
pub mod error;
pub mod models;

#[cfg(test)]
mod tests;

pub use clock::{Clock, SystemClock};
pub use error::error_location::ErrorLocation;
pub use models::user::User;
