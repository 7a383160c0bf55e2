//! Checkout: delivery details and order submission.

mod details;
mod submission;

pub use details::CheckoutDetails;
pub use submission::OrderSubmission;
