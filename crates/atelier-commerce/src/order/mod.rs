//! Orders after checkout: the record, its status machine, staff and
//! customer status changes, and lookup.

mod items;
mod lookup;
mod order;
mod repository;
mod service;
mod status;

pub use items::{ItemsDecodeError, OrderItems, OrderLine};
pub use lookup::{LookupOutcome, OrderLookup};
pub use order::Order;
pub use repository::{OrderRepository, StatusChange};
pub use service::OrderStatusService;
pub use status::{CancellationPolicy, OrderStatus, ParseStatusError, Transition};

pub(crate) use order::phone_digits;
