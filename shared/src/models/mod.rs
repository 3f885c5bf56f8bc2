//! Domain Models

pub mod booking;
pub mod customer;
pub mod product;

pub use booking::{
    AdditionalCost, Booking, BookingCreate, BookingItem, BookingItemInput, BookingStatus,
    BookingTotals, BookingUpdate, CustomerSnapshot, ItemStatus,
};
pub use customer::{Customer, CustomerPayload, CustomerUpdate};
pub use product::Product;
