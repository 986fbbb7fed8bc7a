//! Domain services.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod registration;

pub use cart::{CartLedger, CartLine};
pub use catalog::CatalogService;
pub use checkout::{CheckoutError, CheckoutService};
pub use registration::{RegistrationError, RegistrationService};
