//! Business logic services.
//!
//! Services sit between the HTTP routes and the repositories: they own the
//! multi-step operations (checkout fan-out, credential handling, invoice
//! rendering, gateway calls) so route handlers stay thin.

pub mod auth;
pub mod checkout;
pub mod invoice;
pub mod payment;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutRequest, CheckoutService};
pub use invoice::{InvoiceError, generate_invoice, invoice_path};
pub use payment::{PaymentClient, PaymentError};
