//! Domain types returned by repositories and serialized in API responses.

pub mod cart;
pub mod delivery;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use delivery::{AgentDelivery, Delivery, DeliveryProduct, DeliveryUpdate};
pub use order::{Order, OrderItem, OrderParty, OrderWithDelivery, ShippingInfo, ShippingRow};
pub use product::Product;
pub use user::{User, UserSummary};
