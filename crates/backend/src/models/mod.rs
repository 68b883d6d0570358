//! Domain models for the storefront backend.
//!
//! These types are what the UI collaborator sends and receives. None of them
//! carries a password or password hash; secrets stay inside the user
//! repository.

pub mod order;
pub mod password_reset;
pub mod product;
pub mod session;
pub mod settings;
pub mod stats;
pub mod user;

pub use order::{Address, CustomerSnapshot, NewOrder, Order, OrderItem};
pub use password_reset::PasswordResetToken;
pub use product::{NewProduct, Product};
pub use session::{LoginSuccess, SessionToken};
pub use settings::SiteSettings;
pub use stats::AdminStats;
pub use user::{NewUser, RegisterRequest, User};
