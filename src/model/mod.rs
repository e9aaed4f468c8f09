//! Domain model: identifiers, entity summaries, and the error taxonomy.

pub mod error;
pub mod identifiers;
pub mod order;
pub mod product;
pub mod user;

pub use error::{FeedError, FetchFailure};
pub use identifiers::{Generation, MarkerId, OrderId, ProductId, RequestToken, UserId};
pub use order::{OrderStatus, OrderSummary};
pub use product::{ProductPatch, ProductSummary};
pub use user::{UserRole, UserSummary};
