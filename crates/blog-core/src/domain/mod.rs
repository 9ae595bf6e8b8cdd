//! Domain entities - the core business objects.

mod identifier;
mod post;

pub use identifier::{BlogId, MalformedIdentifier};
pub use post::{BlogFields, BlogPost};
