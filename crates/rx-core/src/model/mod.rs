pub mod artifact;
pub mod resource_id;

pub use artifact::{ArtifactKind, Identity, QuotedArtifact};
pub use resource_id::ResourceId;
