//! rx-client: fachadas proxy sobre el provider y los hooks del backend.
//!
//! Entradas delgadas que validan argumentos, construyen la expresión,
//! normalizan y delegan. El contrato exacto importa porque el binder
//! depende de las formas que estas fachadas producen.

pub mod client;
pub mod definition;
pub mod metadata;
pub mod testing;

pub use client::ClientProxy;
pub use definition::DefinitionProxy;
pub use metadata::MetadataProxy;
pub use testing::{RecordedCall, RecordingHooks};
