//! rxflow: capa cliente de compilación y binding de la plataforma
//! reactiva distribuida.
//!
//! Reexporta la superficie pública del workspace: árboles citados
//! (`rx-expr`), modelo de artifacts/provider/binder (`rx-core`) y
//! fachadas proxy (`rx-client`).

pub use rx_expr::{Expr, IntrinsicOp, ParamDecl, TypeRef};

pub use rx_core::{ops, ArtifactKind, BuilderToken, ContextBinder, Identity, InMemoryNamingService,
                  LiveObserver, NamingService, ParamBuilder, QueryProvider, QuotedArtifact,
                  RemoteError, ResourceId, RxClientError, ServiceHooks, SubscriptionSource};

pub use rx_client::{ClientProxy, DefinitionProxy, MetadataProxy, RecordingHooks};
