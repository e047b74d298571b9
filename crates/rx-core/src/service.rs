//! Contrato del backend (hooks abstractos de creación/borrado/definición).
//!
//! El cliente concreto implementa este trait con el transporte real; este
//! núcleo sólo construye los artifacts y delega. Cada operación recibe la
//! señal de cancelación del caller y debe respetarla best-effort.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::model::{QuotedArtifact, ResourceId};

use thiserror::Error;

/// Fallo reportado por el backend. Se propaga sin reintento.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("backend rejected operation: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("operation cancelled by backend")]
    Cancelled,
}

/// Handle opaco a un observer vivo en el backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveObserver {
    pub id: ResourceId,
}

/// Hooks abstractos implementados por el cliente concreto.
#[async_trait]
pub trait ServiceHooks: Send + Sync {
    async fn create_subscription(&self,
                                 artifact: &QuotedArtifact,
                                 metadata: Option<&Value>,
                                 ct: &CancellationToken)
                                 -> Result<(), RemoteError>;

    async fn delete_subscription(&self,
                                 artifact: &QuotedArtifact,
                                 ct: &CancellationToken)
                                 -> Result<(), RemoteError>;

    async fn create_stream(&self,
                           artifact: &QuotedArtifact,
                           metadata: Option<&Value>,
                           ct: &CancellationToken)
                           -> Result<(), RemoteError>;

    async fn delete_stream(&self,
                           artifact: &QuotedArtifact,
                           ct: &CancellationToken)
                           -> Result<(), RemoteError>;

    async fn get_observer(&self,
                          observer: &QuotedArtifact,
                          ct: &CancellationToken)
                          -> Result<LiveObserver, RemoteError>;

    async fn define_observable(&self,
                               id: &ResourceId,
                               definition: &QuotedArtifact,
                               metadata: Option<&Value>,
                               ct: &CancellationToken)
                               -> Result<(), RemoteError>;

    async fn undefine_observable(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError>;

    async fn define_observer(&self,
                             id: &ResourceId,
                             definition: &QuotedArtifact,
                             metadata: Option<&Value>,
                             ct: &CancellationToken)
                             -> Result<(), RemoteError>;

    async fn undefine_observer(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError>;

    async fn define_subscription_factory(&self,
                                         id: &ResourceId,
                                         definition: &QuotedArtifact,
                                         metadata: Option<&Value>,
                                         ct: &CancellationToken)
                                         -> Result<(), RemoteError>;

    async fn undefine_subscription_factory(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError>;

    async fn define_stream_factory(&self,
                                   id: &ResourceId,
                                   definition: &QuotedArtifact,
                                   metadata: Option<&Value>,
                                   ct: &CancellationToken)
                                   -> Result<(), RemoteError>;

    async fn undefine_stream_factory(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError>;
}
