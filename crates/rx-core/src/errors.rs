//! Errores del núcleo de quotations (taxonomía fija, sin reintentos).

use thiserror::Error;

use crate::service::RemoteError;

/// Taxonomía de errores del cliente.
///
/// - `InvalidArgument`: entrada requerida ausente o mal formada; se detecta
///   en el borde de la API, antes de cualquier I/O.
/// - `ContractViolation`: una expresión no calza con ninguna forma
///   reconocida o resuelve a un tipo incompatible durante el binding. Error
///   de programación, nunca se reintenta ni se coacciona.
/// - `Remote`: el hook del backend falló; se propaga sin reintento (la
///   política de retry pertenece al cliente concreto).
/// - `Cancelled`: la señal de cancelación llegó antes o durante la
///   operación asíncrona.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RxClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("remote operation failed: {0}")]
    Remote(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl From<RemoteError> for RxClientError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Cancelled => RxClientError::Cancelled,
            other => RxClientError::Remote(other.to_string()),
        }
    }
}
