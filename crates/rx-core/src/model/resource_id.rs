//! Identificador de recurso: nombre canónico direccionable por string.
//!
//! Dos identificadores son iguales sii sus formas canónicas lo son. La
//! forma canónica se usa como nombre cross-process y, para artifacts
//! parametrizados, como nombre textual del parámetro placeholder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RxClientError;

/// Nombre canónico de un artifact durable en el backend (URI en el
/// sistema original). Opaco: este núcleo no interpreta su estructura más
/// allá de la validación sintáctica mínima.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Valida y construye un identificador. Rechaza entradas en blanco y
    /// formas que colisionarían con nombres locales del binder.
    pub fn new(canonical: impl Into<String>) -> Result<Self, RxClientError> {
        let s = canonical.into();
        Self::try_parse(&s).ok_or_else(|| {
            RxClientError::InvalidArgument(format!("resource id is not canonical: {s:?}"))
        })
    }

    /// Forma total del parseo: `Some` sii el string es un id canónico.
    ///
    /// Regla sintáctica: no vacío, contiene un separador `:`, sin espacios
    /// y sin el prefijo `@` reservado a parámetros de entorno.
    pub fn try_parse(s: &str) -> Option<Self> {
        if s.is_empty() || s.starts_with('@') {
            return None;
        }
        if !s.contains(':') || s.chars().any(char::is_whitespace) {
            return None;
        }
        Some(ResourceId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = RxClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uri_like_names() {
        assert!(ResourceId::try_parse("rx://observable/xs").is_some());
        assert!(ResourceId::try_parse("r:1").is_some());
    }

    #[test]
    fn rejects_local_and_blank_names() {
        assert!(ResourceId::try_parse("").is_none());
        assert!(ResourceId::try_parse("@ctx").is_none());
        assert!(ResourceId::try_parse("x").is_none());
        assert!(ResourceId::try_parse("a b:1").is_none());
    }

    #[test]
    fn equality_is_canonical_string_equality() {
        let a = ResourceId::new("rx://s/1").unwrap();
        let b = ResourceId::new("rx://s/1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "rx://s/1");
    }
}
