//! Builders parametrizados: la generalización de aridad.
//!
//! El sistema original genera a mano un overload por aridad (2..15).
//! Aquí hay un solo algoritmo sobre la lista ordenada de tipos de
//! argumento: validar la aridad declarada, registrar la expresión
//! parametrizada *original* en el servicio de nombres y, al aplicar,
//! construir `Invoke(expr, Constant(a_i, ty_i)…)` en orden declarado
//! antes de delegar en la regla de quoting no parametrizada.

use std::sync::Arc;

use serde_json::Value;

use rx_expr::{Expr, TypeRef};

use crate::errors::RxClientError;
use crate::model::{ArtifactKind, QuotedArtifact};
use crate::naming::{BuilderToken, NamingService};

use super::quote;

/// Builder de artifacts parametrizados. Es un valor invocable, no un
/// árbol: su expresión originaria se recupera vía el token registrado en
/// el servicio de nombres.
pub struct ParamBuilder {
    naming: Arc<dyn NamingService>,
    result: ArtifactKind,
    arg_types: Vec<TypeRef>,
    expr: Expr,
    token: BuilderToken,
}

impl ParamBuilder {
    pub(crate) fn new(naming: Arc<dyn NamingService>,
                      result: ArtifactKind,
                      arg_types: Vec<TypeRef>,
                      expr: Expr)
                      -> Result<Self, RxClientError> {
        match expr.ty() {
            TypeRef::Func { args, .. } => {
                if args.len() != arg_types.len() {
                    return Err(RxClientError::InvalidArgument(format!(
                        "parameterized expression declares arity {}, builder expects {}",
                        args.len(),
                        arg_types.len()
                    )));
                }
            }
            other if !arg_types.is_empty() => {
                return Err(RxClientError::InvalidArgument(format!(
                    "expression of type {other} cannot back a builder of arity {}",
                    arg_types.len()
                )));
            }
            _ => {}
        }
        let token = BuilderToken::fresh();
        naming.register_builder(token, expr.clone());
        Ok(Self { naming, result, arg_types, expr, token })
    }

    pub fn token(&self) -> BuilderToken {
        self.token
    }

    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }

    /// La expresión parametrizada original (no la especializada por
    /// llamada).
    pub fn original_expression(&self) -> &Expr {
        &self.expr
    }

    /// Aplica el builder a valores concretos y produce el artifact.
    pub fn apply(&self, args: &[Value]) -> Result<QuotedArtifact, RxClientError> {
        if args.len() != self.arg_types.len() {
            return Err(RxClientError::InvalidArgument(format!(
                "builder of arity {} applied to {} arguments",
                self.arg_types.len(),
                args.len()
            )));
        }
        let constants: Vec<Expr> = args.iter()
                                       .zip(self.arg_types.iter())
                                       .map(|(v, t)| Expr::constant(v.clone(), t.clone()))
                                       .collect();
        let applied = Expr::invoke(self.expr.clone(), constants);
        Ok(quote(self.naming.as_ref(), self.result.clone(), applied))
    }
}
