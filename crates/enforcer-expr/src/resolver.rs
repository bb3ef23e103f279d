use crate::snapshot::PropertySnapshot;
use std::sync::Arc;

/// A reference that could not be resolved. Not fatal by itself: the caller decides whether a
/// missing property is a problem.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedExpressionError {
    #[error("unresolved property '{property}' in expression '{expression}'")]
    Unknown { property: String, expression: String },
    #[error("malformed expression '{expression}': {reason}")]
    Malformed {
        expression: String,
        reason: &'static str,
    },
}

impl UnresolvedExpressionError {
    /// The missing property, when the expression was well-formed.
    pub fn property(&self) -> Option<&str> {
        match self {
            UnresolvedExpressionError::Unknown { property, .. } => Some(property),
            UnresolvedExpressionError::Malformed { .. } => None,
        }
    }
}

/// Resolves `${name}` references against an immutable snapshot.
///
/// Cheap to clone; every clone shares the same snapshot.
#[derive(Clone, Debug, Default)]
pub struct ExpressionResolver {
    snapshot: Arc<PropertySnapshot>,
}

impl ExpressionResolver {
    pub fn new(snapshot: PropertySnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> &PropertySnapshot {
        &self.snapshot
    }

    /// Interpolate every `${name}` in `expression`.
    ///
    /// - text without references resolves to itself
    /// - `$${` is a literal `${`
    /// - references do not nest
    pub fn resolve(&self, expression: &str) -> Result<String, UnresolvedExpressionError> {
        let mut out = String::with_capacity(expression.len());
        let mut rest = expression;

        while let Some(at) = rest.find('$') {
            out.push_str(&rest[..at]);
            let tail = &rest[at..];

            if let Some(after) = tail.strip_prefix("$${") {
                out.push_str("${");
                rest = after;
            } else if let Some(body) = tail.strip_prefix("${") {
                let Some(end) = body.find('}') else {
                    return Err(UnresolvedExpressionError::Malformed {
                        expression: expression.to_string(),
                        reason: "unterminated '${'",
                    });
                };
                let name = body[..end].trim();
                if name.is_empty() {
                    return Err(UnresolvedExpressionError::Malformed {
                        expression: expression.to_string(),
                        reason: "empty property name",
                    });
                }
                let value = self.snapshot.lookup(name).ok_or_else(|| {
                    UnresolvedExpressionError::Unknown {
                        property: name.to_string(),
                        expression: expression.to_string(),
                    }
                })?;
                out.push_str(value);
                rest = &body[end + 1..];
            } else {
                out.push('$');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);

        Ok(out)
    }

    /// Like [`resolve`](Self::resolve), but treats anything unresolved as absent.
    pub fn resolve_optional(&self, expression: &str) -> Option<String> {
        self.resolve(expression).ok()
    }

    /// Look a single property up by name, without expression syntax.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.snapshot.lookup(name)
    }
}
