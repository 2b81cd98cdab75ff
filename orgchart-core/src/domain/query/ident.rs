// orgchart-core/src/domain/query/ident.rs

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::domain::error::DomainError;

/// PostgreSQL truncates identifiers beyond NAMEDATALEN - 1.
const MAX_IDENT_LEN: usize = 63;

fn re_ident() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap_or_else(|_| {
            // Unreachable: the pattern is a literal
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

/// A validated SQL identifier. Always rendered double-quoted, so the
/// original case is preserved on engines that fold unquoted names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.len() > MAX_IDENT_LEN || !re_ident().is_match(&value) {
            return Err(DomainError::InvalidIdentifier(value));
        }
        Ok(Self(value))
    }

    /// For compile-time constant names known to be valid.
    pub(crate) fn trusted(value: &'static str) -> Self {
        debug_assert!(re_ident().is_match(value), "invalid identifier constant");
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The regex already rules out embedded quotes
        write!(f, "\"{}\"", self.0)
    }
}

/// `schema.table AS alias`
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub schema: Option<Ident>,
    pub name: Ident,
    pub alias: Option<Ident>,
}

impl TableRef {
    pub fn new(name: &str) -> Result<Self, DomainError> {
        Ok(Self {
            schema: None,
            name: Ident::new(name)?,
            alias: None,
        })
    }

    pub fn aliased(name: &str, alias: &str) -> Result<Self, DomainError> {
        Ok(Self {
            schema: None,
            name: Ident::new(name)?,
            alias: Some(Ident::new(alias)?),
        })
    }

    pub fn in_schema(mut self, schema: Option<&Ident>) -> Self {
        self.schema = schema.cloned();
        self
    }

    /// The name columns of this table are qualified with inside its scope.
    pub fn binding(&self) -> &Ident {
        self.alias.as_ref().unwrap_or(&self.name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        Ok(())
    }
}

/// `qualifier.name`
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub qualifier: Option<Ident>,
    pub name: Ident,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Qualified column reference, e.g. `col("oh", "id_pai")`.
pub fn col(qualifier: &str, name: &str) -> Result<ColumnRef, DomainError> {
    Ok(ColumnRef {
        qualifier: Some(Ident::new(qualifier)?),
        name: Ident::new(name)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_ident_is_quoted_and_keeps_case() -> Result<()> {
        let ident = Ident::new("nomeOrganogramaPai")?;
        assert_eq!(ident.to_string(), "\"nomeOrganogramaPai\"");
        Ok(())
    }

    #[test]
    fn test_ident_rejects_injection() {
        for bad in ["", "oh\".\"id_pai", "1abc", "a b", "x;DROP TABLE t", "é"] {
            let err = Ident::new(bad).unwrap_err();
            assert!(matches!(err, DomainError::InvalidIdentifier(_)), "{bad}");
        }
    }

    #[test]
    fn test_ident_length_limit() {
        assert!(Ident::new("a".repeat(63)).is_ok());
        assert!(Ident::new("a".repeat(64)).is_err());
    }

    #[test]
    fn test_table_ref_rendering() -> Result<()> {
        let schema = Ident::new("public")?;
        let t = TableRef::aliased("organograma_historico", "oh")?.in_schema(Some(&schema));
        assert_eq!(
            t.to_string(),
            "\"public\".\"organograma_historico\" AS \"oh\""
        );
        assert_eq!(t.binding().as_str(), "oh");

        let bare = TableRef::new("organograma")?;
        assert_eq!(bare.binding().as_str(), "organograma");
        Ok(())
    }

    #[test]
    fn test_column_ref_rendering() -> Result<()> {
        assert_eq!(col("oh", "id_pai")?.to_string(), "\"oh\".\"id_pai\"");
        Ok(())
    }
}
