use std::str::FromStr;

use crate::imagesync::SyncError;

/// Top-level catalog product
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    /// Product code, may contain `/`
    pub code: String,
    pub integration_id: Option<String>,
    pub name: String,
}

/// Optional restriction of a run to an explicit set of product IDs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    ids: Vec<i64>,
}

impl ProductFilter {
    /// Match every master product
    #[must_use]
    pub const fn all() -> Self {
        Self { ids: Vec::new() }
    }

    #[must_use]
    pub fn only(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Parse an optional comma-separated ID list; `None` means all products
    pub fn from_arg(arg: Option<&str>) -> Result<Self, SyncError> {
        arg.map_or_else(|| Ok(Self::all()), |s| s.parse())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }
}

impl FromStr for ProductFilter {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ids = s
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|_| SyncError::InvalidProductId(token.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::only(ids))
    }
}
