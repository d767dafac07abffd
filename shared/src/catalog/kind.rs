//! Catalog descriptors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One product collection served by its own listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Men,
    Women,
    Electronics,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 3] = [Self::Men, Self::Women, Self::Electronics];

    /// Endpoint path relative to the catalog base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Men => "mens",
            Self::Women => "womens",
            Self::Electronics => "electronics",
        }
    }

    /// Name of the product array in the listing response
    pub fn list_field(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Electronics => "electronics",
        }
    }

    /// Page size a freshly opened page starts with
    pub fn default_limit(&self) -> u32 {
        match self {
            Self::Men | Self::Women => 20,
            Self::Electronics => 25,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Men => "Mens Collection",
            Self::Women => "Womens Collection",
            Self::Electronics => "Electronics Collection",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" | "mens" => Ok(Self::Men),
            "women" | "womens" => Ok(Self::Women),
            "electronics" => Ok(Self::Electronics),
            other => Err(format!("unknown catalog: {other}")),
        }
    }
}
