//! Request manifest consumed by the driver.
//!
//! The manifest lists, per package, the messages that need a type tag and the package's id range:
//!
//! ```json
//! {
//!   "packages": [
//!     {
//!       "name": "login",
//!       "range": { "min": 100, "max": 199 },
//!       "messages": [{ "name": "Login", "id": 101 }, { "name": "Logout" }]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub packages: Vec<Package>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Range for auto-assigned ids. Without it, every message needs an explicit id.
    #[serde(default)]
    pub range: Option<IdRange>,
    /// Whether the package's tags go to the shared sidecar store.
    #[serde(default = "default_export")]
    pub export: bool,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    /// Explicit id; absent means auto-assignment.
    #[serde(default)]
    pub id: Option<u32>,
}

fn default_export() -> bool {
    true
}

impl Manifest {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
