use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category record; the catalogue lifecycle is managed outside this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
