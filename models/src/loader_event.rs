use std::fmt::{Display, Formatter, Result as FormatResult};

use serde::{Deserialize, Serialize};

/// Phases of an iframe's life as reported to the loader's owner.
///
/// Order over a session: `BeforeCreate`, `Created`, `BeforeMount`, `Mounted`,
/// any number of `BeforeUpdate`/`Updated`, then `BeforeDestroy`, `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoaderEventType {
    BeforeCreate,
    Created,
    BeforeMount,
    Mounted,
    BeforeUpdate,
    Updated,
    BeforeDestroy,
    Destroyed,
}

impl LoaderEventType {
    pub const ALL: [LoaderEventType; 8] = [
        LoaderEventType::BeforeCreate,
        LoaderEventType::Created,
        LoaderEventType::BeforeMount,
        LoaderEventType::Mounted,
        LoaderEventType::BeforeUpdate,
        LoaderEventType::Updated,
        LoaderEventType::BeforeDestroy,
        LoaderEventType::Destroyed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderEventType::BeforeCreate => "beforeCreate",
            LoaderEventType::Created => "created",
            LoaderEventType::BeforeMount => "beforeMount",
            LoaderEventType::Mounted => "mounted",
            LoaderEventType::BeforeUpdate => "beforeUpdate",
            LoaderEventType::Updated => "updated",
            LoaderEventType::BeforeDestroy => "beforeDestroy",
            LoaderEventType::Destroyed => "destroyed",
        }
    }
}

impl Display for LoaderEventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        f.write_str(self.as_str())
    }
}
