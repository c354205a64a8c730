use crate::coerce::{string_list_of, string_of, timestamp_of, Fields};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Creation and update stamps of the record itself, as kept by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Audit {
    pub created_date: Option<DateTime<FixedOffset>>,
    pub created_date_raw: String,
    pub updated_date: Option<DateTime<FixedOffset>>,
    pub updated_date_raw: String,
}

impl Audit {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            created_date: timestamp_of(values, "createdDate"),
            created_date_raw: string_of(values, "createdDate"),
            updated_date: timestamp_of(values, "updatedDate"),
            updated_date_raw: string_of(values, "updatedDate"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameServers {
    pub raw_text: String,
    pub host_names: Vec<String>,
    pub ips: Vec<String>,
}

impl NameServers {
    pub fn from_fields(values: &Fields) -> Self {
        Self {
            raw_text: string_of(values, "rawText"),
            host_names: string_list_of(values, "hostNames"),
            ips: string_list_of(values, "ips"),
        }
    }
}
