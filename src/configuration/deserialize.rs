pub mod optional_string {
    use serde::{Deserialize, Deserializer};

    /// Blank values are treated the same as absent ones.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)
            .map(|v| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()))
    }
}

pub mod lenient_status {
    use crate::reporter::allure::model::status::Status;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any value that is not one of the known status strings maps to `Status::Unknown`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Status, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(status) => status.parse().unwrap_or(Status::Unknown),
            _ => Status::Unknown,
        })
    }
}
