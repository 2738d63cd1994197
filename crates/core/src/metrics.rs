use serde::{Deserialize, Serialize};

/// Fixed primary key of the singleton metrics record.
pub const METRICS_ROW_ID: i64 = 1;

/// Usage counters exposed through the admin endpoint.
///
/// Serialized with the camelCase names the browser client and the remote
/// table use (`pageViews`, `messageCount`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    #[serde(default)]
    pub page_views: u64,
    #[serde(default)]
    pub message_count: u64,
}

/// Which counter an increment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    PageViews,
    MessageCount,
}

impl Counter {
    /// Column name in the remote metrics table.
    #[must_use]
    pub const fn column(&self) -> &'static str {
        match *self {
            Self::PageViews => "pageViews",
            Self::MessageCount => "messageCount",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_use_camel_case_on_the_wire() {
        let m = Metrics { page_views: 3, message_count: 7 };
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json, serde_json::json!({"pageViews": 3, "messageCount": 7}));
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let m: Metrics = serde_json::from_str(r#"{"pageViews": 2}"#).unwrap();
        assert_eq!(m, Metrics { page_views: 2, message_count: 0 });
    }
}
