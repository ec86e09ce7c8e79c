use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SyncError, SyncResult};

const OPTIONS_NOT_OBJECT: &str = "last argument must be a chart or options object";

/// Which propagation protocols a chart group runs.
///
/// Every flag defaults to `true`. Unknown keys in a serialized options object
/// are ignored; known keys overlay the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Mirror highlight/unhighlight across the group.
    #[serde(default = "default_enabled")]
    pub selection: bool,
    /// Mirror the x viewport (date window) across the group.
    #[serde(default = "default_enabled")]
    pub zoom: bool,
    /// When zooming, mirror the y viewport (value range) as well.
    #[serde(default = "default_enabled")]
    pub range: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            selection: default_enabled(),
            zoom: default_enabled(),
            range: default_enabled(),
        }
    }
}

impl SyncOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_selection(mut self, enabled: bool) -> Self {
        self.selection = enabled;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.zoom = enabled;
        self
    }

    #[must_use]
    pub fn with_range(mut self, enabled: bool) -> Self {
        self.range = enabled;
        self
    }

    /// Overlays the recognized keys of a JSON options object onto the defaults.
    ///
    /// Non-object values and non-boolean values for a recognized key are
    /// rejected with `SyncError::InvalidArgument`.
    pub fn from_json_value(value: &Value) -> SyncResult<Self> {
        let Value::Object(map) = value else {
            return Err(SyncError::InvalidArgument(OPTIONS_NOT_OBJECT.to_owned()));
        };

        let mut options = Self::default();
        for (key, slot) in [
            ("selection", &mut options.selection),
            ("zoom", &mut options.zoom),
            ("range", &mut options.range),
        ] {
            if let Some(raw) = map.get(key) {
                *slot = raw.as_bool().ok_or_else(|| {
                    SyncError::InvalidArgument(format!("option `{key}` must be a boolean"))
                })?;
            }
        }
        Ok(options)
    }

    pub fn from_json_str(input: &str) -> SyncResult<Self> {
        let value: Value = serde_json::from_str(input).map_err(|e| {
            SyncError::InvalidArgument(format!("failed to parse sync options json: {e}"))
        })?;
        Self::from_json_value(&value)
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recognized_keys_overlay_defaults() {
        let options =
            SyncOptions::from_json_value(&json!({ "zoom": false, "color": "red" })).expect("ok");
        assert_eq!(
            options,
            SyncOptions::default().with_zoom(false),
            "unknown keys are ignored"
        );
    }

    #[test]
    fn non_object_is_rejected() {
        for value in [json!(3), json!("zoom"), json!([true]), json!(null)] {
            let err = SyncOptions::from_json_value(&value).expect_err("must fail");
            assert_eq!(
                err,
                SyncError::InvalidArgument(OPTIONS_NOT_OBJECT.to_owned())
            );
        }
    }

    #[test]
    fn non_boolean_flag_is_rejected() {
        let err = SyncOptions::from_json_str(r#"{ "range": "yes" }"#).expect_err("must fail");
        assert!(matches!(err, SyncError::InvalidArgument(message) if message.contains("range")));
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let options: SyncOptions = serde_json::from_str(r#"{ "selection": false }"#).expect("ok");
        assert!(!options.selection);
        assert!(options.zoom);
        assert!(options.range);
    }
}
