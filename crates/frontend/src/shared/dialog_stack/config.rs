use log::{info, warn};
use serde::Deserialize;

/// Host pages may override the defaults with
/// `<meta name="dialog-stack-config" content='{"dialog_param":"modal"}'>`.
const META_NAME: &str = "dialog-stack-config";

/// Query parameter names and stacking settings for the dialog stack.
///
/// Every field has a default, so hosts may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DialogStackConfig {
    /// Query parameter holding the route key of the topmost routed dialog.
    pub dialog_param: String,
    /// Query parameter holding the id of the topmost routed dialog.
    pub dialog_id_param: String,
    /// z-index of the first dialog overlay.
    pub base_z_index: i32,
}

impl Default for DialogStackConfig {
    fn default() -> Self {
        Self {
            dialog_param: "dialog".to_string(),
            dialog_id_param: "dialogId".to_string(),
            base_z_index: 1000,
        }
    }
}

impl DialogStackConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config from the page's meta tag, or the defaults.
    pub fn load() -> Self {
        let content = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| {
                document
                    .query_selector(&format!("meta[name=\"{}\"]", META_NAME))
                    .ok()
                    .flatten()
            })
            .and_then(|meta| meta.get_attribute("content"));
        Self::from_source(content.as_deref())
    }

    fn from_source(content: Option<&str>) -> Self {
        let Some(json) = content else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                info!("dialog stack config loaded from <meta name={}>", META_NAME);
                config
            }
            Err(err) => {
                warn!("invalid dialog stack config, using defaults: {}", err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DialogStackConfig::default();
        assert_eq!(config.dialog_param, "dialog");
        assert_eq!(config.dialog_id_param, "dialogId");
        assert_eq!(config.base_z_index, 1000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DialogStackConfig::from_json(r#"{ "dialog_param": "modal" }"#).unwrap();
        assert_eq!(config.dialog_param, "modal");
        assert_eq!(config.dialog_id_param, "dialogId");
        assert_eq!(config.base_z_index, 1000);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DialogStackConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_from_source_falls_back_to_defaults() {
        assert_eq!(DialogStackConfig::from_source(None), DialogStackConfig::default());
        assert_eq!(
            DialogStackConfig::from_source(Some("{ not json")),
            DialogStackConfig::default()
        );
        let config = DialogStackConfig::from_source(Some(r#"{ "base_z_index": 50 }"#));
        assert_eq!(config.base_z_index, 50);
        assert_eq!(config.dialog_param, "dialog");
    }
}
