//! Plugin settings, read once when the plugin is attached to an editor

use crate::marker::{Delimiters, MarkerProtocol, DEFAULT_CLASS_NAME};

/// Knobs exposed to the host's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    /// Class identifying math regions
    pub class_name: String,
    /// Delimiters wrapping raw source for the renderer
    pub symbols: Delimiters,
    /// Engine library URL. When unset the configuration script is expected to load it.
    pub lib: Option<String>,
    /// Engine configuration script URL, defaults to `<plugin_url>/config.js`
    pub config_url: Option<String>,
    /// Where the plugin's own assets are served from
    pub plugin_url: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            symbols: Delimiters::default(),
            lib: None,
            config_url: None,
            plugin_url: ".".to_string(),
        }
    }
}

impl PluginSettings {
    pub fn protocol(&self) -> MarkerProtocol {
        MarkerProtocol::new(self.class_name.clone(), self.symbols.clone())
    }
}
