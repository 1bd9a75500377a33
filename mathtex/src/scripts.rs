//! Engine script resources
//!
//! The engine is configured by a script that receives the scaffold class as a `class` query
//! parameter, so it only typesets scaffolds and never the author's raw regions. The library
//! script itself follows when configured.

use crate::error::MathtexError;
use crate::render::{RenderScope, ScriptTag};
use crate::settings::PluginSettings;
use url::{form_urlencoded, Url};

const CONFIG_SCRIPT: &str = "config.js";

/// The ordered script URLs to inject into every rendering scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineScripts {
    urls: Vec<String>,
}

impl EngineScripts {
    pub fn from_settings(settings: &PluginSettings) -> Result<Self, MathtexError> {
        let scaffold_class = settings.protocol().scaffold_class().to_string();

        let config_base = match &settings.config_url {
            Some(url) => url.clone(),
            None => default_config_url(&settings.plugin_url),
        };
        let mut urls = vec![with_class_query(&config_base, &scaffold_class)?];

        if let Some(lib) = &settings.lib {
            check_url(lib)?;
            urls.push(lib.clone());
        }

        Ok(Self { urls })
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Inject every script `scope` does not already carry. Returns how many were added.
    pub fn inject_missing(&self, scope: &mut RenderScope) -> usize {
        let mut injected = 0;
        for url in &self.urls {
            if scope.has_script(url) {
                tracing::trace!(target: "mathtex", src = %url, "script already present");
                continue;
            }
            scope.push_script(ScriptTag::new(url.clone()));
            injected += 1;
        }
        injected
    }

    /// Inject every script into a fresh sandbox, loaded in order.
    pub fn inject_sandbox(&self, scope: &mut RenderScope) {
        for url in &self.urls {
            scope.push_script(ScriptTag::new(url.clone()).ordered().with_charset("utf-8"));
        }
    }
}

fn default_config_url(plugin_url: &str) -> String {
    let base = plugin_url.trim_end_matches('/');
    if base.is_empty() {
        CONFIG_SCRIPT.to_string()
    } else {
        format!("{base}/{CONFIG_SCRIPT}")
    }
}

fn with_class_query(base: &str, scaffold_class: &str) -> Result<String, MathtexError> {
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("class", scaffold_class);
            Ok(url.to_string())
        }
        // Relative to the page the editor lives in
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("class", scaffold_class)
                .finish();
            let separator = if base.contains('?') { '&' } else { '?' };
            Ok(format!("{base}{separator}{query}"))
        }
        Err(err) => Err(invalid_url(base, err)),
    }
}

fn check_url(candidate: &str) -> Result<(), MathtexError> {
    match Url::parse(candidate) {
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(err) => Err(invalid_url(candidate, err)),
    }
}

fn invalid_url(url: &str, err: url::ParseError) -> MathtexError {
    MathtexError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    }
}
