//! Loader script for embedding the widget into third-party pages.
//!
//! The script mounts the widget UI in an iframe inside a shadow root so the
//! host page's styles cannot leak in.

use minijinja::{Environment, context};
use ragwidget_core::{Result, WidgetError};
use url::Url;

const TEMPLATE_NAME: &str = "embed_loader";

// Named without an extension so minijinja does not HTML-escape the output.
const EMBED_LOADER_TEMPLATE: &str = r#"(function () {
  const widgetWrapper = document.createElement("div");
  widgetWrapper.id = "rag-widget-wrapper";
  widgetWrapper.style.position = "fixed";
  widgetWrapper.style.bottom = "20px";
  widgetWrapper.style.right = "20px";
  widgetWrapper.style.zIndex = "9999";

  const shadowRoot = widgetWrapper.attachShadow({ mode: "open" });

  const style = document.createElement("style");
  style.textContent = `
    .rag-widget-container {
      all: initial;
      width: auto;
      height: auto;
      background: transparent !important;
    }

    iframe {
      width: {{ width }}px;
      height: {{ height }}px;
      border: none;
      border-radius: 16px;
      box-shadow: none !important;
      background: transparent !important;
    }
  `;

  const container = document.createElement("div");
  container.className = "rag-widget-container";

  const iframe = document.createElement("iframe");
  iframe.src = {{ frame_src }};
  iframe.allow = "clipboard-write";
  iframe.allowTransparency = true;
  iframe.style.background = "transparent";

  container.appendChild(iframe);
  shadowRoot.appendChild(style);
  shadowRoot.appendChild(container);
  document.body.appendChild(widgetWrapper);
})();
"#;

const FRAME_WIDTH: u32 = 380;
const FRAME_HEIGHT: u32 = 500;

/// Where the iframe points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    widget_origin: Url,
    embed_path: String,
}

impl EmbedConfig {
    /// Validates `widget_origin` as an absolute http(s) URL and `embed_path`
    /// as an absolute path.
    pub fn new(widget_origin: &str, embed_path: impl Into<String>) -> Result<Self> {
        let widget_origin = Url::parse(widget_origin.trim()).map_err(|e| {
            WidgetError::config(format!("Invalid widget origin '{}': {}", widget_origin, e))
        })?;
        if !matches!(widget_origin.scheme(), "http" | "https") || !widget_origin.has_host() {
            return Err(WidgetError::config(format!(
                "Widget origin must be an http(s) URL: {}",
                widget_origin
            )));
        }

        let embed_path = embed_path.into();
        if !embed_path.starts_with('/') {
            return Err(WidgetError::config(format!(
                "Embed path must start with '/': {}",
                embed_path
            )));
        }

        Ok(Self {
            widget_origin,
            embed_path,
        })
    }

    /// The iframe `src`.
    pub fn frame_src(&self) -> String {
        format!(
            "{}{}",
            self.widget_origin.as_str().trim_end_matches('/'),
            self.embed_path
        )
    }
}

pub struct EmbedSnippet;

impl EmbedSnippet {
    pub fn render(config: &EmbedConfig) -> Result<String> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, EMBED_LOADER_TEMPLATE)
            .map_err(|e| WidgetError::internal(format!("Embed template is invalid: {}", e)))?;
        let template = env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| WidgetError::internal(e.to_string()))?;

        // Emitted as a JS string literal; JSON escaping covers quotes and
        // backslashes in the path.
        let frame_src = serde_json::to_string(&config.frame_src())?;

        template
            .render(context! {
                frame_src => frame_src,
                width => FRAME_WIDTH,
                height => FRAME_HEIGHT,
            })
            .map_err(|e| WidgetError::internal(format!("Failed to render embed script: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_loader() {
        let config = EmbedConfig::new("http://localhost:4200", "/widget-embed").unwrap();
        assert_eq!(config.frame_src(), "http://localhost:4200/widget-embed");

        let script = EmbedSnippet::render(&config).unwrap();
        assert!(script.contains(r#"widgetWrapper.id = "rag-widget-wrapper";"#));
        assert!(script.contains(r#"widgetWrapper.style.position = "fixed";"#));
        assert!(script.contains(r#"widgetWrapper.style.zIndex = "9999";"#));
        assert!(script.contains(r#"attachShadow({ mode: "open" })"#));
        assert!(script.contains("all: initial;"));
        assert!(script.contains("width: 380px;"));
        assert!(script.contains("height: 500px;"));
        assert!(script.contains(r#"iframe.src = "http://localhost:4200/widget-embed";"#));
        assert!(script.contains(r#"iframe.allow = "clipboard-write";"#));
    }

    #[test]
    fn test_origin_path_and_trailing_slash() {
        let config = EmbedConfig::new("https://widget.example.com/", "/embed").unwrap();
        let script = EmbedSnippet::render(&config).unwrap();
        assert!(script.contains(r#"iframe.src = "https://widget.example.com/embed";"#));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(EmbedConfig::new("not a url", "/widget-embed").is_err());
        assert!(EmbedConfig::new("file:///tmp/x", "/widget-embed").is_err());
        assert!(EmbedConfig::new("http://localhost:4200", "widget-embed").is_err());
    }
}
