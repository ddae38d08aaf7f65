use anyhow::Result;
use ragwidget_application::{EmbedConfig, EmbedSnippet};

use crate::context::{self, GlobalArgs};

/// Prints the loader script; flags override the `[embed]` settings.
pub fn run(args: &GlobalArgs, origin: Option<&str>, path: Option<&str>) -> Result<()> {
    let settings = context::load_settings(args)?;
    let origin = origin.unwrap_or(&settings.embed.widget_origin);
    let path = path.unwrap_or(&settings.embed.embed_path);

    let config = EmbedConfig::new(origin, path)?;
    print!("{}", EmbedSnippet::render(&config)?);
    Ok(())
}
