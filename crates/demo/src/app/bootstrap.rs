use std::env;
use std::path::{Path, PathBuf};

use mapview::{TextureSet, TileAtlas, ViewerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::DemoError;

pub(crate) const SPRITE_MODE_ENV_VAR: &str = "MAPVIEW_SPRITE_MODE";
pub(crate) const ASSET_DIR_ENV_VAR: &str = "MAPVIEW_ASSET_DIR";
const ATLAS_FILE: &str = "tiles.json";

pub(crate) struct DemoWiring {
    pub(crate) config: ViewerConfig,
    pub(crate) atlas: TileAtlas,
    pub(crate) textures: TextureSet,
}

pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

pub(crate) fn build_demo() -> Result<DemoWiring, DemoError> {
    let asset_dir = resolve_asset_dir();
    let atlas = TileAtlas::load(&asset_dir.join(ATLAS_FILE))?;
    let textures = TextureSet::load(&asset_dir, atlas.textures());

    // Without any sheet on disk the glyph renderer is the only useful mode.
    let sprite_mode = read_env_var(SPRITE_MODE_ENV_VAR)
        .and_then(|raw| parse_sprite_mode(&raw))
        .unwrap_or(textures.loaded_count() > 0);
    info!(
        asset_dir = %asset_dir.display(),
        textures_loaded = textures.loaded_count(),
        sprite_mode,
        "demo_assets_ready"
    );

    Ok(DemoWiring {
        config: ViewerConfig {
            window_title: "Map View Demo".to_string(),
            sprite_mode,
            ..ViewerConfig::default()
        },
        atlas,
        textures,
    })
}

fn resolve_asset_dir() -> PathBuf {
    match read_env_var(ASSET_DIR_ENV_VAR) {
        Some(raw) if !raw.trim().is_empty() => PathBuf::from(raw.trim()),
        _ => Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"),
    }
}

fn read_env_var(var: &'static str) -> Option<String> {
    match env::var(var) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(env_var = var, error = %err, "unable to read env var; using default");
            None
        }
    }
}

pub(crate) fn parse_sprite_mode(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "sprite" | "sprites" => Some(true),
        "0" | "false" | "off" | "glyph" | "glyphs" | "ascii" => Some(false),
        other => {
            warn!(
                env_var = SPRITE_MODE_ENV_VAR,
                value = other,
                "invalid sprite mode value; falling back to texture availability"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_mode_accepts_common_spellings() {
        assert_eq!(parse_sprite_mode("1"), Some(true));
        assert_eq!(parse_sprite_mode(" Sprite "), Some(true));
        assert_eq!(parse_sprite_mode("glyph"), Some(false));
        assert_eq!(parse_sprite_mode("OFF"), Some(false));
    }

    #[test]
    fn unknown_sprite_mode_falls_back() {
        assert_eq!(parse_sprite_mode("maybe"), None);
        assert_eq!(parse_sprite_mode(""), None);
    }

    #[test]
    fn bundled_atlas_defines_every_view_id() {
        let atlas = TileAtlas::load(
            &Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("assets")
                .join(ATLAS_FILE),
        )
        .expect("bundled atlas parses");
        for id in mapview::ViewId::ALL {
            assert!(atlas.contains(id), "missing tile for {id:?}");
        }
        assert_eq!(atlas.textures().len(), 6);
    }
}
