//! Texture layer table: texture name -> index into the block texture array.
//!
//! Only the name -> layer mapping lives here; uploading pixels belongs to
//! the graphics backend.

use std::collections::HashMap;
use std::path::Path;

use abyss_engine::world::catalog::{TextureLayer, TextureLayers};

/// Textures the standard block table refers to, in layer order.
pub const STANDARD_TEXTURES: &[&str] = &[
    "stone", "dirt", "grass", "grass_side", "coal_ore", "iron_ore", "log", "log_top", "leaves",
];

/// Layers assigned in list order. Names that were never loaded resolve to
/// layer 0.
#[derive(Debug, Clone, Default)]
pub struct TextureArray {
    layers: HashMap<String, TextureLayer>,
}

impl TextureArray {
    /// Every name gets the layer matching its position in `names`.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let layers = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref().to_string(), TextureLayer(i as u32)))
            .collect();
        Self { layers }
    }

    /// Like [`TextureArray::from_names`], but a name is only mapped if
    /// `<dir>/<name>.png` exists. Layer numbers still follow list order, so a
    /// missing file leaves a hole rather than shifting later layers.
    pub fn scan<S: AsRef<str>>(dir: &Path, names: &[S]) -> Self {
        let mut layers = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let path = dir.join(format!("{name}.png"));
            if path.is_file() {
                layers.insert(name.to_string(), TextureLayer(i as u32));
            } else {
                tracing::warn!("Failed to load texture: {}", path.display());
            }
        }
        tracing::info!("Texture array: {}/{} layers loaded from {}", layers.len(), names.len(), dir.display());
        Self { layers }
    }

    pub fn get(&self, name: &str) -> Option<TextureLayer> {
        self.layers.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TextureLayers for TextureArray {
    fn texture_layer(&self, name: &str) -> TextureLayer {
        self.get(name).unwrap_or_default()
    }
}
