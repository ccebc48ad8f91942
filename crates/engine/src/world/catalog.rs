//! Block catalog: static per-type attributes indexed by [`BlockId`].
//!
//! Filled once at startup (textures resolved through a [`TextureLayers`]
//! provider), then shared read-only. Rendering consults it; the storage core
//! never does.

use super::block::BlockId;
use std::collections::HashMap;

/// Layer index into the texture array used for block faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureLayer(pub u32);

/// Texture collaborator: resolves a texture name to its array layer.
///
/// Unknown names should resolve to layer 0 rather than fail; texturing is
/// best-effort.
pub trait TextureLayers {
    fn texture_layer(&self, name: &str) -> TextureLayer;
}

/// Static attributes of one block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockType {
    pub name: String,
    pub texture_top: TextureLayer,
    pub texture_side: TextureLayer,
    pub texture_bottom: TextureLayer,
    /// Neighbouring faces stay visible through this block (leaves, glass).
    pub transparent: bool,
}

impl BlockType {
    /// Same texture on every face.
    pub fn uniform(name: impl Into<String>, texture: TextureLayer, transparent: bool) -> Self {
        Self {
            name: name.into(),
            texture_top: texture,
            texture_side: texture,
            texture_bottom: texture,
            transparent,
        }
    }

    pub fn air() -> Self {
        Self::uniform("Air", TextureLayer(0), true)
    }
}

/// Table of block types. Entry 0 is always air.
#[derive(Debug, Clone)]
pub struct BlockCatalog {
    types: Vec<BlockType>,
    by_name: HashMap<String, BlockId>,
}

impl BlockCatalog {
    /// A catalog containing only air.
    pub fn new() -> Self {
        let air = BlockType::air();
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), BlockId::AIR);
        Self {
            types: vec![air],
            by_name,
        }
    }

    /// Append a block type and return the ID it was assigned.
    ///
    /// # Panics
    ///
    /// If the catalog already holds `u16::MAX + 1` entries.
    pub fn register(&mut self, block: BlockType) -> BlockId {
        let id = u16::try_from(self.types.len())
            .map(BlockId)
            .unwrap_or_else(|_| panic!("block catalog full, cannot register {:?}", block.name));
        self.by_name.insert(block.name.clone(), id);
        self.types.push(block);
        id
    }

    /// Attributes of `id`. Unknown IDs fall back to entry 0.
    pub fn get(&self, id: BlockId) -> &BlockType {
        match self.types.get(id.0 as usize) {
            Some(block) => block,
            None => {
                tracing::trace!(id = id.0, "unknown block id, using fallback entry");
                &self.types[0]
            }
        }
    }

    /// ID of the block type registered under `name`.
    pub fn find(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        (id.0 as usize) < self.types.len()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Never true: air is always present.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, block)| (BlockId(i as u16), block))
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new()
    }
}
