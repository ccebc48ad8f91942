//! The standard block table.
//!
//! IDs are assigned in registration order, so the constants below must stay
//! in sync with [`standard_catalog`].

use abyss_engine::world::block::BlockId;
use abyss_engine::world::catalog::{BlockCatalog, BlockType, TextureLayers};

pub const AIR: BlockId = BlockId(0);
pub const STONE: BlockId = BlockId(1);
pub const DIRT: BlockId = BlockId(2);
pub const GRASS: BlockId = BlockId(3);
pub const LOG: BlockId = BlockId(4);
pub const LEAVES: BlockId = BlockId(5);
pub const COAL_ORE: BlockId = BlockId(6);
pub const IRON_ORE: BlockId = BlockId(7);

/// Build the catalog, resolving every face texture through `textures`.
pub fn standard_catalog(textures: &impl TextureLayers) -> BlockCatalog {
    let layer = |name: &str| textures.texture_layer(name);
    let mut catalog = BlockCatalog::new();

    let stone = layer("stone");
    let dirt = layer("dirt");
    let grass_top = layer("grass");
    let grass_side = layer("grass_side");
    let log_top = layer("log_top");
    let log_side = layer("log");
    let leaves = layer("leaves");
    let coal = layer("coal_ore");
    let iron = layer("iron_ore");

    let registered = [
        catalog.register(BlockType::uniform("Stone", stone, false)),
        catalog.register(BlockType::uniform("Dirt", dirt, false)),
        catalog.register(BlockType {
            name: "Grass".into(),
            texture_top: grass_top,
            texture_side: grass_side,
            texture_bottom: dirt,
            transparent: false,
        }),
        catalog.register(BlockType {
            name: "Log".into(),
            texture_top: log_top,
            texture_side: log_side,
            texture_bottom: log_top,
            transparent: false,
        }),
        catalog.register(BlockType::uniform("Leaves", leaves, true)),
        catalog.register(BlockType::uniform("Coal", coal, false)),
        catalog.register(BlockType::uniform("Iron", iron, false)),
    ];
    debug_assert_eq!(registered, [STONE, DIRT, GRASS, LOG, LEAVES, COAL_ORE, IRON_ORE]);

    tracing::info!("Block catalog ready: {} types", catalog.len());
    catalog
}

/// Is light (and sight) blocked by this block?
pub fn is_opaque(catalog: &BlockCatalog, id: BlockId) -> bool {
    !id.is_air() && !catalog.get(id).transparent
}
