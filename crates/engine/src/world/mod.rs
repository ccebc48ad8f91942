pub mod block;
pub mod catalog;
pub mod chunk;
pub mod position;

use block::BlockId;
use chunk::ChunkColumn;
use dashmap::DashMap;
use position::{BlockPos, ChunkPos, LocalBlockPos};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

/// The entire block world. Thread-safe, lock-sharded by column.
///
/// Columns are handed out as `Arc`s so a caller can keep working on one
/// without holding any shard lock of the map.
pub struct World {
    columns: DashMap<ChunkPos, Arc<ChunkColumn>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            columns: DashMap::new(),
        }
    }

    /// The column at `pos`, created empty the first time it is requested.
    pub fn column(&self, pos: ChunkPos) -> Arc<ChunkColumn> {
        let entry = self.columns.entry(pos).or_insert_with(|| {
            tracing::debug!(x = pos.x, z = pos.z, "creating chunk column");
            Arc::new(ChunkColumn::new(pos.x, pos.z))
        });
        Arc::clone(entry.value())
    }

    /// The column at `pos` if it exists. Never creates one.
    pub fn get_column(&self, pos: ChunkPos) -> Option<Arc<ChunkColumn>> {
        self.columns.get(&pos).map(|entry| Arc::clone(entry.value()))
    }

    /// Read a block at an absolute position. Returns AIR for missing
    /// columns and sections without allocating either.
    pub fn get_block(&self, pos: BlockPos) -> BlockId {
        match self.columns.get(&pos.chunk()) {
            Some(column) => column.get_block(pos.local()),
            None => BlockId::AIR,
        }
    }

    /// Write a block at an absolute position, creating its column and
    /// section if needed. Returns the previous block.
    ///
    /// Takes `&self` because the map shards and the sections' atomics
    /// provide all the interior mutability needed.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) -> BlockId {
        self.column(pos.chunk()).set_block(pos.local(), block)
    }

    /// Write many blocks at once (a tree, a building, a test fixture).
    ///
    /// Writes are grouped by column and the groups are applied in parallel.
    /// Inside a group the input order is kept, so a position listed twice
    /// ends up with its last value. The placement as a whole is **not**
    /// atomic: concurrent readers can observe any prefix of each group.
    ///
    /// Returns the number of writes applied.
    pub fn place_structure(&self, blocks: &[(BlockPos, BlockId)]) -> usize {
        let mut groups: HashMap<ChunkPos, Vec<(LocalBlockPos, BlockId)>> = HashMap::new();
        for &(pos, block) in blocks {
            groups.entry(pos.chunk()).or_default().push((pos.local(), block));
        }

        groups
            .into_par_iter()
            .map(|(chunk_pos, writes)| {
                let column = self.column(chunk_pos);
                for &(local, block) in &writes {
                    column.set_block(local, block);
                }
                writes.len()
            })
            .sum()
    }

    pub fn has_column(&self, pos: ChunkPos) -> bool {
        self.columns.contains_key(&pos)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Positions of every created column, sorted.
    pub fn column_positions(&self) -> Vec<ChunkPos> {
        let mut positions: Vec<ChunkPos> = self.columns.iter().map(|entry| *entry.key()).collect();
        positions.sort_unstable();
        positions
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
