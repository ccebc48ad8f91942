use super::block::BlockId;
use super::position::{LocalBlockPos, SECTION_SIZE, SECTION_VOLUME, section_offset};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicU16, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A 16x16x16 cube of blocks at vertical index `y_index`.
///
/// Stored as a flat array in YZX order (see [`section_offset`]). Every cell is
/// its own atomic, so writers touching different cells of the same section
/// never contend and no section-wide lock exists. The flip side: there is no
/// cross-cell atomicity, a reader may see a section halfway through a
/// multi-block edit.
pub struct ChunkSection {
    y_index: i32,
    /// Cells whose value is not AIR. Adjusted from the value each swap
    /// replaced, never recomputed by scanning. Signed: two writers racing on
    /// one cell can apply their `-1` before the other's `+1`.
    block_count: AtomicI32,
    blocks: Box<[AtomicU16]>,
}

impl ChunkSection {
    /// An all-air section.
    pub fn new(y_index: i32) -> Self {
        Self {
            y_index,
            block_count: AtomicI32::new(0),
            blocks: (0..SECTION_VOLUME).map(|_| AtomicU16::new(0)).collect(),
        }
    }

    #[inline]
    fn cell(&self, x: u8, y: u8, z: u8) -> &AtomicU16 {
        debug_assert!(
            (x as usize) < SECTION_SIZE && (y as usize) < SECTION_SIZE && (z as usize) < SECTION_SIZE,
            "section-local coordinate out of range: ({x}, {y}, {z})"
        );
        &self.blocks[section_offset(x, y, z)]
    }

    #[inline]
    pub fn get(&self, x: u8, y: u8, z: u8) -> BlockId {
        BlockId(self.cell(x, y, z).load(Ordering::Acquire))
    }

    /// Store `block` and return the value it replaced.
    ///
    /// Safe to call concurrently on any cells; the non-empty count stays
    /// exact because each transition is decided by the value this swap saw.
    #[inline]
    pub fn set(&self, x: u8, y: u8, z: u8, block: BlockId) -> BlockId {
        let old = BlockId(self.cell(x, y, z).swap(block.0, Ordering::AcqRel));
        match (old.is_air(), block.is_air()) {
            (true, false) => {
                self.block_count.fetch_add(1, Ordering::Relaxed);
            }
            (false, true) => {
                self.block_count.fetch_sub(1, Ordering::Relaxed);
            }
            _ => {}
        }
        old
    }

    /// Number of non-air cells.
    ///
    /// Exact once concurrent writers have returned. While writes to the same
    /// cell are in flight the counter may briefly lag its final value; a
    /// transient negative reads as 0.
    pub fn block_count(&self) -> u32 {
        self.block_count.load(Ordering::Relaxed).max(0) as u32
    }

    /// True when no cell holds a non-air block. Such a section could be
    /// dropped from its column without losing anything.
    pub fn is_empty(&self) -> bool {
        self.block_count.load(Ordering::Relaxed) <= 0
    }

    pub fn y_index(&self) -> i32 {
        self.y_index
    }
}

impl fmt::Debug for ChunkSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkSection")
            .field("y_index", &self.y_index)
            .field("block_count", &self.block_count())
            .finish_non_exhaustive()
    }
}

/// A vertically unbounded column of chunk sections, keyed by section index
/// (`y >> 4`, negative below zero).
///
/// Sparse: a section exists only once something has asked for it through
/// [`ChunkColumn::get_section`] or a write. Reads never allocate.
///
/// Locking is two-tier. The mutex guards only the index -> section map and is
/// held for a lookup or insert; block reads and writes happen after it is
/// released, on the section's atomics.
pub struct ChunkColumn {
    x: i32,
    z: i32,
    sections: Mutex<HashMap<i32, Arc<ChunkSection>>>,
}

impl ChunkColumn {
    pub fn new(x: i32, z: i32) -> Self {
        Self {
            x,
            z,
            sections: Mutex::new(HashMap::new()),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    // A panic while holding this lock can only happen inside HashMap itself;
    // the map is still structurally valid, so keep using it.
    fn lock_sections(&self) -> MutexGuard<'_, HashMap<i32, Arc<ChunkSection>>> {
        self.sections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The section at `y_index`, created (all air) if it does not exist yet.
    ///
    /// Find-or-create runs under the column lock, so concurrent callers for
    /// the same index all receive the one instance that was inserted.
    pub fn get_section(&self, y_index: i32) -> Arc<ChunkSection> {
        let mut sections = self.lock_sections();
        let section = sections.entry(y_index).or_insert_with(|| {
            tracing::trace!(x = self.x, z = self.z, y_index, "allocating chunk section");
            Arc::new(ChunkSection::new(y_index))
        });
        Arc::clone(section)
    }

    /// The section at `y_index` if one has been allocated.
    pub fn existing_section(&self, y_index: i32) -> Option<Arc<ChunkSection>> {
        self.lock_sections().get(&y_index).cloned()
    }

    /// Write a block, allocating its section on first touch.
    /// Returns the block that was there before.
    pub fn set_block(&self, pos: LocalBlockPos, block: BlockId) -> BlockId {
        let section = self.get_section(pos.section_index());
        section.set(pos.x, pos.section_local_y(), pos.z, block)
    }

    /// Read a block. A position in a never-allocated section is AIR.
    pub fn get_block(&self, pos: LocalBlockPos) -> BlockId {
        match self.existing_section(pos.section_index()) {
            Some(section) => section.get(pos.x, pos.section_local_y(), pos.z),
            None => BlockId::AIR,
        }
    }

    /// Number of allocated sections, empty ones included.
    pub fn section_count(&self) -> usize {
        self.lock_sections().len()
    }

    /// Indices of all allocated sections, lowest first.
    pub fn section_indices(&self) -> Vec<i32> {
        let mut indices: Vec<i32> = self.lock_sections().keys().copied().collect();
        indices.sort_unstable();
        indices
    }
}

impl fmt::Debug for ChunkColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkColumn")
            .field("x", &self.x)
            .field("z", &self.z)
            .field("sections", &self.section_count())
            .finish()
    }
}
