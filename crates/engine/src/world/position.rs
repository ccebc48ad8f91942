//! Coordinate types and the bit-packed index arithmetic shared by sections,
//! columns and the world map.
//!
//! World coordinates are `i32` on every axis. Splitting one into a
//! chunk/section part (`>> 4`) and an in-section part (`& 15`) is then exact
//! for the whole range, so two distinct positions can never land in the same
//! cell.

/// Blocks along each axis of a chunk section (and of a column footprint).
pub const SECTION_SIZE: usize = 16;
/// `log2(SECTION_SIZE)`: the shift that turns a block coordinate into a
/// section / chunk coordinate.
pub const SECTION_SHIFT: u32 = 4;
/// Mask that keeps the in-section part of a block coordinate.
pub const SECTION_MASK: i32 = (SECTION_SIZE as i32) - 1;
/// Cells in one 16x16 horizontal layer of a section.
pub const SECTION_AREA: usize = SECTION_SIZE * SECTION_SIZE;
/// Cells in one section.
pub const SECTION_VOLUME: usize = SECTION_AREA * SECTION_SIZE;

/// Flat cell index inside a section: `(y << 8) | (z << 4) | x`.
///
/// Callers must pass coordinates in `0..16`; anything larger bleeds into the
/// neighbouring axis.
#[inline]
pub const fn section_offset(x: u8, y: u8, z: u8) -> usize {
    ((y as usize) << (2 * SECTION_SHIFT)) | ((z as usize) << SECTION_SHIFT) | (x as usize)
}

/// Vertical section index for a world Y. Arithmetic shift, so `-1 -> -1`
/// rather than truncating toward zero.
#[inline]
pub const fn section_index(world_y: i32) -> i32 {
    world_y >> SECTION_SHIFT
}

/// Y inside the section returned by [`section_index`]; `-1 -> 15`.
#[inline]
pub const fn section_local_y(world_y: i32) -> u8 {
    (world_y & SECTION_MASK) as u8
}

/// Absolute block position in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The column holding this block. Horizontal axes split the same way
    /// Y does, so `section_index` does the work.
    pub const fn chunk(&self) -> ChunkPos {
        ChunkPos::new(section_index(self.x), section_index(self.z))
    }

    /// Column-relative position: x and z folded into `0..16`, y untouched.
    pub const fn local(&self) -> LocalBlockPos {
        LocalBlockPos::new(section_local_y(self.x), self.y, section_local_y(self.z))
    }
}

/// Column position. Column `(cx, cz)` covers block x in `cx*16..cx*16+16`
/// and likewise for z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Smallest and largest column coordinate a `BlockPos` can map to.
    pub const MIN: i32 = i32::MIN >> SECTION_SHIFT;
    pub const MAX: i32 = i32::MAX >> SECTION_SHIFT;

    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The block at the column's minimum x/z corner, at height `y`.
    ///
    /// Only columns inside `MIN..=MAX` on both axes have one; outside that
    /// range this is a contract violation.
    pub fn block_origin(&self, y: i32) -> BlockPos {
        debug_assert!(
            (Self::MIN..=Self::MAX).contains(&self.x) && (Self::MIN..=Self::MAX).contains(&self.z),
            "column outside block coordinate range: ({}, {})",
            self.x,
            self.z
        );
        BlockPos::new(self.x << SECTION_SHIFT, y, self.z << SECTION_SHIFT)
    }
}

/// Block position relative to a column: x and z in `0..16`, y in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalBlockPos {
    pub x: u8,
    pub y: i32,
    pub z: u8,
}

impl LocalBlockPos {
    pub const fn new(x: u8, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    pub const fn section_index(&self) -> i32 {
        section_index(self.y)
    }

    pub const fn section_local_y(&self) -> u8 {
        section_local_y(self.y)
    }
}
