/// Block type identifier. The core stores these without interpreting them;
/// the block catalog assigns names and textures to specific IDs.
///
/// The only semantic the core enforces is that `BlockId::AIR` (0) is the
/// "empty" block: a section's non-empty count tracks cells that are not AIR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The universal "empty" block.
    pub const AIR: BlockId = BlockId(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for BlockId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}
