//! Storage-core tests: section indexing, lazy column allocation, and the
//! non-empty count under concurrent writers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use abyss_engine::world::World;
use abyss_engine::world::block::BlockId;
use abyss_engine::world::chunk::{ChunkColumn, ChunkSection};
use abyss_engine::world::position::{
    BlockPos, ChunkPos, LocalBlockPos, SECTION_SIZE, SECTION_VOLUME, section_index, section_local_y,
    section_offset,
};

const STONE: BlockId = BlockId(1);
const DIRT: BlockId = BlockId(2);
const GRASS: BlockId = BlockId(3);

/// Count non-air cells the slow way.
fn scan_non_air(section: &ChunkSection) -> u32 {
    let mut n = 0;
    for y in 0..SECTION_SIZE as u8 {
        for z in 0..SECTION_SIZE as u8 {
            for x in 0..SECTION_SIZE as u8 {
                if !section.get(x, y, z).is_air() {
                    n += 1;
                }
            }
        }
    }
    n
}

// ---------------------------------------------------------------------------
// Index arithmetic
// ---------------------------------------------------------------------------

#[test]
fn offset_packs_y_z_x() {
    assert_eq!(section_offset(0, 0, 0), 0);
    assert_eq!(section_offset(1, 0, 0), 1);
    assert_eq!(section_offset(0, 0, 1), 16);
    assert_eq!(section_offset(0, 1, 0), 256);
    assert_eq!(section_offset(15, 15, 15), SECTION_VOLUME - 1);
    assert_eq!(section_offset(5, 6, 7), (6 << 8) | (7 << 4) | 5);
}

#[test]
fn negative_y_uses_arithmetic_shift() {
    assert_eq!(section_index(-1), -1);
    assert_eq!(section_local_y(-1), 15);

    assert_eq!(section_index(-16), -1);
    assert_eq!(section_local_y(-16), 0);
    assert_eq!(section_index(-17), -2);
    assert_eq!(section_local_y(-17), 15);

    assert_eq!(section_index(0), 0);
    assert_eq!(section_index(15), 0);
    assert_eq!(section_index(16), 1);
    assert_eq!(section_index(150), 9);
    assert_eq!(section_local_y(150), 6);
}

#[test]
fn block_pos_splits_negative_xz() {
    let pos = BlockPos::new(-1, 70, -17);
    assert_eq!(pos.chunk(), ChunkPos::new(-1, -2));
    assert_eq!(pos.local(), LocalBlockPos::new(15, 70, 15));
    assert_eq!(ChunkPos::new(-1, -2).block_origin(0), BlockPos::new(-16, 0, -32));
}

#[test]
fn coordinate_extremes_split_exactly() {
    assert_eq!(section_index(i32::MAX), ChunkPos::MAX);
    assert_eq!(section_local_y(i32::MAX), 15);
    assert_eq!(section_index(i32::MIN), ChunkPos::MIN);
    assert_eq!(section_local_y(i32::MIN), 0);

    let far = BlockPos::new(i32::MAX, 0, i32::MIN);
    assert_eq!(far.chunk(), ChunkPos::new(ChunkPos::MAX, ChunkPos::MIN));
    assert_eq!(far.local(), LocalBlockPos::new(15, 0, 0));
    assert_eq!(far.chunk().block_origin(7), BlockPos::new(i32::MAX - 15, 7, i32::MIN));
}

// ---------------------------------------------------------------------------
// ChunkSection
// ---------------------------------------------------------------------------

#[test]
fn fresh_section_is_empty_air() {
    let section = ChunkSection::new(-3);
    assert!(section.is_empty());
    assert_eq!(section.block_count(), 0);
    assert_eq!(section.y_index(), -3);
    assert_eq!(section.get(7, 7, 7), BlockId::AIR);
}

#[test]
fn count_tracks_air_transitions() {
    let section = ChunkSection::new(0);

    assert_eq!(section.set(1, 2, 3, STONE), BlockId::AIR);
    assert_eq!(section.block_count(), 1);

    // nonzero -> nonzero leaves the count alone
    assert_eq!(section.set(1, 2, 3, DIRT), STONE);
    assert_eq!(section.block_count(), 1);

    assert_eq!(section.set(1, 2, 3, BlockId::AIR), DIRT);
    assert_eq!(section.block_count(), 0);
    assert!(section.is_empty());

    // air -> air leaves the count alone
    section.set(1, 2, 3, BlockId::AIR);
    assert_eq!(section.block_count(), 0);
}

#[test]
fn setting_same_value_twice_is_idempotent() {
    let section = ChunkSection::new(0);
    section.set(4, 4, 4, GRASS);
    section.set(4, 4, 4, GRASS);
    assert_eq!(section.block_count(), 1);
    assert_eq!(section.get(4, 4, 4), GRASS);
}

#[test]
fn filling_and_clearing_whole_section() {
    let section = ChunkSection::new(0);
    for y in 0..16u8 {
        for z in 0..16u8 {
            for x in 0..16u8 {
                section.set(x, y, z, STONE);
            }
        }
    }
    assert_eq!(section.block_count() as usize, SECTION_VOLUME);
    assert!(!section.is_empty());

    for y in 0..16u8 {
        for z in 0..16u8 {
            for x in 0..16u8 {
                section.set(x, y, z, BlockId::AIR);
            }
        }
    }
    assert!(section.is_empty());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "out of range")]
fn out_of_range_local_coordinate_panics_in_debug() {
    let section = ChunkSection::new(0);
    section.set(16, 0, 0, STONE);
}

#[test]
fn concurrent_writers_keep_count_exact() {
    let section = ChunkSection::new(0);
    let threads = 8;
    let writes_per_thread = 20_000;

    thread::scope(|s| {
        for t in 0..threads {
            let section = &section;
            s.spawn(move || {
                // Cheap per-thread LCG so threads collide on the same cells.
                let mut state: u32 = 0x9E37_79B9 ^ (t as u32 * 7919);
                for _ in 0..writes_per_thread {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    let cell = (state >> 8) as usize % 512;
                    let x = (cell % 16) as u8;
                    let z = ((cell / 16) % 16) as u8;
                    let y = (cell / 256) as u8;
                    let block = if state & 1 == 0 { BlockId::AIR } else { BlockId((state >> 28) as u16 + 1) };
                    section.set(x, y, z, block);
                }
            });
        }
    });

    assert_eq!(section.block_count(), scan_non_air(&section));
    assert_eq!(section.is_empty(), scan_non_air(&section) == 0);
}

#[test]
fn concurrent_clear_ends_empty() {
    let section = ChunkSection::new(0);
    thread::scope(|s| {
        for t in 0..4u8 {
            let section = &section;
            s.spawn(move || {
                for round in 0..50 {
                    let block = if round % 2 == 0 { STONE } else { BlockId::AIR };
                    for z in 0..16u8 {
                        for x in 0..16u8 {
                            section.set(x, t, z, block);
                        }
                    }
                }
            });
        }
    });
    // Each thread owns one layer and finishes on AIR.
    assert!(section.is_empty());
    assert_eq!(scan_non_air(&section), 0);
}

#[test]
fn racing_toggles_on_one_cell_never_underflow_the_count() {
    let section = ChunkSection::new(0);
    let writers = 4u16;
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let section = &section;
        let done = &done;
        let reader = s.spawn(move || {
            let mut highest = 0;
            while !done.load(Ordering::Relaxed) {
                highest = highest.max(section.block_count());
            }
            highest
        });

        let handles: Vec<_> = (0..writers)
            .map(|t| {
                s.spawn(move || {
                    for round in 0..20_000 {
                        let block = if round % 2 == 0 { BlockId(t + 1) } else { BlockId::AIR };
                        section.set(7, 7, 7, block);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        done.store(true, Ordering::Relaxed);

        // One cell can be counted at most once per in-flight writer.
        let highest = reader.join().unwrap();
        assert!(highest <= u32::from(writers) + 1, "count read {highest}");
    });

    assert_eq!(section.block_count(), scan_non_air(&section));
    assert_eq!(section.block_count(), 0);
}

// ---------------------------------------------------------------------------
// ChunkColumn
// ---------------------------------------------------------------------------

#[test]
fn column_round_trip_at_any_height() {
    let column = ChunkColumn::new(0, 0);
    let heights = [-4096i32, -17, -16, -1, 0, 1, 15, 16, 150, 255, 256, 10_000];
    for (i, &y) in heights.iter().enumerate() {
        let pos = LocalBlockPos::new((i % 16) as u8, y, 15 - (i % 16) as u8);
        let block = BlockId(i as u16 + 1);
        column.set_block(pos, block);
        assert_eq!(column.get_block(pos), block, "round trip at y={y}");
    }
    for (i, &y) in heights.iter().enumerate() {
        let pos = LocalBlockPos::new((i % 16) as u8, y, 15 - (i % 16) as u8);
        assert_eq!(column.get_block(pos), BlockId(i as u16 + 1));
    }
}

#[test]
fn reads_never_allocate_sections() {
    let column = ChunkColumn::new(3, -7);
    for y in -64..320 {
        assert_eq!(column.get_block(LocalBlockPos::new(0, y, 0)), BlockId::AIR);
    }
    assert_eq!(column.section_count(), 0);
    assert!(column.existing_section(0).is_none());
}

#[test]
fn place_block_at_150_lands_in_section_9() {
    let column = ChunkColumn::new(0, 0);
    column.set_block(LocalBlockPos::new(5, 150, 5), GRASS);

    assert_eq!(column.section_count(), 1);
    let section = column.existing_section(9).expect("section 9 allocated");
    assert_eq!(section.y_index(), 9);
    assert_eq!(section.block_count(), 1);

    assert_eq!(column.get_block(LocalBlockPos::new(5, 150, 5)), GRASS);
    assert_eq!(column.get_block(LocalBlockPos::new(5, 150, 6)), BlockId::AIR);
    assert_eq!(column.section_count(), 1);
}

#[test]
fn y_minus_one_lands_in_section_minus_one_top_layer() {
    let column = ChunkColumn::new(0, 0);
    column.set_block(LocalBlockPos::new(0, -1, 0), STONE);
    let section = column.existing_section(-1).expect("section -1 allocated");
    assert_eq!(section.get(0, 15, 0), STONE);
    assert_eq!(column.section_indices(), vec![-1]);
}

#[test]
fn extreme_heights_do_not_alias_lower_sections() {
    let column = ChunkColumn::new(0, 0);
    column.set_block(LocalBlockPos::new(0, i32::MAX, 0), STONE);
    column.set_block(LocalBlockPos::new(0, i32::MIN, 0), DIRT);

    assert_eq!(column.get_block(LocalBlockPos::new(0, 0, 0)), BlockId::AIR);
    assert_eq!(column.get_block(LocalBlockPos::new(0, 15, 0)), BlockId::AIR);
    assert_eq!(column.get_block(LocalBlockPos::new(0, i32::MAX, 0)), STONE);
    assert_eq!(column.get_block(LocalBlockPos::new(0, i32::MIN, 0)), DIRT);
    assert_eq!(column.section_indices(), vec![i32::MIN >> 4, i32::MAX >> 4]);
    assert!(column.existing_section(0).is_none());
}

#[test]
fn get_section_creates_once() {
    let column = ChunkColumn::new(0, 0);
    let a = column.get_section(4);
    let b = column.get_section(4);
    assert!(Arc::ptr_eq(&a, &b));
    assert!(a.is_empty());
    assert_eq!(column.section_count(), 1);

    column.get_section(-2);
    assert_eq!(column.section_indices(), vec![-2, 4]);
}

#[test]
fn concurrent_get_section_yields_one_instance() {
    let column = ChunkColumn::new(0, 0);
    let threads = 16;
    let barrier = Barrier::new(threads);

    let sections: Vec<Arc<ChunkSection>> = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let column = &column;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    column.get_section(-5)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(column.section_count(), 1);
    let first = &sections[0];
    assert!(sections.iter().all(|s| Arc::ptr_eq(s, first)));
    // Only the map plus our collected handles refer to the section.
    assert_eq!(Arc::strong_count(first), threads + 1);
}

#[test]
fn concurrent_column_writes_across_sections() {
    let column = ChunkColumn::new(0, 0);
    thread::scope(|s| {
        for t in 0..8i32 {
            let column = &column;
            s.spawn(move || {
                // Each thread writes its own 16-block band spread over the
                // full 0..16 footprint; bands straddle section boundaries.
                for y in (t * 16 - 8)..(t * 16 + 8) {
                    for x in 0..16u8 {
                        column.set_block(LocalBlockPos::new(x, y, 3), STONE);
                    }
                }
            });
        }
    });

    for y in -8..120i32 {
        assert_eq!(column.get_block(LocalBlockPos::new(9, y, 3)), STONE, "y={y}");
    }
    let total: u32 = column
        .section_indices()
        .into_iter()
        .map(|i| column.get_section(i).block_count())
        .sum();
    assert_eq!(total, 128 * 16);
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

#[test]
fn world_reads_do_not_create_columns() {
    let world = World::new();
    assert_eq!(world.get_block(BlockPos::new(100, 64, -100)), BlockId::AIR);
    assert_eq!(world.column_count(), 0);
    assert!(world.get_column(ChunkPos::new(6, -7)).is_none());
}

#[test]
fn world_routes_absolute_positions_to_columns() {
    let world = World::new();
    world.set_block(BlockPos::new(-1, -1, -1), STONE);
    world.set_block(BlockPos::new(16, 0, 0), DIRT);

    assert_eq!(world.get_block(BlockPos::new(-1, -1, -1)), STONE);
    assert_eq!(world.get_block(BlockPos::new(16, 0, 0)), DIRT);
    assert_eq!(world.column_positions(), vec![ChunkPos::new(-1, -1), ChunkPos::new(1, 0)]);

    let column = world.get_column(ChunkPos::new(-1, -1)).expect("column exists");
    assert_eq!((column.x(), column.z()), (-1, -1));
    assert_eq!(column.get_block(LocalBlockPos::new(15, -1, 15)), STONE);
}

#[test]
fn far_columns_do_not_alias_the_origin() {
    let world = World::new();
    world.set_block(BlockPos::new(i32::MAX, 0, 0), BlockId(7));
    world.set_block(BlockPos::new(0, 0, i32::MIN), BlockId(8));

    assert_eq!(world.get_block(BlockPos::new(0, 0, 0)), BlockId::AIR);
    assert!(!world.has_column(ChunkPos::new(0, 0)));
    assert_eq!(
        world.column_positions(),
        vec![ChunkPos::new(0, ChunkPos::MIN), ChunkPos::new(ChunkPos::MAX, 0)]
    );
    assert_eq!(world.get_block(BlockPos::new(i32::MAX, 0, 0)), BlockId(7));
    assert_eq!(world.get_block(BlockPos::new(0, 0, i32::MIN)), BlockId(8));
}

#[test]
fn world_column_handle_is_shared() {
    let world = World::new();
    let a = world.column(ChunkPos::new(2, 2));
    let b = world.column(ChunkPos::new(2, 2));
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(world.column_count(), 1);
}

#[test]
fn place_structure_writes_every_block() {
    let world = World::new();
    // A 3x3 slab straddling four columns, plus a pillar.
    let mut blocks = Vec::new();
    for x in -1..=1 {
        for z in -1..=1 {
            blocks.push((BlockPos::new(x * 16, 10, z * 16), STONE));
        }
    }
    for y in -20..20 {
        blocks.push((BlockPos::new(3, y, 3), DIRT));
    }
    // Listed twice: the later write wins.
    blocks.push((BlockPos::new(3, 0, 3), GRASS));

    let written = world.place_structure(&blocks);
    assert_eq!(written, blocks.len());
    assert_eq!(world.column_count(), 9);

    for x in -1..=1 {
        for z in -1..=1 {
            assert_eq!(world.get_block(BlockPos::new(x * 16, 10, z * 16)), STONE);
        }
    }
    for y in -20..20 {
        let expected = if y == 0 { GRASS } else { DIRT };
        assert_eq!(world.get_block(BlockPos::new(3, y, 3)), expected);
    }
}
