//! Benchmark: one writer thread vs `World::place_structure` on rayon.
//!
//! Fills a grid of columns with a layered slab and measures time to write it.
//! Run with: `cargo run --release -p abyss-client --example bench_place`

use std::time::Instant;

use abyss_client::blocks;
use abyss_engine::world::World;
use abyss_engine::world::block::BlockId;
use abyss_engine::world::position::BlockPos;

fn main() {
    let side: i32 = 8; // columns per axis
    let depth: i32 = 64; // blocks per column
    let blocks = build_slab(side, depth);

    println!("=== Abyss: structure placement benchmark ===\n");
    println!("  {}x{} columns, {} blocks deep, {} writes\n", side, side, depth, blocks.len());

    // --- Sequential ---
    let world_seq = World::new();
    let t0 = Instant::now();
    for &(pos, block) in &blocks {
        world_seq.set_block(pos, block);
    }
    let dt_seq = t0.elapsed();
    println!("  Sequential: {:>8.2?}", dt_seq);

    // --- Parallel ---
    let world_par = World::new();
    let t0 = Instant::now();
    let written = world_par.place_structure(&blocks);
    let dt_par = t0.elapsed();
    println!("  Parallel:   {:>8.2?} ({} writes)", dt_par, written);

    let speedup = dt_seq.as_secs_f64() / dt_par.as_secs_f64();
    println!("\n  Speedup: {:.2}x", speedup);

    // --- Verify identical ---
    let mismatches = blocks
        .iter()
        .filter(|(pos, _)| world_seq.get_block(*pos) != world_par.get_block(*pos))
        .count();
    if mismatches == 0 {
        println!("  Worlds identical.");
    } else {
        println!("  {} mismatching blocks!", mismatches);
    }
}

fn build_slab(side: i32, depth: i32) -> Vec<(BlockPos, BlockId)> {
    let mut out = Vec::new();
    for x in 0..side * 16 {
        for z in 0..side * 16 {
            for y in -depth..0 {
                let block = match y {
                    -1 => blocks::GRASS,
                    -4..=-2 => blocks::DIRT,
                    _ if (x + y + z) % 37 == 0 => blocks::COAL_ORE,
                    _ => blocks::STONE,
                };
                out.push((BlockPos::new(x, y, z), block));
            }
        }
    }
    out
}
