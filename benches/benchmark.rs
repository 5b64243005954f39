use data_segment::{
    hybrid::HybridTree,
    location::{
        CommAndLoc,
        Location,
    },
    node::truncated_hash,
    pad,
};
use divan::{
    black_box,
    Bencher,
};

// allow: unused warning if `bench_include_allocs` feature is not enabled.
#[allow(dead_code)]
#[cfg_attr(feature = "bench_include_allocs", global_allocator)]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

/// `log2_leafs` values to benchmark the hybrid tree at; the largest is a
/// realistic sparse deal (a handful of populated leaves inside billions of
/// possible positions), the smallest fits fully in a single storage block.
const LOG2_LEAFS: [u32; 3] = [8, 20, 40];

/// Number of sub-pieces batch-set into the tree per benchmark iteration.
const LEAF_COUNTS: [usize; 3] = [1, 16, 256];

#[divan::bench(args = LOG2_LEAFS)]
fn empty_tree_root(bencher: Bencher, log2_leafs: u32) {
    bencher.bench(|| black_box(HybridTree::new(black_box(log2_leafs)).unwrap().root()));
}

#[divan::bench(args = LEAF_COUNTS)]
fn set_node_sequential(bencher: Bencher, leaf_count: usize) {
    let log2_leafs = 40;
    bencher
        .with_inputs(|| (HybridTree::new(log2_leafs).unwrap(), leaves(leaf_count)))
        .bench_local_refs(|(tree, leaves)| {
            for (i, leaf) in leaves.iter().enumerate() {
                tree.set_node(0, i as u64, *leaf).unwrap();
            }
            black_box(tree.root())
        });
}

#[divan::bench(args = LEAF_COUNTS)]
fn batch_set(bencher: Bencher, leaf_count: usize) {
    let log2_leafs = 40;
    bencher
        .with_inputs(|| {
            let placements: Vec<CommAndLoc> = leaves(leaf_count)
                .into_iter()
                .enumerate()
                .map(|(i, leaf)| {
                    CommAndLoc::new(leaf, Location::new(0, i as u64, log2_leafs).unwrap())
                })
                .collect();
            (HybridTree::new(log2_leafs).unwrap(), placements)
        })
        .bench_local_refs(|(tree, placements)| {
            tree.batch_set(black_box(placements.as_slice())).unwrap();
            black_box(tree.root())
        });
}

#[divan::bench(args = LEAF_COUNTS)]
fn collect_proof(bencher: Bencher, leaf_count: usize) {
    let log2_leafs = 40;
    let mut tree = HybridTree::new(log2_leafs).unwrap();
    for (i, leaf) in leaves(leaf_count).into_iter().enumerate() {
        tree.set_node(0, i as u64, leaf).unwrap();
    }
    bencher.bench_local(|| {
        for i in 0..leaf_count as u64 {
            black_box(tree.collect_proof(0, i).unwrap());
        }
    });
}

const PAD_CHUNK_COUNTS: [usize; 4] = [1, 16, 256, 4096];

#[divan::bench(args = PAD_CHUNK_COUNTS)]
fn pad_round_trip(bencher: Bencher, chunks: usize) {
    let unpadded = vec![0xabu8; chunks * pad::UNPADDED_CHUNK_SIZE];
    bencher.bench_local(|| {
        let padded = pad::pad(black_box(&unpadded)).unwrap();
        black_box(pad::unpad(&padded).unwrap())
    });
}

fn leaves(count: usize) -> Vec<[u8; 32]> {
    (0..count)
        .map(|i| truncated_hash(&(i as u64).to_le_bytes()))
        .collect()
}

fn main() {
    // Handle `nextest` querying the benchmark binary for tests. `divan` is
    // incompatible with `nextest`, so just report no tests available.
    // See https://github.com/nvzqz/divan/issues/43.
    let args: Vec<_> = std::env::args().collect();
    if args.contains(&"--list".to_string())
        && args.contains(&"--format".to_string())
        && args.contains(&"terse".to_string())
    {
        return;
    }
    divan::main();
}
