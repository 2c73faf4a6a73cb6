//! Synthetic pileup used by the viewer: a few samples, each with reads
//! packed into non-overlapping rows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One aligned read, in reference coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Read {
    pub start: u32,
    pub end: u32,
    pub row: usize,
}

#[derive(Debug, Clone)]
pub struct SampleTrack {
    pub name: String,
    pub reads: Vec<Read>,
    pub variants: Vec<u32>,
}

impl SampleTrack {
    pub fn rows(&self) -> usize {
        self.reads.iter().map(|r| r.row + 1).max().unwrap_or(0)
    }
}

/// Assigns each `(start, end)` interval the lowest row whose last read ends
/// before it starts. Intervals must be sorted by start.
pub fn pack_rows(intervals: &[(u32, u32)]) -> Vec<Read> {
    let mut row_ends: Vec<u32> = Vec::new();
    intervals
        .iter()
        .map(|&(start, end)| {
            let row = match row_ends.iter().position(|&e| e < start) {
                Some(row) => {
                    row_ends[row] = end;
                    row
                }
                None => {
                    row_ends.push(end);
                    row_ends.len() - 1
                }
            };
            Read { start, end, row }
        })
        .collect()
}

/// `samples` tracks over `[0, locus_len)` with roughly `reads_per_sample` reads each.
///
/// Seeded, so every run shows the same pileup.
pub fn synthetic_tracks(samples: usize, locus_len: u32, reads_per_sample: usize, seed: u64) -> Vec<SampleTrack> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|i| {
            let mut intervals: Vec<(u32, u32)> = (0..reads_per_sample)
                .map(|_| {
                    let len = rng.gen_range(80..150).min(locus_len);
                    let start = rng.gen_range(0..=locus_len - len);
                    (start, start + len)
                })
                .collect();
            intervals.sort_unstable();

            let mut variants: Vec<u32> = (0..3).map(|_| rng.gen_range(0..locus_len.max(1))).collect();
            variants.sort_unstable();

            SampleTrack {
                name: format!("Sample {i}"),
                reads: pack_rows(&intervals),
                variants,
            }
        })
        .collect()
}
