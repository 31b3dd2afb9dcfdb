//! Terminal progress for chunk solves and seam reconciliation

use crate::world::buffer::BufferKey;
use crate::world::chunk::ChunkCoord;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static CHUNK_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Chunks: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SEAM_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Seams:  [{bar:40.green/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Two bars: chunks ready and seams reconciled
pub struct ProgressManager {
    multi_progress: MultiProgress,
    chunk_bar: ProgressBar,
    seam_bar: ProgressBar,
}

impl ProgressManager {
    /// Create bars sized for the expected chunk and seam counts
    pub fn new(chunk_count: usize, seam_count: usize) -> Self {
        let multi_progress = MultiProgress::new();
        let chunk_bar = multi_progress.add(ProgressBar::new(chunk_count as u64));
        chunk_bar.set_style(CHUNK_STYLE.clone());
        let seam_bar = multi_progress.add(ProgressBar::new(seam_count as u64));
        seam_bar.set_style(SEAM_STYLE.clone());
        Self {
            multi_progress,
            chunk_bar,
            seam_bar,
        }
    }

    /// Record a chunk that finished solving and growing
    pub fn chunk_ready(&self, coord: ChunkCoord) {
        self.chunk_bar.inc(1);
        self.chunk_bar.set_message(format!("last {coord}"));
    }

    /// Record a reconciled seam
    pub fn seam_done(&self, key: BufferKey) {
        self.seam_bar.inc(1);
        self.seam_bar.set_message(format!("last {key}"));
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        self.chunk_bar.finish_with_message("done");
        self.seam_bar.finish_with_message("done");
        let _ = self.multi_progress.clear();
    }
}

/// Number of chunks in a fully active square with the given radius
///
/// Negative radii count as zero.
pub const fn chunk_count(radius: i32) -> usize {
    let side = square_side(radius);
    side.saturating_mul(side)
}

/// Number of seams in a fully active square of chunks with the given radius
///
/// Negative radii count as zero.
pub const fn seam_count(radius: i32) -> usize {
    let side = square_side(radius);
    side.saturating_mul(side - 1).saturating_mul(2)
}

const fn square_side(radius: i32) -> usize {
    let radius = if radius < 0 { 0 } else { radius as usize };
    radius.saturating_mul(2).saturating_add(1)
}
