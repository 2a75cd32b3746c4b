//! Chaos-game point plotter, the demo payload for the producer side.
//!
//! Repeatedly moves halfway from the current point towards a randomly
//! chosen corner of a triangle and colours the landing pixel, which
//! converges on a Sierpinski triangle.

use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::computation::Computation;
use crate::error::Error;

/// RGBA pixel buffer, white-filled on creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the RGBA value at `(x, y)`, or `None` outside the canvas
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[i..i + 4]);
        Some(rgba)
    }

    pub fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Write the canvas as a binary PPM (alpha dropped)
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> Result<(), Error> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        for rgba in self.pixels.chunks_exact(4) {
            out.write_all(&rgba[..3])?;
        }
        Ok(())
    }

    /// Save to `<dir>/<base>.<n>.ppm` using the first `n >= *counter` that
    /// does not exist yet. Existing files are never overwritten.
    pub fn save_next(&self, dir: &Path, base: &str, counter: &mut u32) -> Result<PathBuf, Error> {
        loop {
            let path = dir.join(format!("{base}.{counter}.ppm"));
            *counter += 1;
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    let mut out = BufWriter::new(file);
                    self.write_ppm(&mut out)?;
                    out.flush()?;
                    info!("image saved to {}", path.display());
                    return Ok(path);
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Chaos-game computation over a [`Canvas`]
pub struct ChaosGame {
    canvas: Canvas,
    corners: [(f64, f64); 3],
    current: (f64, f64),
    plotted: u64,
    limit: Option<u64>,
    rng: StdRng,
}

impl ChaosGame {
    /// Runs forever when `limit` is `None`.
    pub fn new(width: usize, height: usize, limit: Option<u64>) -> Self {
        Self::with_rng(width, height, limit, StdRng::from_entropy())
    }

    pub fn seeded(width: usize, height: usize, limit: Option<u64>, seed: u64) -> Self {
        Self::with_rng(width, height, limit, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, limit: Option<u64>, mut rng: StdRng) -> Self {
        let (w, h) = (width as f64, height as f64);
        let top = (
            pick(&mut rng, w / 4.0, 3.0 * w / 4.0),
            pick(&mut rng, 0.0, h / 10.0),
        );
        let left = (
            pick(&mut rng, 0.0, w / 10.0),
            pick(&mut rng, 3.0 * h / 4.0, h),
        );
        let right = (
            pick(&mut rng, 9.0 * w / 10.0, w),
            pick(&mut rng, 3.0 * h / 4.0, h),
        );

        Self {
            canvas: Canvas::new(width, height),
            corners: [top, left, right],
            current: top,
            plotted: 0,
            limit,
            rng,
        }
    }

    pub fn plotted(&self) -> u64 {
        self.plotted
    }

    fn colour(&self, x: f64, y: f64) -> [u8; 4] {
        let w = (self.canvas.width.max(2) - 1) as f64;
        let h = (self.canvas.height.max(2) - 1) as f64;
        [
            (255.0 * x / w) as u8,
            (255.0 * (h - y) / h) as u8,
            (255.0 * (w - x) * y / w / h) as u8,
            255,
        ]
    }
}

/// Uniform in `[lo, hi)`, or `lo` for an empty range
fn pick(rng: &mut StdRng, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

impl Computation for ChaosGame {
    type Snapshot = Canvas;

    fn advance(&mut self) {
        let corner = self.corners[self.rng.gen_range(0..3)];
        let x = (corner.0 + self.current.0) / 2.0;
        let y = (corner.1 + self.current.1) / 2.0;
        self.current = (x, y);

        let rgba = self.colour(x, y);
        self.canvas.put(x as usize, y as usize, rgba);
        self.plotted += 1;
    }

    fn snapshot(&self) -> Canvas {
        self.canvas.clone()
    }

    fn is_complete(&self) -> bool {
        self.limit.is_some_and(|limit| self.plotted >= limit)
    }
}
