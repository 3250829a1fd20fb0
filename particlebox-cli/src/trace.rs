//! Text renderer for particlebox
//!
//! Writes one CSV row per drawn particle so runs can be inspected or plotted
//! without a window.

use glam::{Quat, Vec3};
use particlebox_core::Renderer;
use std::io::Write;

pub struct CsvRenderer<W: Write> {
    out: W,
    frame: u64,
    index: usize,
    every: u64,
    error: Option<std::io::Error>,
}

impl<W: Write> CsvRenderer<W> {
    /// `every` keeps only every n-th frame (1 keeps all)
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            frame: 0,
            index: 0,
            every: every.max(1),
            error: None,
        }
    }

    pub fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "frame,particle,x,y,z")
    }

    /// Mark the start of a new frame
    pub fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
        self.index = 0;
    }

    /// Surface the first write error hit while drawing, then flush
    pub fn finish(mut self) -> std::io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for CsvRenderer<W> {
    fn draw(&mut self, position: Vec3, _orientation: Quat, _scale: Vec3) {
        let index = self.index;
        self.index += 1;
        if self.error.is_some() || self.frame % self.every != 0 {
            return;
        }
        if let Err(e) = writeln!(
            self.out,
            "{},{},{:.6},{:.6},{:.6}",
            self.frame, index, position.x, position.y, position.z
        ) {
            self.error = Some(e);
        }
    }
}
