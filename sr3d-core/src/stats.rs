//! Rendering statistics.

use std::fmt::{self, Display, Formatter};
use std::ops::AddAssign;
use std::time::{Duration, Instant};

/// Counts of work submitted and produced by the pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    /// Frames rendered.
    pub frames: u64,
    /// Draw calls issued.
    pub calls: u64,
    /// Time spent inside draw calls.
    pub time: Duration,

    /// Vertices shaded / landing in front of the camera (`w > 0`).
    pub verts: Throughput,
    /// Triangles submitted / rasterized. Rejected triangles count as input
    /// only.
    pub prims: Throughput,
    /// Pixels covered / written after the depth test.
    pub frags: Throughput,
    /// Triangles dropped because a vertex had `w <= 0`.
    pub culled: u64,
}

/// A pair of input and output counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Throughput {
    /// Items submitted.
    pub i: usize,
    /// Items that made it to the render target.
    pub o: usize,
}

/// Measures the time of one draw call into a [`Stats`].
pub(crate) struct Timer(Instant);

impl Timer {
    pub(crate) fn start() -> Self {
        Self(Instant::now())
    }

    pub(crate) fn finish(self, stats: &mut Stats) {
        stats.time += self.0.elapsed();
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Average time per frame, or zero if no frame was rendered.
    pub fn frame_time(&self) -> Duration {
        match self.frames {
            0 => Duration::ZERO,
            n => self.time / n as u32,
        }
    }
}

impl Throughput {
    pub fn new(i: usize, o: usize) -> Self {
        Self { i, o }
    }

    /// Fraction of the input that was output, or `None` for no input.
    pub fn ratio(&self) -> Option<f32> {
        (self.i > 0).then(|| self.o as f32 / self.i as f32)
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, other: Self) {
        self.frames += other.frames;
        self.calls += other.calls;
        self.time += other.time;
        self.verts += other.verts;
        self.prims += other.prims;
        self.frags += other.frags;
        self.culled += other.culled;
    }
}

impl AddAssign for Throughput {
    fn add_assign(&mut self, rhs: Self) {
        self.i += rhs.i;
        self.o += rhs.o;
    }
}

impl Display for Throughput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", human_num(self.i), human_num(self.o))
    }
}

impl Display for Stats {
    /// One line, suitable for a status bar.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tris {} | frags {} | culled {}",
            self.prims, self.frags, self.culled
        )?;
        if f.alternate() {
            write!(
                f,
                " | verts {} | calls {} | frames {} | {:.2}ms/frame",
                self.verts,
                self.calls,
                self.frames,
                self.frame_time().as_secs_f32() * 1000.0
            )?;
        }
        Ok(())
    }
}

fn human_num(n: usize) -> String {
    if n < 10_000 {
        format!("{n}")
    } else if n < 1_000_000 {
        format!("{:.1}k", n as f32 / 1_000.0)
    } else {
        format!("{:.1}M", n as f32 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assign() {
        let mut total = Stats::new();
        let frame = Stats {
            frames: 1,
            calls: 2,
            time: Duration::from_millis(4),
            verts: Throughput::new(8, 8),
            prims: Throughput::new(12, 6),
            frags: Throughput::new(100, 80),
            culled: 1,
        };
        total += frame.clone();
        total += frame;
        assert_eq!(total.frames, 2);
        assert_eq!(total.calls, 4);
        assert_eq!(total.prims, Throughput::new(24, 12));
        assert_eq!(total.frags, Throughput::new(200, 160));
        assert_eq!(total.culled, 2);
        assert_eq!(total.frame_time(), Duration::from_millis(4));
    }

    #[test]
    fn test_display() {
        let stats = Stats {
            prims: Throughput::new(12, 6),
            frags: Throughput::new(123_456, 2_500_000),
            ..Stats::default()
        };
        assert_eq!(
            stats.to_string(),
            "tris 12/6 | frags 123.5k/2.5M | culled 0"
        );
        assert!(format!("{stats:#}").contains("frames 0"));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(Throughput::default().ratio(), None);
        assert_eq!(Throughput::new(4, 1).ratio(), Some(0.25));
    }
}
