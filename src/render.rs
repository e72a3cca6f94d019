//! Terminal view running beside the solver

use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::grid::Grid;
use crate::sync::{SharedGrid, Shutdown};

/// Something a frame can be drawn onto
pub trait Canvas: Send + 'static {
    fn draw(&mut self, frame: &Grid) -> io::Result<()>;
}

/// Redraws the whole grid as emojis after clearing the screen
pub struct TerminalCanvas<W> {
    out: W,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalCanvas<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + 'static> Canvas for TerminalCanvas<W> {
    fn draw(&mut self, frame: &Grid) -> io::Result<()> {
        write!(self.out, "\x1B[2J\x1B[1;1H")?;
        writeln!(self.out, "{}", frame)?;
        self.out.flush()
    }
}

/// Periodic reader of the shared grid
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    frame_length: Duration,
}

impl Renderer {
    pub fn new(frame_length: Duration) -> Self {
        Self { frame_length }
    }

    /// Start the frame loop on its own thread
    ///
    /// Every `frame_length` the loop copies the grid and draws the copy;
    /// the lock is never held while drawing. The loop ends when `shutdown`
    /// is triggered. If drawing fails, the loop triggers `shutdown` itself
    /// so that the solver stops as well.
    pub fn begin_rendering<C: Canvas>(
        &self,
        grid: SharedGrid,
        mut canvas: C,
        shutdown: Shutdown,
    ) -> RenderHandle<C> {
        let frame_length = self.frame_length;
        let signal = shutdown.clone();
        let handle = thread::spawn(move || {
            info!("Rendering every {:?}", frame_length);
            let mut frames = 0usize;
            loop {
                let frame = grid.snapshot();
                if let Err(err) = canvas.draw(&frame) {
                    warn!("Drawing failed after {} frames, shutting down: {}", frames, err);
                    signal.trigger();
                    return Err(err);
                }
                frames += 1;
                if signal.wait_timeout(frame_length) {
                    break;
                }
            }
            info!("Rendering stopped after {} frames", frames);
            Ok(canvas)
        });
        RenderHandle { shutdown, handle }
    }
}

/// Running frame loop started by [Renderer::begin_rendering]
pub struct RenderHandle<C> {
    shutdown: Shutdown,
    handle: JoinHandle<io::Result<C>>,
}

impl<C> RenderHandle<C> {
    /// True once the loop has returned
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Request shutdown and wait for the loop to exit
    ///
    /// Returns the canvas, or the error that ended the loop.
    pub fn stop(self) -> io::Result<C> {
        self.shutdown.trigger();
        self.handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("render thread panicked")))
    }
}
