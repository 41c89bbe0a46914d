//! drawing frames onto a terminal.

use {
    crate::layout::{self, Frame},
    crossterm::{QueueableCommand, cursor, style, terminal},
    std::io::{self, Write},
};

/// a surface frames are drawn onto.
pub trait Canvas {
    fn clear(&mut self) -> io::Result<()>;
    /// writes `text` starting at the 1-based `row` and `col`.
    fn put(&mut self, row: usize, col: usize, text: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;

    /// draws every write in `frame`, in order.
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let Frame { clear, writes } = frame;

        if *clear {
            self.clear()?;
        }
        for layout::Write { row, col, text } in writes {
            self.put(*row, *col, text)?;
        }

        self.flush()
    }
}

/// a terminal driven with crossterm commands.
pub struct Terminal<W: Write> {
    out: W,
}

// === impl Terminal ===

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// crossterm positions are 0-based.
    fn position(row: usize, col: usize) -> (u16, u16) {
        let clamp = |n: usize| u16::try_from(n.saturating_sub(1)).unwrap_or(u16::MAX);
        (clamp(col), clamp(row))
    }
}

impl<W: Write> Canvas for Terminal<W> {
    fn clear(&mut self) -> io::Result<()> {
        let Self { out } = self;
        out.queue(terminal::Clear(terminal::ClearType::All))
            .map(drop)
    }

    fn put(&mut self, row: usize, col: usize, text: &str) -> io::Result<()> {
        let (x, y) = Self::position(row, col);
        let Self { out } = self;

        out.queue(cursor::MoveTo(x, y))?
            .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?
            .queue(style::Print(text))
            .map(drop)
    }

    fn flush(&mut self) -> io::Result<()> {
        let Self { out } = self;
        out.flush()
    }
}

impl<W: Write> Drop for Terminal<W> {
    /// leaves the cursor on a fresh line below the last frame.
    fn drop(&mut self) {
        let Self { out } = self;
        let _ = out.write_all(b"\n").and_then(|()| out.flush());
    }
}
