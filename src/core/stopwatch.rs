use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

struct Split {
    name: String,
    duration: Duration,
}

/// Records named wall-clock splits for the stages of a render, which are then
/// logged and written into the diagnostics file.
pub struct Stopwatch {
    name: String,
    splits: Vec<Split>,
    start_total: Instant,
    start_split: Instant,
}

impl Stopwatch {
    pub fn new<S: Into<String>>(name: S) -> Stopwatch {
        let now = Instant::now();
        Stopwatch {
            name: name.into(),
            splits: Vec::default(),
            start_total: now,
            start_split: now,
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start_total.elapsed()
    }

    pub fn record_split<S: Into<String>>(&mut self, name: S) -> Duration {
        let duration = self.start_split.elapsed();
        self.start_split = Instant::now();
        let name = name.into();
        log::debug!("{}: {} took {:?}", self.name, name, duration);
        self.splits.push(Split { name, duration });
        duration
    }

    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "Stopwatch: {};  Total elapsed duration: {:?}",
            self.name,
            self.total_elapsed()
        )?;
        for split in self.splits.iter() {
            writeln!(writer, "  {}: {:?}", split.name, split.duration)?;
        }
        writeln!(writer)
    }
}
