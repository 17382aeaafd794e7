//! Storage result types
//!
//! A `Snapshot` holds the units of one resource. The count sent on the
//! control channel and the units later streamed both come from it.

use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    units: Vec<Vec<u8>>,
}

impl Snapshot {
    /// Builds a snapshot; an empty resource becomes a single empty unit.
    pub fn new(mut units: Vec<Vec<u8>>) -> Self {
        if units.is_empty() {
            units.push(Vec::new());
        }
        Self { units }
    }

    /// Count announced to the client, always at least 1.
    pub fn count(&self) -> usize {
        self.units.len()
    }

    pub fn units(&self) -> &[Vec<u8>] {
        &self.units
    }

    /// Writes every unit to `sink` in order and flushes it.
    pub async fn stream<W>(&self, sink: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        for unit in &self.units {
            sink.write_all(unit).await?;
        }
        sink.flush().await?;
        debug!("Streamed {} units", self.units.len());
        Ok(())
    }
}
