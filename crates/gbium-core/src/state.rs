//! Save/load surface for the core.
//!
//! Components expose their state as plain values wrapped in a [`Snapshot`].
//! With `savestate-serde` those values derive serde; `savestate-postcard`
//! adds a compact binary encoding of a whole console snapshot.

use std::convert::Infallible;

use crate::{
    Gameboy,
    cpu::{Cpu, CpuSnapshot},
    error::Error,
    memory::{Memory, MemoryState},
};

/// Metadata attached to every snapshot for compatibility checks.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotMeta {
    /// Version of the snapshot payload.
    pub format_version: u32,
    /// Machine cycle counter when the snapshot was captured.
    pub cycle: u64,
    /// Cartridge title, when a cartridge was loaded.
    pub title: Option<String>,
}

impl Default for SnapshotMeta {
    fn default() -> Self {
        Self {
            format_version: 1,
            cycle: 0,
            title: None,
        }
    }
}

/// Simple wrapper bundling snapshot metadata with payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<T, M = SnapshotMeta> {
    pub meta: M,
    pub data: T,
}

/// Minimal save/load contract.
pub trait SaveState {
    type State;
    type Error;
    type Meta: Clone;

    /// Bumped whenever the layout of `State` changes.
    const FORMAT_VERSION: u32 = 1;

    fn save(&self, meta: Self::Meta) -> Result<Snapshot<Self::State, Self::Meta>, Self::Error>;

    fn load(&mut self, snapshot: &Snapshot<Self::State, Self::Meta>) -> Result<(), Self::Error>;
}

impl SaveState for Cpu {
    type State = CpuSnapshot;
    type Error = Infallible;
    type Meta = SnapshotMeta;

    fn save(&self, meta: Self::Meta) -> Result<Snapshot<Self::State, Self::Meta>, Self::Error> {
        Ok(Snapshot {
            meta,
            data: self.snapshot(),
        })
    }

    fn load(&mut self, snapshot: &Snapshot<Self::State, Self::Meta>) -> Result<(), Self::Error> {
        self.restore(&snapshot.data);
        Ok(())
    }
}

impl SaveState for Memory {
    type State = MemoryState;
    type Error = Error;
    type Meta = SnapshotMeta;

    fn save(&self, meta: Self::Meta) -> Result<Snapshot<Self::State, Self::Meta>, Self::Error> {
        Ok(Snapshot {
            meta,
            data: self.save_state(),
        })
    }

    fn load(&mut self, snapshot: &Snapshot<Self::State, Self::Meta>) -> Result<(), Self::Error> {
        self.load_state(&snapshot.data)
    }
}

/// Everything needed to resume a [`Gameboy`] on the same cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "savestate-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameboyState {
    pub cpu: CpuSnapshot,
    pub memory: MemoryState,
    pub cycles: u64,
}

impl SaveState for Gameboy {
    type State = GameboyState;
    type Error = Error;
    type Meta = SnapshotMeta;

    /// The CPU is expected to sit at an instruction boundary; a mid-instruction
    /// capture resumes at the next opcode fetch.
    fn save(&self, mut meta: Self::Meta) -> Result<Snapshot<Self::State, Self::Meta>, Self::Error> {
        meta.format_version = Self::FORMAT_VERSION;
        meta.cycle = self.cycles;
        if meta.title.is_none() {
            meta.title = self.cartridge.as_ref().map(|c| c.header().title.clone());
        }
        Ok(Snapshot {
            meta,
            data: GameboyState {
                cpu: self.cpu.snapshot(),
                memory: self.memory.save_state(),
                cycles: self.cycles,
            },
        })
    }

    fn load(&mut self, snapshot: &Snapshot<Self::State, Self::Meta>) -> Result<(), Self::Error> {
        if snapshot.meta.format_version != Self::FORMAT_VERSION {
            return Err(Error::StateMismatch("format version"));
        }
        self.memory.load_state(&snapshot.data.memory)?;
        self.cpu.restore(&snapshot.data.cpu);
        self.cycles = snapshot.data.cycles;
        self.ticks = 0;
        Ok(())
    }
}

/// Postcard encoding of a console snapshot.
#[cfg(feature = "savestate-postcard")]
pub mod postcard {
    use super::{GameboyState, Snapshot};

    pub fn encode(snapshot: &Snapshot<GameboyState>) -> Result<Vec<u8>, ::postcard::Error> {
        ::postcard::to_stdvec(snapshot)
    }

    pub fn decode(bytes: &[u8]) -> Result<Snapshot<GameboyState>, ::postcard::Error> {
        ::postcard::from_bytes(bytes)
    }
}
