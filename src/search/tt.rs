use std::sync::atomic::{AtomicU64, Ordering};

use crate::board::moves::Move;
use crate::search::eval::NEAR_CHECKMATE_VALUE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

impl Bound {
    fn encode(self) -> u64 {
        match self { Bound::Exact => 1, Bound::Lower => 2, Bound::Upper => 3 }
    }

    fn decode(bits: u64) -> Option<Self> {
        match bits { 1 => Some(Bound::Exact), 2 => Some(Bound::Lower), 3 => Some(Bound::Upper), _ => None }
    }
}

/// A stored search result. Mate values are kept relative to the node they
/// were found at; use `value` to read them back at a given ply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: u64,
    pub depth: i32,
    pub best: Option<Move>,
    pub bound: Bound,
    stored: i32,
}

impl Entry {
    pub fn new(key: u64, depth: i32, ply: usize, best: Option<Move>, value: i32, bound: Bound) -> Self {
        let ply = ply as i32;
        let stored = if value > NEAR_CHECKMATE_VALUE { value + ply }
            else if value < -NEAR_CHECKMATE_VALUE { value - ply }
            else { value };
        Self { key, depth, best, bound, stored }
    }

    /// Value as seen from a node `ply` plies below the root.
    pub fn value(&self, ply: usize) -> i32 {
        let ply = ply as i32;
        if self.stored > NEAR_CHECKMATE_VALUE { self.stored - ply }
        else if self.stored < -NEAR_CHECKMATE_VALUE { self.stored + ply }
        else { self.stored }
    }

    fn pack(&self) -> u64 {
        let mv = self.best.map_or(0, |m| m.raw() as u64) & 0x00FF_FFFF;
        let value = (self.stored.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16 as u64) << 24;
        let depth = (self.depth.clamp(i8::MIN as i32, i8::MAX as i32) as i8 as u8 as u64) << 40;
        mv | value | depth | (self.bound.encode() << 48)
    }

    fn unpack(key: u64, data: u64) -> Option<Self> {
        let bound = Bound::decode((data >> 48) & 0x3)?;
        Some(Self {
            key,
            best: Move::from_raw((data & 0x00FF_FFFF) as u32),
            stored: ((data >> 24) & 0xFFFF) as u16 as i16 as i32,
            depth: ((data >> 40) & 0xFF) as u8 as i8 as i32,
            bound,
        })
    }
}

#[derive(Default)]
struct Slot {
    check: AtomicU64,
    data: AtomicU64,
}

/// Shared, lock-free transposition table. Each slot keeps `key ^ data`
/// next to `data`, so a torn write from a racing thread fails the key check
/// instead of producing a mixed entry.
pub struct TranspositionTable {
    slots: Vec<Slot>,
    mask: usize,
}

const SLOT_BYTES: usize = 16;
pub const DEFAULT_CAPACITY_MB: usize = 64;

impl TranspositionTable {
    pub fn new(mb: usize) -> Self {
        let mut tt = Self { slots: Vec::new(), mask: 0 };
        tt.set_capacity_mb(mb);
        tt
    }

    pub fn set_capacity_mb(&mut self, mb: usize) {
        let wanted = (mb.saturating_mul(1024 * 1024) / SLOT_BYTES).max(1024);
        // round down to a power of two
        let entries = 1usize << (usize::BITS - 1 - wanted.leading_zeros());
        self.slots.clear();
        self.slots.resize_with(entries, Slot::default);
        self.mask = entries - 1;
    }

    pub fn capacity(&self) -> usize { self.slots.len() }

    #[inline]
    fn slot(&self, key: u64) -> &Slot { &self.slots[(key as usize) & self.mask] }

    pub fn lookup(&self, key: u64) -> Option<Entry> {
        let slot = self.slot(key);
        let data = slot.data.load(Ordering::Relaxed);
        let check = slot.check.load(Ordering::Relaxed);
        if check ^ data != key { return None; }
        Entry::unpack(key, data)
    }

    /// Depth-preferred on the same position, always-replace otherwise.
    pub fn store(&self, entry: Entry) {
        let slot = self.slot(entry.key);
        if let Some(existing) = self.lookup(entry.key) {
            if existing.depth > entry.depth && entry.bound != Bound::Exact { return; }
        }
        let data = entry.pack();
        slot.data.store(data, Ordering::Relaxed);
        slot.check.store(entry.key ^ data, Ordering::Relaxed);
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot.check.get_mut() = 0;
            *slot.data.get_mut() = 0;
        }
    }

    /// Occupied permille, sampled over the first thousand slots.
    pub fn hashfull(&self) -> usize {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample].iter().filter(|s| s.data.load(Ordering::Relaxed) != 0).count();
        used * 1000 / sample.max(1)
    }
}

impl Default for TranspositionTable {
    fn default() -> Self { Self::new(DEFAULT_CAPACITY_MB) }
}
