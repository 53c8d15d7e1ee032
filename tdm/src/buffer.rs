//! Macro buffers shared pairwise by two macros growing towards each other.
//!
//! ```text
//!  start(2n)       end(2n)        end(2n+1)           start(2n+1)
//!  v               v              v                   v
//! +------------------------------------------------------+
//! |>>>>> MACRO 2n >>>>>           <<<<< MACRO 2n+1 <<<<<<|
//! +------------------------------------------------------+
//! ```
//!
//! Positions are boundaries between slots, `0..=BUFFER_SIZE`. The even macro
//! owns slots `[start, end)` and reads them front to back, the odd macro owns
//! `[end, BUFFER_SIZE)` and reads them back to front. A recording stops when
//! its cursor meets the neighbor's end, so the two never overlap and there is
//! no fixed split between them: one long and one short macro is as fine as
//! two medium ones.

use tdm_types::record::KeypressRecord;

use crate::error::TdmError;

/// Growth direction of a macro inside its buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Even macros, growing from the front
    Forward,
    /// Odd macros, growing from the back
    Backward,
}

impl Direction {
    pub fn of(macro_id: u8) -> Self {
        if macro_id & 1 == 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// The signed stride of one step in this direction
    pub fn stride(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A position inside one macro, used while recording or playing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub(crate) macro_id: u8,
    pub(crate) start: usize,
    pub(crate) pos: usize,
    pub(crate) end: usize,
    pub(crate) direction: Direction,
}

impl Cursor {
    /// Number of slots between the macro start and the cursor
    pub fn offset(&self) -> usize {
        self.start.abs_diff(self.pos)
    }

    pub fn at_start(&self) -> bool {
        self.pos == self.start
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.end
    }

    fn advance(&mut self) {
        self.pos = self.pos.wrapping_add_signed(self.direction.stride());
    }

    fn retreat(&mut self) {
        self.pos = self.pos.wrapping_add_signed(-self.direction.stride());
    }

    /// Slot index in front of the cursor, the next one to write or read
    fn next_slot(&self) -> Option<usize> {
        match self.direction {
            Direction::Forward => Some(self.pos),
            Direction::Backward => self.pos.checked_sub(1),
        }
    }

    /// Slot index behind the cursor, the one written or read last
    fn last_slot(&self) -> Option<usize> {
        if self.at_start() {
            return None;
        }
        match self.direction {
            Direction::Forward => self.pos.checked_sub(1),
            Direction::Backward => Some(self.pos),
        }
    }
}

/// Fixed storage for `2 * NUM_PAIRS` macros, allocated once and never resized.
pub struct MacroBuffers<const BUFFER_SIZE: usize, const NUM_PAIRS: usize> {
    slots: [[KeypressRecord; BUFFER_SIZE]; NUM_PAIRS],
    /// Persisted end boundary of every macro, `[even, odd]` per pair
    ends: [[usize; 2]; NUM_PAIRS],
}

impl<const BUFFER_SIZE: usize, const NUM_PAIRS: usize> Default for MacroBuffers<BUFFER_SIZE, NUM_PAIRS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const BUFFER_SIZE: usize, const NUM_PAIRS: usize> MacroBuffers<BUFFER_SIZE, NUM_PAIRS> {
    /// Number of macros, always even
    pub const NUM_MACROS: usize = 2 * NUM_PAIRS;

    pub fn new() -> Self {
        const {
            assert!(NUM_PAIRS >= 1, "at least one macro pair is required");
            assert!(2 * NUM_PAIRS <= u8::MAX as usize, "macro ids must fit in a u8");
        };
        Self {
            slots: [[KeypressRecord::default(); BUFFER_SIZE]; NUM_PAIRS],
            ends: [[0, BUFFER_SIZE]; NUM_PAIRS],
        }
    }

    /// Empties every macro
    pub fn reset(&mut self) {
        for ends in self.ends.iter_mut() {
            *ends = [0, BUFFER_SIZE];
        }
    }

    /// The macro sharing a buffer with `macro_id`
    pub fn neighbor(macro_id: u8) -> u8 {
        macro_id ^ 1
    }

    /// Fixed start boundary of a macro
    pub fn start(macro_id: u8) -> usize {
        match Direction::of(macro_id) {
            Direction::Forward => 0,
            Direction::Backward => BUFFER_SIZE,
        }
    }

    /// Persisted end boundary of a macro, exclusive
    pub fn end(&self, macro_id: u8) -> usize {
        self.ends[Self::pair(macro_id)][(macro_id & 1) as usize]
    }

    /// Number of records in a macro
    pub fn len(&self, macro_id: u8) -> usize {
        Self::start(macro_id).abs_diff(self.end(macro_id))
    }

    pub fn is_empty(&self, macro_id: u8) -> bool {
        self.len(macro_id) == 0
    }

    /// Slots a macro may use right now: from its start up to its neighbor's end
    pub fn capacity(&self, macro_id: u8) -> usize {
        Self::start(macro_id).abs_diff(self.end(Self::neighbor(macro_id)))
    }

    /// A cursor at the start of `macro_id`, bounded by its persisted end
    pub fn cursor(&self, macro_id: u8) -> Cursor {
        let start = Self::start(macro_id);
        Cursor {
            macro_id,
            start,
            pos: start,
            end: self.end(macro_id),
            direction: Direction::of(macro_id),
        }
    }

    /// Commit the cursor position as the new end of its macro.
    pub fn commit(&mut self, cursor: &Cursor) {
        let limit = self.end(Self::neighbor(cursor.macro_id));
        let pos = match cursor.direction {
            Direction::Forward => cursor.pos.min(limit),
            Direction::Backward => cursor.pos.max(limit),
        };
        self.ends[Self::pair(cursor.macro_id)][(cursor.macro_id & 1) as usize] = pos;
    }

    /// `true` if writing at the cursor would run into the neighbor macro
    pub fn is_full(&self, cursor: &Cursor) -> bool {
        cursor.pos == self.end(Self::neighbor(cursor.macro_id))
    }

    /// Write a record in front of the cursor and move past it.
    pub fn append(&mut self, cursor: &mut Cursor, record: KeypressRecord) -> Result<(), TdmError> {
        if self.is_full(cursor) {
            return Err(TdmError::BufferFull);
        }
        let idx = cursor.next_slot().ok_or(TdmError::BufferFull)?;
        let slot = self.slots[Self::pair(cursor.macro_id)]
            .get_mut(idx)
            .ok_or(TdmError::BufferFull)?;
        *slot = record;
        cursor.advance();
        Ok(())
    }

    /// Read the record in front of the cursor and move past it, `None` once
    /// the cursor reaches its end.
    pub fn next(&self, cursor: &mut Cursor) -> Option<KeypressRecord> {
        if cursor.at_end() {
            return None;
        }
        let record = *self.slots[Self::pair(cursor.macro_id)].get(cursor.next_slot()?)?;
        cursor.advance();
        Some(record)
    }

    /// The record right behind the cursor, i.e. the one appended last
    pub fn last(&self, cursor: &Cursor) -> Option<&KeypressRecord> {
        self.slots[Self::pair(cursor.macro_id)].get(cursor.last_slot()?)
    }

    pub fn last_mut(&mut self, cursor: &Cursor) -> Option<&mut KeypressRecord> {
        self.slots[Self::pair(cursor.macro_id)].get_mut(cursor.last_slot()?)
    }

    /// Step the cursor back over trailing records while `predicate` holds for
    /// the record behind it. Returns the number of records dropped.
    pub fn trim_back<P>(&self, cursor: &mut Cursor, mut predicate: P) -> usize
    where
        P: FnMut(&KeypressRecord) -> bool,
    {
        let mut trimmed = 0;
        while let Some(record) = self.last(cursor) {
            if !predicate(record) {
                break;
            }
            cursor.retreat();
            trimmed += 1;
        }
        trimmed
    }

    /// Records of a macro in playback order
    pub fn records(&self, macro_id: u8) -> impl Iterator<Item = &KeypressRecord> {
        let pair = &self.slots[Self::pair(macro_id)];
        let (start, end) = (Self::start(macro_id), self.end(macro_id));
        let forward = match Direction::of(macro_id) {
            Direction::Forward => &pair[start..end],
            Direction::Backward => &[][..],
        };
        let backward = match Direction::of(macro_id) {
            Direction::Forward => &[][..],
            Direction::Backward => &pair[end..start],
        };
        forward.iter().chain(backward.iter().rev())
    }

    fn pair(macro_id: u8) -> usize {
        macro_id as usize / 2
    }
}
