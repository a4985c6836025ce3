//! MIDI Time Code reassembly.
//!
//! Quarter-frame messages arrive in a fixed cycle of eight pieces, each carrying one nibble of
//! `frames`, `seconds`, `minutes` and `hours + rate`. The frames pair straddles the sender's
//! transmission latency, so frame values are corrected on arrival instead of being copied
//! verbatim: a position is only published when a frames nibble is received.

use tracing::{Level, event};

use crate::events::timecode::{FrameRate, Timecode};
use crate::packets::error::DecodeError;

/// Owns the timecode state shared by the full-frame and quarter-frame paths.
#[derive(Debug, Default, Clone)]
pub struct TimecodeAssembler {
    state: Timecode,
}

impl TimecodeAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The position assembled so far.
    pub fn current(&self) -> Timecode {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = Timecode::default();
    }

    /// Applies a full-frame message, replacing the whole state.
    ///
    /// `rate_and_hours` is `rate * 32 + hours`. An unrecognized rate leaves the state untouched.
    pub fn full_frame(&mut self, rate_and_hours: u8, minutes: u8, seconds: u8, frames: u8) -> Result<Timecode, DecodeError> {
        let frame_rate = FrameRate::from_field(rate_and_hours / 32)?;
        self.state = Timecode {
            hours: rate_and_hours % 32,
            minutes,
            seconds,
            frames,
            frame_rate,
        };
        event!(Level::TRACE, timecode = %self.state, "Full-frame timecode");
        Ok(self.state)
    }

    /// Applies one quarter-frame piece. Returns the position to publish after a frames nibble.
    pub fn quarter_frame(&mut self, piece: u8, nibble: u8) -> Result<Option<Timecode>, DecodeError> {
        let nibble = nibble & 0x0F;
        let state = &mut self.state;
        match piece {
            // frames low nibble
            0 => {
                if state.frames == state.frame_rate.last_frame() {
                    state.frames = 0;
                    Self::rollover(state);
                }
                // the high nibble of the previous pair is still one quarter-frame behind
                if state.frames == 15 {
                    state.frames = 16;
                }
                state.frames = (state.frames / 16) * 16 + nibble;
                Ok(Some(*state))
            }
            // frames high nibble
            1 => {
                state.frames = (nibble * 16 + state.frames % 16).saturating_add(1);
                if state.frames == state.frame_rate.frames_per_second() {
                    state.frames = 0;
                    Self::rollover(state);
                }
                Ok(Some(*state))
            }
            2 => {
                state.seconds = Self::low_nibble(state.seconds, nibble);
                Ok(None)
            }
            3 => {
                state.seconds = Self::high_nibble(state.seconds, nibble);
                Ok(None)
            }
            4 => {
                state.minutes = Self::low_nibble(state.minutes, nibble);
                Ok(None)
            }
            5 => {
                state.minutes = Self::high_nibble(state.minutes, nibble);
                Ok(None)
            }
            6 => {
                state.hours = Self::low_nibble(state.hours, nibble);
                Ok(None)
            }
            // hours high bit and rate
            7 => {
                state.hours = state.hours % 16 + (nibble % 2) * 16;
                state.frame_rate = FrameRate::from_field(nibble / 2)?;
                Ok(None)
            }
            _ => Err(DecodeError::UnrecognizedQuarterFramePiece(piece)),
        }
    }

    fn low_nibble(value: u8, nibble: u8) -> u8 {
        (value / 16) * 16 + nibble
    }

    fn high_nibble(value: u8, nibble: u8) -> u8 {
        value % 16 + nibble * 16
    }

    /// Carries one second into the larger units, wrapping the day.
    fn rollover(state: &mut Timecode) {
        state.seconds = state.seconds.wrapping_add(1);
        if state.seconds == 60 {
            state.seconds = 0;
            state.minutes = state.minutes.wrapping_add(1);
            if state.minutes == 60 {
                state.minutes = 0;
                state.hours = state.hours.wrapping_add(1);
                if state.hours == 24 {
                    state.hours = 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(assembler: &mut TimecodeAssembler, data: &[u8]) -> Vec<Timecode> {
        data.iter()
            .filter_map(|byte| assembler.quarter_frame(byte >> 4, byte & 0x0F).unwrap())
            .collect()
    }

    #[test]
    fn test_full_cycle_from_zero() {
        let mut assembler = TimecodeAssembler::new();
        let cycle = Timecode::new(1, 2, 3, 4, FrameRate::Fps24).quarter_frames();

        let published = feed(&mut assembler, &cycle);
        // only the two frames nibbles publish, before the rest of the cycle has arrived
        assert_eq!(
            published,
            vec![
                Timecode::new(0, 0, 0, 4, FrameRate::Fps30),
                Timecode::new(0, 0, 0, 5, FrameRate::Fps30)
            ]
        );
        assert_eq!(assembler.current(), Timecode::new(1, 2, 3, 5, FrameRate::Fps24));

        let published = feed(&mut assembler, &cycle[..1]);
        assert_eq!(published, vec![Timecode::new(1, 2, 3, 4, FrameRate::Fps24)]);
        let published = feed(&mut assembler, &cycle[1..2]);
        assert_eq!(published, vec![Timecode::new(1, 2, 3, 5, FrameRate::Fps24)]);
    }

    #[test]
    fn test_piece_zero_rolls_over_after_last_frame() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(0, 0, 10, 23).unwrap();

        let published = assembler.quarter_frame(0, 0).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 11, 0, FrameRate::Fps24)));
    }

    #[test]
    fn test_piece_zero_rollover_cascades() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(32 + 23, 59, 59, 24).unwrap();

        let published = assembler.quarter_frame(0, 2).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 0, 2, FrameRate::Fps25)));
    }

    #[test]
    fn test_piece_zero_fifteen_becomes_sixteen() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(0, 0, 0, 15).unwrap();

        let published = assembler.quarter_frame(0, 2).unwrap();
        assert_eq!(published.map(|timecode| timecode.frames), Some(18));
    }

    #[test]
    fn test_piece_one_adds_latency_frame() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(0, 0, 0, 6).unwrap();

        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published.map(|timecode| timecode.frames), Some(23));
    }

    #[test]
    fn test_piece_one_rolls_over_at_frame_count() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(96, 0, 59, 13).unwrap();

        // 30 fps: 16 + 13 + 1 == 30
        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 1, 0, 0, FrameRate::Fps30)));
    }

    #[test]
    fn test_piece_one_rolls_over_at_24_fps() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(0, 0, 5, 7).unwrap();

        // 16 + 7 + 1 == 24
        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 6, 0, FrameRate::Fps24)));
    }

    #[test]
    fn test_piece_one_rolls_over_at_25_fps() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(32, 0, 5, 7).unwrap();

        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 5, 24, FrameRate::Fps25)));

        assembler.full_frame(32, 0, 5, 8).unwrap();
        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 6, 0, FrameRate::Fps25)));
    }

    #[test]
    fn test_piece_one_rollover_wraps_the_day() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(64 + 23, 59, 59, 13).unwrap();

        let published = assembler.quarter_frame(1, 1).unwrap();
        assert_eq!(published, Some(Timecode::new(0, 0, 0, 0, FrameRate::Fps30Drop)));
    }

    #[test]
    fn test_seconds_minutes_hours_nibbles() {
        let mut assembler = TimecodeAssembler::new();
        for (piece, nibble) in [(2, 0xB), (3, 0x2), (4, 0x5), (5, 0x3), (6, 0x7), (7, 0x3)] {
            assert_eq!(assembler.quarter_frame(piece, nibble), Ok(None));
        }
        assert_eq!(assembler.current(), Timecode::new(23, 53, 43, 0, FrameRate::Fps25));
    }

    #[test]
    fn test_hours_low_nibble_keeps_high_bit() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(20, 0, 0, 0).unwrap();
        assembler.quarter_frame(6, 2).unwrap();
        assert_eq!(assembler.current().hours, 18);
    }

    #[test]
    fn test_unrecognized_rate_keeps_previous_rate() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(32, 0, 0, 0).unwrap();

        assert_eq!(assembler.quarter_frame(7, 0x9), Err(DecodeError::UnrecognizedFrameRate(4)));
        let current = assembler.current();
        assert_eq!(current.frame_rate, FrameRate::Fps25);
        assert_eq!(current.hours, 16);
    }

    #[test]
    fn test_quarter_frame_rate_last_write_wins() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(0, 0, 0, 0).unwrap();
        assembler.quarter_frame(7, 0x4).unwrap();
        assert_eq!(assembler.current().frame_rate, FrameRate::Fps30Drop);
    }

    #[test]
    fn test_full_frame_overwrites_quarter_frame_state() {
        let mut assembler = TimecodeAssembler::new();
        feed(&mut assembler, &Timecode::new(3, 4, 5, 6, FrameRate::Fps30).quarter_frames());

        let timecode = assembler.full_frame(32 + 5, 10, 20, 3).unwrap();
        assert_eq!(timecode, Timecode::new(5, 10, 20, 3, FrameRate::Fps25));
        assert_eq!(assembler.current(), timecode);
    }

    #[test]
    fn test_full_frame_unrecognized_rate_leaves_state() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(5, 1, 2, 3).unwrap();
        assert_eq!(assembler.full_frame(0x85, 9, 9, 9), Err(DecodeError::UnrecognizedFrameRate(4)));
        assert_eq!(assembler.current(), Timecode::new(5, 1, 2, 3, FrameRate::Fps24));
    }

    #[test]
    fn test_unknown_piece() {
        let mut assembler = TimecodeAssembler::new();
        assert_eq!(assembler.quarter_frame(8, 0), Err(DecodeError::UnrecognizedQuarterFramePiece(8)));
    }

    #[test]
    fn test_reset() {
        let mut assembler = TimecodeAssembler::new();
        assembler.full_frame(1, 2, 3, 4).unwrap();
        assembler.reset();
        assert_eq!(assembler.current(), Timecode::default());
    }
}
