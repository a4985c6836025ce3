use std::fmt;

use crate::packets::error::DecodeError;
use crate::packets::status::{SYSEX_END, SystemCommand, universal};

/// SMPTE frame rate carried in the two-bit rate field of MIDI Time Code.
///
/// Defaults to 30 fps, whose rollover thresholds also apply while no rate has been announced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameRate {
    Fps24,
    Fps25,
    Fps30Drop,
    #[default]
    Fps30,
}

impl FrameRate {
    pub fn from_field(field: u8) -> Result<Self, DecodeError> {
        match field {
            0 => Ok(FrameRate::Fps24),
            1 => Ok(FrameRate::Fps25),
            2 => Ok(FrameRate::Fps30Drop),
            3 => Ok(FrameRate::Fps30),
            _ => Err(DecodeError::UnrecognizedFrameRate(field)),
        }
    }

    pub fn field(self) -> u8 {
        match self {
            FrameRate::Fps24 => 0,
            FrameRate::Fps25 => 1,
            FrameRate::Fps30Drop => 2,
            FrameRate::Fps30 => 3,
        }
    }

    /// Frame count at which the frames field wraps into the next second.
    pub fn frames_per_second(self) -> u8 {
        match self {
            FrameRate::Fps24 => 24,
            FrameRate::Fps25 => 25,
            FrameRate::Fps30Drop | FrameRate::Fps30 => 30,
        }
    }

    pub fn last_frame(self) -> u8 {
        self.frames_per_second() - 1
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameRate::Fps24 => write!(f, "24 fps"),
            FrameRate::Fps25 => write!(f, "25 fps"),
            FrameRate::Fps30Drop => write!(f, "30 fps drop"),
            FrameRate::Fps30 => write!(f, "30 fps"),
        }
    }
}

/// An absolute `hh:mm:ss:ff` position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timecode {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
    pub frame_rate: FrameRate,
}

impl Timecode {
    pub fn new(hours: u8, minutes: u8, seconds: u8, frames: u8, frame_rate: FrameRate) -> Self {
        Timecode {
            hours,
            minutes,
            seconds,
            frames,
            frame_rate,
        }
    }

    /// Data bytes of the eight quarter-frame messages (status `0xF1`) announcing this position, piece 0 first.
    pub fn quarter_frames(&self) -> [u8; 8] {
        let nibbles = [
            self.frames & 0x0F,
            (self.frames >> 4) & 0x01,
            self.seconds & 0x0F,
            (self.seconds >> 4) & 0x03,
            self.minutes & 0x0F,
            (self.minutes >> 4) & 0x03,
            self.hours & 0x0F,
            (self.frame_rate.field() << 1) | ((self.hours >> 4) & 0x01),
        ];
        let mut pieces = [0; 8];
        for (piece, (data, nibble)) in pieces.iter_mut().zip(nibbles).enumerate() {
            *data = ((piece as u8) << 4) | nibble;
        }
        pieces
    }

    /// The universal real-time full-frame System Exclusive message for this position.
    pub fn full_frame(&self) -> [u8; 10] {
        [
            SystemCommand::SystemExclusiveStart.status(),
            universal::REALTIME,
            universal::ALL_CALL,
            universal::TIMECODE,
            universal::FULL_FRAME,
            (self.frame_rate.field() << 5) | (self.hours & 0x1F),
            self.minutes & 0x7F,
            self.seconds & 0x7F,
            self.frames & 0x7F,
            SYSEX_END,
        ]
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02} @ {}",
            self.hours, self.minutes, self.seconds, self.frames, self.frame_rate
        )
    }
}
