//! Bit patterns of the MIDI 1.0 status byte, the system sub-commands, the universal
//! System Exclusive IDs used for MIDI Time Code, and the channel mode controllers.

/// High nibble of a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    NoteOff = 0x8,
    NoteOn = 0x9,
    Aftertouch = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelPressure = 0xD,
    PitchBend = 0xE,
    System = 0xF,
}

impl Command {
    /// Maps a command nibble to its command, `None` for the data range 0x0..=0x7.
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x8 => Some(Command::NoteOff),
            0x9 => Some(Command::NoteOn),
            0xA => Some(Command::Aftertouch),
            0xB => Some(Command::ControlChange),
            0xC => Some(Command::ProgramChange),
            0xD => Some(Command::ChannelPressure),
            0xE => Some(Command::PitchBend),
            0xF => Some(Command::System),
            _ => None,
        }
    }

    /// Number of data bytes following the status byte. System messages vary and report 0 here.
    pub const fn data_len(self) -> usize {
        match self {
            Command::ProgramChange | Command::ChannelPressure => 1,
            Command::System => 0,
            _ => 2,
        }
    }

    /// Status byte for this command on a 0-based channel.
    pub const fn status(self, channel_index: u8) -> u8 {
        ((self as u8) << 4) | (channel_index & 0x0F)
    }
}

/// Low nibble of a `0xFn` status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SystemCommand {
    SystemExclusiveStart = 0x0,
    TimecodeQuarterFrame = 0x1,
    SongPosition = 0x2,
    SongSelect = 0x3,
    TuneRequest = 0x6,
    SystemExclusiveEnd = 0x7,
    TimingClock = 0x8,
    Start = 0xA,
    Continue = 0xB,
    Stop = 0xC,
    ActiveSensing = 0xE,
    Reset = 0xF,
}

impl SystemCommand {
    pub const fn from_nibble(nibble: u8) -> Option<Self> {
        match nibble {
            0x0 => Some(SystemCommand::SystemExclusiveStart),
            0x1 => Some(SystemCommand::TimecodeQuarterFrame),
            0x2 => Some(SystemCommand::SongPosition),
            0x3 => Some(SystemCommand::SongSelect),
            0x6 => Some(SystemCommand::TuneRequest),
            0x7 => Some(SystemCommand::SystemExclusiveEnd),
            0x8 => Some(SystemCommand::TimingClock),
            0xA => Some(SystemCommand::Start),
            0xB => Some(SystemCommand::Continue),
            0xC => Some(SystemCommand::Stop),
            0xE => Some(SystemCommand::ActiveSensing),
            0xF => Some(SystemCommand::Reset),
            _ => None,
        }
    }

    pub const fn status(self) -> u8 {
        0xF0 | self as u8
    }
}

/// Terminator of a System Exclusive message.
pub const SYSEX_END: u8 = 0xF7;

/// Universal System Exclusive IDs.
pub mod universal {
    pub const NON_COMMERCIAL: u8 = 0x7D;
    pub const NON_REALTIME: u8 = 0x7E;
    pub const REALTIME: u8 = 0x7F;

    /// Device ID addressing every device on the bus.
    pub const ALL_CALL: u8 = 0x7F;

    /// Sub-ID #1 of MIDI Time Code messages.
    pub const TIMECODE: u8 = 0x01;
    /// Sub-ID #2 of the MTC full-frame message.
    pub const FULL_FRAME: u8 = 0x01;
}

/// Reserved controller numbers that carry channel mode messages instead of a controller value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelMode {
    AllSoundOff = 120,
    ResetAllControllers = 121,
    LocalControl = 122,
    AllNotesOff = 123,
    OmniOff = 124,
    OmniOn = 125,
    MonoOn = 126,
    MonoOff = 127,
}

impl ChannelMode {
    /// First controller number of the channel mode range.
    pub const FIRST: u8 = ChannelMode::AllSoundOff as u8;

    pub const fn from_controller(controller: u8) -> Option<Self> {
        match controller {
            120 => Some(ChannelMode::AllSoundOff),
            121 => Some(ChannelMode::ResetAllControllers),
            122 => Some(ChannelMode::LocalControl),
            123 => Some(ChannelMode::AllNotesOff),
            124 => Some(ChannelMode::OmniOff),
            125 => Some(ChannelMode::OmniOn),
            126 => Some(ChannelMode::MonoOn),
            127 => Some(ChannelMode::MonoOff),
            _ => None,
        }
    }
}

/// Local control values; anything else on controller 122 is ignored.
pub const LOCAL_CONTROL_ON: u8 = 127;
pub const LOCAL_CONTROL_OFF: u8 = 0;
