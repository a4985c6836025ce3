use bytes::{BufMut, BytesMut};
use midi_types::{MidiMessage, status};

use super::error::EncodeError;
use super::raw_packet::StatusBit;
use super::status::{ChannelMode, Command, SystemCommand};
use crate::events::Event;

/// A short MIDI message ready for transmission: `[status, data1, data2]`.
///
/// Messages with fewer than two data bytes leave the tail of the buffer zeroed;
/// [`OutboundPacket::as_bytes`] only returns the bytes the message uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutboundPacket {
    buffer: [u8; 3],
    len: usize,
}

/// Accepts constructed packets for transmission.
pub trait PacketSink {
    fn send(&mut self, packet: &OutboundPacket) -> std::io::Result<()>;
}

impl PacketSink for BytesMut {
    fn send(&mut self, packet: &OutboundPacket) -> std::io::Result<()> {
        packet.write(self);
        Ok(())
    }
}

impl OutboundPacket {
    pub const MAX_LEN: usize = 3;

    /// Builds a packet from raw fields. The message length follows from the status byte; System Exclusive
    /// and undefined system status bytes are rejected.
    pub fn new(status: u8, data1: u8, data2: u8) -> Result<Self, EncodeError> {
        if !status.status_bit() {
            return Err(EncodeError::InvalidStatusByte(status));
        }
        let len = Self::message_len(status)?;
        let mut buffer = [status, 0, 0];
        for (slot, byte) in buffer[1..len].iter_mut().zip([data1, data2]) {
            if byte.status_bit() {
                return Err(EncodeError::InvalidDataByte(byte));
            }
            *slot = byte;
        }
        Ok(OutboundPacket { buffer, len })
    }

    /// A channel mode message on a 1-based channel.
    pub fn channel_mode(channel: u8, mode: ChannelMode, value: u8) -> Result<Self, EncodeError> {
        Self::new(Command::ControlChange.status(channel_index(channel)?), mode as u8, value)
    }

    fn message_len(status: u8) -> Result<usize, EncodeError> {
        match Command::from_nibble(status >> 4) {
            Some(Command::System) => match SystemCommand::from_nibble(status & 0x0F) {
                Some(SystemCommand::SongPosition) => Ok(3),
                Some(SystemCommand::TimecodeQuarterFrame | SystemCommand::SongSelect) => Ok(2),
                Some(SystemCommand::SystemExclusiveStart | SystemCommand::SystemExclusiveEnd) => Err(EncodeError::Unsupported("System Exclusive")),
                Some(_) => Ok(1),
                None => Err(EncodeError::Unsupported("undefined system message")),
            },
            Some(command) => Ok(1 + command.data_len()),
            None => Err(EncodeError::InvalidStatusByte(status)),
        }
    }

    pub fn status(&self) -> u8 {
        self.buffer[0]
    }

    /// The full three-byte buffer, zero padded.
    pub fn buffer(&self) -> [u8; 3] {
        self.buffer
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    pub fn write(&self, bytes: &mut BytesMut) {
        bytes.put_slice(self.as_bytes());
    }
}

fn channel_index(channel: u8) -> Result<u8, EncodeError> {
    match channel {
        1..=16 => Ok(channel - 1),
        _ => Err(EncodeError::InvalidChannel(channel)),
    }
}

fn split_value14(value: u16) -> Result<(u8, u8), EncodeError> {
    if value > 0x3FFF {
        return Err(EncodeError::InvalidValue14(value));
    }
    Ok(((value & 0x7F) as u8, (value >> 7) as u8))
}

impl TryFrom<&Event> for OutboundPacket {
    type Error = EncodeError;

    fn try_from(event: &Event) -> Result<Self, Self::Error> {
        let channel_status = |command: Command, channel: u8| channel_index(channel).map(|index| command.status(index));
        match *event {
            Event::NoteOff { channel, note } => Self::new(channel_status(Command::NoteOff, channel)?, note, 0),
            Event::NoteOn { channel, note, velocity } => Self::new(channel_status(Command::NoteOn, channel)?, note, velocity),
            Event::Aftertouch { channel, note, pressure } => Self::new(channel_status(Command::Aftertouch, channel)?, note, pressure),
            Event::ControlChange { channel, controller, value } => Self::new(channel_status(Command::ControlChange, channel)?, controller, value),
            Event::ProgramChange { channel, program } => Self::new(channel_status(Command::ProgramChange, channel)?, program, 0),
            Event::ChannelPressure { channel, pressure } => Self::new(channel_status(Command::ChannelPressure, channel)?, pressure, 0),
            Event::PitchBend { channel, value } => {
                let (lsb, msb) = split_value14(value)?;
                Self::new(channel_status(Command::PitchBend, channel)?, lsb, msb)
            }
            Event::SongPosition(beats) => {
                let (lsb, msb) = split_value14(beats)?;
                Self::new(SystemCommand::SongPosition.status(), lsb, msb)
            }
            Event::SongSelect(song) => Self::new(SystemCommand::SongSelect.status(), song, 0),
            Event::TuneRequest => Self::new(SystemCommand::TuneRequest.status(), 0, 0),
            Event::TimingClock => Self::new(SystemCommand::TimingClock.status(), 0, 0),
            Event::Start => Self::new(SystemCommand::Start.status(), 0, 0),
            Event::Continue => Self::new(SystemCommand::Continue.status(), 0, 0),
            Event::Stop => Self::new(SystemCommand::Stop.status(), 0, 0),
            Event::ActiveSensing => Self::new(SystemCommand::ActiveSensing.status(), 0, 0),
            Event::Reset => Self::new(SystemCommand::Reset.status(), 0, 0),
            Event::AllSoundOff
            | Event::ResetAllControllers
            | Event::LocalControl(_)
            | Event::AllNotesOff
            | Event::OmniMode(_)
            | Event::MonoMode(_) => Err(EncodeError::Unsupported("channel mode events carry no channel, use OutboundPacket::channel_mode")),
            Event::SystemExclusiveText(_) => Err(EncodeError::Unsupported("System Exclusive")),
            Event::Timecode(_) => Err(EncodeError::Unsupported("timecode spans several messages")),
        }
    }
}

impl From<MidiMessage> for OutboundPacket {
    fn from(message: MidiMessage) -> Self {
        let (buffer, len) = match message {
            MidiMessage::NoteOff(channel, note, velocity) => ([status::NOTE_OFF | u8::from(channel), note.into(), velocity.into()], 3),
            MidiMessage::NoteOn(channel, note, velocity) => ([status::NOTE_ON | u8::from(channel), note.into(), velocity.into()], 3),
            MidiMessage::KeyPressure(channel, note, pressure) => ([status::KEY_PRESSURE | u8::from(channel), note.into(), pressure.into()], 3),
            MidiMessage::ControlChange(channel, control, value) => ([status::CONTROL_CHANGE | u8::from(channel), control.into(), value.into()], 3),
            MidiMessage::ProgramChange(channel, program) => ([status::PROGRAM_CHANGE | u8::from(channel), program.into(), 0], 2),
            MidiMessage::ChannelPressure(channel, pressure) => ([status::CHANNEL_PRESSURE | u8::from(channel), pressure.into(), 0], 2),
            MidiMessage::PitchBendChange(channel, value) => {
                let raw: u16 = value.into();
                ([status::PITCH_BEND_CHANGE | u8::from(channel), (raw & 0x7F) as u8, (raw >> 7) as u8], 3)
            }
            MidiMessage::QuarterFrame(frame) => ([status::QUARTER_FRAME, frame.into(), 0], 2),
            MidiMessage::SongPositionPointer(position) => {
                let raw: u16 = position.into();
                ([status::SONG_POSITION_POINTER, (raw & 0x7F) as u8, (raw >> 7) as u8], 3)
            }
            MidiMessage::SongSelect(song) => ([status::SONG_SELECT, song.into(), 0], 2),
            MidiMessage::TuneRequest => ([status::TUNE_REQUEST, 0, 0], 1),
            MidiMessage::TimingClock => ([status::TIMING_CLOCK, 0, 0], 1),
            MidiMessage::Start => ([status::START, 0, 0], 1),
            MidiMessage::Continue => ([status::CONTINUE, 0, 0], 1),
            MidiMessage::Stop => ([status::STOP, 0, 0], 1),
            MidiMessage::ActiveSensing => ([status::ACTIVE_SENSING, 0, 0], 1),
            MidiMessage::Reset => ([status::RESET, 0, 0], 1),
        };
        OutboundPacket { buffer, len }
    }
}

#[cfg(test)]
mod tests {
    use midi_types::{Channel, Note, Value7, Value14};

    use super::*;

    #[test]
    fn test_new_validates_field_widths() {
        assert_eq!(OutboundPacket::new(0x40, 0, 0), Err(EncodeError::InvalidStatusByte(0x40)));
        assert_eq!(OutboundPacket::new(0x90, 0x80, 0), Err(EncodeError::InvalidDataByte(0x80)));
        assert_eq!(OutboundPacket::new(0xF0, 0x7F, 0x7F), Err(EncodeError::Unsupported("System Exclusive")));
    }

    #[test]
    fn test_new_ignores_unused_data_bytes() {
        let packet = OutboundPacket::new(0xF8, 0xFF, 0xFF).unwrap();
        assert_eq!(packet.as_bytes(), &[0xF8]);
        assert_eq!(packet.buffer(), [0xF8, 0, 0]);

        let packet = OutboundPacket::new(0xC3, 0x05, 0x99).unwrap();
        assert_eq!(packet.as_bytes(), &[0xC3, 0x05]);
    }

    #[test]
    fn test_from_events() {
        let note_on = Event::NoteOn {
            channel: 5,
            note: 0x40,
            velocity: 0x7F,
        };
        assert_eq!(OutboundPacket::try_from(&note_on).unwrap().as_bytes(), &[0x94, 0x40, 0x7F]);

        let bend = Event::PitchBend { channel: 1, value: 8192 };
        assert_eq!(OutboundPacket::try_from(&bend).unwrap().as_bytes(), &[0xE0, 0x00, 0x40]);

        let position = Event::SongPosition(272);
        assert_eq!(OutboundPacket::try_from(&position).unwrap().as_bytes(), &[0xF2, 0x10, 0x02]);

        assert_eq!(OutboundPacket::try_from(&Event::Stop).unwrap().as_bytes(), &[0xFC]);
    }

    #[test]
    fn test_from_invalid_events() {
        let bad_channel = Event::ProgramChange { channel: 0, program: 1 };
        assert_eq!(OutboundPacket::try_from(&bad_channel), Err(EncodeError::InvalidChannel(0)));

        let bad_bend = Event::PitchBend { channel: 1, value: 0x4000 };
        assert_eq!(OutboundPacket::try_from(&bad_bend), Err(EncodeError::InvalidValue14(0x4000)));

        assert!(matches!(OutboundPacket::try_from(&Event::AllNotesOff), Err(EncodeError::Unsupported(_))));
    }

    #[test]
    fn test_channel_mode() {
        let packet = OutboundPacket::channel_mode(16, ChannelMode::LocalControl, 127).unwrap();
        assert_eq!(packet.as_bytes(), &[0xBF, 122, 127]);
        assert_eq!(OutboundPacket::channel_mode(17, ChannelMode::AllNotesOff, 0), Err(EncodeError::InvalidChannel(17)));
    }

    #[test]
    fn test_from_midi_message() {
        let packet = OutboundPacket::from(MidiMessage::NoteOn(Channel::from(4), Note::from(0x40), Value7::from(0x7F)));
        assert_eq!(packet.as_bytes(), &[0x94, 0x40, 0x7F]);

        let packet = OutboundPacket::from(MidiMessage::PitchBendChange(Channel::from(0), Value14::from(8192u16)));
        assert_eq!(packet.as_bytes(), &[0xE0, 0x00, 0x40]);

        let packet = OutboundPacket::from(MidiMessage::TimingClock);
        assert_eq!(packet.as_bytes(), &[0xF8]);
    }

    #[test]
    fn test_send_to_bytes_mut() {
        let mut sink = BytesMut::new();
        for event in [Event::Start, Event::NoteOff { channel: 1, note: 60 }] {
            sink.send(&OutboundPacket::try_from(&event).unwrap()).unwrap();
        }
        assert_eq!(&sink[..], &[0xFA, 0x80, 60, 0]);
    }
}
