use crate::events::Event;
use crate::packets::error::DecodeError;
use crate::packets::raw_packet::RawPacket;
use crate::packets::status::{ChannelMode, Command, LOCAL_CONTROL_OFF, LOCAL_CONTROL_ON};

/// Decodes a channel voice message. `None` means the message is valid but carries no event.
///
/// System status bytes are not channel messages and are rejected.
pub(super) fn classify(command: Command, packet: &RawPacket) -> Result<Option<Event>, DecodeError> {
    let channel = packet.low_nibble() + 1;
    let event = match command {
        Command::NoteOff => {
            let [note, _velocity] = packet.data_bytes()?;
            Event::NoteOff { channel, note }
        }
        Command::NoteOn => {
            let [note, velocity] = packet.data_bytes()?;
            Event::NoteOn { channel, note, velocity }
        }
        Command::Aftertouch => {
            let [note, pressure] = packet.data_bytes()?;
            Event::Aftertouch { channel, note, pressure }
        }
        Command::ControlChange => {
            let [controller, value] = packet.data_bytes()?;
            return Ok(control_change(channel, controller, value));
        }
        Command::ProgramChange => {
            let [program] = packet.data_bytes()?;
            Event::ProgramChange { channel, program }
        }
        Command::ChannelPressure => {
            let [pressure] = packet.data_bytes()?;
            Event::ChannelPressure { channel, pressure }
        }
        Command::PitchBend => {
            let [lsb, msb] = packet.data_bytes()?;
            Event::PitchBend {
                channel,
                value: u16::from(msb) * 128 + u16::from(lsb),
            }
        }
        Command::System => return Err(DecodeError::UnrecognizedCommand(packet.status())),
    };
    Ok(Some(event))
}

fn control_change(channel: u8, controller: u8, value: u8) -> Option<Event> {
    let Some(mode) = ChannelMode::from_controller(controller) else {
        return Some(Event::ControlChange { channel, controller, value });
    };

    match mode {
        ChannelMode::AllSoundOff => Some(Event::AllSoundOff),
        ChannelMode::ResetAllControllers => Some(Event::ResetAllControllers),
        ChannelMode::LocalControl => match value {
            LOCAL_CONTROL_ON => Some(Event::LocalControl(true)),
            LOCAL_CONTROL_OFF => Some(Event::LocalControl(false)),
            _ => None,
        },
        ChannelMode::AllNotesOff => Some(Event::AllNotesOff),
        ChannelMode::OmniOff => Some(Event::OmniMode(false)),
        ChannelMode::OmniOn => Some(Event::OmniMode(true)),
        ChannelMode::MonoOn => Some(Event::MonoMode(true)),
        ChannelMode::MonoOff => Some(Event::MonoMode(false)),
    }
}
