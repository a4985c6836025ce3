use super::timecode::TimecodeAssembler;
use crate::events::Event;
use crate::packets::error::DecodeError;
use crate::packets::raw_packet::RawPacket;
use crate::packets::status::{SystemCommand, universal};

/// Decodes a `0xFn` message, forwarding timecode messages to the assembler.
pub(super) fn route(packet: &RawPacket, timecode: &mut TimecodeAssembler) -> Result<Option<Event>, DecodeError> {
    let command = SystemCommand::from_nibble(packet.low_nibble()).ok_or(DecodeError::UnrecognizedSystemMessage(packet.status()))?;

    let event = match command {
        SystemCommand::SystemExclusiveStart => system_exclusive(packet, timecode)?,
        SystemCommand::TimecodeQuarterFrame => {
            let [data] = packet.data_bytes()?;
            return Ok(timecode.quarter_frame(data >> 4, data & 0x0F)?.map(Event::Timecode));
        }
        SystemCommand::SongPosition => {
            let [lsb, msb] = packet.data_bytes()?;
            Event::SongPosition(u16::from(msb) * 128 + u16::from(lsb))
        }
        SystemCommand::SongSelect => {
            let [song] = packet.data_bytes()?;
            Event::SongSelect(song)
        }
        SystemCommand::TuneRequest => Event::TuneRequest,
        // a terminator arriving on its own closes a message we never started decoding
        SystemCommand::SystemExclusiveEnd => return Ok(None),
        SystemCommand::TimingClock => Event::TimingClock,
        SystemCommand::Start => Event::Start,
        SystemCommand::Continue => Event::Continue,
        SystemCommand::Stop => Event::Stop,
        SystemCommand::ActiveSensing => Event::ActiveSensing,
        SystemCommand::Reset => Event::Reset,
    };
    Ok(Some(event))
}

/// Only the universal real-time MTC full-frame message is understood.
fn system_exclusive(packet: &RawPacket, timecode: &mut TimecodeAssembler) -> Result<Event, DecodeError> {
    let [id] = packet.data_bytes()?;
    let data = packet.data();
    let sub_ids = [data.get(2).copied().unwrap_or_default(), data.get(3).copied().unwrap_or_default()];
    if id != universal::REALTIME || sub_ids != [universal::TIMECODE, universal::FULL_FRAME] {
        return Err(DecodeError::UnrecognizedSysExProtocol { id, sub_ids });
    }

    let [_id, _device, _sub_id_1, _sub_id_2, rate_and_hours, minutes, seconds, frames] = packet.data_bytes()?;
    timecode.full_frame(rate_and_hours, minutes, seconds, frames).map(Event::Timecode)
}
