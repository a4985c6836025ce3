use thiserror::Error;

/// Reasons a packet is dropped without producing an event.
///
/// None of these are fatal: the decoder reports them and moves on to the next packet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Not enough data: expected {expected} bytes, got {actual}")]
    NotEnoughData { expected: usize, actual: usize },
    #[error("Data byte {byte:#04X} at index {index} has the status bit set")]
    InvalidDataByte { index: usize, byte: u8 },
    #[error("Unrecognized MIDI command in status byte {0:#04X}")]
    UnrecognizedCommand(u8),
    #[error("Unrecognized MIDI system message {0:#04X}")]
    UnrecognizedSystemMessage(u8),
    #[error("Unrecognized System Exclusive protocol (id {id:#04X}, sub-ids {sub_ids:02X?})")]
    UnrecognizedSysExProtocol { id: u8, sub_ids: [u8; 2] },
    #[error("Unrecognized quarter-frame piece {0}")]
    UnrecognizedQuarterFramePiece(u8),
    #[error("Unrecognized timecode frame rate field {0}")]
    UnrecognizedFrameRate(u8),
}

/// Reasons an outbound packet cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Status byte {0:#04X} does not have the status bit set")]
    InvalidStatusByte(u8),
    #[error("Data byte {0:#04X} does not fit in 7 bits")]
    InvalidDataByte(u8),
    #[error("Channel {0} is outside 1..=16")]
    InvalidChannel(u8),
    #[error("Value {0} does not fit in 14 bits")]
    InvalidValue14(u16),
    #[error("Event cannot be sent as a single short message: {0}")]
    Unsupported(&'static str),
}
