use super::error::DecodeError;
use super::status::{SYSEX_END, SystemCommand};

pub(crate) trait StatusBit {
    fn status_bit(&self) -> bool;
}

impl StatusBit for u8 {
    fn status_bit(&self) -> bool {
        self & 0x80 != 0
    }
}

/// One MIDI message as delivered by the host: a status byte followed by its data bytes.
///
/// Construction only checks field widths. A System Exclusive packet may carry its `0xF7`
/// terminator, which is excluded from [`RawPacket::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket<'a> {
    bytes: &'a [u8],
    data: &'a [u8],
}

impl<'a> RawPacket<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let Some((&status, rest)) = bytes.split_first() else {
            return Err(DecodeError::NotEnoughData { expected: 1, actual: 0 });
        };

        let data = match rest.split_last() {
            Some((&SYSEX_END, body)) if status == SystemCommand::SystemExclusiveStart.status() => body,
            _ => rest,
        };

        if let Some(index) = data.iter().position(StatusBit::status_bit) {
            return Err(DecodeError::InvalidDataByte {
                index: index + 1,
                byte: data[index],
            });
        }

        Ok(RawPacket { bytes, data })
    }

    pub fn status(&self) -> u8 {
        self.bytes[0]
    }

    /// Bits 7..4 of the status byte.
    pub fn command_nibble(&self) -> u8 {
        self.status() >> 4
    }

    /// Bits 3..0 of the status byte: the channel index or the system sub-command.
    pub fn low_nibble(&self) -> u8 {
        self.status() & 0x0F
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The first `N` data bytes, or [`DecodeError::NotEnoughData`] when the packet is shorter.
    pub fn data_bytes<const N: usize>(&self) -> Result<[u8; N], DecodeError> {
        self.data
            .get(..N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(DecodeError::NotEnoughData {
                expected: N + 1,
                actual: 1 + self.data.len(),
            })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
