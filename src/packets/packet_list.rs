use bytes::{BufMut, Bytes, BytesMut};
use tracing::{Level, event};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    little_endian::{U16, U32, U64},
};

/// Leading header of a packed packet list.
#[derive(Debug, KnownLayout, IntoBytes, Immutable, FromBytes, Unaligned)]
#[repr(C, packed)]
pub struct PacketListHeader {
    pub num_packets: U32,
}

/// Header preceding the bytes of every packet in the list.
#[derive(Debug, KnownLayout, IntoBytes, Immutable, FromBytes, Unaligned)]
#[repr(C, packed)]
pub struct TimedPacketHeader {
    pub timestamp: U64,
    pub length: U16,
}

/// A packet together with the host timestamp it was received at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedPacket<'a> {
    pub timestamp: u64,
    pub bytes: &'a [u8],
}

/// A batch of packets in arrival order, as handed over by the host in one callback.
#[derive(Debug)]
pub struct PacketList<'a> {
    header: &'a PacketListHeader,
    body: &'a [u8],
}

impl<'a> PacketList<'a> {
    pub fn new(data: &'a [u8]) -> std::io::Result<Self> {
        let (header, body) = PacketListHeader::ref_from_prefix(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, format!("Failed to parse packet list header: {e}")))?;

        Ok(Self { header, body })
    }

    /// Number of packets announced by the header.
    pub fn len(&self) -> usize {
        self.header.num_packets.get() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn packets(&self) -> PacketListIterator<'a> {
        PacketListIterator {
            data: self.body,
            remaining: self.len(),
        }
    }
}

/// Yields the packets of a [`PacketList`], stopping early at the first truncated packet.
#[derive(Debug)]
pub struct PacketListIterator<'a> {
    data: &'a [u8],
    remaining: usize,
}

impl<'a> Iterator for PacketListIterator<'a> {
    type Item = TimedPacket<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let Ok((header, rest)) = TimedPacketHeader::ref_from_prefix(self.data) else {
            event!(Level::ERROR, remaining = self.remaining, "Packet list truncated inside a packet header");
            self.remaining = 0;
            return None;
        };

        let length = header.length.get() as usize;
        if rest.len() < length {
            event!(Level::ERROR, length, available = rest.len(), "Packet list truncated inside packet data");
            self.remaining = 0;
            return None;
        }

        let (bytes, rest) = rest.split_at(length);
        self.data = rest;
        self.remaining -= 1;
        Some(TimedPacket {
            timestamp: header.timestamp.get(),
            bytes,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Builds the packed representation read by [`PacketList`].
#[derive(Debug, Default)]
pub struct PacketListBuilder {
    body: BytesMut,
    count: u32,
}

impl PacketListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: u64, bytes: &[u8]) -> std::io::Result<&mut Self> {
        let length = u16::try_from(bytes.len())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Packet of {} bytes is too long", bytes.len())))?;
        let header = TimedPacketHeader {
            timestamp: U64::new(timestamp),
            length: U16::new(length),
        };
        self.body.put_slice(header.as_bytes());
        self.body.put_slice(bytes);
        self.count += 1;
        Ok(self)
    }

    pub fn build(&self) -> Bytes {
        let header = PacketListHeader {
            num_packets: U32::new(self.count),
        };
        let mut buffer = BytesMut::with_capacity(size_of::<PacketListHeader>() + self.body.len());
        buffer.put_slice(header.as_bytes());
        buffer.put_slice(&self.body);
        buffer.freeze()
    }
}
