//! Rust library for decoding an incoming MIDI 1.0 byte stream into typed events.
//!
//! Raw packets (one status byte followed by its data bytes) are classified into channel voice
//! messages, channel mode messages, system common and real-time messages. MIDI Time Code arriving
//! as quarter-frame or full-frame messages is assembled into a running [`Timecode`].
//! Decoded events are delivered to a [`MidiObserver`].
//!
//! # Features
//! - **Observer callbacks**: Implement only the [`MidiObserver`] methods you care about, or wrap a closure in [`EventFn`].
//! - **Timecode**: Quarter-frame reassembly with frame rollover, and full-frame locate messages.
//! - **Deferred control changes**: Generic control change events can be handed to a `tokio` task
//!   through a bounded queue, so a slow observer never blocks decoding.
//! - **Packet lists**: Batches of timestamped packets are decoded in arrival order.
//! - **Outbound packets**: Events can be turned back into wire bytes with [`OutboundPacket`].
//!
//! ## Unsupported Features
//! - **Running status**: Every packet must carry its own status byte.
//! - **System Exclusive payloads**: Only the MTC full-frame message is understood; other SysEx is reported and dropped.
pub mod decoder;
pub mod events;
pub mod packets;

pub use decoder::{ControlChangeDelivery, DecodeStats, DecoderConfig, MidiDecoder, SetupError};
pub use events::Event;
pub use events::observer::{EventFn, MidiObserver};
pub use events::timecode::{FrameRate, Timecode};
pub use packets::error::{DecodeError, EncodeError};
pub use packets::outbound::{OutboundPacket, PacketSink};
pub use packets::packet_list::{PacketList, PacketListBuilder, TimedPacket};
