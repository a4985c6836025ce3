mod channel;
mod system;
pub mod timecode;

use std::sync::Arc;

use thiserror::Error;
use tracing::{Level, event, instrument};

use crate::events::Event;
use crate::events::deferred::{ControlChange, DeferredDelivery};
use crate::events::observer::MidiObserver;
use crate::events::timecode::Timecode;
use crate::packets::error::DecodeError;
use crate::packets::packet_list::PacketList;
use crate::packets::raw_packet::RawPacket;
use crate::packets::status::Command;
use timecode::TimecodeAssembler;

/// Queue capacity used by [`ControlChangeDelivery::deferred`].
pub const DEFAULT_DEFERRED_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Deferred delivery needs a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
    #[error("Deferred delivery queue capacity must be at least 1")]
    ZeroCapacity,
}

/// How generic control change events reach the observer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ControlChangeDelivery {
    /// Delivered on the decoding thread, in packet order with every other event.
    #[default]
    Inline,
    /// Queued and delivered from a tokio task. Events arriving while the queue is full are dropped.
    Deferred { capacity: usize },
}

impl ControlChangeDelivery {
    pub fn deferred() -> Self {
        ControlChangeDelivery::Deferred {
            capacity: DEFAULT_DEFERRED_CAPACITY,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub control_change_delivery: ControlChangeDelivery,
}

/// Counters of processed packets, delivered events and dropped packets by reason.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    pub packets: u64,
    pub events: u64,
    pub malformed: u64,
    pub unrecognized_command: u64,
    pub unrecognized_system_message: u64,
    pub unrecognized_sysex: u64,
    pub unrecognized_frame_rate: u64,
    pub deferred_dropped: u64,
}

impl DecodeStats {
    fn record_error(&mut self, error: &DecodeError) {
        let counter = match error {
            DecodeError::NotEnoughData { .. } | DecodeError::InvalidDataByte { .. } | DecodeError::UnrecognizedQuarterFramePiece(_) => {
                &mut self.malformed
            }
            DecodeError::UnrecognizedCommand(_) => &mut self.unrecognized_command,
            DecodeError::UnrecognizedSystemMessage(_) => &mut self.unrecognized_system_message,
            DecodeError::UnrecognizedSysExProtocol { .. } => &mut self.unrecognized_sysex,
            DecodeError::UnrecognizedFrameRate(_) => &mut self.unrecognized_frame_rate,
        };
        *counter += 1;
    }

    /// Packets dropped because of a [`DecodeError`].
    pub fn dropped(&self) -> u64 {
        self.malformed + self.unrecognized_command + self.unrecognized_system_message + self.unrecognized_sysex + self.unrecognized_frame_rate
    }
}

/// Decodes a MIDI input stream and delivers the resulting events to an observer.
///
/// The decoder is the single writer of its timecode state: feed it from one thread, in arrival
/// order. Decoding never blocks, and a packet that cannot be decoded is logged, counted and skipped.
pub struct MidiDecoder<O: MidiObserver + ?Sized + 'static> {
    observer: Arc<O>,
    timecode: TimecodeAssembler,
    deferred: Option<DeferredDelivery>,
    stats: DecodeStats,
}

impl<O: MidiObserver + ?Sized + 'static> MidiDecoder<O> {
    /// A decoder delivering every event inline.
    pub fn new(observer: Arc<O>) -> Self {
        MidiDecoder {
            observer,
            timecode: TimecodeAssembler::new(),
            deferred: None,
            stats: DecodeStats::default(),
        }
    }

    /// Deferred delivery spawns its worker on the current tokio runtime.
    pub fn with_config(observer: Arc<O>, config: DecoderConfig) -> Result<Self, SetupError> {
        let deferred = match config.control_change_delivery {
            ControlChangeDelivery::Inline => None,
            ControlChangeDelivery::Deferred { capacity } => Some(DeferredDelivery::spawn(observer.clone(), capacity)?),
        };
        Ok(MidiDecoder {
            deferred,
            ..Self::new(observer)
        })
    }

    pub fn observer(&self) -> &Arc<O> {
        &self.observer
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    /// The timecode assembled so far, whether or not it has been published.
    pub fn timecode(&self) -> Timecode {
        self.timecode.current()
    }

    pub fn reset_timecode(&mut self) {
        self.timecode.reset();
    }

    /// Classifies one packet, updating the timecode state, without notifying the observer.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Option<Event>, DecodeError> {
        let packet = RawPacket::new(bytes)?;
        let command = Command::from_nibble(packet.command_nibble()).ok_or(DecodeError::UnrecognizedCommand(packet.status()))?;
        match command {
            Command::System => system::route(&packet, &mut self.timecode),
            _ => channel::classify(command, &packet),
        }
    }

    /// Decodes one packet and delivers its event, if any.
    pub fn process_packet(&mut self, bytes: &[u8]) {
        self.stats.packets += 1;
        self.observer.packet_received(bytes);

        match self.decode(bytes) {
            Ok(Some(event)) => self.deliver(event),
            Ok(None) => event!(Level::TRACE, packet = ?bytes, "Packet produced no event"),
            Err(e) => {
                self.stats.record_error(&e);
                event!(Level::WARN, packet = ?bytes, "Dropping MIDI packet: {}", e);
            }
        }
    }

    /// Processes a batch of packets in order.
    #[instrument(level = "trace", skip_all)]
    pub fn process_batch<'a, I>(&mut self, packets: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        for packet in packets {
            self.process_packet(packet);
        }
    }

    /// Processes a packed packet list, returning the number of packets processed.
    #[instrument(level = "trace", skip_all, fields(len = data.len()))]
    pub fn process_packet_list(&mut self, data: &[u8]) -> std::io::Result<usize> {
        let list = PacketList::new(data).inspect_err(|e| event!(Level::ERROR, "Failed to parse packet list: {}", e))?;
        let mut processed = 0;
        for packet in list.packets() {
            event!(Level::TRACE, timestamp = packet.timestamp, "Processing packet");
            self.process_packet(packet.bytes);
            processed += 1;
        }
        if processed < list.len() {
            event!(Level::ERROR, processed, announced = list.len(), "Packet list ended early");
        }
        Ok(processed)
    }

    /// Stops deferred delivery after every queued control change has reached the observer.
    pub async fn close(self) {
        if let Some(deferred) = self.deferred {
            deferred.close().await;
        }
    }

    fn deliver(&mut self, event: Event) {
        event!(Level::TRACE, ?event, "Decoded event");
        if let (Event::ControlChange { channel, controller, value }, Some(deferred)) = (&event, &self.deferred) {
            let change = ControlChange {
                channel: *channel,
                controller: *controller,
                value: *value,
            };
            if deferred.enqueue(change) {
                self.stats.events += 1;
            } else {
                self.stats.deferred_dropped += 1;
            }
            return;
        }

        self.stats.events += 1;
        event.notify(self.observer.as_ref());
    }
}
