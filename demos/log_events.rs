#[cfg(feature = "examples")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use midiin::{ControlChangeDelivery, DecoderConfig, Event, EventFn, FrameRate, MidiDecoder, OutboundPacket, PacketListBuilder, Timecode};
    use tracing::{Level, event};
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry().with(fmt::layer()).with(EnvFilter::from_default_env()).init();

    let observer = Arc::new(EventFn(|decoded: Event| {
        event!(Level::INFO, "Received event: {:?}", decoded);
    }));
    let config = DecoderConfig {
        control_change_delivery: ControlChangeDelivery::deferred(),
    };
    let mut decoder = MidiDecoder::with_config(observer, config)?;

    let performance = [
        Event::Start,
        Event::NoteOn {
            channel: 1,
            note: 60,
            velocity: 100,
        },
        Event::ControlChange {
            channel: 1,
            controller: 7,
            value: 90,
        },
        Event::PitchBend { channel: 1, value: 10000 },
        Event::NoteOff { channel: 1, note: 60 },
        Event::Stop,
    ];
    let mut list = PacketListBuilder::new();
    for (timestamp, performed) in performance.iter().enumerate() {
        list.push(timestamp as u64 * 1000, OutboundPacket::try_from(performed)?.as_bytes())?;
    }
    let processed = decoder.process_packet_list(&list.build())?;
    event!(Level::INFO, processed, "Processed packet list");

    let locate = Timecode::new(1, 0, 0, 0, FrameRate::Fps25);
    decoder.process_packet(&locate.full_frame());
    for data in locate.quarter_frames() {
        decoder.process_packet(&[0xF1, data]);
    }
    event!(Level::INFO, "Timecode after one quarter-frame cycle: {}", decoder.timecode());

    // unrecognized SysEx is logged and counted
    decoder.process_packet(&[0xF0, 0x43, 0x10, 0x4C, 0xF7]);

    let stats = decoder.stats();
    decoder.close().await;
    event!(Level::INFO, ?stats, "Decoder closed");
    Ok(())
}

#[cfg(not(feature = "examples"))]
fn main() {
    println!("This example requires the 'examples' feature to be enabled.");
}
