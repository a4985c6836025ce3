pub(crate) mod deferred;
pub mod observer;
pub mod timecode;

use observer::MidiObserver;
use timecode::Timecode;

/// A decoded MIDI message.
///
/// Channels are 1-based (1..=16). Controllers 120..=127 never appear as [`Event::ControlChange`];
/// they are decoded into the channel mode variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    NoteOff { channel: u8, note: u8 },
    NoteOn { channel: u8, note: u8, velocity: u8 },
    Aftertouch { channel: u8, note: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    /// 14-bit value, centre 8192.
    PitchBend { channel: u8, value: u16 },

    AllSoundOff,
    ResetAllControllers,
    LocalControl(bool),
    AllNotesOff,
    OmniMode(bool),
    MonoMode(bool),

    SystemExclusiveText(String),
    /// Song position in MIDI beats (sixteenth notes).
    SongPosition(u16),
    SongSelect(u8),
    TuneRequest,
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,

    Timecode(Timecode),
}

impl Event {
    /// Calls the observer method matching this event.
    pub fn notify<O: MidiObserver + ?Sized>(&self, observer: &O) {
        match self {
            Event::NoteOff { channel, note } => observer.note_off(*channel, *note),
            Event::NoteOn { channel, note, velocity } => observer.note_on(*channel, *note, *velocity),
            Event::Aftertouch { channel, note, pressure } => observer.aftertouch(*channel, *note, *pressure),
            Event::ControlChange { channel, controller, value } => observer.control_change(*channel, *controller, *value),
            Event::ProgramChange { channel, program } => observer.program_change(*channel, *program),
            Event::ChannelPressure { channel, pressure } => observer.channel_pressure(*channel, *pressure),
            Event::PitchBend { channel, value } => observer.pitch_bend(*channel, *value),
            Event::AllSoundOff => observer.all_sound_off(),
            Event::ResetAllControllers => observer.reset_all_controllers(),
            Event::LocalControl(on) => observer.local_control(*on),
            Event::AllNotesOff => observer.all_notes_off(),
            Event::OmniMode(on) => observer.omni_mode(*on),
            Event::MonoMode(on) => observer.mono_mode(*on),
            Event::SystemExclusiveText(text) => observer.system_exclusive(text),
            Event::SongPosition(beats) => observer.song_position(*beats),
            Event::SongSelect(song) => observer.song_select(*song),
            Event::TuneRequest => observer.tune_request(),
            Event::TimingClock => observer.timing_clock(),
            Event::Start => observer.start(),
            Event::Continue => observer.continue_playback(),
            Event::Stop => observer.stop(),
            Event::ActiveSensing => observer.active_sensing(),
            Event::Reset => observer.reset(),
            Event::Timecode(timecode) => observer.timecode(*timecode),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::events::observer::EventFn;
    use crate::events::timecode::FrameRate;

    #[test]
    fn test_notify_round_trips_through_event_fn() {
        let received = Mutex::new(Vec::new());
        let observer = EventFn(|event: Event| received.lock().unwrap().push(event));

        let events = vec![
            Event::NoteOff { channel: 1, note: 60 },
            Event::NoteOn {
                channel: 16,
                note: 61,
                velocity: 100,
            },
            Event::Aftertouch {
                channel: 2,
                note: 62,
                pressure: 3,
            },
            Event::ControlChange {
                channel: 3,
                controller: 7,
                value: 90,
            },
            Event::ProgramChange { channel: 4, program: 5 },
            Event::ChannelPressure { channel: 5, pressure: 6 },
            Event::PitchBend { channel: 6, value: 8192 },
            Event::AllSoundOff,
            Event::ResetAllControllers,
            Event::LocalControl(false),
            Event::AllNotesOff,
            Event::OmniMode(true),
            Event::MonoMode(false),
            Event::SystemExclusiveText("hello".to_string()),
            Event::SongPosition(300),
            Event::SongSelect(9),
            Event::TuneRequest,
            Event::TimingClock,
            Event::Start,
            Event::Continue,
            Event::Stop,
            Event::ActiveSensing,
            Event::Reset,
            Event::Timecode(Timecode::new(1, 2, 3, 4, FrameRate::Fps24)),
        ];

        for event in &events {
            event.notify(&observer);
        }

        assert_eq!(*received.lock().unwrap(), events);
    }
}
