use super::Event;
use super::timecode::Timecode;

/// Receives decoded MIDI events.
///
/// Every method has an empty default body, so implementors only override the events they
/// care about. Apart from [`MidiObserver::control_change`], which may be delivered from the
/// deferred delivery task, methods are called on the thread feeding the decoder, in packet order.
pub trait MidiObserver: Send + Sync {
    /// Called with every packet before it is decoded, including packets that produce no event.
    fn packet_received(&self, _packet: &[u8]) {}

    fn note_off(&self, _channel: u8, _note: u8) {}
    fn note_on(&self, _channel: u8, _note: u8, _velocity: u8) {}
    fn aftertouch(&self, _channel: u8, _note: u8, _pressure: u8) {}
    fn control_change(&self, _channel: u8, _controller: u8, _value: u8) {}
    fn program_change(&self, _channel: u8, _program: u8) {}
    fn channel_pressure(&self, _channel: u8, _pressure: u8) {}
    fn pitch_bend(&self, _channel: u8, _value: u16) {}

    fn all_sound_off(&self) {}
    fn reset_all_controllers(&self) {}
    fn local_control(&self, _on: bool) {}
    fn all_notes_off(&self) {}
    fn omni_mode(&self, _on: bool) {}
    fn mono_mode(&self, _on: bool) {}

    fn system_exclusive(&self, _text: &str) {}
    fn timecode(&self, _timecode: Timecode) {}
    fn song_position(&self, _beats: u16) {}
    fn song_select(&self, _song: u8) {}
    fn tune_request(&self) {}
    fn timing_clock(&self) {}
    fn start(&self) {}
    fn continue_playback(&self) {}
    fn stop(&self) {}
    fn active_sensing(&self) {}
    fn reset(&self) {}
}

/// Adapts a closure taking whole [`Event`]s into a [`MidiObserver`].
pub struct EventFn<F>(pub F);

impl<F> MidiObserver for EventFn<F>
where
    F: Fn(Event) + Send + Sync,
{
    fn note_off(&self, channel: u8, note: u8) {
        (self.0)(Event::NoteOff { channel, note })
    }

    fn note_on(&self, channel: u8, note: u8, velocity: u8) {
        (self.0)(Event::NoteOn { channel, note, velocity })
    }

    fn aftertouch(&self, channel: u8, note: u8, pressure: u8) {
        (self.0)(Event::Aftertouch { channel, note, pressure })
    }

    fn control_change(&self, channel: u8, controller: u8, value: u8) {
        (self.0)(Event::ControlChange { channel, controller, value })
    }

    fn program_change(&self, channel: u8, program: u8) {
        (self.0)(Event::ProgramChange { channel, program })
    }

    fn channel_pressure(&self, channel: u8, pressure: u8) {
        (self.0)(Event::ChannelPressure { channel, pressure })
    }

    fn pitch_bend(&self, channel: u8, value: u16) {
        (self.0)(Event::PitchBend { channel, value })
    }

    fn all_sound_off(&self) {
        (self.0)(Event::AllSoundOff)
    }

    fn reset_all_controllers(&self) {
        (self.0)(Event::ResetAllControllers)
    }

    fn local_control(&self, on: bool) {
        (self.0)(Event::LocalControl(on))
    }

    fn all_notes_off(&self) {
        (self.0)(Event::AllNotesOff)
    }

    fn omni_mode(&self, on: bool) {
        (self.0)(Event::OmniMode(on))
    }

    fn mono_mode(&self, on: bool) {
        (self.0)(Event::MonoMode(on))
    }

    fn system_exclusive(&self, text: &str) {
        (self.0)(Event::SystemExclusiveText(text.to_owned()))
    }

    fn timecode(&self, timecode: Timecode) {
        (self.0)(Event::Timecode(timecode))
    }

    fn song_position(&self, beats: u16) {
        (self.0)(Event::SongPosition(beats))
    }

    fn song_select(&self, song: u8) {
        (self.0)(Event::SongSelect(song))
    }

    fn tune_request(&self) {
        (self.0)(Event::TuneRequest)
    }

    fn timing_clock(&self) {
        (self.0)(Event::TimingClock)
    }

    fn start(&self) {
        (self.0)(Event::Start)
    }

    fn continue_playback(&self) {
        (self.0)(Event::Continue)
    }

    fn stop(&self) {
        (self.0)(Event::Stop)
    }

    fn active_sensing(&self) {
        (self.0)(Event::ActiveSensing)
    }

    fn reset(&self) {
        (self.0)(Event::Reset)
    }
}
