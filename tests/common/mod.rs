use std::sync::Mutex;

use midiin::{Event, MidiObserver, Timecode};

/// Records every callback as the event it corresponds to.
#[derive(Default)]
pub struct RecordingObserver {
    pub packets: Mutex<Vec<Vec<u8>>>,
    pub events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn packet_count(&self) -> usize {
        self.packets.lock().unwrap().len()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl MidiObserver for RecordingObserver {
    fn packet_received(&self, bytes: &[u8]) {
        self.packets.lock().unwrap().push(bytes.to_vec());
    }
    fn note_off(&self, channel: u8, note: u8) {
        self.push(Event::NoteOff { channel, note });
    }
    fn note_on(&self, channel: u8, note: u8, velocity: u8) {
        self.push(Event::NoteOn { channel, note, velocity });
    }
    fn control_change(&self, channel: u8, controller: u8, value: u8) {
        self.push(Event::ControlChange { channel, controller, value });
    }
    fn pitch_bend(&self, channel: u8, value: u16) {
        self.push(Event::PitchBend { channel, value });
    }
    fn all_notes_off(&self) {
        self.push(Event::AllNotesOff);
    }
    fn local_control(&self, on: bool) {
        self.push(Event::LocalControl(on));
    }
    fn timecode(&self, timecode: Timecode) {
        self.push(Event::Timecode(timecode));
    }
    fn song_position(&self, beats: u16) {
        self.push(Event::SongPosition(beats));
    }
    fn start(&self) {
        self.push(Event::Start);
    }
    fn stop(&self) {
        self.push(Event::Stop);
    }
}
