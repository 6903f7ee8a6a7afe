//! Plain-text queue rendering

use cadence_core::Song;
use cadence_playback::{format_time, RepeatMode, Session};

/// Snapshot of what the user sees
#[derive(Debug, Clone, PartialEq)]
pub struct QueueView {
    pub songs: Vec<Song>,
    pub current_index: Option<usize>,
    pub repeat: RepeatMode,
    pub shuffled: bool,
    pub has_next: bool,
    pub has_previous: bool,
    pub position: f64,
}

impl QueueView {
    pub fn from_session(session: &Session) -> Self {
        let queue = session.queue();
        let state = session.state();
        Self {
            songs: queue.songs().to_vec(),
            current_index: queue.current_index(),
            repeat: queue.repeat_mode(),
            shuffled: queue.is_shuffled(),
            has_next: queue.has_next(),
            has_previous: queue.has_previous(),
            position: state.current_time(),
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "repeat: {}  shuffle: {}  previous: {}  next: {}",
            self.repeat,
            if self.shuffled { "on" } else { "off" },
            yes_no(self.has_previous),
            yes_no(self.has_next),
        )];

        if let Some(song) = self.current_index.and_then(|i| self.songs.get(i)) {
            lines.push(format!(
                "now: {} - {} [{} / {}]",
                song.artist,
                song.title,
                format_time(self.position),
                song.duration
            ));
        }

        if self.songs.is_empty() {
            lines.push("(queue is empty)".to_string());
        }

        lines.extend(self.songs.iter().enumerate().map(|(i, song)| {
            let marker = if Some(i) == self.current_index { '>' } else { ' ' };
            format!(
                "{} {:>3}. {} - {} ({})",
                marker, i, song.artist, song.title, song.duration
            )
        }));

        lines.join("\n")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::PlaybackConfig;

    #[test]
    fn empty_queue() {
        let session = Session::new(PlaybackConfig::default());
        let text = QueueView::from_session(&session).render();

        assert!(text.starts_with("repeat: off  shuffle: off"));
        assert!(text.ends_with("(queue is empty)"));
    }

    #[test]
    fn marks_current_entry() {
        let mut session = Session::new(PlaybackConfig::default());
        session.set_queue(
            vec![
                Song::new(1, "A", "X", "3:00", "a.mp3"),
                Song::new(2, "B", "Y", "4:10", "b.mp3"),
            ],
            1,
        );

        let text = QueueView::from_session(&session).render();
        assert!(text.contains("now: Y - B [0:00 / 4:10]"));
        assert!(text.contains("    0. X - A (3:00)"));
        assert!(text.contains(">   1. Y - B (4:10)"));
        assert!(text.contains("previous: yes  next: no"));
    }

    #[test]
    fn one_line_per_entry() {
        let mut session = Session::new(PlaybackConfig::default());
        session.set_queue(
            vec![
                Song::new(1, "A", "X", "3:00", "a.mp3"),
                Song::new(2, "B", "Y", "4:10", "b.mp3"),
            ],
            0,
        );

        let text = QueueView::from_session(&session).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "now: X - A [0:00 / 3:00]");
        assert!(!text.ends_with('\n'));
    }
}
