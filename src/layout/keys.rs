//! Undo/redo keyboard chords.
//!
//! The platform modifier is ⌘ on macOS and Ctrl elsewhere. Modifier+Z undoes,
//! Modifier+Shift+Z redoes, and Ctrl+Y also redoes off macOS.

#[cfg(test)]
#[path = "keys_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Mac,
    #[default]
    Other,
}

impl Platform {
    /// Classify a `navigator.platform`/user-agent style string.
    #[must_use]
    pub fn detect(platform: &str) -> Self {
        let p = platform.to_ascii_lowercase();
        if p.contains("mac") || p.contains("iphone") || p.contains("ipad") {
            Self::Mac
        } else {
            Self::Other
        }
    }
}

/// A key press as reported by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    #[must_use]
    pub fn key(key: char) -> Self {
        Self { key, ..Self::default() }
    }

    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryShortcut {
    Undo,
    Redo,
}

/// Map a chord to a history action, if it is one.
#[must_use]
pub fn match_shortcut(chord: KeyChord, platform: Platform) -> Option<HistoryShortcut> {
    let modifier = match platform {
        Platform::Mac => chord.meta && !chord.ctrl,
        Platform::Other => chord.ctrl && !chord.meta,
    };
    if !modifier || chord.alt {
        return None;
    }
    match (chord.key.to_ascii_lowercase(), chord.shift) {
        ('z', false) => Some(HistoryShortcut::Undo),
        ('z', true) => Some(HistoryShortcut::Redo),
        ('y', false) if platform == Platform::Other => Some(HistoryShortcut::Redo),
        _ => None,
    }
}
