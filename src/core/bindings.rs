//! Key bindings that run command lines when a key is pressed.

use bevy::input::ButtonInput;
use bevy::prelude::KeyCode;

use super::EnumValue;

macro_rules! nameable_keys {
    ($($variant:ident),* $(,)?) => {
        impl EnumValue for KeyCode {
            const TYPE_NAME: &'static str = "KeyCode";
            const VARIANTS: &'static [(&'static str, Self)] =
                &[$((stringify!($variant), KeyCode::$variant)),*];
        }
    };
}

// Every `KeyCode` variant except `Unidentified`
nameable_keys!(
    Backquote, Backslash, BracketLeft, BracketRight, Comma, Equal, Minus, Period, Quote,
    Semicolon, Slash, IntlBackslash, IntlRo, IntlYen,
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    AltLeft, AltRight, Backspace, CapsLock, ContextMenu, ControlLeft, ControlRight, Enter,
    SuperLeft, SuperRight, ShiftLeft, ShiftRight, Space, Tab,
    Convert, KanaMode, Lang1, Lang2, Lang3, Lang4, Lang5, NonConvert,
    Delete, End, Help, Home, Insert, PageDown, PageUp,
    ArrowDown, ArrowLeft, ArrowRight, ArrowUp,
    NumLock, Numpad0, Numpad1, Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7,
    Numpad8, Numpad9, NumpadAdd, NumpadBackspace, NumpadClear, NumpadClearEntry,
    NumpadComma, NumpadDecimal, NumpadDivide, NumpadEnter, NumpadEqual, NumpadHash,
    NumpadMemoryAdd, NumpadMemoryClear, NumpadMemoryRecall, NumpadMemoryStore,
    NumpadMemorySubtract, NumpadMultiply, NumpadParenLeft, NumpadParenRight, NumpadStar,
    NumpadSubtract,
    Escape, Fn, FnLock, PrintScreen, ScrollLock, Pause,
    BrowserBack, BrowserFavorites, BrowserForward, BrowserHome, BrowserRefresh,
    BrowserSearch, BrowserStop, Eject, LaunchApp1, LaunchApp2, LaunchMail,
    MediaPlayPause, MediaSelect, MediaStop, MediaTrackNext, MediaTrackPrevious,
    Power, Sleep, AudioVolumeDown, AudioVolumeMute, AudioVolumeUp, WakeUp,
    Meta, Hyper, Turbo, Abort, Resume, Suspend, Again, Copy, Cut, Find, Open, Paste,
    Props, Select, Undo, Hiragana, Katakana,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, F13, F14, F15, F16, F17, F18,
    F19, F20, F21, F22, F23, F24, F25, F26, F27, F28, F29, F30, F31, F32, F33, F34, F35,
);

/// Command lines bound to keys.
///
/// Keys keep the order they were first bound in, and each key runs its lines
/// in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    bound: Vec<(KeyCode, Vec<String>)>,
}

impl KeyBindings {
    /// Create an empty binding table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command line to `key`.
    pub fn add(&mut self, key: KeyCode, line: impl Into<String>) {
        let line = line.into();
        match self.bound.iter_mut().find(|(k, _)| *k == key) {
            Some((_, lines)) => lines.push(line),
            None => self.bound.push((key, vec![line])),
        }
    }

    /// Remove every line bound to `key`. Returns whether anything was bound.
    pub fn reset(&mut self, key: KeyCode) -> bool {
        let before = self.bound.len();
        self.bound.retain(|(k, _)| *k != key);
        self.bound.len() != before
    }

    /// Lines bound to `key`.
    pub fn commands_for(&self, key: KeyCode) -> &[String] {
        self.bound
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(&[], |(_, lines)| lines.as_slice())
    }

    /// Every binding, in first-bound order.
    pub fn iter(&self) -> impl Iterator<Item = (KeyCode, &[String])> {
        self.bound.iter().map(|(key, lines)| (*key, lines.as_slice()))
    }

    /// Check if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Lines of every key pressed this frame.
    pub fn triggered(&self, input: &ButtonInput<KeyCode>) -> Vec<String> {
        self.bound
            .iter()
            .filter(|(key, _)| input.just_pressed(*key))
            .flat_map(|(_, lines)| lines.iter().cloned())
            .collect()
    }
}
