/// A logical key. Physical layouts map onto these through [`Key::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Forward,
    Back,
    Left,
    Right,
    Run,
}

impl Key {
    /// Map a DOM-style key name (`"w"`, `"ArrowUp"`, `"Shift"`) to a logical key.
    /// Returns `None` for keys the simulation does not use.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(Self::Forward),
            "s" | "arrowdown" => Some(Self::Back),
            "a" | "arrowleft" => Some(Self::Left),
            "d" | "arrowright" => Some(Self::Right),
            "shift" | "shiftleft" | "shiftright" => Some(Self::Run),
            _ => None,
        }
    }
}

/// A raw input edge or delta from any device.
///
/// Deltas are in screen pixels; the aggregator converts them to radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Primary pointer button pressed. Pointer motion only looks while held.
    PointerDown,
    PointerUp,
    PointerMove { dx: f32, dy: f32 },
    /// Drag on the touch look area.
    TouchDrag { dx: f32, dy: f32 },
    /// Absolute virtual stick position; y = +1 pushes away from the camera.
    Joystick { x: f32, y: f32 },
    JoystickRelease,
    /// On-screen run toggle.
    RunButton(bool),
    /// Focus lost: everything held is released.
    Blur,
}
