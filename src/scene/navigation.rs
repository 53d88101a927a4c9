use serde::Deserialize;

/// Per-frame navigation intent, already decoded from raw device state.
///
/// Axis values are signed multipliers. Translation axes are scaled by the
/// camera's move speed and rotation axes by its rotation speed, both per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationInput {
    /// +1 moves along the camera forward axis.
    pub forward: f32,
    /// +1 moves along the camera right axis.
    pub right: f32,
    /// +1 moves along the camera up axis.
    pub up: f32,
    pub yaw: f32,
    pub pitch: f32,
}

/// Keyboard state relevant to navigation. Arrow keys and WASD are interchangeable.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Relative mouse motion since the last frame plus held buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub dx: f32,
    pub dy: f32,
    pub left: bool,
    pub right: bool,
}

impl NavigationInput {
    /// Decodes the mouse/keyboard chords.
    ///
    /// - Keys: forward/back and strafe.
    /// - Left button alone: mouse Y drives forward/back (up on screen is forward).
    /// - Both buttons: mouse Y drives vertical movement.
    /// - Exactly one button: mouse X drives yaw.
    /// - Right button: mouse Y drives pitch.
    pub fn from_devices(keys: KeyState, mouse: MouseState) -> Self {
        let axis = |pos: bool, neg: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));

        let mut forward = axis(keys.forward, keys.back);
        if mouse.left && !mouse.right {
            forward -= mouse.dy;
        }

        let up = if mouse.left && mouse.right {
            -mouse.dy
        } else {
            0.0
        };
        let yaw = if mouse.left ^ mouse.right {
            mouse.dx
        } else {
            0.0
        };
        let pitch = if mouse.right { -mouse.dy } else { 0.0 };

        Self {
            forward,
            right: axis(keys.right, keys.left),
            up,
            yaw,
            pitch,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
