use std::collections::BTreeMap;

use crate::math::Pose;

use super::camera::CameraRig;

/// The player avatar as seen by the build session: a pose plus the
/// control switches the session flips on mode transitions.
#[derive(Debug, Clone, Copy)]
pub struct PlayerRig {
    /// Current world pose of the player.
    pub pose: Pose,
    /// Master control switch (motor).
    pub control_enabled: bool,
    /// Look input switch.
    pub look_enabled: bool,
    /// Movement input switch.
    pub movement_enabled: bool,
}

impl PlayerRig {
    /// Creates a player rig with all controls enabled.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            control_enabled: true,
            look_enabled: true,
            movement_enabled: true,
        }
    }
}

/// Opaque show/hide targets toggled on mode transitions. The session
/// never interprets panel names; it only hides everything on entry and
/// restores the saved visibility on exit.
#[derive(Debug, Clone, Default)]
pub struct UiVisibility {
    panels: BTreeMap<String, bool>,
}

impl UiVisibility {
    /// Creates an empty visibility registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a panel with its current visibility.
    pub fn register(&mut self, name: impl Into<String>, visible: bool) {
        let _ = self.panels.insert(name.into(), visible);
    }

    /// Returns a panel's visibility, if registered.
    #[must_use]
    pub fn is_visible(&self, name: &str) -> Option<bool> {
        self.panels.get(name).copied()
    }

    /// Hides every registered panel.
    pub fn hide_all(&mut self) {
        for visible in self.panels.values_mut() {
            *visible = false;
        }
    }

    /// Snapshot of all panel visibilities, for restore on session exit.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, bool)> {
        self.panels
            .iter()
            .map(|(name, visible)| (name.clone(), *visible))
            .collect()
    }

    /// Restores a snapshot taken earlier. Panels registered since the
    /// snapshot keep their current state.
    pub fn restore(&mut self, snapshot: &[(String, bool)]) {
        for (name, visible) in snapshot {
            if let Some(entry) = self.panels.get_mut(name) {
                *entry = *visible;
            }
        }
    }
}

/// The external systems a build session borrows during transitions.
/// Optional members are skipped (with a logged warning) when absent, so a
/// partially wired host still gets a well-defined mode change.
#[derive(Debug, Default)]
pub struct Collaborators {
    /// Player avatar and control switches.
    pub player: Option<PlayerRig>,
    /// The primary (normal play) camera.
    pub camera: Option<CameraRig>,
    /// Registered UI panels.
    pub ui: UiVisibility,
}

impl Collaborators {
    /// Creates an empty collaborator set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_all_and_restore_round_trip() {
        let mut ui = UiVisibility::new();
        ui.register("joystick", true);
        ui.register("dialogue", false);
        ui.register("prompt", true);

        let snapshot = ui.snapshot();
        ui.hide_all();
        assert_eq!(ui.is_visible("joystick"), Some(false));
        assert_eq!(ui.is_visible("prompt"), Some(false));

        ui.restore(&snapshot);
        assert_eq!(ui.is_visible("joystick"), Some(true));
        assert_eq!(ui.is_visible("dialogue"), Some(false));
        assert_eq!(ui.is_visible("prompt"), Some(true));
    }

    #[test]
    fn unknown_panels_are_none() {
        let ui = UiVisibility::new();
        assert_eq!(ui.is_visible("minimap"), None);
    }
}
