pub mod camera;
pub mod collaborators;
pub mod location;

pub use camera::{CameraRig, CameraTransition};
pub use collaborators::{Collaborators, PlayerRig, UiVisibility};
pub use location::BuildLocation;

use tracing::{debug, warn};

use crate::constructor::{PointerEvent, SegmentConstructor};
use crate::error::{GraphError, GridError, SessionError};
use crate::graph::{BarMaterial, ConnectivityGraph};
use crate::grid::{GridConfig, GridSurface};
use crate::math::{CameraLens, Point2, Pose};

/// Default easing rate for the overview camera transition.
const DEFAULT_CAMERA_RATE: f64 = 5.0;

/// Global play mode as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Normal play: player control active, no grid.
    #[default]
    Normal,
    /// Build mode: player control suspended, grid active.
    Building,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Building => "building",
        }
    }
}

/// Fire-and-forget mode-change notifications, queued for the host to
/// drain after each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Build mode was entered at the named location.
    EnteredBuildMode {
        /// Name of the activated location.
        location: String,
    },
    /// Build mode was exited.
    ExitedBuildMode,
}

#[derive(Debug, Clone, Copy)]
struct PlayerSnapshot {
    control: bool,
    look: bool,
    movement: bool,
}

#[derive(Debug, Default)]
struct SavedState {
    player: Option<PlayerSnapshot>,
    camera_pose: Option<Pose>,
    camera_enabled: Option<bool>,
    ui: Vec<(String, bool)>,
}

/// The build-mode controller.
///
/// Owns the grid surface and segment constructor for the duration of one
/// session and atomically swaps camera, input and UI ownership between
/// normal play and building. A single instance is enforced by the owning
/// composition root, not by a global accessor.
#[derive(Debug)]
pub struct BuildSession {
    mode: Mode,
    grid_config: GridConfig,
    constructor: SegmentConstructor,
    location: Option<BuildLocation>,
    surface: Option<GridSurface>,
    transition: Option<CameraTransition>,
    camera_rate: f64,
    saved: SavedState,
    events: Vec<SessionEvent>,
}

impl BuildSession {
    /// Creates a session controller in normal mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid configuration is invalid.
    pub fn new(grid_config: GridConfig, material: Option<BarMaterial>) -> Result<Self, GridError> {
        grid_config.validate()?;
        let constructor = match material {
            Some(material) => SegmentConstructor::with_material(material),
            None => SegmentConstructor::new(),
        };
        Ok(Self {
            mode: Mode::Normal,
            grid_config,
            constructor,
            location: None,
            surface: None,
            transition: None,
            camera_rate: DEFAULT_CAMERA_RATE,
            saved: SavedState::default(),
            events: Vec::new(),
        })
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns `true` while a build session is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.mode == Mode::Building
    }

    /// The active grid surface, if building.
    #[must_use]
    pub fn surface(&self) -> Option<&GridSurface> {
        self.surface.as_ref()
    }

    /// The segment constructor.
    #[must_use]
    pub fn constructor(&self) -> &SegmentConstructor {
        &self.constructor
    }

    /// The active build location, if building.
    #[must_use]
    pub fn location(&self) -> Option<&BuildLocation> {
        self.location.as_ref()
    }

    /// The in-flight overview camera transition, if any.
    #[must_use]
    pub fn camera_transition(&self) -> Option<&CameraTransition> {
        self.transition.as_ref()
    }

    /// Overrides the overview camera easing rate.
    pub fn set_camera_rate(&mut self, rate: f64) {
        self.camera_rate = rate;
    }

    /// Takes all queued mode-change notifications.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enters build mode at the given location.
    ///
    /// Disables player control, swaps or eases the camera toward the
    /// location's observation pose, creates and initializes the grid
    /// surface, hides registered UI, and queues a mode-change event.
    /// Missing collaborators skip their step with a logged warning; the
    /// transition itself still completes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidModeTransition`] when already
    /// building. The session state is untouched in that case.
    pub fn enter(
        &mut self,
        location: BuildLocation,
        collaborators: &mut Collaborators,
    ) -> Result<(), SessionError> {
        if self.mode == Mode::Building {
            debug!("enter ignored, already building");
            return Err(SessionError::InvalidModeTransition {
                current: self.mode.as_str(),
            });
        }
        let mut location = location;
        self.mode = Mode::Building;
        self.saved = SavedState::default();

        // Player control.
        if let Some(player) = collaborators.player.as_mut() {
            self.saved.player = Some(PlayerSnapshot {
                control: player.control_enabled,
                look: player.look_enabled,
                movement: player.movement_enabled,
            });
            if location.disable_player_movement {
                player.control_enabled = false;
                player.movement_enabled = false;
            }
            player.look_enabled = false;
        } else {
            warn_missing("player rig");
        }

        // Camera ownership.
        if let Some(dedicated) = location.camera.as_mut() {
            dedicated.enabled = true;
            if let Some(primary) = collaborators.camera.as_mut() {
                self.saved.camera_enabled = Some(primary.enabled);
                primary.enabled = false;
            }
        } else if let Some(primary) = collaborators.camera.as_mut() {
            self.saved.camera_pose = Some(primary.pose);
            match location.overview_pose() {
                Ok(target) => {
                    self.transition = Some(CameraTransition::new(target, self.camera_rate));
                }
                Err(err) => warn!(%err, "could not compute overview pose, camera left in place"),
            }
        } else {
            warn_missing("primary camera");
        }

        // Grid surface, anchored to whichever camera now observes the
        // location.
        let observation = location
            .camera
            .as_ref()
            .map(|rig| rig.pose)
            .or_else(|| collaborators.camera.as_ref().map(|rig| rig.pose));
        match GridSurface::new(self.grid_config.clone()) {
            Ok(mut surface) => {
                if let Err(err) = surface.initialize(&location.pose, observation.as_ref()) {
                    warn!(%err, "grid surface degraded, snapping disabled");
                }
                self.surface = Some(surface);
            }
            Err(err) => warn!(%err, "grid surface could not be created"),
        }

        // UI.
        self.saved.ui = collaborators.ui.snapshot();
        collaborators.ui.hide_all();

        debug!(location = %location.name, "entered build mode");
        self.events.push(SessionEvent::EnteredBuildMode {
            location: location.name.clone(),
        });
        self.location = Some(location);
        Ok(())
    }

    /// Exits build mode, reversing every entry effect in the opposite
    /// order: the in-progress segment is implicitly cancelled, player
    /// control and camera are restored, the grid surface is destroyed and
    /// the UI brought back.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidModeTransition`] when already
    /// normal; calling exit twice has the same observable effect as once.
    pub fn exit(
        &mut self,
        collaborators: &mut Collaborators,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), SessionError> {
        if self.mode == Mode::Normal {
            debug!("exit ignored, already normal");
            return Err(SessionError::InvalidModeTransition {
                current: self.mode.as_str(),
            });
        }
        self.mode = Mode::Normal;

        // Abandon any uncommitted segment before the grid goes away.
        if let Err(err) = self.constructor.force_cancel(graph) {
            warn!(%err, "provisional segment cleanup failed");
        }

        // Player control.
        if let (Some(player), Some(snapshot)) =
            (collaborators.player.as_mut(), self.saved.player.take())
        {
            player.control_enabled = snapshot.control;
            player.look_enabled = snapshot.look;
            player.movement_enabled = snapshot.movement;
        }

        // Camera ownership.
        self.transition = None;
        if let Some(location) = self.location.as_mut() {
            if let Some(dedicated) = location.camera.as_mut() {
                dedicated.enabled = false;
            }
        }
        if let Some(primary) = collaborators.camera.as_mut() {
            primary.enabled = self.saved.camera_enabled.take().unwrap_or(true);
            if let Some(pose) = self.saved.camera_pose.take() {
                primary.pose = pose;
            }
        }

        // Grid surface.
        if let Some(surface) = self.surface.as_mut() {
            surface.teardown();
        }
        self.surface = None;

        // UI.
        collaborators.ui.restore(&self.saved.ui);
        self.saved.ui.clear();

        self.location = None;
        debug!("exited build mode");
        self.events.push(SessionEvent::ExitedBuildMode);
        Ok(())
    }

    /// Quick-exit path (escape gesture). Equivalent to [`exit`] and only
    /// meaningful while building.
    ///
    /// # Errors
    ///
    /// Same as [`exit`].
    ///
    /// [`exit`]: BuildSession::exit
    pub fn quick_exit(
        &mut self,
        collaborators: &mut Collaborators,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), SessionError> {
        self.exit(collaborators, graph)
    }

    /// Advances one host tick while building: camera easing first, then
    /// the grid follow update, then the constructor's preview drag, so a
    /// placement always samples the current-tick grid pose.
    pub fn tick(
        &mut self,
        dt: f64,
        collaborators: &mut Collaborators,
        graph: &mut ConnectivityGraph,
        cursor: Option<&Point2>,
    ) {
        if self.mode != Mode::Building {
            return;
        }

        if let (Some(transition), Some(primary)) =
            (self.transition.as_mut(), collaborators.camera.as_mut())
        {
            transition.advance(&mut primary.pose, dt);
        }

        let view = self.active_view(collaborators);
        if let (Some(surface), Some((pose, _))) = (self.surface.as_mut(), view) {
            surface.update_follow(dt, &pose);
        }

        if let (Some(cursor), Some((pose, lens)), Some(surface)) =
            (cursor, view, self.surface.as_ref())
        {
            if let Err(err) = self
                .constructor
                .update_preview(cursor, &pose, &lens, surface, graph)
            {
                debug!(%err, "preview update skipped");
            }
        }
    }

    /// Routes a pointer-down event to the segment constructor. Ignored
    /// outside build mode or when no grid surface or camera is available.
    ///
    /// # Errors
    ///
    /// Propagates placement rejections ([`GraphError::DegenerateSegment`],
    /// [`GraphError::SegmentTooLong`]); the placement state machine is
    /// left unchanged by those.
    pub fn pointer_event(
        &mut self,
        event: &PointerEvent,
        collaborators: &Collaborators,
        graph: &mut ConnectivityGraph,
    ) -> Result<(), GraphError> {
        if self.mode != Mode::Building {
            return Ok(());
        }
        let Some((pose, lens)) = self.active_view(collaborators) else {
            return Ok(());
        };
        let Some(surface) = self.surface.as_ref() else {
            return Ok(());
        };
        self.constructor
            .handle_pointer_down(event, &pose, &lens, surface, graph)
    }

    /// The camera currently observing the build: the location's dedicated
    /// rig when enabled, otherwise the primary camera.
    fn active_view(&self, collaborators: &Collaborators) -> Option<(Pose, CameraLens)> {
        if let Some(rig) = self
            .location
            .as_ref()
            .and_then(|location| location.camera.as_ref())
        {
            if rig.enabled {
                return Some((rig.pose, rig.lens));
            }
        }
        collaborators
            .camera
            .as_ref()
            .filter(|rig| rig.enabled)
            .map(|rig| (rig.pose, rig.lens))
    }
}

fn warn_missing(what: &'static str) {
    let err = SessionError::MissingCollaborator(what);
    warn!(%err, "collaborator step skipped");
}
