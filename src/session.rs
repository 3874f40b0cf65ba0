//! Headless play session
//!
//! Wires the camera rig and the centipedes to in-memory collaborators and
//! replays a scripted stream of window events, one frame at a time.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use glam::{UVec2, Vec2};
use skitter_core::GameTime;
use skitter_game::{
    GroundRaycaster, HeadlessCursor, HeadlessNode, HeadlessScene, InputHandler, OrbitCameraRig,
    PerspectiveLens, SceneNode, SegmentChain,
};
use tracing::{debug, info, warn};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::settings::GameSettings;

/// One scripted happening
#[derive(Debug, Clone, Copy)]
pub enum ScriptStep {
    Key(KeyCode, ElementState),
    Mouse(MouseButton, ElementState),
    /// Wheel notches, positive away from the user
    Scroll(f32),
    /// Move the pointer, `None` leaves the window
    MoveCursor(Option<Vec2>),
    /// Send a centipede toward the ground point under the cursor
    PickDestination(u32),
    Grow(u32),
    Reset(u32),
}

/// The script the binary plays: pan with keys and screen edges, orbit, zoom,
/// steer and grow the centipedes.
pub fn demo_script() -> Vec<(u64, ScriptStep)> {
    use ElementState::{Pressed, Released};
    use ScriptStep::*;

    vec![
        (30, Key(KeyCode::ArrowUp, Pressed)),
        (90, Key(KeyCode::ArrowUp, Released)),
        (100, Key(KeyCode::ArrowLeft, Pressed)),
        (100, Key(KeyCode::ArrowRight, Pressed)),
        (130, Key(KeyCode::ArrowLeft, Released)),
        (130, Key(KeyCode::ArrowRight, Released)),
        (150, MoveCursor(Some(Vec2::new(0.4, -0.3)))),
        (150, PickDestination(0)),
        (160, MoveCursor(Some(Vec2::new(0.0, 0.97)))),
        (200, MoveCursor(Some(Vec2::ZERO))),
        (220, Mouse(MouseButton::Middle, Pressed)),
        (230, MoveCursor(Some(Vec2::new(0.1, 0.05)))),
        (240, MoveCursor(Some(Vec2::new(0.2, 0.1)))),
        (250, MoveCursor(Some(Vec2::new(0.25, 0.1)))),
        (260, Mouse(MouseButton::Middle, Released)),
        (280, Scroll(1.0)),
        (281, Scroll(1.0)),
        (282, Scroll(1.0)),
        (300, Scroll(-1.0)),
        (320, Grow(1)),
        (330, Grow(0)),
        (360, MoveCursor(None)),
        (400, MoveCursor(Some(Vec2::new(-0.2, 0.2)))),
        (400, PickDestination(1)),
        (500, Reset(1)),
    ]
}

type Rig = OrbitCameraRig<HeadlessNode, HeadlessCursor>;
type Centipede = SegmentChain<HeadlessNode, HeadlessNode>;

/// Everything alive during a session
pub struct Session {
    time: GameTime,
    input: InputHandler,
    rig: Rig,
    raycaster: GroundRaycaster<PerspectiveLens>,
    scene: HeadlessScene,
    chains: Vec<Centipede>,
    script: VecDeque<(u64, ScriptStep)>,
    frame: u64,
}

impl Session {
    pub fn new(settings: &GameSettings, mut script: Vec<(u64, ScriptStep)>) -> Result<Self> {
        let window = UVec2::new(settings.session.window_width, settings.session.window_height);
        let rig = OrbitCameraRig::new(
            settings.camera.clone(),
            HeadlessNode::new("camera"),
            HeadlessCursor::new(window),
        )
        .context("Failed to set up camera rig")?;

        let mut scene = HeadlessScene::default();
        let players = settings.session.players;
        let mut chains = Vec::with_capacity(players as usize);
        for index in 0..players {
            let mut chain = SegmentChain::new(&mut scene, index, players, settings.centipede.clone())
                .with_context(|| format!("Failed to spawn centipede {index}"))?;
            for _ in 0..settings.session.starting_segments {
                chain.add_length(&mut scene)?;
            }
            chains.push(chain);
        }

        script.sort_by_key(|(frame, _)| *frame);

        Ok(Self {
            time: GameTime::new(settings.time.clone()),
            input: InputHandler::new(),
            rig,
            raycaster: GroundRaycaster::new(PerspectiveLens::new(settings.lens.clone())),
            scene,
            chains,
            script: script.into(),
            frame: 0,
        })
    }

    /// Advance one frame
    pub fn step(&mut self, raw_delta: f32) -> Result<()> {
        while let Some(&(at, step)) = self.script.front() {
            if at > self.frame {
                break;
            }
            self.script.pop_front();
            self.apply(step)?;
        }

        for event in self.input.drain() {
            debug!("Frame {}: {:?}", self.frame, event);
            self.rig.handle_event(event);
        }

        self.time.update(raw_delta);
        let dt = self.time.delta_time;
        self.rig.update(dt);
        for chain in &mut self.chains {
            chain.update(dt);
        }

        self.frame += 1;
        Ok(())
    }

    fn apply(&mut self, step: ScriptStep) -> Result<()> {
        match step {
            ScriptStep::Key(key, state) => self.input.handle_keyboard(PhysicalKey::Code(key), state),
            ScriptStep::Mouse(button, state) => self.input.handle_mouse_button(button, state),
            ScriptStep::Scroll(lines) => self
                .input
                .handle_scroll(MouseScrollDelta::LineDelta(0.0, lines)),
            ScriptStep::MoveCursor(position) => self.rig.cursor_mut().set_position(position),
            ScriptStep::PickDestination(player) => {
                let hit = self.rig.try_pick_ground_point(&self.raycaster);
                match (hit, self.chains.get_mut(player as usize)) {
                    (Some(point), Some(chain)) => {
                        info!("Centipede {} heading for {:?}", player, point);
                        chain.set_destination(point);
                    }
                    (None, _) => info!("Destination pick missed the ground"),
                    (_, None) => warn!("No centipede {}", player),
                }
            }
            ScriptStep::Grow(player) => match self.chains.get_mut(player as usize) {
                Some(chain) => chain.add_length(&mut self.scene)?,
                None => warn!("No centipede {}", player),
            },
            ScriptStep::Reset(player) => match self.chains.get_mut(player as usize) {
                Some(chain) => chain.reset(),
                None => warn!("No centipede {}", player),
            },
        }
        Ok(())
    }

    /// Log where everything is
    pub fn report(&self) {
        info!(
            "Frame {}: camera target {:?}, distance {:.1}, yaw {:.2}, pitch {:.2}",
            self.frame,
            self.rig.target(),
            self.rig.distance(),
            self.rig.yaw(),
            self.rig.pitch()
        );
        for chain in &self.chains {
            info!(
                "  centipede {}: head {:?}, {} segments",
                chain.index(),
                chain.head().transform().position,
                chain.body().len()
            );
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn chains(&self) -> &[Centipede] {
        &self.chains
    }

    pub fn scene(&self) -> &HeadlessScene {
        &self.scene
    }

    /// Tear everything down, handing back the scene for inspection
    pub fn finish(self) -> HeadlessScene {
        for chain in self.chains {
            chain.destroy();
        }
        let (camera, _cursor) = self.rig.destroy();
        info!("Camera came to rest at {:?}", camera.transform().position);
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(frames: u64) -> Session {
        let settings = GameSettings::default();
        let mut session = Session::new(&settings, demo_script()).unwrap();
        for _ in 0..frames {
            session.step(settings.session.frame_delta).unwrap();
        }
        session
    }

    #[test]
    fn test_demo_session_runs() {
        let session = run(600);
        assert_eq!(session.frame(), 600);

        let rig = session.rig();
        assert!(rig.pan_limits().contains(rig.target()));
        assert!((-85.0..=-10.0).contains(&rig.pitch()));
        assert!(!rig.is_orbiting());

        let chains = session.chains();
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].body().len(), 5);
        assert!(chains[1].body().is_empty());
        assert!(chains[0].destination().is_some());
    }

    #[test]
    fn test_key_pan_moves_target() {
        // Up arrow held from frame 30 to 90 pans away from the camera
        let session = run(95);
        assert!(session.rig().target().y > 1.0);
    }

    #[test]
    fn test_finish_detaches_scene() {
        let session = run(10);
        // Two players with head, tail, marker and four segments each
        assert_eq!(session.scene().attached_count(), 14);
        let scene = session.finish();
        assert_eq!(scene.attached_count(), 0);
    }

    #[test]
    fn test_out_of_range_player_ignored() {
        let settings = GameSettings::default();
        let script = vec![(0, ScriptStep::Grow(7)), (0, ScriptStep::Reset(9))];
        let mut session = Session::new(&settings, script).unwrap();
        session.step(settings.session.frame_delta).unwrap();
        assert_eq!(session.chains()[0].body().len(), 4);
    }
}
