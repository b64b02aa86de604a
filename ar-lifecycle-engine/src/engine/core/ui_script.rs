use std::collections::VecDeque;

use bevy::prelude::*;

use crate::engine::session::{LifecycleEvent, TransitionRequest};
use crate::tools::placement::{PlacementCommand, PlacementEvent};

/// A button press the script performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Transition(TransitionRequest),
    Placement(PlacementCommand),
    Exit,
}

/// Button presses replayed one after another, each after a frame delay.
#[derive(Resource, Debug, Clone, Default)]
pub struct UiScript {
    steps: VecDeque<(u32, ScriptAction)>,
    waited: u32,
}

impl UiScript {
    pub fn new(steps: impl IntoIterator<Item = (u32, ScriptAction)>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            waited: 0,
        }
    }

    /// Enter AR, place a chair, restart the session, go home twice, exit.
    ///
    /// The second `EnterAr` in the same frame shows an overlapping request
    /// being rejected.
    pub fn demo() -> Self {
        use ScriptAction::*;
        Self::new([
            (2, Transition(TransitionRequest::enter_ar())),
            (0, Transition(TransitionRequest::enter_ar())),
            (12, Placement(PlacementCommand::SelectPrefab(0))),
            (2, Placement(PlacementCommand::Place)),
            (2, Placement(PlacementCommand::SelectPrefab(7))),
            (4, Transition(TransitionRequest::enter_ar())),
            (12, Placement(PlacementCommand::Place)),
            (4, Transition(TransitionRequest::return_home())),
            (8, Transition(TransitionRequest::return_home())),
            (8, Exit),
        ])
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Actions due this frame.
    fn tick(&mut self) -> Vec<ScriptAction> {
        let mut due = Vec::new();
        while let Some((delay, action)) = self.steps.front().copied() {
            if self.waited < delay {
                self.waited += 1;
                break;
            }
            self.steps.pop_front();
            self.waited = 0;
            due.push(action);
        }
        due
    }
}

pub fn run_ui_script(
    mut script: ResMut<UiScript>,
    mut transitions: EventWriter<TransitionRequest>,
    mut placement: EventWriter<PlacementCommand>,
    mut exit: EventWriter<AppExit>,
) {
    for action in script.tick() {
        info!("→ UI action: {:?}", action);
        match action {
            ScriptAction::Transition(request) => {
                transitions.write(request);
            }
            ScriptAction::Placement(command) => {
                placement.write(command);
            }
            ScriptAction::Exit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

pub fn report_lifecycle_events(
    mut lifecycle_events: EventReader<LifecycleEvent>,
    mut placement_events: EventReader<PlacementEvent>,
) {
    for event in lifecycle_events.read() {
        match event {
            LifecycleEvent::ArReady { origin } => println!("✓ AR ready (origin {})", origin.0),
            LifecycleEvent::ArUnloaded => println!("✓ AR scene unloaded"),
            LifecycleEvent::Failed(error) => println!("✗ AR transition failed: {}", error),
            other => debug!("Lifecycle event: {:?}", other),
        }
    }
    for event in placement_events.read() {
        debug!("Placement event: {:?}", event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_steps_fire_together() {
        let mut script = UiScript::new([
            (1, ScriptAction::Exit),
            (0, ScriptAction::Placement(PlacementCommand::Place)),
        ]);
        assert!(script.tick().is_empty());
        assert_eq!(script.tick().len(), 2);
        assert!(script.is_finished());
    }
}
