// --- Mocking Infrastructure (for testing) ---

// This module is only compiled when the "test-mocks" feature is enabled.
#![cfg(feature = "test-mocks")]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

use crate::error::{CoreError, CoreResult, command_start_error};
use crate::external::detector::SceneDetector;
use crate::external::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::external::ffprobe_executor::{ProbeExecutor, VideoProperties};
use crate::scenes::SceneInterval;

/// Mock implementation of `FfmpegProcess`.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// One scripted outcome for a spawned ffmpeg process.
enum SpawnOutcome {
    Succeed,
    FailSpawn,
    ExitCode(i32),
}

/// Mock `FfmpegSpawner` that replays a queue of scripted outcomes.
///
/// Each spawn pops the next outcome; once the queue is drained every spawn
/// succeeds. All received argument lists are recorded for assertions.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    outcomes: Rc<RefCell<VecDeque<SpawnOutcome>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Scripts a successful process for the next spawn.
    pub fn push_success(&self) {
        self.outcomes.borrow_mut().push_back(SpawnOutcome::Succeed);
    }

    /// Scripts a spawn failure (process never starts).
    pub fn push_spawn_error(&self) {
        self.outcomes.borrow_mut().push_back(SpawnOutcome::FailSpawn);
    }

    /// Scripts a process that starts but exits with the given code.
    pub fn push_exit_failure(&self, exit_code: i32) {
        self.outcomes
            .borrow_mut()
            .push_back(SpawnOutcome::ExitCode(exit_code));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.received_calls.borrow().len()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args);

        let outcome = self
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(SpawnOutcome::Succeed);

        match outcome {
            SpawnOutcome::Succeed => Ok(MockFfmpegProcess {
                events_to_emit: Rc::new(RefCell::new(Vec::new())),
                exit_status: ExitStatus::from_raw(0),
            }),
            SpawnOutcome::FailSpawn => Err(command_start_error(
                "ffmpeg (mock)",
                std::io::Error::new(std::io::ErrorKind::NotFound, "Mock spawn failure"),
            )),
            SpawnOutcome::ExitCode(code) => Ok(MockFfmpegProcess {
                events_to_emit: Rc::new(RefCell::new(vec![FfmpegEvent::Error(
                    "Simulated ffmpeg error line".to_string(),
                )])),
                exit_status: ExitStatus::from_raw(code << 8),
            }),
        }
    }
}

/// Mock implementation of `ProbeExecutor`.
#[derive(Clone, Default)]
pub struct MockProbeExecutor {
    properties: Rc<RefCell<HashMap<PathBuf, VideoProperties>>>,
}

impl MockProbeExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the properties reported for a specific input path.
    pub fn expect_properties(&self, input_path: &Path, props: VideoProperties) {
        self.properties
            .borrow_mut()
            .insert(input_path.to_path_buf(), props);
    }
}

impl ProbeExecutor for MockProbeExecutor {
    fn get_video_properties(&self, input_path: &Path) -> CoreResult<VideoProperties> {
        self.properties
            .borrow()
            .get(input_path)
            .cloned()
            .ok_or_else(|| {
                CoreError::VideoInfoError(format!(
                    "MockProbeExecutor: no properties set for {}",
                    input_path.display()
                ))
            })
    }
}

/// Mock implementation of `SceneDetector`.
#[derive(Clone, Default)]
pub struct MockSceneDetector {
    scenes: Rc<RefCell<HashMap<PathBuf, Vec<SceneInterval>>>>,
}

impl MockSceneDetector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the scene list returned for a specific input path.
    pub fn expect_scenes(&self, input_path: &Path, scenes: Vec<SceneInterval>) {
        self.scenes
            .borrow_mut()
            .insert(input_path.to_path_buf(), scenes);
    }
}

impl SceneDetector for MockSceneDetector {
    fn detect_scenes(
        &self,
        input_path: &Path,
        _threshold: f32,
        _props: &VideoProperties,
    ) -> CoreResult<Vec<SceneInterval>> {
        self.scenes.borrow().get(input_path).cloned().ok_or_else(|| {
            CoreError::SceneDetection(format!(
                "MockSceneDetector: no scenes set for {}",
                input_path.display()
            ))
        })
    }
}
