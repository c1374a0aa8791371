use async_trait::async_trait;
use std::sync::Mutex;
use tubely_processing::{CommandError, CommandOutput, CommandRunner};

/// Marker the fake ffmpeg prepends to the remuxed copy of its input.
pub const REMUX_MARKER: &[u8] = b"faststart:";

enum ProbeBehavior {
    Geometry(u32, u32),
    Fail(&'static str),
}

/// Scripted stand-in for ffprobe/ffmpeg.
///
/// ffprobe answers with the configured geometry (or fails). ffmpeg "remuxes"
/// by writing `REMUX_MARKER` followed by the input bytes to its last argument.
pub struct FakeRunner {
    probe: ProbeBehavior,
    fail_remux: bool,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    pub fn with_geometry(width: u32, height: u32) -> Self {
        Self {
            probe: ProbeBehavior::Geometry(width, height),
            fail_remux: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_probe(stderr: &'static str) -> Self {
        Self {
            probe: ProbeBehavior::Fail(stderr),
            ..Self::with_geometry(0, 0)
        }
    }

    pub fn failing_remux(mut self) -> Self {
        self.fail_remux = true;
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(program, _)| program).collect()
    }
}

fn exit(status: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> CommandOutput {
    CommandOutput {
        status: Some(status),
        stdout: stdout.into(),
        stderr: stderr.into(),
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        match program {
            "ffprobe" => match self.probe {
                ProbeBehavior::Geometry(width, height) => Ok(exit(
                    0,
                    format!(r#"{{"streams":[{{"width":{},"height":{}}}]}}"#, width, height),
                    "",
                )),
                ProbeBehavior::Fail(stderr) => Ok(exit(1, "", stderr)),
            },
            "ffmpeg" => {
                let output = args.last().cloned().unwrap_or_default();
                if self.fail_remux {
                    std::fs::write(&output, b"partial").unwrap();
                    return Ok(exit(1, "", "moov atom not found"));
                }
                let input_index = args.iter().position(|a| a == "-i").unwrap() + 1;
                let mut remuxed = REMUX_MARKER.to_vec();
                remuxed.extend(std::fs::read(&args[input_index]).unwrap());
                std::fs::write(&output, remuxed).unwrap();
                Ok(exit(0, "", ""))
            }
            other => panic!("unexpected program {}", other),
        }
    }
}
