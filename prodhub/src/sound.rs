//! Alarm audio backends.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use prodhub_core::alarm::{Silence, Sound, SoundError};

use crate::config::SoundSetting;

/// ASCII bell.
const BEL: &[u8] = b"\x07";

/// Build the backend selected by `setting`.
#[must_use]
pub fn from_setting(setting: &SoundSetting) -> Box<dyn Sound + Send> {
    match setting {
        SoundSetting::Bell => Box::new(TerminalBell::new(io::stdout())),
        SoundSetting::Mute => Box::new(Silence),
        SoundSetting::Command(argv) => match argv.split_first() {
            Some((program, args)) => Box::new(CommandSound::new(program.clone(), args.to_vec())),
            None => Box::new(Silence),
        },
    }
}

/// Rings the terminal bell on start and on every tick while ringing.
pub struct TerminalBell<W: Write> {
    out: W,
    ringing: bool,
}

impl<W: Write> TerminalBell<W> {
    /// A bell writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            ringing: false,
        }
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    fn ring(&mut self) -> io::Result<()> {
        self.out.write_all(BEL)?;
        self.out.flush()
    }
}

impl<W: Write> Sound for TerminalBell<W> {
    fn start(&mut self) -> Result<(), SoundError> {
        self.ring()
            .map_err(|e| SoundError::StartFailed(format!("terminal bell: {e}")))?;
        self.ringing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.ringing = false;
    }

    fn tick(&mut self) {
        if self.ringing
            && let Err(err) = self.ring()
        {
            tracing::debug!(error = %err, "terminal bell write failed");
        }
    }
}

/// Plays a sound by running an external command, starting it again each
/// time it exits until stopped.
pub struct CommandSound {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSound {
    /// A backend that runs `program` with `args`.
    #[must_use]
    pub const fn new(program: String, args: Vec<String>) -> Self {
        Self {
            program,
            args,
            child: None,
        }
    }

    /// Whether a player process is currently attached.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.child.is_some()
    }

    fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

impl Sound for CommandSound {
    fn start(&mut self) -> Result<(), SoundError> {
        self.stop();
        let child = self
            .spawn()
            .map_err(|e| SoundError::StartFailed(format!("{}: {e}", self.program)))?;
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine.
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn tick(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(_)) => match self.spawn() {
                Ok(next) => self.child = Some(next),
                Err(err) => {
                    tracing::warn!(program = %self.program, error = %err, "alarm sound restart failed");
                    self.child = None;
                }
            },
            Err(err) => {
                tracing::warn!(program = %self.program, error = %err, "alarm sound status unknown");
            }
        }
    }
}

impl Drop for CommandSound {
    fn drop(&mut self) {
        self.stop();
    }
}
