//! Process and file-open primitives.
//!
//! `Launcher` is the seam between the action dispatcher and the OS. The
//! dispatcher decides *what* may be launched; a launcher only spawns.

use std::process::{Command, Stdio};

use super::errors::ActionError;

/// One thing to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchRequest {
    /// Run an allow-listed program with arguments.
    Program { program: String, args: Vec<String> },
    /// Hand a path or URL to the platform opener.
    Open { target: String },
}

impl LaunchRequest {
    /// Split an allow-listed command line and append extra arguments.
    pub fn from_command_line(command: &str, extra: Option<&str>) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let mut args: Vec<String> = parts.collect();
        if let Some(extra) = extra {
            args.push(extra.to_string());
        }
        Some(LaunchRequest::Program { program, args })
    }

    pub fn open(target: impl Into<String>) -> Self {
        LaunchRequest::Open {
            target: target.into(),
        }
    }

    /// Human-readable command, for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            LaunchRequest::Program { program, args } if args.is_empty() => program.clone(),
            LaunchRequest::Program { program, args } => format!("{program} {}", args.join(" ")),
            LaunchRequest::Open { target } => format!("{} {target}", platform_opener().0),
        }
    }
}

/// Starts processes on behalf of the dispatcher.
pub trait Launcher: Send + Sync {
    fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError>;
}

/// Spawns real, detached processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<(), ActionError> {
        let mut cmd = match request {
            LaunchRequest::Program { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            LaunchRequest::Open { target } => {
                let (opener, prefix) = platform_opener();
                let mut cmd = Command::new(opener);
                cmd.args(prefix).arg(target);
                cmd
            }
        };

        // Windows: prevent a console window from flashing up
        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        cmd.spawn().map_err(|e| ActionError::LaunchFailed {
            command: request.describe(),
            reason: e.to_string(),
        })?;

        tracing::debug!(command = %request.describe(), "process spawned");
        Ok(())
    }
}

/// The platform's "open with default handler" command and its leading args.
fn platform_opener() -> (&'static str, &'static [&'static str]) {
    const WINDOWS_START: &[&str] = &["/C", "start", ""];
    const NO_ARGS: &[&str] = &[];

    if cfg!(target_os = "windows") {
        ("cmd", WINDOWS_START)
    } else if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else {
        ("xdg-open", NO_ARGS)
    }
}
