//! Purpose: Hold top-level CLI command dispatch for `vlc-bootstrap`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Success output is a single JSON document on stdout.

use super::*;

pub(super) fn dispatch_command(command: Command, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "vlc-bootstrap", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Probe(args) => {
            let bootstrap = args.bootstrap();
            let discovery = bootstrap.discover(args.vlc_path.as_deref());
            let value = serde_json::to_value(&discovery).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode discovery report")
                    .with_source(err)
            })?;
            emit_json(value, color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Init(args) => {
            let mut bootstrap = args.bootstrap();
            let initialized = bootstrap.try_initialize(args.vlc_path.as_deref())?;
            let mut value = serde_json::to_value(initialized).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode bootstrap state")
                    .with_source(err)
            })?;
            if let Value::Object(map) = &mut value {
                map.insert("initialized".to_string(), Value::Bool(true));
            }
            emit_json(value, color_mode);
            Ok(RunOutcome::ok())
        }
    }
}
