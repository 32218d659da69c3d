//! safety-hooks: PreToolUse hook for Claude Code.
//!
//! Reads the hook event as JSON from stdin, writes the decision JSON to
//! stdout, and always exits 0 so a hook failure never wedges the host.
//!
//! Usage:
//!   safety-hooks [--format auto|flat|nested]
//!   safety-hooks --dump-config

use std::io::Read;
use std::process::ExitCode;

use safety_hooks::config::Settings;
use safety_hooks::error::HookError;
use safety_hooks::hook::{self, HookInput, OutputFormat};
use safety_hooks::logging;

struct Args {
    format: OutputFormat,
    dump_config: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        format: OutputFormat::default(),
        dump_config: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--dump-config" => args.dump_config = true,
            "--format" => {
                let value = it.next().ok_or("--format needs a value")?;
                args.format = value.parse()?;
            }
            other => match other.strip_prefix("--format=") {
                Some(value) => args.format = value.parse()?,
                None => return Err(format!("unknown argument '{other}'")),
            },
        }
    }
    Ok(args)
}

fn read_stdin() -> Result<String, HookError> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("safety-hooks: {e}");
            return ExitCode::from(2);
        }
    };

    let cwd = std::env::current_dir().unwrap_or_default();

    if args.dump_config {
        let (settings, skipped) = Settings::load(&cwd);
        for e in &skipped {
            eprintln!("safety-hooks: ignoring config layer: {e}");
        }
        match toml::to_string_pretty(&settings) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("safety-hooks: cannot render config: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let input = read_stdin().and_then(|raw| HookInput::parse(&raw));
    let cwd = input.as_ref().map(HookInput::working_dir).unwrap_or(cwd);

    let (settings, skipped) = Settings::load(&cwd);
    logging::init(&settings.logging);
    for e in &skipped {
        log::warn!("ignoring config layer: {e}");
    }

    let (response, subject, event_name) = match &input {
        Ok(input) => (
            hook::decide(input, &settings),
            hook::describe(input),
            input.event_name(),
        ),
        Err(e) => (hook::malformed(e), format!("<{e}>"), "PreToolUse"),
    };
    logging::log_decision(&subject, &response);

    let output = hook::render(&response, args.format, event_name);
    println!("{output}");
    ExitCode::SUCCESS
}
