//! Stdin command loop: `<param name> <value>` or `quit`.

use std::io::BufRead;

use cv_modules::{modules::layout::ParamConfig, rack::ParamHandle, RackError};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set { name: String, value: f32 },
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
///
/// Parameter names may contain spaces ("Ch 1 level"), so the value is the
/// last whitespace-separated token.
pub fn parse_line(line: &str) -> Option<Result<Command, String>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
        return Some(Ok(Command::Quit));
    }

    let Some((name, value)) = line.rsplit_once(char::is_whitespace) else {
        return Some(Err(format!("expected '<param name> <value>', got '{line}'")));
    };
    Some(match value.parse::<f32>() {
        Ok(value) => Ok(Command::Set {
            name: name.trim().to_string(),
            value,
        }),
        Err(_) => Err(format!("'{value}' is not a number")),
    })
}

/// Try each module's handle in turn until one knows the parameter.
/// Returns the owning module's name and the parameter's config.
pub fn route(
    handles: &mut [ParamHandle],
    name: &str,
    value: f32,
) -> Result<(&'static str, &'static ParamConfig), RackError> {
    let mut last = None;
    for handle in handles.iter_mut() {
        let layout = handle.layout();
        match layout.param_index(name) {
            Ok(id) => {
                handle.set(id, value)?;
                return Ok((layout.name, layout.param(id)?));
            }
            Err(err) => last = Some(err),
        }
    }
    Err(last.unwrap_or_else(|| RackError::UnknownParam {
        module: "rack",
        name: name.to_string(),
    }))
}

/// Value as the module displays it, e.g. "6.02 dB" for a full channel fader.
pub fn describe(config: &ParamConfig, value: f32) -> String {
    format!("{:.2}{}", config.display_value(config.clamp(value)), config.unit)
}

/// Read commands until `quit` or end of input.
pub fn run(mut handles: Vec<ParamHandle>) -> std::io::Result<()> {
    let names: Vec<&str> = handles
        .iter()
        .flat_map(|h| h.layout().params.iter().map(|p| p.name))
        .collect();
    info!("parameters: {}", names.join(", "));
    info!("type '<param name> <value>' to change a parameter, 'quit' to stop");

    for line in std::io::stdin().lock().lines() {
        match parse_line(&line?) {
            None => {}
            Some(Ok(Command::Quit)) => break,
            Some(Ok(Command::Set { name, value })) => match route(&mut handles, &name, value) {
                Ok((module, config)) => info!(
                    module,
                    param = config.name,
                    display = %describe(config, value),
                    "queued"
                ),
                Err(err) => warn!(%err, "rejected"),
            },
            Some(Err(msg)) => warn!("{msg}"),
        }
    }
    Ok(())
}
