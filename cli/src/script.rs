//! Pointer script parsing.
//!
//! ```text
//! # enroll an L shape
//! down 150 150
//! move 150 450
//! up 450 750
//! wait 1100
//! ```

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};

use lattice_types::{Mode, PointerEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Pointer(PointerEvent),
    Wait(Duration),
    Resize { width: u32, height: u32 },
    Restart(Mode),
}

pub fn parse(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if line.is_empty() {
            continue;
        }
        let step = parse_line(line).with_context(|| format!("line {}: `{line}`", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        bail!("empty command");
    };
    let args: Vec<&str> = words.collect();

    let step = match command {
        "down" => {
            let (x, y) = pair(&args)?;
            Step::Pointer(PointerEvent::down(x, y))
        }
        "move" => {
            let (x, y) = pair(&args)?;
            Step::Pointer(PointerEvent::moved(x, y))
        }
        "up" => {
            let (x, y) = pair(&args)?;
            Step::Pointer(PointerEvent::up(x, y))
        }
        "wait" => {
            let [ms] = args.as_slice() else {
                bail!("expected `wait <ms>`");
            };
            Step::Wait(Duration::from_millis(number(ms)?))
        }
        "resize" => {
            let (width, height) = pair(&args)?;
            Step::Resize { width, height }
        }
        "restart" => {
            let [mode] = args.as_slice() else {
                bail!("expected `restart <enroll|authenticate>`");
            };
            let mode = Mode::parse(mode)
                .ok_or_else(|| anyhow!("unknown mode `{mode}`"))?;
            Step::Restart(mode)
        }
        other => bail!("unknown command `{other}`"),
    };
    Ok(step)
}

fn pair<T>(args: &[&str]) -> Result<(T, T)>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let [a, b] = args else {
        bail!("expected two arguments, found {}", args.len());
    };
    Ok((number(a)?, number(b)?))
}

fn number<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse()
        .with_context(|| format!("`{raw}` is not a valid number"))
}
