use anyhow::{bail, Result};
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub(crate) config: Option<PathBuf>,
    pub(crate) command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Recommend {
        usecase: String,
        skill: String,
        hardware: Option<PathBuf>,
        json: bool,
    },
    Scores {
        usecase: String,
        skill: String,
        hardware: Option<PathBuf>,
    },
    Scan {
        output: Option<PathBuf>,
    },
    Info {
        distro_id: String,
    },
}

pub(crate) fn parse_invocation(args: &[String]) -> Result<Invocation> {
    let (config, rest) = match args {
        [flag, path, rest @ ..] if flag == "--config" => (Some(PathBuf::from(path)), rest),
        [flag] if flag == "--config" => bail!("--config requires a path"),
        rest => (None, rest),
    };

    let command = match rest {
        [cmd, usecase, skill, opts @ ..] if cmd == "recommend" => {
            let opts = parse_options(opts, &["--hardware"], &["--json"])?;
            Command::Recommend {
                usecase: usecase.clone(),
                skill: skill.clone(),
                hardware: opts.value("--hardware").map(PathBuf::from),
                json: opts.switch("--json"),
            }
        }
        [cmd, usecase, skill, opts @ ..] if cmd == "scores" => {
            let opts = parse_options(opts, &["--hardware"], &[])?;
            Command::Scores {
                usecase: usecase.clone(),
                skill: skill.clone(),
                hardware: opts.value("--hardware").map(PathBuf::from),
            }
        }
        [cmd, opts @ ..] if cmd == "scan" => {
            let opts = parse_options(opts, &["--output"], &[])?;
            Command::Scan {
                output: opts.value("--output").map(PathBuf::from),
            }
        }
        [cmd, distro_id] if cmd == "info" => Command::Info {
            distro_id: distro_id.clone(),
        },
        _ => bail!(crate::usage()),
    };

    Ok(Invocation { config, command })
}

#[derive(Debug, Default)]
struct Options {
    values: Vec<(String, String)>,
    switches: Vec<String>,
}

impl Options {
    fn value(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }
}

fn parse_options(args: &[String], valued: &[&str], switches: &[&str]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if valued.contains(&arg.as_str()) {
            let Some(value) = iter.next() else {
                bail!("option '{}' requires a value", arg);
            };
            options.values.push((arg.clone(), value.clone()));
        } else if switches.contains(&arg.as_str()) {
            options.switches.push(arg.clone());
        } else {
            bail!("unexpected argument '{}'\n{}", arg, crate::usage());
        }
    }
    Ok(options)
}
