use std::cell::RefCell;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{ArgEnum, Parser};
use kvc::{Container, ContainerFn, Context, Deleter, Getter, MapContainer, Modifier, Putter};
use log::debug;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ArgEnum, Debug)]
enum Backend {
    Map,
    Adapter,
}

#[derive(Parser)]
#[clap(name = "kvc", author, version)]
#[clap(about = "Run commands against an in-memory container", long_about = None)]
struct Kvc {
    /// Script with one command per line, read from stdin when omitted
    #[clap(parse(from_os_str))]
    script: Option<PathBuf>,

    #[clap(long, arg_enum)]
    backend: Option<Backend>,

    /// Run the remaining commands after one fails
    #[clap(long)]
    keep_going: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum UpdateOp {
    Add,
    Sub,
    Mul,
    Set,
}

impl UpdateOp {
    fn apply(self, val: i64, arg: i64) -> i64 {
        match self {
            UpdateOp::Add => val.wrapping_add(arg),
            UpdateOp::Sub => val.wrapping_sub(arg),
            UpdateOp::Mul => val.wrapping_mul(arg),
            UpdateOp::Set => arg,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Command {
    Put { key: String, value: i64 },
    Get { key: String },
    Mod { key: String, update: Option<(UpdateOp, i64)> },
    Del { key: String },
    Len,
    Cap,
}

/// Script format, one command per line:
/// `put <key> <int>`
/// `get <key>`
/// `mod <key> [add|sub|mul|set <int>]`, no update means no update function
/// `del <key>`
/// `len`
/// `cap`
/// Blank lines and lines starting with '#' are skipped.
fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let int = |s: &str| -> Result<i64> {
        s.parse()
            .map_err(|_| anyhow!("invalid integer {:?} in {:?}", s, line))
    };

    let command = match words.as_slice() {
        ["put", key, value] => Command::Put {
            key: key.to_string(),
            value: int(*value)?,
        },
        ["get", key] => Command::Get {
            key: key.to_string(),
        },
        ["mod", key] => Command::Mod {
            key: key.to_string(),
            update: None,
        },
        ["mod", key, op, arg] => {
            let op = match *op {
                "add" => UpdateOp::Add,
                "sub" => UpdateOp::Sub,
                "mul" => UpdateOp::Mul,
                "set" => UpdateOp::Set,
                _ => bail!("invalid update {:?} in {:?}", op, line),
            };
            Command::Mod {
                key: key.to_string(),
                update: Some((op, int(*arg)?)),
            }
        }
        ["del", key] => Command::Del {
            key: key.to_string(),
        },
        ["len"] => Command::Len,
        ["cap"] => Command::Cap,
        _ => bail!("invalid command {:?}", line),
    };

    Ok(Some(command))
}

/// Runs one command and renders its outcome as a single output line.
fn execute<C>(container: &mut C, ctx: &Context, command: Command) -> kvc::Result<String>
where
    C: Container<String, i64>,
{
    match command {
        Command::Put { key, value } => container.put(ctx, key, value).map(|_| "ok".to_owned()),
        Command::Get { key } => container.get(ctx, key).map(|v| v.to_string()),
        Command::Mod { key, update } => {
            let result = match update {
                Some((op, arg)) => {
                    let f = move |val: i64| op.apply(val, arg);
                    container.modify(ctx, key, Some(&f))
                }
                None => container.modify(ctx, key, None),
            };
            result.map(|_| "ok".to_owned())
        }
        Command::Del { key } => container.del(ctx, key).map(|v| v.to_string()),
        Command::Len => container.len(ctx).map(|n| n.to_string()),
        Command::Cap => container.cap(ctx).map(|n| n.to_string()),
    }
}

/// Returns whether every command succeeded.
fn run<C>(container: &mut C, commands: Vec<Command>, keep_going: bool) -> bool
where
    C: Container<String, i64>,
{
    let ctx = Context::background();
    let mut all_ok = true;

    for command in commands {
        debug!("command: {:?}", command);
        match execute(container, &ctx, command) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                println!("error: {}", e);
                all_ok = false;
                if !keep_going {
                    break;
                }
            }
        }
    }

    all_ok
}

/// A `ContainerFn` whose functions all share one `MapContainer`.
fn shared_map_adapter() -> ContainerFn<String, i64> {
    let shared = Rc::new(RefCell::new(MapContainer::<String, i64>::new()));

    let put = shared.clone();
    let get = shared.clone();
    let modify = shared.clone();
    let del = shared.clone();
    let len = shared.clone();
    let cap = shared;

    ContainerFn::new()
        .with_put(move |ctx: &Context, key, val| put.borrow_mut().put(ctx, key, val))
        .with_get(move |ctx: &Context, key| get.borrow().get(ctx, key))
        .with_modify(move |ctx: &Context, key, f| modify.borrow_mut().modify(ctx, key, f))
        .with_del(move |ctx: &Context, key| del.borrow_mut().del(ctx, key))
        .with_len(move |ctx: &Context| len.borrow().len(ctx))
        .with_cap(move |ctx: &Context| cap.borrow().cap(ctx))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Kvc::parse();
    let backend = args.backend.unwrap_or(Backend::Map);

    debug!("kvc version: {:?}", env!("CARGO_PKG_VERSION"));
    debug!("backend: {:?}", backend);

    let script = match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut commands = Vec::new();
    for (n, line) in script.lines().enumerate() {
        let command = parse_line(line).with_context(|| format!("line {}", n + 1))?;
        commands.extend(command);
    }

    let all_ok = match backend {
        Backend::Map => run(&mut MapContainer::<String, i64>::new(), commands, args.keep_going),
        Backend::Adapter => run(&mut shared_map_adapter(), commands, args.keep_going),
    };

    if !all_ok {
        std::process::exit(1);
    }

    Ok(())
}
