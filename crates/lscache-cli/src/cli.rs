//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use crate::config::Config;

pub const USAGE: &str = "\
Usage: lscache [--slot NAME] [--user ID] [--dir PATH] <command>

Commands:
  show                          print the whole slot as JSON
  users                         list user ids in the slot
  caches                        list cache names for the user
  list   <cache>                list entries with their age
  get    <cache> <entry>        print an entry as JSON
  put    <cache> <entry> <json> store an entry (non-JSON is stored as a string)
  delete <cache> <entry>        remove an entry
  clear  <cache>                remove every entry of a cache
  age    <cache> <entry>        print how long ago an entry was written
  reset                         remove the whole slot
  save-config                   write the effective slot/user/dir to the config file
  help                          show this message

Environment: LSCACHE_SLOT, LSCACHE_USER, LSCACHE_DIR (a .env file is read too).
Log level: RUST_LOG (default warn).";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    SaveConfig,
    Slot(SlotCommand),
}

/// Commands that read or write the slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotCommand {
    Show,
    Users,
    Caches,
    List { cache: String },
    Get { cache: String, entry: String },
    Put { cache: String, entry: String, value: String },
    Delete { cache: String, entry: String },
    Clear { cache: String },
    Age { cache: String, entry: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub slot: Option<String>,
    pub user: Option<String>,
    pub dir: Option<PathBuf>,
    pub command: Command,
}

impl Args {
    /// Flags win over anything already in `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(ref slot) = self.slot {
            config.slot_name = Some(slot.clone());
        }
        if let Some(ref user) = self.user {
            config.user = Some(user.clone());
        }
        if let Some(ref dir) = self.dir {
            config.store_dir = Some(dir.clone());
        }
    }
}

pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut slot = None;
    let mut user = None;
    let mut dir = None;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--slot" => slot = Some(flag_value(&mut args, "--slot")?),
            "--user" => user = Some(flag_value(&mut args, "--user")?),
            "--dir" => dir = Some(PathBuf::from(flag_value(&mut args, "--dir")?)),
            "-h" | "--help" => positional.insert(0, "help".to_string()),
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            _ => positional.push(arg),
        }
    }

    let command = parse_command(&positional)?;
    Ok(Args {
        slot,
        user,
        dir,
        command,
    })
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_command(positional: &[String]) -> Result<Command> {
    let Some((name, rest)) = positional.split_first() else {
        return Ok(Command::Help);
    };

    let expect = |count: usize| -> Result<()> {
        if rest.len() == count {
            Ok(())
        } else {
            Err(anyhow!(
                "'{}' takes {} argument(s), got {}",
                name,
                count,
                rest.len()
            ))
        }
    };
    let arg = |i: usize| rest[i].clone();

    let command = match name.as_str() {
        "help" => return Ok(Command::Help),
        "save-config" => return expect(0).map(|_| Command::SaveConfig),
        "show" => expect(0).map(|_| SlotCommand::Show)?,
        "users" => expect(0).map(|_| SlotCommand::Users)?,
        "caches" => expect(0).map(|_| SlotCommand::Caches)?,
        "list" => expect(1).map(|_| SlotCommand::List { cache: arg(0) })?,
        "get" => expect(2).map(|_| SlotCommand::Get {
            cache: arg(0),
            entry: arg(1),
        })?,
        "put" => expect(3).map(|_| SlotCommand::Put {
            cache: arg(0),
            entry: arg(1),
            value: arg(2),
        })?,
        "delete" => expect(2).map(|_| SlotCommand::Delete {
            cache: arg(0),
            entry: arg(1),
        })?,
        "clear" => expect(1).map(|_| SlotCommand::Clear { cache: arg(0) })?,
        "age" => expect(2).map(|_| SlotCommand::Age {
            cache: arg(0),
            entry: arg(1),
        })?,
        "reset" => expect(0).map(|_| SlotCommand::Reset)?,
        other => bail!("Unknown command: {}", other),
    };
    Ok(Command::Slot(command))
}
