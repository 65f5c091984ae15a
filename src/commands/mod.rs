use anyhow::Result;
use serde::Serialize;

use crate::cli::Command;
use crate::storage::Storage;

pub mod records;

pub trait CommandRunner {
    fn run<S: Storage>(&self, storage: &S) -> Result<()>;
}

impl Command {
    pub fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            Command::Client { cmd } => cmd.run(storage),
            Command::Country { cmd } => cmd.run(storage),
            Command::MachineType { cmd } => cmd.run(storage),
            Command::Machine { cmd } => cmd.run(storage),
            Command::RepairType { cmd } => cmd.run(storage),
            Command::Repair { cmd } => cmd.run(storage),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_all<T, R>(records: Vec<T>) -> Result<()>
where
    R: Serialize + From<T>,
{
    let rendered: Vec<R> = records.into_iter().map(R::from).collect();
    print_json(&rendered)
}
