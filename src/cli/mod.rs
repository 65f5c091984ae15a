mod args;
mod command;

pub use args::Cli;
pub use command::{
    ClientCmd, Command, CountryCmd, MachineCmd, MachineTypeCmd, RepairCmd, RepairTypeCmd,
};

pub use args::parse;
