use chrono::NaiveDate;
use clap::Subcommand;

use crate::types::Cost;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Add or list clients")]
    Client {
        #[command(subcommand)]
        cmd: ClientCmd,
    },
    #[command(about = "Add or list countries of manufacture")]
    Country {
        #[command(subcommand)]
        cmd: CountryCmd,
    },
    #[command(
        about = "Add or list machine types",
        long_about = "A machine type is a brand and year of manufacture made in a given country."
    )]
    MachineType {
        #[command(subcommand)]
        cmd: MachineTypeCmd,
    },
    #[command(about = "Add or list machines")]
    Machine {
        #[command(subcommand)]
        cmd: MachineCmd,
    },
    #[command(about = "Add or list repair types")]
    RepairType {
        #[command(subcommand)]
        cmd: RepairTypeCmd,
    },
    #[command(
        about = "Record or list repairs",
        long_about = "Recording a repair checks that the machine exists and increments its repair count in the same transaction."
    )]
    Repair {
        #[command(subcommand)]
        cmd: RepairCmd,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClientCmd {
    #[command(about = "Add a client")]
    Add {
        #[arg(long, help = "Client name (must not be empty)")]
        name: String,
        #[arg(long, help = "Postal address")]
        address: Option<String>,
    },
    #[command(about = "List all clients")]
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CountryCmd {
    #[command(about = "Add a country")]
    Add {
        #[arg(long, help = "Country name (unique)")]
        name: String,
    },
    #[command(about = "List all countries")]
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MachineTypeCmd {
    #[command(about = "Add a machine type")]
    Add {
        #[arg(long, value_name = "ID", help = "Country of manufacture")]
        country_id: i64,
        #[arg(long = "year", value_name = "YEAR", help = "Year of manufacture")]
        year_of_manufacture: i32,
        #[arg(long)]
        brand: String,
    },
    #[command(about = "List all machine types")]
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MachineCmd {
    #[command(about = "Add a machine with a repair count of zero")]
    Add {
        #[arg(long, value_name = "ID")]
        machine_type_id: i64,
        #[arg(long, value_name = "ID", help = "Owning client")]
        client_id: i64,
        #[arg(long, value_name = "SN", help = "Serial number (unique)")]
        serial_number: String,
    },
    #[command(about = "List all machines")]
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RepairTypeCmd {
    #[command(about = "Add a repair type")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_name = "DAYS", help = "Expected duration in days")]
        duration_days: u32,
        #[arg(long, value_name = "AMOUNT", help = "Cost with at most two decimals, e.g. 120.50")]
        cost: Cost,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(about = "List all repair types")]
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RepairCmd {
    #[command(about = "Record a repair for an existing machine")]
    Add {
        #[arg(long, value_name = "ID")]
        machine_id: i64,
        #[arg(long, value_name = "ID")]
        repair_type_id: i64,
        #[arg(long, value_name = "YYYY-MM-DD")]
        start_date: NaiveDate,
        #[arg(long, value_name = "YYYY-MM-DD")]
        end_date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    #[command(about = "List all repairs")]
    List,
}
