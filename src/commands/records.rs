use anyhow::{Context, Result};

use super::{print_all, print_json, CommandRunner};
use crate::cli;
use crate::rest::models::{
    ClientResponse, CountryResponse, MachineResponse, MachineTypeResponse, RepairResponse,
    RepairTypeResponse,
};
use crate::service;
use crate::storage::{
    NewClient, NewCountry, NewMachine, NewMachineType, NewRepair, NewRepairType, Storage,
};

impl CommandRunner for cli::ClientCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::ClientCmd::Add { name, address } => {
                let client = service::create_client(
                    storage,
                    NewClient {
                        name: name.clone(),
                        address: address.clone(),
                    },
                )
                .context("adding client")?;
                log::info!("added client id={}", client.id);
                print_json(&ClientResponse::from(client))
            }
            cli::ClientCmd::List => {
                print_all::<_, ClientResponse>(storage.list_clients().context("listing clients")?)
            }
        }
    }
}

impl CommandRunner for cli::CountryCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::CountryCmd::Add { name } => {
                let country = service::create_country(storage, NewCountry { name: name.clone() })
                    .context("adding country")?;
                log::info!("added country id={}", country.id);
                print_json(&CountryResponse::from(country))
            }
            cli::CountryCmd::List => print_all::<_, CountryResponse>(
                storage.list_countries().context("listing countries")?,
            ),
        }
    }
}

impl CommandRunner for cli::MachineTypeCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::MachineTypeCmd::Add {
                country_id,
                year_of_manufacture,
                brand,
            } => {
                let machine_type = service::create_machine_type(
                    storage,
                    NewMachineType {
                        country_id: *country_id,
                        year_of_manufacture: *year_of_manufacture,
                        brand: brand.clone(),
                    },
                )
                .context("adding machine type")?;
                log::info!("added machine type id={}", machine_type.id);
                print_json(&MachineTypeResponse::from(machine_type))
            }
            cli::MachineTypeCmd::List => print_all::<_, MachineTypeResponse>(
                storage
                    .list_machine_types()
                    .context("listing machine types")?,
            ),
        }
    }
}

impl CommandRunner for cli::MachineCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::MachineCmd::Add {
                machine_type_id,
                client_id,
                serial_number,
            } => {
                let machine = service::create_machine(
                    storage,
                    NewMachine {
                        machine_type_id: *machine_type_id,
                        client_id: *client_id,
                        serial_number: serial_number.clone(),
                    },
                )
                .context("adding machine")?;
                log::info!(
                    "added machine id={} serial={}",
                    machine.id,
                    machine.serial_number
                );
                print_json(&MachineResponse::from(machine))
            }
            cli::MachineCmd::List => print_all::<_, MachineResponse>(
                storage.list_machines().context("listing machines")?,
            ),
        }
    }
}

impl CommandRunner for cli::RepairTypeCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::RepairTypeCmd::Add {
                name,
                duration_days,
                cost,
                notes,
            } => {
                let repair_type = service::create_repair_type(
                    storage,
                    NewRepairType {
                        name: name.clone(),
                        duration_days: *duration_days,
                        cost: *cost,
                        notes: notes.clone(),
                    },
                )
                .context("adding repair type")?;
                log::info!("added repair type id={}", repair_type.id);
                print_json(&RepairTypeResponse::from(repair_type))
            }
            cli::RepairTypeCmd::List => print_all::<_, RepairTypeResponse>(
                storage.list_repair_types().context("listing repair types")?,
            ),
        }
    }
}

impl CommandRunner for cli::RepairCmd {
    fn run<S: Storage>(&self, storage: &S) -> Result<()> {
        match self {
            cli::RepairCmd::Add {
                machine_id,
                repair_type_id,
                start_date,
                end_date,
                notes,
            } => {
                let repair = service::create_repair(
                    storage,
                    NewRepair {
                        machine_id: *machine_id,
                        repair_type_id: *repair_type_id,
                        start_date: *start_date,
                        end_date: *end_date,
                        notes: notes.clone(),
                    },
                )
                .context("recording repair")?;
                print_json(&RepairResponse::from(repair))
            }
            cli::RepairCmd::List => print_all::<_, RepairResponse>(
                storage.list_repairs().context("listing repairs")?,
            ),
        }
    }
}
