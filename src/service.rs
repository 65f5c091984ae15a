use anyhow::{Context, Result};

use crate::storage::{
    Client, Country, Machine, MachineType, NewClient, NewCountry, NewMachine, NewMachineType,
    NewRepair, NewRepairType, Repair, RepairType, Storage, StorageRead, StorageTx, StorageWrite,
};
use crate::types::MaintenanceError;

/// Records a repair and bumps the machine's repair count in one transaction.
///
/// Fails with [`MaintenanceError::ReferenceNotFound`] when the machine does not
/// exist; in that case nothing is written. Any error after the transaction
/// opens drops it uncommitted, which rolls back both writes.
pub fn create_repair<S: Storage>(storage: &S, repair: NewRepair) -> Result<Repair> {
    let tx = storage.begin_tx().context("opening repair transaction")?;

    if tx.load_machine(repair.machine_id)?.is_none() {
        log::warn!("Repair rejected: machine {} not found", repair.machine_id);
        return Err(MaintenanceError::machine_not_found(repair.machine_id).into());
    }

    let created = tx.insert_repair(&repair).context("inserting repair")?;
    let touched = tx
        .increment_repair_count(repair.machine_id)
        .context("incrementing repair count")?;
    if touched != 1 {
        anyhow::bail!(
            "expected to update 1 machine row for machine {}, updated {}",
            repair.machine_id,
            touched
        );
    }
    tx.commit().context("committing repair")?;

    log::info!(
        "🔧 Repair {} recorded for machine {}",
        created.id,
        created.machine_id
    );
    Ok(created)
}

pub fn create_client<S: Storage>(storage: &S, client: NewClient) -> Result<Client> {
    let client = NewClient {
        name: required_name("client", &client.name)?,
        address: client.address,
    };
    insert_one(storage, |tx| tx.insert_client(&client))
}

pub fn create_country<S: Storage>(storage: &S, country: NewCountry) -> Result<Country> {
    let country = NewCountry {
        name: required_name("country", &country.name)?,
    };
    insert_one(storage, |tx| tx.insert_country(&country))
}

pub fn create_machine_type<S: Storage>(
    storage: &S,
    machine_type: NewMachineType,
) -> Result<MachineType> {
    insert_one(storage, |tx| tx.insert_machine_type(&machine_type))
}

pub fn create_machine<S: Storage>(storage: &S, machine: NewMachine) -> Result<Machine> {
    insert_one(storage, |tx| tx.insert_machine(&machine))
}

pub fn create_repair_type<S: Storage>(
    storage: &S,
    repair_type: NewRepairType,
) -> Result<RepairType> {
    insert_one(storage, |tx| tx.insert_repair_type(&repair_type))
}

fn insert_one<S, T, F>(storage: &S, insert: F) -> Result<T>
where
    S: Storage,
    F: FnOnce(&S::Tx) -> Result<T>,
{
    let tx = storage.begin_tx()?;
    let record = insert(&tx)?;
    tx.commit()?;
    Ok(record)
}

fn required_name(entity: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MaintenanceError::InvalidInput(format!("{entity} name must not be empty")).into());
    }
    Ok(trimmed.to_string())
}
