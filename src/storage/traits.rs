use anyhow::Result;
use chrono::NaiveDate;

use crate::types::Cost;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCountry {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineType {
    pub id: i64,
    pub country_id: i64,
    pub year_of_manufacture: i32,
    pub brand: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMachineType {
    pub country_id: i64,
    pub year_of_manufacture: i32,
    pub brand: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub id: i64,
    pub machine_type_id: i64,
    pub client_id: i64,
    pub serial_number: String,
    pub repair_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMachine {
    pub machine_type_id: i64,
    pub client_id: i64,
    pub serial_number: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairType {
    pub id: i64,
    pub name: String,
    pub duration_days: u32,
    pub cost: Cost,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRepairType {
    pub name: String,
    pub duration_days: u32,
    pub cost: Cost,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repair {
    pub id: i64,
    pub machine_id: i64,
    pub repair_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRepair {
    pub machine_id: i64,
    pub repair_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Read access to every record table. Lists are ordered by id.
pub trait StorageRead {
    fn list_clients(&self) -> Result<Vec<Client>>;
    fn list_countries(&self) -> Result<Vec<Country>>;
    fn list_machine_types(&self) -> Result<Vec<MachineType>>;
    fn list_machines(&self) -> Result<Vec<Machine>>;
    fn list_repair_types(&self) -> Result<Vec<RepairType>>;
    fn list_repairs(&self) -> Result<Vec<Repair>>;
    fn load_machine(&self, id: i64) -> Result<Option<Machine>>;
}

pub trait StorageWrite {
    fn insert_client(&self, client: &NewClient) -> Result<Client>;
    fn insert_country(&self, country: &NewCountry) -> Result<Country>;
    fn insert_machine_type(&self, machine_type: &NewMachineType) -> Result<MachineType>;
    fn insert_machine(&self, machine: &NewMachine) -> Result<Machine>;
    fn insert_repair_type(&self, repair_type: &NewRepairType) -> Result<RepairType>;
    fn insert_repair(&self, repair: &NewRepair) -> Result<Repair>;
    /// Adds one to the machine's repair count; returns the number of rows touched.
    fn increment_repair_count(&self, machine_id: i64) -> Result<usize>;
}

/// A write scope over one connection. Dropping it without `commit` rolls back.
pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> Result<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    fn begin_tx(&self) -> Result<Self::Tx>;
}
