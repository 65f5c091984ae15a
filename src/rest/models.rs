use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::storage::{Client, Country, Machine, MachineType, NewRepair, Repair, RepairType};
use crate::types::Cost;

#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientResponse {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MachineTypeResponse {
    pub id: i64,
    pub country_id: i64,
    pub year_of_manufacture: i32,
    pub brand: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MachineResponse {
    pub id: i64,
    pub machine_type_id: i64,
    pub client_id: i64,
    pub serial_number: String,
    pub repair_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RepairTypeResponse {
    pub id: i64,
    pub name: String,
    pub duration_days: u32,
    pub cost: Cost,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRepairRequest {
    pub machine_id: i64,
    pub repair_type_id: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairResponse {
    pub id: i64,
    pub machine_id: i64,
    pub repair_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            address: client.address,
        }
    }
}

impl From<Country> for CountryResponse {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
        }
    }
}

impl From<MachineType> for MachineTypeResponse {
    fn from(machine_type: MachineType) -> Self {
        Self {
            id: machine_type.id,
            country_id: machine_type.country_id,
            year_of_manufacture: machine_type.year_of_manufacture,
            brand: machine_type.brand,
        }
    }
}

impl From<Machine> for MachineResponse {
    fn from(machine: Machine) -> Self {
        Self {
            id: machine.id,
            machine_type_id: machine.machine_type_id,
            client_id: machine.client_id,
            serial_number: machine.serial_number,
            repair_count: machine.repair_count,
        }
    }
}

impl From<RepairType> for RepairTypeResponse {
    fn from(repair_type: RepairType) -> Self {
        Self {
            id: repair_type.id,
            name: repair_type.name,
            duration_days: repair_type.duration_days,
            cost: repair_type.cost,
            notes: repair_type.notes,
        }
    }
}

impl From<Repair> for RepairResponse {
    fn from(repair: Repair) -> Self {
        Self {
            id: repair.id,
            machine_id: repair.machine_id,
            repair_type_id: repair.repair_type_id,
            start_date: repair.start_date,
            end_date: repair.end_date,
            notes: repair.notes,
        }
    }
}

impl From<CreateRepairRequest> for NewRepair {
    fn from(request: CreateRepairRequest) -> Self {
        Self {
            machine_id: request.machine_id,
            repair_type_id: request.repair_type_id,
            start_date: request.start_date,
            end_date: request.end_date,
            notes: request.notes,
        }
    }
}
