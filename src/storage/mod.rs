pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{
    Client, Country, Machine, MachineType, NewClient, NewCountry, NewMachine, NewMachineType,
    NewRepair, NewRepairType, Repair, RepairType, Storage, StorageRead, StorageTx, StorageWrite,
};
