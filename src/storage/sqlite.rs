use anyhow::Result;
use rusqlite::{params, types::Type, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;

use super::traits::{
    Client, Country, Machine, MachineType, NewClient, NewCountry, NewMachine, NewMachineType,
    NewRepair, NewRepairType, Repair, RepairType, Storage, StorageRead, StorageTx, StorageWrite,
};
use crate::types::Cost;

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
    committed: bool,
}

impl StorageTx for SqliteTx {
    fn commit(mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for SqliteTx {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Err(err) = self.conn.execute("ROLLBACK", []) {
            log::warn!("SQLite rollback failed: {}", err);
        }
    }
}

fn open_connection(path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(std::time::Duration::from_millis(500))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    SqliteStorage::migrate(&conn)?;
    Ok(conn)
}

fn column_u32(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<u32> {
    let value: i64 = row.get(idx)?;
    value
        .try_into()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(err)))
}

fn column_cost(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Cost> {
    let cents: i64 = row.get(idx)?;
    let cents: u64 = cents
        .try_into()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(err)))?;
    Ok(Cost::from_cents(cents))
}

fn map_client_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn map_country_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn map_machine_type_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MachineType> {
    Ok(MachineType {
        id: row.get(0)?,
        country_id: row.get(1)?,
        year_of_manufacture: row.get(2)?,
        brand: row.get(3)?,
    })
}

fn map_machine_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Machine> {
    Ok(Machine {
        id: row.get(0)?,
        machine_type_id: row.get(1)?,
        client_id: row.get(2)?,
        serial_number: row.get(3)?,
        repair_count: column_u32(row, 4)?,
    })
}

fn map_repair_type_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RepairType> {
    Ok(RepairType {
        id: row.get(0)?,
        name: row.get(1)?,
        duration_days: column_u32(row, 2)?,
        cost: column_cost(row, 3)?,
        notes: row.get(4)?,
    })
}

fn map_repair_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Repair> {
    Ok(Repair {
        id: row.get(0)?,
        machine_id: row.get(1)?,
        repair_type_id: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn db_list<T>(
    conn: &Connection,
    sql: &str,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mapped = stmt
        .query_map([], map)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_list_clients(conn: &Connection) -> rusqlite::Result<Vec<Client>> {
    db_list(
        conn,
        "SELECT id, name, address FROM clients ORDER BY id",
        map_client_row,
    )
}

fn db_list_countries(conn: &Connection) -> rusqlite::Result<Vec<Country>> {
    db_list(
        conn,
        "SELECT id, name FROM countries ORDER BY id",
        map_country_row,
    )
}

fn db_list_machine_types(conn: &Connection) -> rusqlite::Result<Vec<MachineType>> {
    db_list(
        conn,
        "SELECT id, country_id, year_of_manufacture, brand FROM machine_types ORDER BY id",
        map_machine_type_row,
    )
}

fn db_list_machines(conn: &Connection) -> rusqlite::Result<Vec<Machine>> {
    db_list(
        conn,
        "SELECT id, machine_type_id, client_id, serial_number, repair_count FROM machines ORDER BY id",
        map_machine_row,
    )
}

fn db_list_repair_types(conn: &Connection) -> rusqlite::Result<Vec<RepairType>> {
    db_list(
        conn,
        "SELECT id, name, duration_days, cost_cents, notes FROM repair_types ORDER BY id",
        map_repair_type_row,
    )
}

fn db_list_repairs(conn: &Connection) -> rusqlite::Result<Vec<Repair>> {
    db_list(
        conn,
        "SELECT id, machine_id, repair_type_id, start_date, end_date, notes FROM repairs ORDER BY id",
        map_repair_row,
    )
}

fn db_load_machine(conn: &Connection, id: i64) -> rusqlite::Result<Option<Machine>> {
    conn.query_row(
        "SELECT id, machine_type_id, client_id, serial_number, repair_count FROM machines WHERE id = ?1",
        params![id],
        map_machine_row,
    )
    .optional()
}

fn db_insert_client(conn: &Connection, client: &NewClient) -> rusqlite::Result<Client> {
    conn.execute(
        "INSERT INTO clients (name, address) VALUES (?1, ?2)",
        params![client.name, client.address],
    )?;
    Ok(Client {
        id: conn.last_insert_rowid(),
        name: client.name.clone(),
        address: client.address.clone(),
    })
}

fn db_insert_country(conn: &Connection, country: &NewCountry) -> rusqlite::Result<Country> {
    conn.execute(
        "INSERT INTO countries (name) VALUES (?1)",
        params![country.name],
    )?;
    Ok(Country {
        id: conn.last_insert_rowid(),
        name: country.name.clone(),
    })
}

fn db_insert_machine_type(
    conn: &Connection,
    machine_type: &NewMachineType,
) -> rusqlite::Result<MachineType> {
    conn.execute(
        "INSERT INTO machine_types (country_id, year_of_manufacture, brand) VALUES (?1, ?2, ?3)",
        params![
            machine_type.country_id,
            machine_type.year_of_manufacture,
            machine_type.brand
        ],
    )?;
    Ok(MachineType {
        id: conn.last_insert_rowid(),
        country_id: machine_type.country_id,
        year_of_manufacture: machine_type.year_of_manufacture,
        brand: machine_type.brand.clone(),
    })
}

fn db_insert_machine(conn: &Connection, machine: &NewMachine) -> rusqlite::Result<Machine> {
    conn.execute(
        "INSERT INTO machines (machine_type_id, client_id, serial_number, repair_count) VALUES (?1, ?2, ?3, 0)",
        params![
            machine.machine_type_id,
            machine.client_id,
            machine.serial_number
        ],
    )?;
    Ok(Machine {
        id: conn.last_insert_rowid(),
        machine_type_id: machine.machine_type_id,
        client_id: machine.client_id,
        serial_number: machine.serial_number.clone(),
        repair_count: 0,
    })
}

fn db_insert_repair_type(
    conn: &Connection,
    repair_type: &NewRepairType,
) -> rusqlite::Result<RepairType> {
    let cost_cents = i64::try_from(repair_type.cost.cents())
        .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;
    conn.execute(
        "INSERT INTO repair_types (name, duration_days, cost_cents, notes) VALUES (?1, ?2, ?3, ?4)",
        params![
            repair_type.name,
            repair_type.duration_days,
            cost_cents,
            repair_type.notes
        ],
    )?;
    Ok(RepairType {
        id: conn.last_insert_rowid(),
        name: repair_type.name.clone(),
        duration_days: repair_type.duration_days,
        cost: repair_type.cost,
        notes: repair_type.notes.clone(),
    })
}

fn db_insert_repair(conn: &Connection, repair: &NewRepair) -> rusqlite::Result<Repair> {
    conn.execute(
        r#"
        INSERT INTO repairs (machine_id, repair_type_id, start_date, end_date, notes)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            repair.machine_id,
            repair.repair_type_id,
            repair.start_date,
            repair.end_date,
            repair.notes
        ],
    )?;
    Ok(Repair {
        id: conn.last_insert_rowid(),
        machine_id: repair.machine_id,
        repair_type_id: repair.repair_type_id,
        start_date: repair.start_date,
        end_date: repair.end_date,
        notes: repair.notes.clone(),
    })
}

fn db_increment_repair_count(conn: &Connection, machine_id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE machines SET repair_count = repair_count + 1 WHERE id = ?1",
        params![machine_id],
    )
}

impl StorageRead for SqliteTx {
    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(db_list_clients(&self.conn)?)
    }

    fn list_countries(&self) -> Result<Vec<Country>> {
        Ok(db_list_countries(&self.conn)?)
    }

    fn list_machine_types(&self) -> Result<Vec<MachineType>> {
        Ok(db_list_machine_types(&self.conn)?)
    }

    fn list_machines(&self) -> Result<Vec<Machine>> {
        Ok(db_list_machines(&self.conn)?)
    }

    fn list_repair_types(&self) -> Result<Vec<RepairType>> {
        Ok(db_list_repair_types(&self.conn)?)
    }

    fn list_repairs(&self) -> Result<Vec<Repair>> {
        Ok(db_list_repairs(&self.conn)?)
    }

    fn load_machine(&self, id: i64) -> Result<Option<Machine>> {
        Ok(db_load_machine(&self.conn, id)?)
    }
}

impl StorageWrite for SqliteTx {
    fn insert_client(&self, client: &NewClient) -> Result<Client> {
        Ok(db_insert_client(&self.conn, client)?)
    }

    fn insert_country(&self, country: &NewCountry) -> Result<Country> {
        Ok(db_insert_country(&self.conn, country)?)
    }

    fn insert_machine_type(&self, machine_type: &NewMachineType) -> Result<MachineType> {
        Ok(db_insert_machine_type(&self.conn, machine_type)?)
    }

    fn insert_machine(&self, machine: &NewMachine) -> Result<Machine> {
        Ok(db_insert_machine(&self.conn, machine)?)
    }

    fn insert_repair_type(&self, repair_type: &NewRepairType) -> Result<RepairType> {
        Ok(db_insert_repair_type(&self.conn, repair_type)?)
    }

    fn insert_repair(&self, repair: &NewRepair) -> Result<Repair> {
        Ok(db_insert_repair(&self.conn, repair)?)
    }

    fn increment_repair_count(&self, machine_id: i64) -> Result<usize> {
        Ok(db_increment_repair_count(&self.conn, machine_id)?)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> Result<Self::Tx> {
        let conn = open_connection(&self.path)?;
        conn.execute("BEGIN IMMEDIATE", [])?;

        Ok(SqliteTx {
            conn,
            committed: false,
        })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Deletes the database file along with its WAL sidecars.
    pub fn reset_all(&self) -> Result<()> {
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{}{}", self.path, suffix);
            if Path::new(&path).exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = open_connection(&self.path)?;
        f(&conn)
    }

    fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
        conn.query_row("PRAGMA user_version", [], |row| row.get(0))
    }

    fn version_mismatch() -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        )
    }

    /// Installs the schema on a fresh database. The version is re-read under
    /// the write lock so concurrent openers install it at most once, and the
    /// tables and `user_version` commit together.
    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        if Self::schema_version(conn)? == DB_SCHEMA_VERSION {
            return Ok(());
        }

        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        let version = Self::schema_version(&tx)?;

        if version == DB_SCHEMA_VERSION {
            return tx.commit();
        }

        if version != 0 {
            return Err(Self::version_mismatch());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        tx.execute_batch(
            r#"
            CREATE TABLE clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(trim(name)) > 0),
                address TEXT
            );
            CREATE TABLE countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
            );
            CREATE TABLE machine_types (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                country_id INTEGER NOT NULL REFERENCES countries(id),
                year_of_manufacture INTEGER NOT NULL,
                brand TEXT NOT NULL
            );
            CREATE TABLE machines (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                machine_type_id INTEGER NOT NULL REFERENCES machine_types(id),
                client_id INTEGER NOT NULL REFERENCES clients(id),
                serial_number TEXT NOT NULL UNIQUE,
                repair_count INTEGER NOT NULL DEFAULT 0 CHECK (repair_count >= 0)
            );
            CREATE TABLE repair_types (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                duration_days INTEGER NOT NULL CHECK (duration_days >= 0),
                cost_cents INTEGER NOT NULL CHECK (cost_cents >= 0),
                notes TEXT
            );
            CREATE TABLE repairs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                machine_id INTEGER NOT NULL REFERENCES machines(id),
                repair_type_id INTEGER NOT NULL REFERENCES repair_types(id),
                start_date TEXT NOT NULL,
                end_date TEXT,
                notes TEXT
            );
            CREATE INDEX repairs_machine_idx ON repairs(machine_id);
            CREATE INDEX machines_client_idx ON machines(client_id);
        "#,
        )?;
        tx.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
        tx.commit()
    }
}

impl StorageRead for SqliteStorage {
    fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.with_conn(db_list_clients)?)
    }

    fn list_countries(&self) -> Result<Vec<Country>> {
        Ok(self.with_conn(db_list_countries)?)
    }

    fn list_machine_types(&self) -> Result<Vec<MachineType>> {
        Ok(self.with_conn(db_list_machine_types)?)
    }

    fn list_machines(&self) -> Result<Vec<Machine>> {
        Ok(self.with_conn(db_list_machines)?)
    }

    fn list_repair_types(&self) -> Result<Vec<RepairType>> {
        Ok(self.with_conn(db_list_repair_types)?)
    }

    fn list_repairs(&self) -> Result<Vec<Repair>> {
        Ok(self.with_conn(db_list_repairs)?)
    }

    fn load_machine(&self, id: i64) -> Result<Option<Machine>> {
        let machine = self.with_conn(|conn| db_load_machine(conn, id))?;
        Ok(machine)
    }
}
