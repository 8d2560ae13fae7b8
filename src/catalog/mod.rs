// Copyright 2026 The Riverql Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Database bookkeeping and storage lookup (spec §4.3/§6). The catalog
//! tracks which databases exist and which [`Storage`] backs each
//! `(database, table)` pair; a [`Session`] tracks the one piece of
//! per-connection state the spec needs — the current database.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::config::ServerConfig;
use crate::error::{EngineError, Result};
use crate::storage::Storage;

pub const DEFAULT_DATABASE: &str = "default";
pub const SYSTEM_DATABASE: &str = "system";

/// Per-connection state. DDL (`USE`) mutates the current database;
/// everything else only reads it.
pub trait Session: Send + Sync {
    fn current_database(&self) -> String;

    fn use_database(&self, name: &str) -> Result<()>;

    fn config(&self) -> ServerConfig;
}

/// The default, in-process [`Session`] implementation: a catalog handle
/// plus the one mutable field DDL touches.
pub struct DefaultSession {
    catalog: Arc<Catalog>,
    current_database: Mutex<String>,
    config: ServerConfig,
}

impl DefaultSession {
    pub fn new(config: ServerConfig) -> DefaultSession {
        DefaultSession {
            catalog: Catalog::with_system_tables(),
            current_database: Mutex::new(DEFAULT_DATABASE.to_string()),
            config,
        }
    }

    pub fn with_catalog(catalog: Arc<Catalog>, config: ServerConfig) -> DefaultSession {
        DefaultSession {
            catalog,
            current_database: Mutex::new(DEFAULT_DATABASE.to_string()),
            config,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

impl Session for DefaultSession {
    fn current_database(&self) -> String {
        self.current_database.lock().clone()
    }

    fn use_database(&self, name: &str) -> Result<()> {
        self.catalog.ensure_database_exists(name)?;
        *self.current_database.lock() = name.to_string();
        Ok(())
    }

    fn config(&self) -> ServerConfig {
        self.config
    }
}

/// Tracks known databases and the storages registered under each. The
/// `system` database always exists and cannot be dropped.
pub struct Catalog {
    databases: RwLock<HashMap<String, HashMap<String, Arc<dyn Storage>>>>,
}

impl Catalog {
    pub fn new() -> Catalog {
        let mut databases = HashMap::new();
        databases.insert(DEFAULT_DATABASE.to_string(), HashMap::new());
        databases.insert(SYSTEM_DATABASE.to_string(), HashMap::new());
        Catalog {
            databases: RwLock::new(databases),
        }
    }

    /// A catalog with `system.numbers` and `system.tables` registered,
    /// the latter listing every table across every database by reading
    /// back through the shared `Arc` at query time.
    pub fn with_system_tables() -> Arc<Catalog> {
        let catalog = Arc::new(Catalog::new());
        catalog.register_storage(SYSTEM_DATABASE, Arc::new(crate::storage::SystemNumbersStorage::new(65536)));

        let listing = catalog.clone();
        let tables_storage = crate::storage::SystemTablesStorage::new(move || {
            listing
                .list_tables()
                .into_iter()
                .map(|(database, name, engine)| crate::storage::TableInfo { name, database, engine })
                .collect()
        });
        catalog.register_storage(SYSTEM_DATABASE, Arc::new(tables_storage));

        catalog
    }

    fn register_storage(&self, database: &str, storage: Arc<dyn Storage>) {
        let mut databases = self.databases.write();
        let tables = databases.entry(database.to_string()).or_default();
        tables.insert(storage.name().to_string(), storage);
    }

    pub fn database_exists(&self, name: &str) -> bool {
        self.databases.read().contains_key(name)
    }

    pub fn ensure_database_exists(&self, name: &str) -> Result<()> {
        if self.database_exists(name) {
            Ok(())
        } else {
            Err(EngineError::database_not_found(name))
        }
    }

    pub fn create_database(&self, name: &str, if_not_exists: bool) -> Result<()> {
        let mut databases = self.databases.write();
        if databases.contains_key(name) {
            if if_not_exists {
                return Ok(());
            }
            return Err(EngineError::Validation(format!("database:{name} already exists")));
        }
        databases.insert(name.to_string(), HashMap::new());
        Ok(())
    }

    pub fn drop_database(&self, name: &str, if_exists: bool) -> Result<()> {
        if name == SYSTEM_DATABASE {
            return Err(EngineError::Unsupported("cannot drop the system database".to_string()));
        }
        let mut databases = self.databases.write();
        if databases.remove(name).is_none() && !if_exists {
            return Err(EngineError::database_not_found(name));
        }
        Ok(())
    }

    pub fn register(&self, database: &str, storage: Arc<dyn Storage>) -> Result<()> {
        self.ensure_database_exists(database)?;
        self.register_storage(database, storage);
        Ok(())
    }

    pub fn lookup_storage(&self, database: &str, table: &str) -> Result<Arc<dyn Storage>> {
        let databases = self.databases.read();
        databases
            .get(database)
            .ok_or_else(|| EngineError::database_not_found(database))?
            .get(table)
            .cloned()
            .ok_or_else(|| EngineError::table_not_found(database, table))
    }

    /// Every `(database, table, engine)` triple currently registered,
    /// used by `system.tables`'s fill callback.
    pub fn list_tables(&self) -> Vec<(String, String, String)> {
        let databases = self.databases.read();
        let mut out = Vec::new();
        for (db, tables) in databases.iter() {
            for (table, storage) in tables.iter() {
                out.push((db.clone(), table.clone(), storage.engine().to_string()));
            }
        }
        out.sort();
        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_and_system_databases_exist_from_the_start() {
        let catalog = Catalog::new();
        assert!(catalog.database_exists(DEFAULT_DATABASE));
        assert!(catalog.database_exists(SYSTEM_DATABASE));
        assert!(!catalog.database_exists("nope"));
    }

    #[test]
    fn create_and_drop_database_round_trip() {
        let catalog = Catalog::new();
        catalog.create_database("shop", false).unwrap();
        assert!(catalog.database_exists("shop"));
        catalog.drop_database("shop", false).unwrap();
        assert!(!catalog.database_exists("shop"));
    }

    #[test]
    fn create_existing_database_without_if_not_exists_fails() {
        let catalog = Catalog::new();
        let err = catalog.create_database(DEFAULT_DATABASE, false).unwrap_err();
        assert_eq!(err.to_string(), "database:default already exists");
    }

    #[test]
    fn create_existing_database_with_if_not_exists_is_a_no_op() {
        let catalog = Catalog::new();
        assert!(catalog.create_database(DEFAULT_DATABASE, true).is_ok());
    }

    #[test]
    fn drop_missing_database_fails_without_if_exists() {
        let catalog = Catalog::new();
        let err = catalog.drop_database("nope", false).unwrap_err();
        assert_eq!(err.to_string(), "database:nope doesn't exists");
    }

    #[test]
    fn drop_missing_database_with_if_exists_is_a_no_op() {
        let catalog = Catalog::new();
        assert!(catalog.drop_database("nope", true).is_ok());
    }

    #[test]
    fn system_database_cannot_be_dropped() {
        let catalog = Catalog::new();
        assert!(catalog.drop_database(SYSTEM_DATABASE, false).is_err());
    }

    #[test]
    fn session_use_database_rejects_unknown_names() {
        let session = DefaultSession::new(ServerConfig::default());
        let err = session.use_database("nope").unwrap_err();
        assert_eq!(err.to_string(), "database:nope doesn't exists");
        assert_eq!(session.current_database(), DEFAULT_DATABASE);
    }

    #[test]
    fn session_use_database_switches_the_current_database() {
        let session = DefaultSession::new(ServerConfig::default());
        session.catalog().create_database("shop", false).unwrap();
        session.use_database("shop").unwrap();
        assert_eq!(session.current_database(), "shop");
    }

    #[test]
    fn lookup_storage_reports_missing_table() {
        let catalog = Catalog::new();
        let err = catalog.lookup_storage(DEFAULT_DATABASE, "ghost").unwrap_err();
        assert_eq!(err.to_string(), "table:default.ghost doesn't exists");
    }
}
