use chrono::{DateTime, Utc};
use diesel::prelude::*;
use gf_core::errors::StoreError;
use gf_core::model::Address;
use gf_core::repo::{FlowRecord, FlowRegistry, FlowsGroupRecord};
use log::debug;
use uuid::Uuid;

use super::{parse_address, to_i64, to_u64, with_retry, ConnectionProvider};
use crate::error::PersistenceError;
use crate::schema::{flows, flows_groups};

#[derive(Insertable, Debug)]
#[diesel(table_name = flows_groups)]
struct NewGroupRow<'a> {
    address: &'a str,
    name: &'a str,
    owner: &'a str,
    created_at: DateTime<Utc>,
    deploy_txid: &'a str,
}

/// Fila de `flows_groups` (mismo orden de columnas que el esquema).
#[derive(Queryable, Debug)]
struct GroupRow {
    address: String,
    name: String,
    owner: String,
    created_at: DateTime<Utc>,
    deploy_txid: String,
}

impl GroupRow {
    fn into_record(self) -> Result<FlowsGroupRecord, PersistenceError> {
        Ok(FlowsGroupRecord { address: parse_address("address", &self.address)?,
                              name: self.name,
                              owner: parse_address("owner", &self.owner)?,
                              created_at: self.created_at,
                              deploy_txid: self.deploy_txid })
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = flows)]
struct NewFlowRow<'a> {
    id: Uuid,
    group_address: &'a str,
    name: &'a str,
    creator: &'a str,
    created_at: DateTime<Utc>,
    position: i64,
}

#[derive(Queryable, Debug)]
struct FlowRow {
    id: Uuid,
    group_address: String,
    name: String,
    creator: String,
    created_at: DateTime<Utc>,
    position: i64,
}

impl FlowRow {
    fn into_record(self) -> Result<FlowRecord, PersistenceError> {
        Ok(FlowRecord { id: self.id,
                        group: parse_address("group_address", &self.group_address)?,
                        name: self.name,
                        creator: parse_address("creator", &self.creator)?,
                        created_at: self.created_at,
                        position: to_u64("position", self.position)? })
    }
}

/// Implementación Postgres de `FlowRegistry`.
///
/// Las restricciones de la DB sostienen las invariantes del trait:
/// PK de `flows_groups` (grupo duplicado), FK de `flows` (grupo inexistente)
/// y `UNIQUE (group_address, name)` (flow duplicado).
pub struct PgFlowRegistry<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgFlowRegistry<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Todos los grupos, en orden de creación.
    pub fn list_groups(&self) -> Result<Vec<FlowsGroupRecord>, StoreError> {
        let rows: Vec<GroupRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows_groups::table.order((flows_groups::created_at.asc(), flows_groups::address.asc()))
                               .load(&mut conn)
                               .map_err(PersistenceError::from)
        })?;
        Ok(rows.into_iter().map(GroupRow::into_record).collect::<Result<Vec<_>, _>>()?)
    }
}

impl<P: ConnectionProvider> FlowRegistry for PgFlowRegistry<P> {
    fn insert_group(&mut self, group: &FlowsGroupRecord) -> Result<(), StoreError> {
        let address = group.address.to_hex();
        let owner = group.owner.to_hex();
        debug!("insert_group address={} owner={}", address, owner);
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(flows_groups::table).values(NewGroupRow { address: &address,
                                                                           name: &group.name,
                                                                           owner: &owner,
                                                                           created_at: group.created_at,
                                                                           deploy_txid: &group.deploy_txid })
                                                     .execute(&mut conn)
                                                     .map_err(PersistenceError::from)
        })?;
        Ok(())
    }

    fn group(&self, address: &Address) -> Result<Option<FlowsGroupRecord>, StoreError> {
        let key = address.to_hex();
        let row: Option<GroupRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows_groups::table.find(&key)
                               .first(&mut conn)
                               .optional()
                               .map_err(PersistenceError::from)
        })?;
        Ok(row.map(GroupRow::into_record).transpose()?)
    }

    fn groups_deployed_by(&self, owner: &Address) -> Result<u64, StoreError> {
        let key = owner.to_hex();
        let n: i64 = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows_groups::table.filter(flows_groups::owner.eq(&key))
                               .count()
                               .get_result(&mut conn)
                               .map_err(PersistenceError::from)
        })?;
        Ok(to_u64("count", n)?)
    }

    fn insert_flow(&mut self, flow: &FlowRecord) -> Result<(), StoreError> {
        let group = flow.group.to_hex();
        let creator = flow.creator.to_hex();
        let position = to_i64("position", flow.position)?;
        debug!("insert_flow group={} name={} position={}", group, flow.name, position);
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(flows::table).values(NewFlowRow { id: flow.id,
                                                                  group_address: &group,
                                                                  name: &flow.name,
                                                                  creator: &creator,
                                                                  created_at: flow.created_at,
                                                                  position })
                                              .execute(&mut conn)
                                              .map_err(PersistenceError::from)
        })?;
        Ok(())
    }

    fn flow(&self, group: &Address, name: &str) -> Result<Option<FlowRecord>, StoreError> {
        let key = group.to_hex();
        let row: Option<FlowRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows::table.filter(flows::group_address.eq(&key))
                        .filter(flows::name.eq(name))
                        .first(&mut conn)
                        .optional()
                        .map_err(PersistenceError::from)
        })?;
        Ok(row.map(FlowRow::into_record).transpose()?)
    }

    fn flow_names(&self, group: &Address) -> Result<Vec<String>, StoreError> {
        let key = group.to_hex();
        let names = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows::table.filter(flows::group_address.eq(&key))
                        .order(flows::position.asc())
                        .select(flows::name)
                        .load::<String>(&mut conn)
                        .map_err(PersistenceError::from)
        })?;
        Ok(names)
    }

    fn flow_count(&self, group: &Address) -> Result<u64, StoreError> {
        let key = group.to_hex();
        let n: i64 = with_retry(|| {
            let mut conn = self.provider.connection()?;
            flows::table.filter(flows::group_address.eq(&key))
                        .count()
                        .get_result(&mut conn)
                        .map_err(PersistenceError::from)
        })?;
        Ok(to_u64("count", n)?)
    }
}
