use chrono::Utc;
use gf_core::errors::StoreError;
use gf_core::model::Address;
use gf_core::repo::{FlowRecord, FlowRegistry, FlowsGroupRecord, InMemoryFlowRegistry};
use gf_persistence::pg::{PgFlowRegistry, PoolProvider};
use uuid::Uuid;
mod test_support;

fn group(owner: Address, tag: &str) -> FlowsGroupRecord {
    FlowsGroupRecord { address: Address::derive("pg-test", &[tag.as_bytes()]),
                       name: "test_flows".into(),
                       owner,
                       created_at: Utc::now(),
                       deploy_txid: format!("0x{tag}") }
}

fn flow(group: &FlowsGroupRecord, name: &str, position: u64) -> FlowRecord {
    FlowRecord { id: Uuid::new_v4(),
                 group: group.address,
                 name: name.into(),
                 creator: group.owner,
                 created_at: Utc::now(),
                 position }
}

// Aplica la misma secuencia a ambos backends y compara lo observable.
fn exercise<R: FlowRegistry>(reg: &mut R, tag: &str) -> (Vec<String>, u64, u64, Vec<bool>) {
    let owner = Address::derive("pg-test-owner", &[tag.as_bytes()]);
    let g = group(owner, tag);
    reg.insert_group(&g).expect("insert group");
    let dup_group = reg.insert_group(&g).unwrap_err();
    assert!(matches!(dup_group, StoreError::Conflict(_)), "{dup_group:?}");

    for (i, name) in ["zeta", "alpha", "mid"].iter().enumerate() {
        reg.insert_flow(&flow(&g, name, i as u64)).expect("insert flow");
    }
    let dup_flow = reg.insert_flow(&flow(&g, "alpha", 3)).unwrap_err();
    assert!(matches!(dup_flow, StoreError::Conflict(_)), "{dup_flow:?}");

    let orphan = group(owner, &format!("{tag}-missing"));
    let missing = reg.insert_flow(&flow(&orphan, "x", 0)).unwrap_err();
    assert!(matches!(missing, StoreError::NotFound(_)), "{missing:?}");

    let stored = reg.group(&g.address).unwrap().expect("group exists");
    assert_eq!(stored.owner, owner);
    assert_eq!(stored.name, "test_flows");
    let exists = vec![reg.flow(&g.address, "mid").unwrap().is_some(), reg.flow(&g.address, "nope").unwrap().is_some()];
    (reg.flow_names(&g.address).unwrap(), reg.flow_count(&g.address).unwrap(), reg.groups_deployed_by(&owner).unwrap(), exists)
}

#[test]
fn pg_registry_matches_in_memory() {
    let Some(pool) = test_support::with_pool(|p| p.clone()) else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let tag = Uuid::new_v4().to_string();
    let mut mem = InMemoryFlowRegistry::new();
    let mut pg = PgFlowRegistry::new(PoolProvider { pool });
    let expected = exercise(&mut mem, &tag);
    assert_eq!(expected.0, vec!["zeta", "alpha", "mid"]);
    assert_eq!(exercise(&mut pg, &format!("{tag}-pg")), expected);
}

#[test]
fn unknown_group_is_none() {
    let Some(pool) = test_support::with_pool(|p| p.clone()) else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let pg = PgFlowRegistry::new(PoolProvider { pool });
    let addr = Address::derive("pg-test", &[Uuid::new_v4().as_bytes()]);
    assert!(pg.group(&addr).unwrap().is_none());
    assert!(pg.flow_names(&addr).unwrap().is_empty());
    assert_eq!(pg.flow_count(&addr).unwrap(), 0);
}
