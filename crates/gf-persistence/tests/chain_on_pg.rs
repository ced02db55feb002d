use gf_core::event::{EventStore, FlowCreated, TxStatus};
use gf_persistence::pg::open_chain;
mod test_support;
use test_support::{fresh_config, with_pool};

#[test]
fn basic_ops_survive_reopen() {
    let Some(pool) = with_pool(|p| p.clone()) else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let config = fresh_config();
    let mut chain = open_chain(&pool, config.clone()).expect("open chain");
    let owner = chain.accounts()[0];
    let other = chain.accounts()[1];

    let group = chain.deploy_flows_group("test_flows", owner).expect("deploy");
    let receipt = group.create_flow(&mut chain, "test_flow_01", owner).expect("createFlow");
    let ev = receipt.events.get("FlowCreated").expect("FlowCreated");
    assert_eq!(FlowCreated::try_from(ev).unwrap().name().unwrap(), "test_flow_01");

    let err = group.create_flow(&mut chain, "test_flow_02", other).unwrap_err();
    assert!(err.is_vm_error());
    let height = chain.block_number();
    drop(chain);

    // Reabrir: el estado y la altura vienen de la DB
    let chain = open_chain(&pool, config).expect("reopen");
    assert!(chain.block_number() >= height);
    let group = chain.flows_group_at(&group.address).expect("group persisted");
    assert_eq!(group.get_all_flow_names(&chain).unwrap(), vec!["test_flow_01"]);
    assert_eq!(group.get_owner(&chain).unwrap(), owner);

    let logged = chain.events_for(&group.address).unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].event, *ev);

    let history: Vec<_> = chain.history().unwrap().into_iter().filter(|t| t.contract == group.address).collect();
    assert_eq!(history.len(), 3);
    assert!(matches!(history[2].status, TxStatus::Reverted { .. }));
    assert!(chain.event_store().latest_block().unwrap() >= height);
}
