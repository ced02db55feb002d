//! Harness de `GFflowsGroup`: fixture `flows_group` + operaciones básicas.
use gf_core::chain::{Chain, FlowsGroupHandle};
use gf_core::event::FlowCreated;
use gfflows_rust::{run_basic_ops, AppConfig};

/// Despliega `test_flows` desde `accounts[0]` sobre una cadena nueva.
fn flows_group() -> (Chain, FlowsGroupHandle) {
    let mut chain = Chain::with_config(AppConfig::default().chain_config());
    let owner = chain.accounts()[0];
    let group = chain.deploy_flows_group("test_flows", owner).expect("deploy test_flows");
    (chain, group)
}

#[test]
fn test_basic_ops() {
    let (mut chain, flows_group) = flows_group();
    let owner = chain.accounts()[0];

    let tx = flows_group.create_flow(&mut chain, "test_flow_01", owner).expect("owner createFlow");
    assert!(tx.events.contains("FlowCreated"));
    let ev = tx.events.get("FlowCreated").expect("FlowCreated");
    assert!(ev.contains_key("creatorAddr"));
    assert!(ev.contains_key("nameStr"));
    let created = FlowCreated::try_from(ev).expect("decode FlowCreated");
    assert_eq!(created.creator_addr, owner);
    assert_eq!(created.name().unwrap(), "test_flow_01");

    let other = chain.accounts()[1];
    let err = flows_group.create_flow(&mut chain, "test_flow_02", other).unwrap_err();
    assert!(err.is_vm_error(), "expected VM error, got {err}");

    assert_eq!(flows_group.get_all_flow_names(&chain).unwrap(), vec!["test_flow_01"]);
}

#[test]
fn every_non_owner_account_is_rejected() {
    let (mut chain, flows_group) = flows_group();
    let others: Vec<_> = chain.accounts().iter().skip(1).copied().collect();
    for (i, acct) in others.into_iter().enumerate() {
        let name = format!("intruder_{i}");
        assert!(flows_group.create_flow(&mut chain, &name, acct).unwrap_err().is_vm_error());
    }
    assert!(flows_group.get_all_flow_names(&chain).unwrap().is_empty());
    assert!(chain.events_for(&flows_group.address).unwrap().is_empty());
}

#[test]
fn fixture_is_fresh_per_test() {
    let (chain, flows_group) = flows_group();
    assert_eq!(flows_group.flows_count(&chain).unwrap(), 0);
    assert_eq!(chain.history().unwrap().len(), 1);
}

#[test]
fn scenario_report_matches_harness() {
    let mut chain = Chain::new();
    let report = run_basic_ops(&mut chain).expect("scenario");
    assert!(report.passed());
    assert_eq!(report.flow_names, vec!["test_flow_01"]);
    assert_eq!(report.event_fields, vec!["creatorAddr", "nameStr"]);
    assert_eq!(report.event_creator, chain.accounts()[0]);
}
