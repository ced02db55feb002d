//! Esquema Diesel (mantenido a mano, equivalente a `diesel print-schema`).

diesel::table! {
    flows_groups (address) {
        address -> Text,
        name -> Text,
        owner -> Text,
        created_at -> Timestamptz,
        deploy_txid -> Text,
    }
}

diesel::table! {
    flows (id) {
        id -> Uuid,
        group_address -> Text,
        name -> Text,
        creator -> Text,
        created_at -> Timestamptz,
        position -> BigInt,
    }
}

diesel::table! {
    chain_transactions (txid) {
        txid -> Text,
        block_number -> BigInt,
        sender -> Text,
        contract -> Text,
        method -> Text,
        status -> Text,
        reason -> Nullable<Text>,
        ts -> Timestamptz,
    }
}

diesel::table! {
    contract_events (seq) {
        seq -> BigInt,
        txid -> Text,
        block_number -> BigInt,
        contract -> Text,
        event_name -> Text,
        payload -> Jsonb,
        ts -> Timestamptz,
    }
}

diesel::joinable!(flows -> flows_groups (group_address));

diesel::allow_tables_to_appear_in_same_query!(
    flows_groups,
    flows,
    chain_transactions,
    contract_events,
);
