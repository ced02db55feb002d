//! CLI mínima sobre la cadena de desarrollo.
//!
//! ```text
//! gf-cli accounts
//! gf-cli demo
//! gf-cli deploy --name <N> [--from <I>]
//! gf-cli create-flow --group <ADDR> --name <N> [--from <I>]
//! gf-cli flows --group <ADDR>
//! gf-cli events --group <ADDR>
//! gf-cli history
//! ```
//!
//! `demo` corre en memoria; el resto requiere `DATABASE_URL`. Códigos de
//! salida: 4 uso inválido o revert, 5 error de backend.
use std::process::exit;

use gf_core::{Address, Chain, ChainConfig, ChainError, EventStore, FlowCreated, FlowRegistry};
use gf_persistence::pg::{open_chain, PgChain};

enum CliError {
    Usage(String),
    Rejected(String),
    Backend(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) | CliError::Rejected(_) => 4,
            CliError::Backend(_) => 5,
        }
    }
}

impl From<ChainError> for CliError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::VirtualMachine(_)
            | ChainError::UnknownAccount(_)
            | ChainError::UnknownContract(_)
            | ChainError::UnknownMethod(_)
            | ChainError::InvalidArguments { .. } => CliError::Rejected(e.to_string()),
            other => CliError::Backend(other.to_string()),
        }
    }
}

fn main() {
    // Cargar .env si existe para obtener DATABASE_URL
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        match &e {
            CliError::Usage(m) => eprintln!("[gf-cli] uso: {m}\n{}", usage()),
            CliError::Rejected(m) => eprintln!("[gf-cli] rechazado: {m}"),
            CliError::Backend(m) => eprintln!("[gf-cli] backend: {m}"),
        }
        exit(e.exit_code());
    }
}

fn usage() -> &'static str {
    "comandos: accounts | demo | deploy --name N [--from I] | create-flow --group A --name N [--from I] | \
     flows --group A | events --group A | history"
}

fn run(args: &[String]) -> Result<(), CliError> {
    let Some((cmd, rest)) = args.split_first() else {
        return Err(CliError::Usage("falta comando".into()));
    };
    let opts = Opts::parse(rest)?;
    match cmd.as_str() {
        "accounts" => {
            let chain = Chain::with_config(chain_config_from_env()?);
            for (i, a) in chain.accounts().iter().enumerate() {
                println!("accounts[{i}] {a}");
            }
            Ok(())
        }
        "demo" => demo(chain_config_from_env()?),
        "deploy" => {
            let name = opts.require("--name", &opts.name)?;
            let mut chain = pg_chain()?;
            let from = account(&chain, opts.from)?;
            let group = chain.deploy_flows_group(name, from)?;
            println!("desplegado: address={} name={} owner={} txid={}",
                     group.address, group.name, group.owner, group.deploy_txid);
            Ok(())
        }
        "create-flow" => {
            let name = opts.require("--name", &opts.name)?;
            let address = opts.group()?;
            let mut chain = pg_chain()?;
            let from = account(&chain, opts.from)?;
            let group = chain.flows_group_at(&address)?;
            let receipt = group.create_flow(&mut chain, name, from)?;
            println!("creado: flow={} txid={} block={}", name, receipt.txid, receipt.block_number);
            for ev in receipt.events.iter() {
                println!("  {}", serde_json::to_string(&ev.fields).map_err(|e| CliError::Backend(e.to_string()))?);
            }
            Ok(())
        }
        "flows" => {
            let address = opts.group()?;
            let chain = pg_chain()?;
            let group = chain.flows_group_at(&address)?;
            for name in group.get_all_flow_names(&chain)? {
                println!("{name}");
            }
            Ok(())
        }
        "events" => {
            let address = opts.group()?;
            let chain = pg_chain()?;
            for logged in chain.events_for(&address)? {
                let name = FlowCreated::try_from(&logged.event).ok().and_then(|f| f.name().ok());
                println!("seq={} block={} event={} name={:?}",
                         logged.seq, logged.block_number, logged.event.name, name);
            }
            Ok(())
        }
        "history" => {
            let chain = pg_chain()?;
            println!("height={}", chain.event_store().latest_block().map_err(|e| CliError::Backend(e.to_string()))?);
            for tx in chain.history()? {
                println!("block={} {} {} from={} to={} {}",
                         tx.block_number, tx.txid, tx.method, tx.sender, tx.contract, tx.status.as_str());
            }
            Ok(())
        }
        other => Err(CliError::Usage(format!("comando desconocido '{other}'"))),
    }
}

/// Escenario de referencia sobre una cadena en memoria. Falla si algún paso
/// no produce lo esperado.
fn demo(config: ChainConfig) -> Result<(), CliError> {
    let mut chain = Chain::with_config(config);
    let owner = account(&chain, Some(0))?;
    let other = account(&chain, Some(1))?;
    let group = chain.deploy_flows_group("test_flows", owner)?;
    println!("deploy test_flows -> {}", group.address);

    let receipt = group.create_flow(&mut chain, "test_flow_01", owner)?;
    let ev = receipt.events
                    .get("FlowCreated")
                    .ok_or_else(|| CliError::Rejected("createFlow no emitió FlowCreated".into()))?;
    let decoded = FlowCreated::try_from(ev).ok().and_then(|f| f.name().ok());
    println!("createFlow(test_flow_01) from accounts[0] -> FlowCreated name={:?}", decoded);
    if decoded.as_deref() != Some("test_flow_01") {
        return Err(CliError::Rejected(format!("FlowCreated con nameStr inesperado: {decoded:?}")));
    }

    match group.create_flow(&mut chain, "test_flow_02", other) {
        Err(e) if e.is_vm_error() => println!("createFlow(test_flow_02) from accounts[1] -> {e}"),
        Err(e) => return Err(e.into()),
        Ok(_) => return Err(CliError::Rejected("non-owner createFlow was accepted".into())),
    }

    let names = group.get_all_flow_names(&chain)?;
    println!("getAllFlowNames -> {:?}", names);
    if names != ["test_flow_01"] {
        return Err(CliError::Rejected(format!("getAllFlowNames devolvió {names:?}")));
    }
    println!("flows registrados={}",
             chain.registry().flow_count(&group.address).map_err(|e| CliError::Backend(e.to_string()))?);
    Ok(())
}

#[derive(Default)]
struct Opts {
    name: Option<String>,
    group: Option<String>,
    from: Option<usize>,
}

impl Opts {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut opts = Opts::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = args.get(i + 1).cloned().ok_or_else(|| CliError::Usage(format!("falta valor para {flag}")))?;
            match flag {
                "--name" => opts.name = Some(value),
                "--group" => opts.group = Some(value),
                "--from" => {
                    let idx = value.parse::<usize>()
                                   .map_err(|_| CliError::Usage(format!("--from espera un índice, no '{value}'")))?;
                    opts.from = Some(idx);
                }
                other => return Err(CliError::Usage(format!("flag desconocido {other}"))),
            }
            i += 2;
        }
        Ok(opts)
    }

    fn require<'a>(&self, flag: &str, value: &'a Option<String>) -> Result<&'a str, CliError> {
        value.as_deref().ok_or_else(|| CliError::Usage(format!("falta {flag}")))
    }

    fn group(&self) -> Result<Address, CliError> {
        let raw = self.require("--group", &self.group)?;
        raw.parse::<Address>().map_err(|e| CliError::Usage(format!("--group inválido: {e}")))
    }
}

fn account<R: FlowRegistry, E: EventStore>(chain: &Chain<R, E>, index: Option<usize>) -> Result<Address, CliError> {
    let i = index.unwrap_or(0);
    chain.accounts()
         .get(i)
         .ok_or_else(|| CliError::Usage(format!("accounts[{i}] no existe ({} cuentas)", chain.accounts().len())))
}

fn chain_config_from_env() -> Result<ChainConfig, CliError> {
    ChainConfig::from_lookup(|k| std::env::var(k).ok()).map_err(|e| CliError::Usage(e.to_string()))
}

fn pg_chain() -> Result<PgChain, CliError> {
    if std::env::var("DATABASE_URL").is_err() {
        return Err(CliError::Usage("requiere DATABASE_URL para operar contra backend persistente".into()));
    }
    let pool = gf_persistence::build_dev_pool_from_env().map_err(|e| CliError::Backend(e.to_string()))?;
    Ok(open_chain(&pool, chain_config_from_env()?)?)
}
