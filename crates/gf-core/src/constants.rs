//! Constantes de la cadena de desarrollo y del contrato `GFflowsGroup`.
//!
//! Algunos valores participan en la derivación determinista de direcciones y
//! txids; cambiarlos altera todas las direcciones generadas (cuentas y
//! contratos), por lo que deben mantenerse estables.

/// Versión lógica de la cadena de desarrollo. Forma parte del input de hashing
/// de cada transacción.
pub const CHAIN_VERSION: &str = "gf-devchain/1";

/// Cantidad de cuentas desbloqueadas que expone la cadena por defecto.
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// Semilla por defecto para derivar las cuentas de desarrollo.
pub const DEFAULT_ACCOUNT_SEED: &str = "gf-devchain";

/// Nombre del contrato tal como aparece en receipts y logs.
pub const FLOWS_GROUP_CONTRACT: &str = "GFflowsGroup";

/// Nombre del evento emitido por `createFlow`.
pub const FLOW_CREATED_EVENT: &str = "FlowCreated";

/// Firma canónica del evento `FlowCreated` (base del topic).
pub const FLOW_CREATED_SIGNATURE: &str = "FlowCreated(address,string)";

/// Nombre del campo con la dirección del creador en `FlowCreated`.
pub const FIELD_CREATOR_ADDR: &str = "creatorAddr";

/// Nombre del campo con el nombre (codificado) del flow en `FlowCreated`.
pub const FIELD_NAME_STR: &str = "nameStr";

/// Tamaño de palabra usado por la codificación ABI de strings.
pub const ABI_WORD_SIZE: usize = 32;
