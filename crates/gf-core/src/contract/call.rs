use serde::{Deserialize, Serialize};

use crate::errors::ChainError;
use crate::model::Address;

/// Métodos que modifican estado (se envían como transacción).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum FlowsGroupCall {
    CreateFlow { name: String },
}

impl FlowsGroupCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            FlowsGroupCall::CreateFlow { .. } => "createFlow",
        }
    }

    /// Construye la llamada a partir del nombre de método del contrato y sus
    /// argumentos en texto (por ejemplo desde la CLI).
    pub fn from_method(method: &str, args: &[String]) -> Result<Self, ChainError> {
        match method {
            "createFlow" => {
                let name = single_arg(method, args)?;
                Ok(FlowsGroupCall::CreateFlow { name })
            }
            other => Err(ChainError::UnknownMethod(other.to_string())),
        }
    }
}

/// Métodos de sólo lectura (no minan transacción).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum FlowsGroupQuery {
    GetAllFlowNames,
    GetName,
    GetOwner,
    FlowExists { name: String },
    GetFlowsCount,
}

impl FlowsGroupQuery {
    pub fn method_name(&self) -> &'static str {
        match self {
            FlowsGroupQuery::GetAllFlowNames => "getAllFlowNames",
            FlowsGroupQuery::GetName => "getName",
            FlowsGroupQuery::GetOwner => "getOwner",
            FlowsGroupQuery::FlowExists { .. } => "flowExists",
            FlowsGroupQuery::GetFlowsCount => "getFlowsCount",
        }
    }

    pub fn from_method(method: &str, args: &[String]) -> Result<Self, ChainError> {
        let no_args = |q: FlowsGroupQuery| -> Result<Self, ChainError> {
            if args.is_empty() {
                Ok(q)
            } else {
                Err(ChainError::InvalidArguments { method: method.to_string(),
                                                   detail: format!("expected 0 arguments, got {}", args.len()) })
            }
        };
        match method {
            "getAllFlowNames" => no_args(FlowsGroupQuery::GetAllFlowNames),
            "getName" => no_args(FlowsGroupQuery::GetName),
            "getOwner" => no_args(FlowsGroupQuery::GetOwner),
            "getFlowsCount" => no_args(FlowsGroupQuery::GetFlowsCount),
            "flowExists" => Ok(FlowsGroupQuery::FlowExists { name: single_arg(method, args)? }),
            other => Err(ChainError::UnknownMethod(other.to_string())),
        }
    }
}

fn single_arg(method: &str, args: &[String]) -> Result<String, ChainError> {
    match args {
        [one] => Ok(one.clone()),
        _ => Err(ChainError::InvalidArguments { method: method.to_string(),
                                                detail: format!("expected 1 argument, got {}", args.len()) }),
    }
}

/// Valor devuelto por una consulta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Names(Vec<String>),
    Text(String),
    Address(Address),
    Bool(bool),
    Count(u64),
}

impl QueryOutput {
    pub fn into_names(self) -> Option<Vec<String>> {
        match self {
            QueryOutput::Names(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            QueryOutput::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            QueryOutput::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryOutput::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u64> {
        match self {
            QueryOutput::Count(c) => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_parse_from_abi_names() {
        let call = FlowsGroupCall::from_method("createFlow", &["f1".to_string()]).unwrap();
        assert_eq!(call, FlowsGroupCall::CreateFlow { name: "f1".into() });
        assert_eq!(call.method_name(), "createFlow");

        let q = FlowsGroupQuery::from_method("getAllFlowNames", &[]).unwrap();
        assert_eq!(q.method_name(), "getAllFlowNames");
        assert_eq!(FlowsGroupQuery::from_method("flowExists", &["x".to_string()]).unwrap(),
                   FlowsGroupQuery::FlowExists { name: "x".into() });
    }

    #[test]
    fn bad_methods_and_arities_are_rejected() {
        assert!(matches!(FlowsGroupCall::from_method("deleteFlow", &[]), Err(ChainError::UnknownMethod(_))));
        assert!(matches!(FlowsGroupCall::from_method("createFlow", &[]),
                         Err(ChainError::InvalidArguments { .. })));
        assert!(matches!(FlowsGroupQuery::from_method("getName", &["x".to_string()]),
                         Err(ChainError::InvalidArguments { .. })));
    }

    #[test]
    fn call_serializes_with_method_tag() {
        let v = serde_json::to_value(FlowsGroupCall::CreateFlow { name: "a".into() }).unwrap();
        assert_eq!(v, serde_json::json!({"method": "createFlow", "name": "a"}));
    }
}
