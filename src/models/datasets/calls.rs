use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::models::datasets::logs::TransformedLogEvent;
use crate::models::datasets::traces::{ExecutionStatus, TransformedStateSet};
use crate::models::errors::CallPathError;
use crate::utils::serialization;

// One unit of execution flattened out of a transaction's trace tree
#[derive(Clone, PartialEq, ::prost::Message, Serialize)]
pub struct Call {
    #[prost(string, tag = "1")]
    pub transaction_id: String,
    #[prost(string, tag = "2")]
    pub call_path: String,
    #[prost(int64, tag = "3")]
    pub ref_block_number: i64,
    #[prost(string, tag = "4")]
    pub ref_block_prefix: String,
    #[prost(string, tag = "5")]
    pub from: String,
    #[prost(string, tag = "6")]
    pub to: String,
    #[prost(string, tag = "7")]
    pub method_name: String,
    #[prost(bytes = "vec", tag = "8")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub params: Vec<u8>,
    #[prost(enumeration = "ExecutionStatus", tag = "9")]
    #[serde(serialize_with = "serialization::execution_status")]
    pub execution_status: i32,
    #[prost(bytes = "vec", tag = "10")]
    #[serde(serialize_with = "hex::serde::serialize")]
    pub return_value: Vec<u8>,
    #[prost(string, tag = "11")]
    pub error: String,
    #[prost(message, optional, tag = "12")]
    pub state_set: Option<TransformedStateSet>,
    #[prost(message, repeated, tag = "13")]
    pub logs: Vec<TransformedLogEvent>,
    #[prost(bool, tag = "14")]
    pub reverted: bool,
}

impl Call {
    pub fn path(&self) -> Result<CallPath, CallPathError> {
        self.call_path.parse()
    }
}

/// Calls of one top-level transaction in execution order.
///
/// `main_call_index` points at the call of the transaction itself; everything
/// before it was contributed by its pre-transactions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallSequence {
    pub calls: Vec<Call>,
    pub main_call_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStep {
    Root(usize),
    Pre(usize),
    Inline(usize),
    Post(usize),
}

impl CallStep {
    pub fn index(&self) -> usize {
        match *self {
            CallStep::Root(index)
            | CallStep::Pre(index)
            | CallStep::Inline(index)
            | CallStep::Post(index) => index,
        }
    }
}

impl fmt::Display for CallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStep::Root(index) | CallStep::Inline(index) => write!(f, ":{index}"),
            CallStep::Pre(index) => write!(f, ":pre:{index}"),
            CallStep::Post(index) => write!(f, ":post:{index}"),
        }
    }
}

/// Parsed form of `Call::call_path`, e.g. `:0:pre:1:2:post:0`.
///
/// The first step is always the root. Every following step descends through one
/// pre, inline or post edge, so the tree position of a call can be rebuilt from
/// its path alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallPath {
    steps: Vec<CallStep>,
}

impl CallPath {
    pub fn root(index: usize) -> Self {
        Self {
            steps: vec![CallStep::Root(index)],
        }
    }

    pub fn steps(&self) -> &[CallStep] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn child(&self, step: CallStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.steps.len() < 2 {
            return None;
        }
        Some(Self {
            steps: self.steps[..self.steps.len() - 1].to_vec(),
        })
    }
}

impl fmt::Display for CallPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.steps.iter().try_for_each(|step| write!(f, "{step}"))
    }
}

impl FromStr for CallPath {
    type Err = CallPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(':')
            .ok_or_else(|| CallPathError::MissingSeparator { path: s.to_string() })?;

        let parse_index = |segment: Option<&str>| -> Result<usize, CallPathError> {
            let segment = segment.ok_or_else(|| CallPathError::Truncated { path: s.to_string() })?;
            segment.parse().map_err(|_| CallPathError::InvalidSegment {
                path: s.to_string(),
                segment: segment.to_string(),
            })
        };

        let mut segments = rest.split(':');
        let mut steps = vec![CallStep::Root(parse_index(segments.next())?)];
        while let Some(segment) = segments.next() {
            let step = match segment {
                "pre" => CallStep::Pre(parse_index(segments.next())?),
                "post" => CallStep::Post(parse_index(segments.next())?),
                _ => CallStep::Inline(parse_index(Some(segment))?),
            };
            steps.push(step);
        }

        Ok(Self { steps })
    }
}
