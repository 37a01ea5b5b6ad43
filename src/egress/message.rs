//! Outbound cue message and the sink trait

use crate::error::EgressError;
use rosc::{OscMessage, OscType};

/// Typed message argument
#[derive(Debug, Clone, PartialEq)]
pub enum CueArg {
    Int(i32),
    Float(f32),
    Str(String),
}

impl From<i32> for CueArg {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for CueArg {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CueArg {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl CueArg {
    fn to_osc(&self) -> OscType {
        match self {
            Self::Int(v) => OscType::Int(*v),
            Self::Float(v) => OscType::Float(*v),
            Self::Str(v) => OscType::String(v.clone()),
        }
    }
}

/// A named message: address plus zero or more arguments
#[derive(Debug, Clone, PartialEq)]
pub struct CueMessage {
    pub address: String,
    pub args: Vec<CueArg>,
}

impl CueMessage {
    /// Create a message with no arguments
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn with_arg(mut self, arg: impl Into<CueArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Convert to an OSC message
    pub fn to_osc(&self) -> OscMessage {
        OscMessage {
            addr: self.address.clone(),
            args: self.args.iter().map(CueArg::to_osc).collect(),
        }
    }
}

/// Destination for cue messages.
///
/// Implementations must not block for long: the pulse scheduler calls
/// `send` from its timing loop.
pub trait CueSink: Send + Sync {
    /// Deliver one message
    fn send(&self, message: &CueMessage) -> Result<(), EgressError>;
}
