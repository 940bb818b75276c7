//! VHDL-to-Verilog testbench transpiler: binds a behavioral VHDL stimulus
//! testbench to a synthesized gate-level netlist so the same stimulus can
//! drive post-synthesis simulation.

pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod ir;
pub mod mapper;
pub mod parser;

// Re-export commonly used types
pub use converter::convert;
pub use diagnostics::{Diagnostic, Severity};
pub use error::{BindingError, ConversionError, ParseError};
pub use ir::{NetlistInterface, Port, PortDirection, Signal, TestbenchModel, VhdlType};
