pub mod model;
pub mod verilog_gen;

pub use model::{
    NetlistInterface, Port, PortDirection, Signal, SignalDirection, StimulusStep, TestbenchModel,
    VectorRange, VhdlType,
};
pub use verilog_gen::VerilogTestbenchGenerator;
