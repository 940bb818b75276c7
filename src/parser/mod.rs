pub mod netlist;
pub mod vhdl_tb;

pub use netlist::extract;
pub use vhdl_tb::analyze;
