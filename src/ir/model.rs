use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
    InOut,
}

impl PortDirection {
    pub fn from_verilog(s: &str) -> Option<Self> {
        match s {
            "input" => Some(PortDirection::Input),
            "output" => Some(PortDirection::Output),
            "inout" => Some(PortDirection::InOut),
            _ => None,
        }
    }
}

/// Direction a testbench signal plays relative to the DUT, inferred from how
/// the source text uses it. `Internal` signals never touch the DUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Input,
    Output,
    InOut,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRange {
    pub left: i32,
    pub right: i32,
    pub downto: bool, // true for "downto", false for "to"
}

impl VectorRange {
    /// Index correspondence is preserved exactly: bit `i` of the source range
    /// is bit `i` of the emitted range, so a `(0 to 7)` range becomes `[0:7]`,
    /// never `[7:0]`.
    pub fn to_verilog(&self) -> String {
        format!("[{}:{}]", self.left, self.right)
    }

    pub fn width(&self) -> u32 {
        (self.left - self.right).unsigned_abs() + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VhdlType {
    StdLogic,
    StdLogicVector(VectorRange),
    Integer,
    Natural,
    Positive,
    Boolean,
    Bit,
    BitVector(VectorRange),
    Signed(VectorRange),
    Unsigned(VectorRange),
    Custom(String), // For user-defined types
}

impl VhdlType {
    pub fn vector_range(&self) -> Option<&VectorRange> {
        match self {
            VhdlType::StdLogicVector(r)
            | VhdlType::BitVector(r)
            | VhdlType::Signed(r)
            | VhdlType::Unsigned(r) => Some(r),
            _ => None,
        }
    }

    pub fn width(&self) -> u32 {
        match self.vector_range() {
            Some(range) => range.width(),
            None => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub direction: PortDirection,
    pub width: u32,
}

impl Port {
    pub fn new(name: String, direction: PortDirection, width: u32) -> Self {
        Self {
            name,
            direction,
            width,
        }
    }
}

/// Port interface of the synthesized gate-level module, in header
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetlistInterface {
    pub module_name: String,
    pub ports: Vec<Port>,
}

impl NetlistInterface {
    pub fn new(module_name: String) -> Self {
        Self {
            module_name,
            ports: Vec::new(),
        }
    }

    pub fn add_port(&mut self, port: Port) {
        self.ports.push(port);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub source_type: VhdlType,
    /// Type text as written in the source declaration, kept for diagnostics.
    pub raw_type: String,
    pub inferred_direction: SignalDirection,
    pub initial_value: Option<String>,
    /// Verilog declaration (e.g. `reg [3:0] count`), filled by the mapper.
    pub target_declaration: Option<String>,
    /// Verilog rendering of `initial_value`, filled by the mapper.
    pub target_initial: Option<String>,
}

impl Signal {
    pub fn new(name: String, source_type: VhdlType, raw_type: String) -> Self {
        Self {
            name,
            source_type,
            raw_type,
            inferred_direction: SignalDirection::Internal,
            initial_value: None,
            target_declaration: None,
            target_initial: None,
        }
    }
}

/// One abstract stimulus action. The analyzer currently emits a fixed
/// reset-pulse-and-run sequence; the generator translates whatever steps are
/// present 1:1, so a richer analyzer can populate real stimulus without
/// changing the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StimulusStep {
    Assign { signal: String, value: String },
    Wait { ns: u32 },
    Display(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestbenchModel {
    pub entity_name: String,
    /// Source declaration order; the generator emits declarations in exactly
    /// this order.
    pub signals: Vec<Signal>,
    pub stimulus: Vec<StimulusStep>,
}

impl TestbenchModel {
    pub fn new(entity_name: String) -> Self {
        Self {
            entity_name,
            signals: Vec::new(),
            stimulus: Vec::new(),
        }
    }

    pub fn add_signal(&mut self, signal: Signal) {
        self.signals.push(signal);
    }

    pub fn find_signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|s| s.name == name)
    }
}
