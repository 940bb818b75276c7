use crate::error::ParseError;
use crate::ir::{Signal, SignalDirection, StimulusStep, TestbenchModel, VectorRange, VhdlType};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref ENTITY_RE: Regex = Regex::new(r"(?i)\bentity\s+([A-Za-z]\w*)\s+is").unwrap();
    static ref SIGNAL_RE: Regex = Regex::new(
        r"(?i)\bsignal\s+([A-Za-z]\w*)\s*:\s*([A-Za-z]\w*(?:\s*\([^)]*\))?)\s*(?::=\s*([^;]+))?;"
    )
    .unwrap();
    static ref VECTOR_RE: Regex = Regex::new(
        r"(?i)^(std_logic_vector|bit_vector|signed|unsigned)\s*\(\s*(\d+)\s+(downto|to)\s+(\d+)\s*\)$"
    )
    .unwrap();
    static ref ASSOCIATION_RE: Regex = Regex::new(r"=>\s*([A-Za-z]\w*)").unwrap();
    static ref DRIVE_RE: Regex = Regex::new(r"\b([A-Za-z]\w*)\s*<=").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"--[^\n]*").unwrap();
}

// Reset pulse and run length of the synthetic stimulus, in ns.
const RESET_PULSE_NS: u32 = 100;
const RUN_NS: u32 = 1200;

/// Parse a behavioral VHDL testbench into a `TestbenchModel`: entity name,
/// declared signals in source order, inferred directions, and the fixed
/// stimulus skeleton.
pub fn analyze(testbench_text: &str) -> Result<TestbenchModel, ParseError> {
    let text = COMMENT_RE.replace_all(testbench_text, "");

    let entity_name = ENTITY_RE
        .captures(&text)
        .map(|cap| cap[1].to_string())
        .ok_or(ParseError::NoEntityFound)?;

    let bound = actual_names(&text);
    let driven = driven_names(&text);

    let mut model = TestbenchModel::new(entity_name);
    let mut seen = HashSet::new();

    for cap in SIGNAL_RE.captures_iter(&text) {
        let name = cap[1].to_string();
        if !seen.insert(name.clone()) {
            return Err(ParseError::DuplicateSignal(name));
        }

        let raw_type = cap[2].trim().to_string();
        let mut signal = Signal::new(name, parse_type(&raw_type), raw_type);
        signal.initial_value = cap.get(3).map(|m| m.as_str().trim().to_string());
        signal.inferred_direction = infer_direction(&signal.name, &bound, &driven);
        model.add_signal(signal);
    }

    model.stimulus = synthetic_stimulus(&model);
    Ok(model)
}

/// Parse a VHDL type mark. Unknown types become `Custom` rather than an
/// error; the mapper decides what to do with those.
pub fn parse_type(type_str: &str) -> VhdlType {
    let type_str = type_str.trim().to_lowercase();

    match type_str.as_str() {
        "std_logic" | "std_ulogic" => return VhdlType::StdLogic,
        "bit" => return VhdlType::Bit,
        "integer" => return VhdlType::Integer,
        "natural" => return VhdlType::Natural,
        "positive" => return VhdlType::Positive,
        "boolean" => return VhdlType::Boolean,
        _ => {}
    }

    if let Some(cap) = VECTOR_RE.captures(&type_str) {
        let left: i32 = cap[2].parse().unwrap_or(0);
        let right: i32 = cap[4].parse().unwrap_or(0);
        let range = VectorRange {
            left,
            right,
            downto: cap[3].eq_ignore_ascii_case("downto"),
        };
        return match &cap[1] {
            "std_logic_vector" => VhdlType::StdLogicVector(range),
            "bit_vector" => VhdlType::BitVector(range),
            "signed" => VhdlType::Signed(range),
            "unsigned" => VhdlType::Unsigned(range),
            _ => VhdlType::Custom(type_str.clone()),
        };
    }

    VhdlType::Custom(type_str)
}

/// Names appearing as actuals in a port association (`formal => actual`).
fn actual_names(text: &str) -> HashSet<String> {
    ASSOCIATION_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Names driven by a signal assignment somewhere in the text.
fn driven_names(text: &str) -> HashSet<String> {
    DRIVE_RE
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Best-effort textual inference, never fatal: a signal bound into a port
/// map that the testbench also drives is a DUT input; bound but only
/// observed is a DUT output; unbound is internal. The generator only needs
/// this to pick which signals to initialize.
fn infer_direction(
    name: &str,
    bound: &HashSet<String>,
    driven: &HashSet<String>,
) -> SignalDirection {
    if !bound.contains(name) {
        SignalDirection::Internal
    } else if driven.contains(name) {
        SignalDirection::Input
    } else {
        SignalDirection::Output
    }
}

/// The fixed stimulus skeleton: pulse the reset if there is one, run for a
/// fixed duration, announce the end. The `$finish` itself is appended by the
/// generator.
fn synthetic_stimulus(model: &TestbenchModel) -> Vec<StimulusStep> {
    let mut steps = Vec::new();

    let reset = model.signals.iter().find(|s| {
        let lower = s.name.to_lowercase();
        lower.contains("rst") || lower.contains("reset")
    });

    if let Some(reset) = reset {
        steps.push(StimulusStep::Assign {
            signal: reset.name.clone(),
            value: "1'b1".to_string(),
        });
        steps.push(StimulusStep::Wait { ns: RESET_PULSE_NS });
        steps.push(StimulusStep::Assign {
            signal: reset.name.clone(),
            value: "1'b0".to_string(),
        });
    }

    steps.push(StimulusStep::Wait { ns: RUN_NS });
    steps.push(StimulusStep::Display("Simulation Ended".to_string()));
    steps
}
