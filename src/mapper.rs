//! Type & value mapping from VHDL declarations to Verilog testbench
//! declarations. Mapping is best-effort and never fails: anything the table
//! does not cover degrades to a 1-bit register plus a warning, so an exotic
//! type never blocks a whole conversion.

use crate::diagnostics::Diagnostic;
use crate::ir::{Signal, VhdlType};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref BIT_STRING_RE: Regex = Regex::new(r#"^"([01]+)"$"#).unwrap();
    static ref OTHERS_RE: Regex = Regex::new(r"(?i)^\(\s*others\s*=>\s*'([01])'\s*\)$").unwrap();
}

/// Fill `signal.target_declaration` and `signal.target_initial` from the
/// source declaration, reporting lossy mappings through `diagnostics`.
pub fn map_signal(signal: &mut Signal, diagnostics: &mut Vec<Diagnostic>) {
    signal.target_initial = Some(map_initial_value(signal, diagnostics));
    let declaration = match &signal.source_type {
        VhdlType::StdLogicVector(range) | VhdlType::BitVector(range) | VhdlType::Unsigned(range) => {
            format!("reg {} {}", range.to_verilog(), signal.name)
        }
        VhdlType::Signed(range) => format!("reg signed {} {}", range.to_verilog(), signal.name),
        VhdlType::StdLogic | VhdlType::Bit | VhdlType::Boolean => format!("reg {}", signal.name),
        VhdlType::Integer | VhdlType::Natural | VhdlType::Positive => {
            format!("integer {}", signal.name)
        }
        VhdlType::Custom(name) => {
            diagnostics.push(Diagnostic::warning(
                format!("unsupported type `{}` defaulted to 1-bit", name),
                format!("signal {} : {}", signal.name, signal.raw_type),
            ));
            format!("reg {}", signal.name)
        }
    };
    signal.target_declaration = Some(declaration);
}

/// Map a VHDL initial-value literal to a Verilog literal. Unrecognized
/// literals default to `0` with a warning, same never-fail policy as the
/// type table. An absent initial value is plain `0` with no diagnostic.
fn map_initial_value(signal: &Signal, diagnostics: &mut Vec<Diagnostic>) -> String {
    let literal = match &signal.initial_value {
        Some(value) => value.trim(),
        None => return "0".to_string(),
    };

    match literal {
        "'0'" => return "1'b0".to_string(),
        "'1'" => return "1'b1".to_string(),
        _ => {}
    }
    if literal.eq_ignore_ascii_case("true") {
        return "1'b1".to_string();
    }
    if literal.eq_ignore_ascii_case("false") {
        return "1'b0".to_string();
    }
    if DECIMAL_RE.is_match(literal) {
        return literal.to_string();
    }
    if let Some(cap) = BIT_STRING_RE.captures(literal) {
        let bits = &cap[1];
        return format!("{}'b{}", bits.len(), bits);
    }
    if let Some(cap) = OTHERS_RE.captures(literal) {
        return match &cap[1] {
            "1" => format!("{{{}{{1'b1}}}}", signal.source_type.width()),
            _ => "0".to_string(),
        };
    }

    diagnostics.push(Diagnostic::warning(
        format!("unrecognized initial value `{}` defaulted to 0", literal),
        format!("signal {} : {}", signal.name, signal.raw_type),
    ));
    "0".to_string()
}
