use crate::error::ParseError;
use crate::ir::{NetlistInterface, Port, PortDirection};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MODULE_RE: Regex = Regex::new(r"\bmodule\s+([A-Za-z_]\w*)\s*\(").unwrap();
    // One port-list entry: optional direction, optional net keyword (Yosys
    // writes `input wire clk` style headers), optional range, identifier.
    static ref ENTRY_RE: Regex = Regex::new(
        r"(?s)^(?:(input|output|inout)\s+)?(?:(?:wire|reg)\s+)?(?:\[\s*(\d+)\s*:\s*(\d+)\s*\]\s*)?([A-Za-z_$]\w*)$"
    )
    .unwrap();
    static ref LINE_COMMENT_RE: Regex = Regex::new(r"//[^\n]*").unwrap();
    static ref ATTRIBUTE_RE: Regex = Regex::new(r"(?s)\(\*.*?\*\)").unwrap();
}

/// Parse the header of a gate-level Verilog netlist into an ordered port
/// interface. Only the module header is read; the body is ignored.
pub fn extract(netlist_text: &str) -> Result<NetlistInterface, ParseError> {
    let stripped = LINE_COMMENT_RE.replace_all(netlist_text, "");
    let stripped = ATTRIBUTE_RE.replace_all(&stripped, "");
    let text: &str = &stripped;

    if !text.split_whitespace().any(|w| w == "module") {
        return Err(ParseError::NoModuleFound);
    }

    let cap = MODULE_RE
        .captures(&text)
        .ok_or_else(|| ParseError::MalformedPortList(fragment_of(&text)))?;
    let module_name = cap[1].to_string();
    let list_start = cap.get(0).unwrap().end();

    let port_list = balanced_port_list(&text[list_start..])?;

    let mut interface = NetlistInterface::new(module_name);
    // Direction keywords apply to every following entry until the next
    // explicit keyword, as in grouped Verilog port declarations.
    let mut current_direction = PortDirection::Input;

    for entry in split_top_level(&port_list) {
        let entry = entry.trim();
        if entry.is_empty() {
            if port_list.trim().is_empty() {
                break; // module with an empty port list
            }
            return Err(ParseError::MalformedPortList(port_list.trim().to_string()));
        }

        let cap = ENTRY_RE
            .captures(entry)
            .ok_or_else(|| ParseError::MalformedPortList(entry.to_string()))?;

        if let Some(dir) = cap.get(1) {
            // Keyword set is fixed by ENTRY_RE, so from_verilog cannot miss.
            current_direction =
                PortDirection::from_verilog(dir.as_str()).unwrap_or(PortDirection::Input);
        }

        let width = match (cap.get(2), cap.get(3)) {
            (Some(high), Some(low)) => {
                let high: i64 = high.as_str().parse().unwrap_or(0);
                let low: i64 = low.as_str().parse().unwrap_or(0);
                (high - low).unsigned_abs() as u32 + 1
            }
            _ => 1,
        };

        interface.add_port(Port::new(cap[4].to_string(), current_direction, width));
    }

    Ok(interface)
}

/// Capture everything up to the parenthesis balancing the one already
/// consumed by the module-header match. Port entries may themselves contain
/// parenthesized expressions, which a non-greedy regex would cut short.
fn balanced_port_list(text: &str) -> Result<String, ParseError> {
    let mut depth = 1u32;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text[..i].to_string());
                }
            }
            _ => {}
        }
    }
    Err(ParseError::MalformedPortList(fragment_of(text)))
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&list[start..]);
    entries
}

fn fragment_of(text: &str) -> String {
    text.trim().chars().take(60).collect()
}
