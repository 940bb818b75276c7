use crate::diagnostics::Diagnostic;
use crate::error::BindingError;
use crate::ir::{NetlistInterface, SignalDirection, StimulusStep, TestbenchModel};

/// Emits the Verilog testbench text from a mapped testbench model and the
/// netlist interface. Section order is fixed, so identical inputs always
/// produce byte-identical output.
pub struct VerilogTestbenchGenerator {
    indent: String,
}

impl VerilogTestbenchGenerator {
    pub fn new() -> Self {
        Self {
            indent: "    ".to_string(),
        }
    }

    pub fn with_indent(indent: String) -> Self {
        Self { indent }
    }

    /// Generate the complete testbench. Fails with `UnresolvedPort` before
    /// producing any text if a netlist port has no same-named signal; width
    /// mismatches between a port and its signal are warnings only.
    pub fn generate(
        &self,
        model: &TestbenchModel,
        iface: &NetlistInterface,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<String, BindingError> {
        self.check_bindings(model, iface, diagnostics)?;

        let mut output = String::new();
        output.push_str(&self.generate_header(model));
        output.push_str(&self.generate_declarations(model));
        output.push_str(&self.generate_instantiation(model, iface));
        output.push_str(&self.generate_clock(model));
        output.push_str(&self.generate_stimulus(model));
        output.push_str("endmodule\n");

        Ok(output)
    }

    /// Every port must resolve before any text is emitted; a failed binding
    /// must not leave partial output behind.
    fn check_bindings(
        &self,
        model: &TestbenchModel,
        iface: &NetlistInterface,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<(), BindingError> {
        for port in &iface.ports {
            let signal = model
                .find_signal(&port.name)
                .ok_or_else(|| BindingError::UnresolvedPort(port.name.clone()))?;

            let signal_width = signal.source_type.width();
            if signal_width != port.width {
                diagnostics.push(Diagnostic::warning(
                    format!(
                        "width mismatch on `{}`: netlist port is {} bits, testbench signal is {} bits",
                        port.name, port.width, signal_width
                    ),
                    format!(".{}({})", port.name, signal.name),
                ));
            }
        }
        Ok(())
    }

    fn generate_header(&self, model: &TestbenchModel) -> String {
        let mut output = String::new();
        output.push_str("// Converted from VHDL testbench by tb_transpiler\n");
        output.push_str("// Auto-generated for post-synthesis simulation\n");
        output.push('\n');
        output.push_str("`timescale 1ns/1ps\n");
        output.push('\n');
        output.push_str(&format!("module {}_tb;\n", model.entity_name));
        output.push('\n');
        output
    }

    fn generate_declarations(&self, model: &TestbenchModel) -> String {
        let mut output = String::new();
        output.push_str("// Signal declarations\n");
        for signal in &model.signals {
            // The mapper runs before generation, so a missing declaration is
            // a caller bug; fall back to a 1-bit register rather than panic.
            let declaration = signal
                .target_declaration
                .clone()
                .unwrap_or_else(|| format!("reg {}", signal.name));

            output.push_str(&self.indent);
            match (&signal.initial_value, &signal.target_initial) {
                (Some(_), Some(init)) => {
                    output.push_str(&format!("{} = {};\n", declaration, init));
                }
                _ => output.push_str(&format!("{};\n", declaration)),
            }
        }
        output.push('\n');
        output
    }

    fn generate_instantiation(&self, model: &TestbenchModel, iface: &NetlistInterface) -> String {
        let mut output = String::new();
        output.push_str("// DUT instantiation\n");
        output.push_str(&self.indent);
        output.push_str(&format!("{} uut (\n", iface.module_name));

        let connections: Vec<String> = iface
            .ports
            .iter()
            .map(|port| {
                // check_bindings already proved the signal exists.
                let signal_name = model
                    .find_signal(&port.name)
                    .map(|s| s.name.as_str())
                    .unwrap_or(port.name.as_str());
                format!("{}{}.{}({})", self.indent, self.indent, port.name, signal_name)
            })
            .collect();
        output.push_str(&connections.join(",\n"));
        output.push('\n');

        output.push_str(&self.indent);
        output.push_str(");\n");
        output.push('\n');
        output
    }

    fn generate_clock(&self, model: &TestbenchModel) -> String {
        let clock = model
            .signals
            .iter()
            .find(|s| s.name.to_lowercase().contains("clk"));

        match clock {
            Some(clock) => {
                let mut output = String::new();
                output.push_str("// Clock generation\n");
                output.push_str(&self.indent);
                output.push_str(&format!("always #10 {0} = ~{0};\n", clock.name));
                output.push('\n');
                output
            }
            None => String::new(),
        }
    }

    fn generate_stimulus(&self, model: &TestbenchModel) -> String {
        let double_indent = format!("{}{}", self.indent, self.indent);

        let mut output = String::new();
        output.push_str("// Stimulus process\n");
        output.push_str(&self.indent);
        output.push_str("initial begin\n");

        output.push_str(&double_indent);
        output.push_str("// Initialize signals\n");
        for signal in &model.signals {
            match signal.inferred_direction {
                SignalDirection::Internal | SignalDirection::Output => continue,
                SignalDirection::Input | SignalDirection::InOut => {}
            }
            let init = signal.target_initial.as_deref().unwrap_or("0");
            output.push_str(&double_indent);
            output.push_str(&format!("{} = {};\n", signal.name, init));
        }
        output.push('\n');

        for step in &model.stimulus {
            output.push_str(&double_indent);
            match step {
                StimulusStep::Assign { signal, value } => {
                    output.push_str(&format!("{} = {};\n", signal, value));
                }
                StimulusStep::Wait { ns } => {
                    output.push_str(&format!("#{};\n", ns));
                }
                StimulusStep::Display(message) => {
                    output.push_str(&format!("$display(\"{}\");\n", message));
                }
            }
        }

        output.push('\n');
        output.push_str(&double_indent);
        output.push_str("// End simulation\n");
        output.push_str(&double_indent);
        output.push_str("$finish;\n");
        output.push_str(&self.indent);
        output.push_str("end\n");
        output.push('\n');
        output
    }
}

impl Default for VerilogTestbenchGenerator {
    fn default() -> Self {
        Self::new()
    }
}
