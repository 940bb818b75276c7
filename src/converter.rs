//! Converter facade: the one externally visible operation. Runs the linear
//! pipeline (read, extract, analyze, map, generate, write) and owns all
//! error tagging and diagnostic accumulation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::diagnostics::Diagnostic;
use crate::error::ConversionError;
use crate::ir::VerilogTestbenchGenerator;
use crate::mapper;
use crate::parser;

/// Convert the VHDL testbench at `testbench_path` into a Verilog testbench
/// driving the gate-level netlist at `netlist_path`, writing the result to
/// `output_path`.
///
/// On success returns the accumulated warning diagnostics. On any failure
/// nothing is written: the full output text is built in memory and written
/// through a temporary file renamed over `output_path`.
pub fn convert(
    testbench_path: &Path,
    netlist_path: &Path,
    output_path: &Path,
) -> Result<Vec<Diagnostic>, ConversionError> {
    info!(
        testbench = %testbench_path.display(),
        netlist = %netlist_path.display(),
        output = %output_path.display(),
        "converting VHDL testbench"
    );

    let testbench_text = read_input(testbench_path)?;
    let netlist_text = read_input(netlist_path)?;

    let iface = parser::netlist::extract(&netlist_text).map_err(|source| {
        error!(path = %netlist_path.display(), %source, "netlist parse failed");
        ConversionError::Parse {
            path: netlist_path.to_path_buf(),
            source,
        }
    })?;
    debug!(
        module = %iface.module_name,
        ports = iface.ports.len(),
        "parsed DUT interface"
    );

    let mut model = parser::vhdl_tb::analyze(&testbench_text).map_err(|source| {
        error!(path = %testbench_path.display(), %source, "testbench parse failed");
        ConversionError::Parse {
            path: testbench_path.to_path_buf(),
            source,
        }
    })?;
    debug!(
        entity = %model.entity_name,
        signals = model.signals.len(),
        "parsed testbench model"
    );

    let mut diagnostics = Vec::new();
    for signal in &mut model.signals {
        mapper::map_signal(signal, &mut diagnostics);
    }
    // Mapper warnings concern the testbench side.
    for diag in &mut diagnostics {
        diag.file = Some(testbench_path.to_path_buf());
    }

    let mut binding_diagnostics = Vec::new();
    let generator = VerilogTestbenchGenerator::new();
    let verilog = generator
        .generate(&model, &iface, &mut binding_diagnostics)
        .map_err(|source| {
            error!(path = %netlist_path.display(), %source, "generation failed");
            ConversionError::Binding(source)
        })?;
    for diag in &mut binding_diagnostics {
        diag.file = Some(netlist_path.to_path_buf());
    }
    diagnostics.extend(binding_diagnostics);

    write_atomically(output_path, &verilog)?;

    for diag in &diagnostics {
        warn!(%diag, "conversion warning");
    }
    info!(output = %output_path.display(), "testbench conversion succeeded");
    Ok(diagnostics)
}

fn read_input(path: &Path) -> Result<String, ConversionError> {
    fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), %source, "read failed");
        ConversionError::Read {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write the finished text through a temporary file in the destination
/// directory, then rename it into place. A failed conversion or interrupted
/// write never leaves a partial `output_path` behind.
fn write_atomically(output_path: &Path, text: &str) -> Result<(), ConversionError> {
    let write_err = |source: std::io::Error| {
        error!(path = %output_path.display(), %source, "write failed");
        ConversionError::Write {
            path: output_path.to_path_buf(),
            source,
        }
    };

    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(text.as_bytes()).map_err(write_err)?;
    tmp.persist(output_path)
        .map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BindingError, ParseError};
    use tempfile::TempDir;

    const TB: &str = r#"
    entity counter_tb is end;
    architecture sim of counter_tb is
        signal clk   : std_logic := '0';
        signal rst   : std_logic := '0';
        signal count : std_logic_vector(3 downto 0);
    begin
        uut: entity work.counter
            port map ( clk => clk, rst => rst, count => count );
        clk <= not clk after 10 ns;
        stim: process begin
            rst <= '1';
            wait for 100 ns;
            rst <= '0';
            wait;
        end process;
    end;
    "#;

    const NETLIST: &str = "module counter(input clk, input rst, output [3:0] count);\nendmodule\n";

    fn write_inputs(dir: &TempDir) -> (PathBuf, PathBuf, PathBuf) {
        let tb = dir.path().join("counter_tb.vhd");
        let netlist = dir.path().join("counter_synth.v");
        fs::write(&tb, TB).unwrap();
        fs::write(&netlist, NETLIST).unwrap();
        (tb, netlist, dir.path().join("counter_tb_post.v"))
    }

    #[test]
    fn test_convert_counter() {
        let dir = TempDir::new().unwrap();
        let (tb, netlist, out) = write_inputs(&dir);

        let diags = convert(&tb, &netlist, &out).unwrap();
        assert!(diags.is_empty());

        let verilog = fs::read_to_string(&out).unwrap();
        assert!(verilog.contains("module counter_tb_tb;"));
        assert!(verilog.contains("counter uut ("));
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let (tb, _, out) = write_inputs(&dir);

        let err = convert(&tb, &dir.path().join("absent.v"), &out).unwrap_err();
        assert!(matches!(err, ConversionError::Read { .. }));
        assert!(!out.exists());
    }

    #[test]
    fn test_parse_failure_is_tagged_with_path() {
        let dir = TempDir::new().unwrap();
        let (tb, _, out) = write_inputs(&dir);
        let netlist = dir.path().join("empty.v");
        fs::write(&netlist, "// nothing here\n").unwrap();

        let err = convert(&tb, &netlist, &out).unwrap_err();
        match err {
            ConversionError::Parse { path, source } => {
                assert_eq!(path, netlist);
                assert_eq!(source, ParseError::NoModuleFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_binding_failure_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let (tb, _, out) = write_inputs(&dir);
        let netlist = dir.path().join("extra_port.v");
        fs::write(
            &netlist,
            "module counter(input clk, input rst, input load, output [3:0] count);\nendmodule\n",
        )
        .unwrap();

        let err = convert(&tb, &netlist, &out).unwrap_err();
        match err {
            ConversionError::Binding(BindingError::UnresolvedPort(name)) => {
                assert_eq!(name, "load");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_warnings_carry_source_file() {
        let dir = TempDir::new().unwrap();
        let tb = dir.path().join("odd_tb.vhd");
        fs::write(
            &tb,
            r#"
            entity odd_tb is end;
            architecture sim of odd_tb is
                signal clk  : std_logic := '0';
                signal mode : opcode_t;
            begin
                uut: entity work.odd port map ( clk => clk );
                clk <= not clk after 10 ns;
            end;
            "#,
        )
        .unwrap();
        let netlist = dir.path().join("odd.v");
        fs::write(&netlist, "module odd(input clk);\nendmodule\n").unwrap();
        let out = dir.path().join("odd_tb_post.v");

        let diags = convert(&tb, &netlist, &out).unwrap();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("opcode_t"));
        assert_eq!(diags[0].file.as_deref(), Some(tb.as_path()));
        assert!(out.exists());
    }
}
