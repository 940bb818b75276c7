use std::fs;
use std::path::PathBuf;

use tb_transpiler::error::{BindingError, ConversionError, ParseError};
use tb_transpiler::ir::{NetlistInterface, PortDirection};
use tb_transpiler::{convert, parser};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("tests/fixtures/{name}"))
}

#[test]
fn test_counter_conversion_scenario() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("counter_tb_post.v");

    let diags = convert(
        &fixture("counter_tb.vhd"),
        &fixture("counter_netlist.v"),
        &out,
    )
    .unwrap();
    assert!(diags.is_empty());

    let verilog = fs::read_to_string(&out).unwrap();
    println!("Generated Verilog:\n{}", verilog);

    assert!(verilog.contains("`timescale 1ns/1ps"));
    assert!(verilog.contains("module counter_tb_tb;"));

    // 1-bit registers initialized to 0, 4-bit register for the count.
    assert!(verilog.contains("reg clk = 1'b0;"));
    assert!(verilog.contains("reg rst = 1'b0;"));
    assert!(verilog.contains("reg [3:0] count;"));

    // Named-port DUT instantiation.
    assert!(verilog.contains("counter uut ("));
    assert!(verilog.contains(".clk(clk)"));
    assert!(verilog.contains(".rst(rst)"));
    assert!(verilog.contains(".count(count)"));

    // Clock toggle and termination.
    assert!(verilog.contains("always #10 clk = ~clk;"));
    assert!(verilog.contains("$finish;"));
    assert!(verilog.contains("endmodule"));
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("counter_tb_post.v");

    convert(
        &fixture("counter_tb.vhd"),
        &fixture("counter_netlist.v"),
        &out,
    )
    .unwrap();
    let first = fs::read(&out).unwrap();

    convert(
        &fixture("counter_tb.vhd"),
        &fixture("counter_netlist.v"),
        &out,
    )
    .unwrap();
    let second = fs::read(&out).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_port_completeness() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("counter_tb_post.v");

    convert(
        &fixture("counter_tb.vhd"),
        &fixture("counter_netlist.v"),
        &out,
    )
    .unwrap();
    let verilog = fs::read_to_string(&out).unwrap();

    let netlist_text = fs::read_to_string(fixture("counter_netlist.v")).unwrap();
    let iface = parser::netlist::extract(&netlist_text).unwrap();

    for port in &iface.ports {
        let connection = format!(".{}(", port.name);
        assert_eq!(
            verilog.matches(&connection).count(),
            1,
            "expected exactly one connection for port {}",
            port.name
        );
    }
}

#[test]
fn test_declaration_order_matches_source() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("counter_tb_post.v");

    convert(
        &fixture("counter_tb.vhd"),
        &fixture("counter_netlist.v"),
        &out,
    )
    .unwrap();
    let verilog = fs::read_to_string(&out).unwrap();

    let clk_pos = verilog.find("reg clk").unwrap();
    let rst_pos = verilog.find("reg rst").unwrap();
    let count_pos = verilog.find("reg [3:0] count").unwrap();
    assert!(clk_pos < rst_pos);
    assert!(rst_pos < count_pos);
}

#[test]
fn test_ascending_range_and_lossy_type() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("shifter_tb_post.v");

    let diags = convert(
        &fixture("shifter_tb.vhd"),
        &fixture("shifter_netlist.v"),
        &out,
    )
    .unwrap();

    let verilog = fs::read_to_string(&out).unwrap();
    println!("Generated Verilog:\n{}", verilog);

    // `(0 to 7)` keeps its index order: bit 0 stays bit 0.
    assert!(verilog.contains("reg [0:7] din = 8'b00000001;"));
    assert!(verilog.contains("reg [0:7] dout;"));
    // integer-typed signal uses native integer storage.
    assert!(verilog.contains("integer cycles = 0;"));
    // The custom-typed signal still converts, as a 1-bit register.
    assert!(verilog.contains("reg mode;"));

    // ...and the lossy default is reported.
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("shift_mode_t"));
    assert!(diags[0].context.contains("mode"));
}

#[test]
fn test_netlist_without_module_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let bad_netlist = dir.path().join("not_a_netlist.v");
    fs::write(&bad_netlist, "// empty synthesis product\n").unwrap();
    let out = dir.path().join("counter_tb_post.v");

    let err = convert(&fixture("counter_tb.vhd"), &bad_netlist, &out).unwrap_err();
    match err {
        ConversionError::Parse { source, .. } => {
            assert_eq!(source, ParseError::NoModuleFound)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_unresolved_port_scenario() {
    let dir = TempDir::new().unwrap();
    let netlist = dir.path().join("counter_scan.v");
    fs::write(
        &netlist,
        "module counter(input clk, input rst, input scan_en, output [3:0] count);\nendmodule\n",
    )
    .unwrap();
    let out = dir.path().join("counter_tb_post.v");

    let err = convert(&fixture("counter_tb.vhd"), &netlist, &out).unwrap_err();
    match err {
        ConversionError::Binding(BindingError::UnresolvedPort(name)) => {
            assert_eq!(name, "scan_en")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_width_mismatch_reported_as_warning() {
    let dir = TempDir::new().unwrap();
    let netlist = dir.path().join("counter_wide.v");
    fs::write(
        &netlist,
        "module counter(input clk, input rst, output [7:0] count);\nendmodule\n",
    )
    .unwrap();
    let out = dir.path().join("counter_tb_post.v");

    let diags = convert(&fixture("counter_tb.vhd"), &netlist, &out).unwrap();
    assert!(out.exists());
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("width mismatch"));
    assert!(diags[0].message.contains("count"));
}

#[test]
fn test_interface_serde_round_trip() {
    let netlist_text = fs::read_to_string(fixture("counter_netlist.v")).unwrap();
    let iface = parser::netlist::extract(&netlist_text).unwrap();

    let json = serde_json::to_string(&iface).unwrap();
    let restored: NetlistInterface = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.module_name, "counter");
    assert_eq!(restored.ports.len(), 3);
    assert_eq!(restored.ports[2].direction, PortDirection::Output);
    assert_eq!(restored.ports[2].width, 4);
}
