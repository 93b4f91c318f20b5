// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fs::{self, File};

use vcd2pwl::{parse_vcd, parse_vcd_with, PwlConfig, TimeUnit, TrackMode, ORPHANED_SCOPE_NAME};

use files::*;

fn open(file_name: &str) -> File {
    File::open(file_name).unwrap()
}

#[test]
fn parse_all_vcds() {
    for file_name in FILES {
        for mode in [TrackMode::TopOnly, TrackMode::Everything] {
            let vcd = parse_vcd_with(open(file_name), mode);

            if vcd.is_err() {
                dbg!(file_name, mode);
                vcd.unwrap();
            }
        }
    }
}

#[test]
fn export_all_vcds() {
    let dir = tempfile::tempdir().unwrap();

    for file_name in FILES {
        let vcd = parse_vcd(open(file_name)).unwrap();
        let out = dir.path().join("out.pwl");
        let config = PwlConfig::new(0.2, 0.1);

        vcd.export_pwl(&out, &config).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), vcd.to_pwl(&config).unwrap());
    }
}

#[test]
fn clock_step_and_ramp() {
    let vcd = parse_vcd(open("./tests/vcd-files/scenarios/clock_step.vcd")).unwrap();
    assert_eq!(
        vcd.metadata().date_text.as_deref(),
        Some("Mon Oct 19 10:22:31 2026")
    );
    assert!(vcd.metadata().date.is_some());

    assert_eq!(
        vcd.to_pwl(&PwlConfig::new(0.0, 0.0)).unwrap(),
        "VCLK CLK 0 pwl(\n0 0\n+'5ns' vvdd\n)\n\n"
    );
    assert_eq!(
        vcd.to_pwl(&PwlConfig::new(0.0, 1.0)).unwrap(),
        "VCLK CLK 0 pwl(\n0 0\n+'5ns' 0 '5ns+1' vvdd\n)\n\n"
    );
}

#[test]
fn bus_is_split_into_bits() {
    let vcd = parse_vcd(open("./tests/vcd-files/scenarios/bus.vcd")).unwrap();
    assert_eq!(
        vcd.to_pwl(&PwlConfig::default()).unwrap(),
        "VDATA[3] DATA[3] 0 pwl(\n0 0\n)\n\n\
         VDATA[2] DATA[2] 0 pwl(\n0 vvdd\n)\n\n\
         VDATA[1] DATA[1] 0 pwl(\n0 0\n)\n\n\
         VDATA[0] DATA[0] 0 pwl(\n0 vvdd\n)\n\n"
    );
}

#[test]
fn ambiguous_signal_is_omitted() {
    let vcd = parse_vcd(open("./tests/vcd-files/scenarios/ambiguous.vcd")).unwrap();

    let en = vcd.top_signal("EN").unwrap();
    assert!(!en.is_export_safe());
    // the value after the ambiguous one is still recorded
    assert_eq!(en.timeline().len(), 3);

    assert_eq!(
        vcd.to_pwl(&PwlConfig::default()).unwrap(),
        "VQ[1] Q[1] 0 pwl(\n0 0\n+'3ns' vvdd\n)\n\n\
         VQ[0] Q[0] 0 pwl(\n0 0\n+'1ns' vvdd\n+'3ns' 0\n)\n\n"
    );
}

#[test]
fn counter_testbench() {
    let vcd = parse_vcd(open("./tests/vcd-files/icarus/counter.vcd")).unwrap();
    assert_eq!(vcd.timescale().unwrap().to_string(), "10ps");

    let top = vcd.top().unwrap();
    assert_eq!(top.name(), "counter_tb");
    // integer and parameter variables are not modelled
    assert_eq!(top.signals().count(), 3);
    assert_eq!(vcd.side_scopes()[0].name(), "dut");

    // side scope signals are not tracked by default, aliased or not
    let dut = &vcd.side_scopes()[0];
    let dut_next = vcd.signal(dut.lookup("'").unwrap());
    assert!(dut_next.timeline().is_empty());
    assert!(dut_next.is_export_safe());
    let dut_clk = vcd.signal(dut.lookup("!").unwrap());
    assert_eq!(dut_clk.name(), "clk");
    assert!(dut_clk.timeline().is_empty());

    let pwl = vcd.to_pwl(&PwlConfig::new(0.2, 0.1)).unwrap();
    let expected = "VCLK CLK 0 pwl(\n0 0\n\
                    +'2.5ns' 0 '2.5ns+0.1' vvdd\n\
                    +'5ns' vvdd '5ns+0.1' 0\n\
                    +'7.5ns' 0 '7.5ns+0.1' vvdd\n\
                    +'10ns' vvdd '10ns+0.1' 0\n\
                    +'12.5ns' 0 '12.5ns+0.1' vvdd\n\
                    +'15ns' vvdd '15ns+0.1' 0\n)\n\n\
                    VRST RST 0 pwl(\n0 vvdd\n+'5ns' vvdd '5ns+0.2' 0\n)\n\n\
                    VCOUNT[2] COUNT[2] 0 pwl(\n0 0\n)\n\n\
                    VCOUNT[1] COUNT[1] 0 pwl(\n0 0\n+'12.5ns' 0 '12.5ns+0.2' vvdd\n)\n\n\
                    VCOUNT[0] COUNT[0] 0 pwl(\n0 0\n\
                    +'7.5ns' 0 '7.5ns+0.2' vvdd\n\
                    +'12.5ns' vvdd '12.5ns+0.2' 0\n)\n\n";
    assert_eq!(pwl, expected);

    let pwl_ps = vcd
        .to_pwl(&PwlConfig::default().with_unit(TimeUnit::Ps))
        .unwrap();
    assert!(pwl_ps.starts_with("VCLK CLK 0 pwl(\n0 0\n+'2500ps' vvdd\n+'5000ps' 0\n"));
}

#[test]
fn counter_testbench_tracking_every_scope() {
    let top_only = parse_vcd(open("./tests/vcd-files/icarus/counter.vcd")).unwrap();
    let vcd = parse_vcd_with(open("./tests/vcd-files/icarus/counter.vcd"), TrackMode::Everything)
        .unwrap();

    let dut = &vcd.side_scopes()[0];
    let dut_next = vcd.signal(dut.lookup("'").unwrap());
    assert!(!dut_next.is_export_safe());
    assert_eq!(dut_next.timeline().len(), 2);

    // ports share their identifier with the testbench net they connect to
    let clk = vcd.top_signal("CLK").unwrap();
    let dut_clk = vcd.signal(dut.lookup("!").unwrap());
    assert_eq!(clk.timeline().len(), 7);
    assert_eq!(dut_clk.timeline(), clk.timeline());
    assert_eq!(vcd.aliases("#").len(), 2);

    // only the top scope is exported, and aliasing does not change it
    let config = PwlConfig::new(0.2, 0.1);
    let pwl = vcd.to_pwl(&config).unwrap();
    assert!(!pwl.contains("count"));
    assert!(pwl.contains("VCOUNT[0]"));
    assert_eq!(pwl, top_only.to_pwl(&config).unwrap());
}

#[test]
fn orphans_and_repeated_scopes() {
    let vcd = parse_vcd(open("./tests/vcd-files/icarus/orphans.vcd")).unwrap();

    let top = vcd.top().unwrap();
    assert_eq!(top.name(), "top");
    let ids = top.signals().map(|(id, _)| id).collect::<Vec<_>>();
    assert_eq!(ids, vec!["!"]);

    // re-entering `top` after an upscope leaves the cursor unset, so B is
    // orphaned along with GLOBAL_EN
    assert_eq!(vcd.side_scopes().len(), 1);
    let orphans = &vcd.side_scopes()[0];
    assert_eq!(orphans.name(), ORPHANED_SCOPE_NAME);
    assert!(orphans.contains("*"));
    assert!(orphans.contains("\""));
    // GLOBAL_EN, A, A again, B
    assert_eq!(vcd.signals().len(), 4);

    assert_eq!(
        vcd.to_pwl(&PwlConfig::default()).unwrap(),
        "VA A 0 pwl(\n0 0\n+'2000ns' vvdd\n)\n\n"
    );

    let vcd = parse_vcd_with(open("./tests/vcd-files/icarus/orphans.vcd"), TrackMode::Everything)
        .unwrap();
    let orphans = &vcd.side_scopes()[0];
    assert_eq!(vcd.signal(orphans.lookup("*").unwrap()).timeline().len(), 1);
    assert_eq!(vcd.signal(orphans.lookup("\"").unwrap()).timeline().len(), 2);
}

#[test]
fn failed_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing_timescale.pwl");

    let vcd = parse_vcd("$scope module top $end $var reg 1 ! A $end $upscope $end".as_bytes())
        .unwrap();
    let err = vcd.export_pwl(&out, &PwlConfig::default()).unwrap_err();

    assert!(matches!(err, vcd2pwl::Error::MissingTimescale));
    assert!(!out.exists());
}

#[test]
fn truncated_trace_is_an_error() {
    let err = parse_vcd("$timescale 1ns $end $scope module top".as_bytes()).unwrap_err();
    assert!(matches!(err, vcd2pwl::Error::Parse(_)));
}
