use std::io::Write;

use krpsim_core::KrpsimError;
use krpsim_verify::verify_files;

#[test]
fn verifies_a_trace_against_a_configuration_on_disk() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "a:3").unwrap();
    writeln!(config_file, "p1:(a:1):(b:1):2").unwrap();
    writeln!(config_file, "optimize:(b)").unwrap();

    let mut trace_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(trace_file, "0:p1").unwrap();
    writeln!(trace_file, "0:p1").unwrap();
    writeln!(trace_file, "0:p1").unwrap();
    writeln!(trace_file, "2:no_more_process_doable").unwrap();

    let final_stock = verify_files(config_file.path(), trace_file.path()).unwrap();
    assert_eq!(final_stock.get("b"), 3);
    assert_eq!(final_stock.get("a"), 0);
}

#[test]
fn a_sentinel_only_trace_verifies_as_no_executions() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "euro:10").unwrap();
    writeln!(config_file, "needs_unobtainable:(unobtainable:1):(target:1):1").unwrap();
    writeln!(config_file, "optimize:(target)").unwrap();

    let mut trace_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(trace_file, "0:no_more_process_doable").unwrap();

    let final_stock = verify_files(config_file.path(), trace_file.path()).unwrap();
    assert_eq!(final_stock.get("euro"), 10);
    assert_eq!(final_stock.get("target"), 0);
}

#[test]
fn rejects_a_trace_that_outruns_the_declared_stock() {
    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(config_file, "a:1").unwrap();
    writeln!(config_file, "p1:(a:1):(b:1):2").unwrap();
    writeln!(config_file, "optimize:(b)").unwrap();

    let mut trace_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(trace_file, "0:p1").unwrap();
    writeln!(trace_file, "0:p1").unwrap();

    let err = verify_files(config_file.path(), trace_file.path()).unwrap_err();
    assert!(matches!(err, KrpsimError::UnsatisfiedNeeds { .. }));
}
