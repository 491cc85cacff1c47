use rand::rngs::StdRng;
use rand::SeedableRng;

use krpsim_algo::{finalize_process, is_complex, retrieve_instructions, score_schedule};
use krpsim_core::{Catalog, Process, Stock};

fn stock(entries: &[(&str, i64)]) -> Stock {
    Stock::from_entries(entries.iter().map(|(n, q)| (n.to_string(), *q)))
}

#[test]
fn inception_lite_runs_end_to_end_and_delivers() {
    let mut catalog = Catalog::new();
    catalog.insert(Process::new("buy_material", stock(&[("euro", 8)]), stock(&[("material", 1)]), 10));
    catalog.insert(Process::new("buy_tools", stock(&[("euro", 7)]), stock(&[("tools", 1)]), 10));
    catalog.insert(Process::new(
        "do_montage",
        stock(&[("material", 1), ("tools", 1)]),
        stock(&[("product", 1)]),
        30,
    ));
    catalog.insert(Process::new("delivery", stock(&[("product", 1)]), stock(&[("client_content", 1)]), 20));
    let initial = stock(&[("euro", 20)]);

    assert!(!is_complex(&catalog));

    let mut rng = StdRng::seed_from_u64(11);
    let instructions = retrieve_instructions(&initial, "client_content", &catalog, 100, false, &mut rng);
    let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 200, 200, false);
    let score = score_schedule(&schedule, &initial, &final_stock, "client_content");

    assert!(final_stock.get("client_content") >= 1);
    assert!(score.created >= 1);
}

#[test]
fn infinite_perfect_scenario_is_self_sustaining() {
    let mut catalog = Catalog::new();
    catalog.insert(Process::new(
        "replicate",
        stock(&[("seed", 1)]),
        stock(&[("seed", 2), ("output", 1)]),
        10,
    ));
    let initial = stock(&[("seed", 1)]);

    let mut rng = StdRng::seed_from_u64(5);
    let instructions = retrieve_instructions(&initial, "output", &catalog, 50, false, &mut rng);
    let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 100, 100, false);
    let score = score_schedule(&schedule, &initial, &final_stock, "output");

    assert!(final_stock.get("seed") >= initial.get("seed"));
    assert!(score.created > 0);
}

#[test]
fn deadlock_scenario_terminates_with_nothing_produced() {
    let mut catalog = Catalog::new();
    catalog.insert(Process::new(
        "needs_unobtainable",
        stock(&[("unobtainable", 1)]),
        stock(&[("target", 1)]),
        1,
    ));
    let initial = stock(&[("euro", 10)]);

    let mut rng = StdRng::seed_from_u64(2);
    let instructions = retrieve_instructions(&initial, "target", &catalog, 50, false, &mut rng);
    let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 50, 50, false);
    let score = score_schedule(&schedule, &initial, &final_stock, "target");

    assert_eq!(score.created, 0);
    assert_eq!(score.score, 0.0);
}

#[test]
fn empty_catalog_produces_an_empty_zero_scored_schedule() {
    let catalog = Catalog::new();
    let initial = stock(&[("euro", 10)]);

    let mut rng = StdRng::seed_from_u64(1);
    let instructions = retrieve_instructions(&initial, "anything", &catalog, 50, false, &mut rng);
    assert!(instructions.is_empty());

    let (schedule, final_stock) = finalize_process(instructions, &initial, &catalog, 50, 50, false);
    let score = score_schedule(&schedule, &initial, &final_stock, "anything");
    assert_eq!(score.score, 0.0);
    assert!(!score.self_sustaining);
}
