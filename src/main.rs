use std::env;
use std::error::Error;

use bridgex::report::{render_assessment, render_optimization};
use bridgex::{assess, optimize, BridgeConfig, Design, Topology};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);

    // An optional JSON file overrides the reference loads, prices and search
    // parameters; anything it leaves out keeps its default.
    let config = match args.next() {
        Some(path) => BridgeConfig::from_path(path)?,
        None => BridgeConfig::default(),
    };
    // A saved design, e.g. the output of an earlier run, replaces the reference
    // bridge as the starting point.
    let design = match args.next() {
        Some(path) => Design::load(path)?,
        None => Design::reference(),
    };
    let output = args.next();

    // Solve the starting design first so it is on record.
    let assessment = assess(
        &design.members,
        &design.supports,
        &config.load,
        &config.criteria,
    )?;
    println!("{}", render_assessment(&design, &assessment, &config.criteria));

    // The joint connectivity stays fixed while joint positions are searched.
    let topology = Topology::from_members(&design.members);
    let result = optimize(&design.members, &design.supports, &topology, &config)?;
    println!("{}", render_optimization(&result));

    let best = result.design(design.supports);
    let best_assessment = assess(
        &best.members,
        &best.supports,
        &config.load,
        &config.criteria,
    )?;
    println!("{}", render_assessment(&best, &best_assessment, &config.criteria));

    if let Some(path) = output {
        best.save(&path)?;
        println!("Best design written to {path}");
    }

    Ok(())
}
