use bridgex::report::render_optimization;
use bridgex::{BridgeConfig, Design, Optimizer, Topology};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = BridgeConfig::default();
    config.optimizer.radius = 0.01;
    config.optimizer.iterations = 500;
    config.optimizer.generations = 10;

    let design = Design::reference();
    let topology = Topology::from_members(&design.members);
    let result = Optimizer::with_rng(&config, StdRng::seed_from_u64(2024)).run(
        &design.members,
        &design.supports,
        &topology,
    )?;
    print!("{}", render_optimization(&result));

    println!("{}", result.design(design.supports).to_json()?);
    Ok(())
}
