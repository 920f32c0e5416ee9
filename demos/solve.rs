use bridgex::report::render_assessment;
use bridgex::{assess, Design, DesignCriteria, LoadCase};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let design = Design::reference();
    let criteria = DesignCriteria::default();

    for intensity in [2.5, 5.0] {
        let load = LoadCase { intensity };
        let assessment = assess(&design.members, &design.supports, &load, &criteria)?;
        println!("Deck load {intensity} per unit length");
        println!("{}", render_assessment(&design, &assessment, &criteria));
    }

    Ok(())
}
