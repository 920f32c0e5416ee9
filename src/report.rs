//! Plain-text summaries of solved designs and optimisation runs.

use std::fmt::Write;

use crate::design::Design;
use crate::evaluation::{parallel_count, Assessment, DesignCriteria};
use crate::optimizer::OptimizationResult;

/// Render member forces, reactions, cost and verdict for a solved design.
///
/// Forces are labelled `(C)` for compression and `(T)` for tension, and each
/// member lists how many elements it needs side by side.
#[must_use]
pub fn render_assessment(
    design: &Design,
    assessment: &Assessment,
    criteria: &DesignCriteria,
) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Bridge truss: {} members, supports at ({:.4}, {:.4}) and ({:.4}, {:.4})",
        design.members.len(),
        design.supports.pin.x,
        design.supports.pin.y,
        design.supports.roller.x,
        design.supports.roller.y
    )
    .expect("writing to string cannot fail");

    for (index, (member, &force)) in design
        .members
        .iter()
        .zip(assessment.solution.member_forces())
        .enumerate()
    {
        let kind = if force < 0.0 { "T" } else { "C" };
        writeln!(
            &mut output,
            "  {index:>3}: ({:.4}, {:.4}) -> ({:.4}, {:.4})  {force:+.2} ({kind}) x{}",
            member.start.x,
            member.start.y,
            member.end.x,
            member.end.y,
            parallel_count(force, criteria)
        )
        .expect("writing to string cannot fail");
    }

    let reactions = assessment.solution.reactions();
    writeln!(
        &mut output,
        "Reactions: Ax = {:+.2}, Ay = {:+.2}, By = {:+.2}",
        reactions.ax, reactions.ay, reactions.by
    )
    .expect("writing to string cannot fail");
    writeln!(&mut output, "Cost: ${:.2}", assessment.cost).expect("writing to string cannot fail");
    writeln!(&mut output, "Validity: {}", assessment.verdict)
        .expect("writing to string cannot fail");

    output
}

/// Render the per-generation progress and final joint positions of a search.
#[must_use]
pub fn render_optimization(result: &OptimizationResult) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Optimisation: ${:.2} -> ${:.2} (saved ${:.2})",
        result.initial_cost,
        result.best_cost,
        result.improvement()
    )
    .expect("writing to string cannot fail");

    for record in &result.history {
        writeln!(
            &mut output,
            "  generation {:>3}: best ${:.4}, accepted {}, invalid {}, unsolvable {}",
            record.generation, record.best_cost, record.accepted, record.invalid, record.unsolvable
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("Joints:\n");
    for joint in &result.joints {
        writeln!(&mut output, "  ({:.6}, {:.6})", joint.x, joint.y)
            .expect("writing to string cannot fail");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::assess;
    use crate::solver::LoadCase;

    #[test]
    fn formats_human_readable_assessment() {
        let design = Design::reference();
        let criteria = DesignCriteria::default();
        let assessment = assess(
            &design.members,
            &design.supports,
            &LoadCase::default(),
            &criteria,
        )
        .expect("reference bridge solves");
        let report = render_assessment(&design, &assessment, &criteria);
        assert!(report.contains("Bridge truss: 13 members"));
        assert!(report.contains("Ay = +15.00"));
        assert!(report.contains("(T)"));
        assert!(report.contains("(C)"));
        assert!(report.contains("Validity: design valid"));
        assert_eq!(report.lines().count(), 1 + 13 + 3);
    }
}
