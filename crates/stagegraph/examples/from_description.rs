//! Example: Laying out a workflow built in code
//!
//! This example builds a small review workflow with the description types
//! directly, without parsing JSON, and prints where each stage lands.

use stagegraph::{
    LayoutBuilder,
    config::{AppConfig, Direction},
    description::{GraphDescription, StageData, StageDescription, TransitionDescription},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building workflow description...\n");

    let stages = vec![
        StageDescription::new(
            "draft",
            StageData::default()
                .with_label("Draft")
                .with_tasks(["Write summary", "Attach files"])
                .with_initial(true),
        ),
        StageDescription::new(
            "review",
            StageData::default()
                .with_label("Review")
                .with_description("Peer review of the submission"),
        ),
        StageDescription::new("legal", StageData::default().with_label("Legal check")),
        StageDescription::new("published", StageData::default().with_label("Published")),
    ];

    let transitions = vec![
        TransitionDescription::new("submit", "draft", "review"),
        TransitionDescription::new("escalate", "review", "legal"),
        TransitionDescription::new("approve", "legal", "published"),
        // Small fixes skip the legal check
        TransitionDescription::new("fast_track", "review", "published"),
        // Rejections go back to the author
        TransitionDescription::new("reject", "review", "draft"),
    ];

    let description = GraphDescription::new(stages, transitions);

    println!("Created workflow:");
    println!("  Stages: {}", description.nodes().len());
    println!("  Transitions: {}", description.edges().len());
    println!();

    for direction in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
        println!("Layout flowing {direction}:");
        let builder = LayoutBuilder::new(AppConfig::default().with_direction(direction));
        let layout = builder.layout(&description)?;

        for node in layout.nodes() {
            let position = node.position();
            println!(
                "  {:<12} layer {} at ({:.0}, {:.0})",
                node.label(),
                node.layer(),
                position.x(),
                position.y()
            );
        }
        for edge in layout.edges() {
            println!(
                "  {:<12} {:?} ({:?} -> {:?})",
                edge.id().to_string(),
                edge.kind(),
                edge.source_side(),
                edge.target_side()
            );
        }

        let bounds = layout.bounding_box();
        println!("  Canvas: {:.0} x {:.0}\n", bounds.width(), bounds.height());
    }

    Ok(())
}
