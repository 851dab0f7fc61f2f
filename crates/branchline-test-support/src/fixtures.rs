//! Fixture story graphs.

use branchline_core::story::{Choice, Scene, StoryGraph};

fn choice(label: &str, target: i64) -> Choice {
    Choice {
        label: label.to_owned(),
        target,
    }
}

fn scene(image: &str, text: &str, options: Vec<Choice>) -> Scene {
    Scene {
        image: image.to_owned(),
        text: text.to_owned(),
        options,
    }
}

/// `Start --Go--> End`.
#[must_use]
pub fn start_end_graph() -> StoryGraph {
    StoryGraph::new(vec![
        scene("intro", "Start", vec![choice("Go", 1)]),
        scene("outro", "End", Vec::new()),
    ])
}

/// `A`, `B`, `C` where `A` offers a choice to `B` and one straight to `C`,
/// and `B` continues to `C`.
#[must_use]
pub fn three_scene_graph() -> StoryGraph {
    StoryGraph::new(vec![
        scene("a", "A", vec![choice("To B", 1), choice("To C", 2)]),
        scene("b", "B", vec![choice("On to C", 2)]),
        scene("c", "C", Vec::new()),
    ])
}

/// A story with a loop back to the start and two endings.
#[must_use]
pub fn branching_graph() -> StoryGraph {
    StoryGraph::new(vec![
        scene(
            "crossroads",
            "You stand at a crossroads.",
            vec![choice("Take the forest path", 1), choice("Enter the cave", 2)],
        ),
        scene(
            "forest",
            "The forest is quiet.",
            vec![choice("Turn back", 0), choice("Press on", 3)],
        ),
        scene("cave", "The cave collapses behind you.", Vec::new()),
        scene("clearing", "You reach a sunlit clearing.", Vec::new()),
    ])
}
