//! Detail records the buoys reveal. Passed verbatim to the UI collaborator.

/// Content payload for one buoy's detail view.
#[derive(Debug, Clone)]
pub struct BuoyContent {
    pub title: &'static str,
    pub problem: &'static str,
    pub timeline: &'static str,
    pub solution: &'static str,
    pub tags: &'static [&'static str],
}

/// Buoy anchor positions in the xz plane (meters from origin).
pub const BUOY_POSITIONS: [[f32; 2]; 5] = [
    [45.0, 30.0],   // north-east
    [-50.0, 25.0],  // north-west
    [55.0, -40.0],  // south-east
    [-35.0, -45.0], // south-west
    [0.0, 65.0],    // far north
];

/// The five detail entries, one per buoy, in position order.
pub fn entries() -> Vec<BuoyContent> {
    vec![
        BuoyContent {
            title: "Conversation Memory Service",
            problem: "Assistant sessions lost context once a thread crossed a few topics.",
            timeline: "6-8 weeks, lead engineer",
            solution: "Layered episodic and semantic stores behind a retrieval gate, \
                       with a small evaluation harness tracking continuity regressions.",
            tags: &["memory", "retrieval", "evaluation"],
        },
        BuoyContent {
            title: "Knowledge Query Pipeline",
            problem: "Answer quality varied wildly and latency spiked on cold queries.",
            timeline: "8-10 weeks, full stack",
            solution: "Hybrid vector and graph retrieval with quality gates, response \
                       caching, and containerized dev/prod parity for fast rollbacks.",
            tags: &["search", "caching", "deployment"],
        },
        BuoyContent {
            title: "Workflow Assistant",
            problem: "Repetitive process tasks slowed throughput and drifted in quality.",
            timeline: "6 weeks, systems",
            solution: "Modular actions guarded by deterministic validators, a feedback \
                       loop for rapid iteration, and observability hooks for triage.",
            tags: &["automation", "validation", "observability"],
        },
        BuoyContent {
            title: "Support Reply Engine",
            problem: "Agents needed faster, more consistent replies for common intents.",
            timeline: "4-6 weeks, engineer",
            solution: "Intent-to-template grounded completion flow with policy guardrails, \
                       tuned live against feedback logs.",
            tags: &["chat", "guardrails", "templates"],
        },
        BuoyContent {
            title: "Batch Data Gateway",
            problem: "A legacy workflow created long turnaround for data-driven tasks.",
            timeline: "4 weeks, solutions",
            solution: "Strict schema I/O around a focused interface, plus an offline \
                       batch mode that cut peak load; scoped to one high-value flow.",
            tags: &["schema", "batching", "integration"],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_entry_per_buoy_position() {
        assert_eq!(entries().len(), BUOY_POSITIONS.len());
    }
}
