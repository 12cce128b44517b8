use crate::assessment::scoring::Segment;
use serde::Serialize;
use std::time::Duration;

/// One labeled insight on the results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub label: &'static str,
    pub text: &'static str,
}

/// The single primary action offered for a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub text: &'static str,
    /// Path relative to the site origin, carrying the segment forward.
    pub href: String,
}

/// Everything the results page shows for a scored lead. Derived entirely
/// from score; the segment is recomputed rather than trusted from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentNarrative {
    pub score: u8,
    pub segment: Segment,
    pub headline: String,
    pub subtitle: &'static str,
    pub insights: [Insight; 3],
    pub call_to_action: CallToAction,
}

impl SegmentNarrative {
    pub fn for_score(score: u8) -> Self {
        let score = score.min(100);
        let segment = Segment::for_score(score);
        let insights = match segment {
            Segment::FoundationBuilder => [
                Insight {
                    label: "Time Leak",
                    text: "Most hours go to operations, leaving little room for growth.",
                },
                Insight {
                    label: "System Gap",
                    text: "Missing documented processes = recurring bottlenecks.",
                },
                Insight {
                    label: "Next Move",
                    text: "Start with the Founder Freedom Blueprint to build your foundation.",
                },
            ],
            Segment::SystemOptimizer => [
                Insight {
                    label: "Time Leak",
                    text: "Still handling too many tasks that could be automated or delegated.",
                },
                Insight {
                    label: "System Gap",
                    text: "Systems exist but aren't optimized for scale.",
                },
                Insight {
                    label: "Next Move",
                    text: "Join the Founder's Circle to refine and scale faster.",
                },
            ],
            Segment::SovereignFounder => [
                Insight {
                    label: "Time Leak",
                    text: "Minimal leaks: you've built strong systems.",
                },
                Insight {
                    label: "System Gap",
                    text: "Ready for strategic execution and team leverage.",
                },
                Insight {
                    label: "Next Move",
                    text: "Book a strategy call to operate like a true CEO.",
                },
            ],
        };

        Self {
            score,
            segment,
            headline: format!("Your Freedom Score: {score}%"),
            subtitle: "Here's what it means, and what to do next.",
            insights,
            call_to_action: CallToAction {
                text: "Continue",
                href: format!("/demo?segment={}", segment.key()),
            },
        }
    }
}

/// The cosmetic count-up the score indicator plays. Purely presentational:
/// the sampled value never exceeds the real score and lands exactly on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    pub target: u8,
    pub delay: Duration,
    pub duration: Duration,
}

impl CountUp {
    pub fn new(target: u8) -> Self {
        Self {
            target,
            delay: Duration::from_millis(800),
            duration: Duration::from_millis(1500),
        }
    }

    /// Displayed value at `elapsed` since the page appeared, with cubic
    /// ease-out over the animation window.
    pub fn value_at(&self, elapsed: Duration) -> u8 {
        let Some(into_animation) = elapsed.checked_sub(self.delay) else {
            return 0;
        };
        if into_animation >= self.duration {
            return self.target;
        }
        let progress = into_animation.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - progress).powi(3);
        (f64::from(self.target) * eased).floor() as u8
    }
}
