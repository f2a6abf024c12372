//! Curriculum catalog.
//!
//! The catalog is a presentation-side collaborator. The engine never looks at
//! it; hosts use the selected [`Topic`] to decide which submission options to
//! offer and which [`RecyclePolicy`] to hand the looper.

use serde::{Deserialize, Serialize};

use crate::core::RecyclePolicy;

/// Concept a topic teaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptKey {
    /// How handler, queue, and looper fit together.
    Architecture,
    /// Preparing and starting the loop.
    Looper,
    /// The time-ordered queue.
    Queue,
    /// Sending immediate and delayed work.
    Handler,
    /// Reusing items through the pool.
    Reuse,
}

impl ConceptKey {
    /// Campfire-themed hint for the concept.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Architecture => {
                "The campfire is the queue, the camper tending it is the looper, and whoever brings firewood is a handler."
            }
            Self::Looper => {
                "A campsite has exactly one fire keeper. Set up the site with prepare() before loop() can tend the fire."
            }
            Self::Queue => {
                "Firewood is stacked by the time it should burn, not by when it arrived."
            }
            Self::Handler => {
                "Many campers can bring wood to the same fire, as long as they know which fire it is."
            }
            Self::Reuse => {
                "Don't chop a new tree every time: obtain() a spare log from the pile and recycle it when it has burnt."
            }
        }
    }
}

/// One curriculum entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    /// Stable identifier.
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Learning objectives.
    pub objectives: &'static [&'static str],
    /// Concept taught.
    pub concept: ConceptKey,
}

impl Topic {
    /// Whether pool-backed submission (`obtain()`) is offered.
    #[must_use]
    pub const fn offers_pool_options(&self) -> bool {
        matches!(self.concept, ConceptKey::Reuse)
    }

    /// Recycle policy to run the looper with while this topic is selected.
    #[must_use]
    pub const fn recycle_policy(&self) -> RecyclePolicy {
        if self.offers_pool_options() {
            RecyclePolicy::Always
        } else {
            RecyclePolicy::PooledOnly
        }
    }

    /// Context string handed to the assistant.
    #[must_use]
    pub fn assistant_context(&self) -> String {
        format!("{} - {}", self.title, self.description)
    }
}

/// Built-in curriculum, in teaching order.
pub const CURRICULUM: &[Topic] = &[
    Topic {
        id: "2.5.1",
        title: "Message loop architecture",
        description: "How handler, message queue, and looper cooperate as producer and consumer.",
        objectives: &["Trace the three-part architecture", "Tell the producer from the consumer"],
        concept: ConceptKey::Architecture,
    },
    Topic {
        id: "2.5.2",
        title: "Looper prepare and loop",
        description: "Creating and starting the loop; one looper per thread.",
        objectives: &["Call prepare() to initialise", "Call loop() to start dispatching"],
        concept: ConceptKey::Looper,
    },
    Topic {
        id: "2.5.3",
        title: "Message queue structure",
        description: "The queue is a list kept sorted by execution time.",
        objectives: &["Inspect the ordered queue", "See how delayed messages wait"],
        concept: ConceptKey::Queue,
    },
    Topic {
        id: "2.5.4",
        title: "Sending and handling messages",
        description: "How a handler targets a looper and how dispatch reaches it.",
        objectives: &["Send a message", "Send a delayed message", "Follow dispatchMessage"],
        concept: ConceptKey::Handler,
    },
    Topic {
        id: "2.5.5",
        title: "Message reuse",
        description: "The message pool: obtain() versus new, and recycling.",
        objectives: &["Compare new allocation", "Use obtain()", "Watch items recycle"],
        concept: ConceptKey::Reuse,
    },
];

/// Tracks the selected topic.
#[derive(Debug, Clone)]
pub struct Catalog {
    topics: &'static [Topic],
    selected: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(CURRICULUM)
    }
}

impl Catalog {
    /// Catalog over `topics`, selecting the first.
    #[must_use]
    pub const fn new(topics: &'static [Topic]) -> Self {
        Self { topics, selected: 0 }
    }

    /// All topics.
    #[must_use]
    pub const fn topics(&self) -> &'static [Topic] {
        self.topics
    }

    /// The selected topic, if the catalog is not empty.
    #[must_use]
    pub fn selected(&self) -> Option<&'static Topic> {
        self.topics.get(self.selected)
    }

    /// Select by id. Unknown ids leave the selection unchanged and return
    /// `None`.
    pub fn select(&mut self, id: &str) -> Option<&'static Topic> {
        let index = self.topics.iter().position(|t| t.id == id)?;
        self.selected = index;
        self.topics.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_reuse_topic_recycles_everything() {
        for topic in CURRICULUM {
            let expected = if topic.concept == ConceptKey::Reuse {
                RecyclePolicy::Always
            } else {
                RecyclePolicy::PooledOnly
            };
            assert_eq!(topic.recycle_policy(), expected, "topic {}", topic.id);
        }
    }

    #[test]
    fn select_by_id() {
        let mut catalog = Catalog::default();
        assert_eq!(catalog.selected().map(|t| t.id), Some("2.5.1"));
        assert_eq!(catalog.select("2.5.5").map(|t| t.concept), Some(ConceptKey::Reuse));
        assert!(catalog.select("9.9.9").is_none());
        assert_eq!(catalog.selected().map(|t| t.id), Some("2.5.5"));
    }
}
