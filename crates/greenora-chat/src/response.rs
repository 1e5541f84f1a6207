//! Reply generation for the plant assistant.
//!
//! Replies come from an ordered rule cascade, first match wins:
//!
//! 1. context-qualified rules (standing topic + keyword in this utterance)
//! 2. topic update (always runs, even after a step-1 hit)
//! 3. knowledge-base entity rule
//! 4. category rules
//! 5. default fallback
//!
//! Every path ends in a reply, so resolution cannot fail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::{
    contains_any, ContextTracker, EXPORT_KEYWORDS, GROWING_KEYWORDS, HEALTH_KEYWORDS,
};
use crate::knowledge::KnowledgeBase;
use crate::types::{PlantFact, Topic};

// =============================================================================
// Canned texts
// =============================================================================

pub const WELCOME_MESSAGE: &str = "Namaste! I'm VrikshaVed AI 🌿\nI can help you with:\n• Plant care & growing tips\n• Medicinal benefits\n• Export business guidance\n• Market insights\n\nWhat would you like to know?";

/// Prompts a presentation layer can offer as one-tap questions.
pub const QUICK_QUESTIONS: &[&str] = &[
    "Tell me about Tulsi",
    "How to grow Aloe Vera?",
    "Export requirements",
    "Medicinal plant benefits",
];

const EXPORT_DOCUMENTS: &str = "📋 **Export Documents Required:**\n• Phytosanitary Certificate\n• Certificate of Origin\n• Quality Inspection Report\n• Commercial Invoice\n• Packing List\n\nNeed help with specific documentation?";

const EXPORT_PRICING: &str = "💰 **Export Pricing Factors:**\n• Quantity ordered\n• Destination country\n• Shipping method\n• Quality grade\n• Packaging requirements\n\nTell me your specific needs for accurate pricing!";

const SOIL_PREPARATION: &str = "🌱 **Soil Preparation Guide:**\n\nFor medicinal plants:\n• Well-drained soil mix\n• Organic compost\n• pH balance 6.0-7.0\n• Proper drainage essential\n• Regular soil testing recommended";

const GROWING_OVERVIEW: &str = "I specialize in medicinal plant cultivation! 🏡\n\nPopular plants for growing:\n• Tulsi (Easy, high demand)\n• Aloe Vera (Low maintenance)\n• Turmeric (Good profitability)\n\nTell me which plant you're interested in!";

const EXPORT_OVERVIEW: &str = "🌍 **Export Business Guidance:**\n\nHigh-demand export plants:\n• Tulsi - US/Europe markets\n• Aloe Vera - Cosmetics industry\n• Turmeric - Global spice trade\n\nRequirements:\n• Organic certification\n• Quality packaging\n• Export documentation\n\nNeed specific market info?";

const HEALTH_OVERVIEW: &str = "💊 **Medicinal Plants Database:**\n\nI have detailed info on:\n• Tulsi - Immunity & stress\n• Aloe Vera - Skin & digestion\n• Turmeric - Inflammation\n• Many more...\n\nWhich plant's health benefits interest you?";

const GREETING: &str = "Namaste! 🙏 I'm VrikshaVed AI, your plant expert.\n\nI can help with:\n• Plant cultivation guidance\n• Medicinal properties\n• Export business tips\n• Market analysis\n\nWhat would you like to explore today?";

const FALLBACK: &str = "I'm constantly learning about plants! 🌱\n\nI can best help with:\n• Specific plant information (Tulsi, Aloe Vera, etc.)\n• Growing techniques\n• Export business guidance\n• Medicinal benefits\n\nTry asking about a particular plant or topic!";

const GREETING_KEYWORDS: &[&str] = &["hi", "hello", "namaste"];

// =============================================================================
// Rule tables
// =============================================================================

/// Which rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ExportDocuments,
    ExportPricing,
    SoilPreparation,
    PlantFact,
    GrowingOverview,
    ExportOverview,
    HealthOverview,
    Greeting,
    Fallback,
}

/// Fires when the standing topic is `topic` and the utterance contains `keyword`.
struct ContextRule {
    topic: Topic,
    keyword: &'static str,
    kind: RuleKind,
    text: &'static str,
}

const CONTEXT_RULES: &[ContextRule] = &[
    ContextRule {
        topic: Topic::Export,
        keyword: "document",
        kind: RuleKind::ExportDocuments,
        text: EXPORT_DOCUMENTS,
    },
    ContextRule {
        topic: Topic::Export,
        keyword: "price",
        kind: RuleKind::ExportPricing,
        text: EXPORT_PRICING,
    },
    ContextRule {
        topic: Topic::Growing,
        keyword: "soil",
        kind: RuleKind::SoilPreparation,
        text: SOIL_PREPARATION,
    },
];

/// Fires when the utterance contains any of `keywords`.
struct CategoryRule {
    keywords: &'static [&'static str],
    kind: RuleKind,
    text: &'static str,
}

const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        keywords: GROWING_KEYWORDS,
        kind: RuleKind::GrowingOverview,
        text: GROWING_OVERVIEW,
    },
    CategoryRule {
        keywords: EXPORT_KEYWORDS,
        kind: RuleKind::ExportOverview,
        text: EXPORT_OVERVIEW,
    },
    CategoryRule {
        keywords: HEALTH_KEYWORDS,
        kind: RuleKind::HealthOverview,
        text: HEALTH_OVERVIEW,
    },
    CategoryRule {
        keywords: GREETING_KEYWORDS,
        kind: RuleKind::Greeting,
        text: GREETING,
    },
];

// =============================================================================
// ResponseResolver
// =============================================================================

/// A reply plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub rule: RuleKind,
}

impl Resolution {
    fn canned(rule: RuleKind, text: &str) -> Self {
        Self {
            text: text.to_string(),
            rule,
        }
    }
}

/// Runs the rule cascade against a shared knowledge base.
#[derive(Debug, Clone)]
pub struct ResponseResolver {
    knowledge: Arc<KnowledgeBase>,
}

impl ResponseResolver {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Produce the reply for `utterance`.
    ///
    /// Context-qualified rules read the topic as it stood before this
    /// utterance. The topic is then updated from the utterance whether or
    /// not one of those rules matched.
    pub fn resolve(&self, utterance: &str, context: &mut ContextTracker) -> Resolution {
        let lower = utterance.to_lowercase();
        let standing = context.get();

        let qualified = CONTEXT_RULES
            .iter()
            .find(|r| r.topic == standing && lower.contains(r.keyword));

        context.observe(&lower);

        if let Some(rule) = qualified {
            return Resolution::canned(rule.kind, rule.text);
        }

        if let Some(plant) = self.knowledge.lookup(&lower) {
            return Resolution {
                text: render_plant(plant),
                rule: RuleKind::PlantFact,
            };
        }

        if let Some(rule) = CATEGORY_RULES
            .iter()
            .find(|r| contains_any(&lower, r.keywords))
        {
            return Resolution::canned(rule.kind, rule.text);
        }

        Resolution::canned(RuleKind::Fallback, FALLBACK)
    }
}

/// Render a knowledge-base record as a multi-line reply.
pub fn render_plant(plant: &PlantFact) -> String {
    let benefits = plant
        .benefits
        .iter()
        .map(|b| format!("• {}", b))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🌿 **{}**\n\n💊 **Medicinal Benefits:**\n{}\n\n🌱 **Growing Guide:**\n{}\n\n💰 **Market Price:** {}\n\n🌍 **Export Markets:** {}\n\n🕒 **Harvesting Time:** {}",
        plant.display_name,
        benefits,
        plant.growing_guide,
        plant.price_range,
        plant.export_markets.join(", "),
        plant.harvest_window,
    )
}

// =============================================================================
// Tests
// =============================================================================
