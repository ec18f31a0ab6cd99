//! Ordered chat rules
//!
//! Rules are evaluated top to bottom and the first match wins. Several
//! rules share keywords ("phone" vs "phone number", "cell" for batteries
//! and phones), so the order below is part of the behaviour.

use super::{ChatContext, Topic};

/// How a rule decides whether it applies to a lowercased message
#[derive(Clone, Copy, Debug)]
pub enum Matcher {
    /// A whole word preceded by start/whitespace and followed by
    /// end/whitespace/`!`
    Word(&'static [&'static str]),
    /// Any plain substring
    Contains(&'static [&'static str]),
    /// Any substring from `any`, provided none from `unless` occurs
    ContainsUnless {
        /// Triggering substrings
        any: &'static [&'static str],
        /// Vetoing substrings
        unless: &'static [&'static str],
    },
}

impl Matcher {
    /// Test a lowercased message
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        match self {
            Self::Word(words) => words.iter().any(|w| contains_word(message, w)),
            Self::Contains(needles) => needles.iter().any(|n| message.contains(n)),
            Self::ContainsUnless { any, unless } => {
                any.iter().any(|n| message.contains(n))
                    && !unless.iter().any(|n| message.contains(n))
            }
        }
    }
}

/// Whether `word` occurs bounded by start-or-whitespace on the left and
/// end, whitespace or `!` on the right
fn contains_word(message: &str, word: &str) -> bool {
    message.match_indices(word).any(|(start, _)| {
        let left_ok = message[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let right_ok = message[start + word.len()..]
            .chars()
            .next()
            .map_or(true, |c| c.is_whitespace() || c == '!');
        left_ok && right_ok
    })
}

/// What a matching rule replies with
#[derive(Clone, Copy, Debug)]
pub enum Reply {
    /// Fixed text
    Fixed(&'static str),
    /// Random pick from a set
    Pick(&'static [&'static str]),
    /// Follow-up when the last topic matches, generic text otherwise
    FollowUp {
        /// Topic that unlocks the follow-up
        after: Topic,
        /// Follow-up text
        then: &'static str,
        /// Generic text
        otherwise: &'static str,
    },
}

/// Context change applied when a rule fires
#[derive(Clone, Copy, Debug, Default)]
pub struct ContextUpdate {
    /// New last topic (`None` leaves it untouched)
    pub topic: Option<Topic>,
    /// Mark that the user asked about recycling something
    pub asked_about_recycling: bool,
}

impl ContextUpdate {
    const NONE: Self = Self {
        topic: None,
        asked_about_recycling: false,
    };

    const fn topic(topic: Topic) -> Self {
        Self {
            topic: Some(topic),
            asked_about_recycling: false,
        }
    }

    /// Apply to a context
    pub fn apply(&self, context: &mut ChatContext) {
        if let Some(topic) = self.topic {
            context.last_topic = Some(topic);
        }
        if self.asked_about_recycling {
            context.asked_about_recycling = true;
        }
    }
}

/// One entry of the ordered rule list
#[derive(Clone, Copy, Debug)]
pub struct ChatRule {
    /// Rule name, for logs and tests
    pub name: &'static str,
    /// When it applies
    pub matcher: Matcher,
    /// What it says
    pub reply: Reply,
    /// How it changes the conversation context
    pub update: ContextUpdate,
}

const GREETINGS: &[&str] = &[
    "Hey there! 👋 I'm EcoBot, your recycling buddy! How can I help you save the planet today?",
    "Hello! 🌱 Ready to recycle? Ask me anything about e-waste!",
    "Hi! 💚 I'm here to help you recycle smarter. What would you like to know?",
];

const THANKS: &[&str] = &[
    "You're welcome! 😊 Happy to help save the planet together! 🌍",
    "My pleasure! Keep up the great work recycling! ♻️💚",
    "Glad I could help! Any other questions? 🌱",
];

/// The ordered rule list
pub const RULES: &[ChatRule] = &[
    ChatRule {
        name: "greeting",
        matcher: Matcher::Word(&["hi", "hello", "hey", "hola", "heya", "sup", "yo"]),
        reply: Reply::Pick(GREETINGS),
        update: ContextUpdate::topic(Topic::Greeting),
    },
    ChatRule {
        name: "thanks",
        matcher: Matcher::Contains(&[
            "thank", "thanks", "thx", "appreciate", "helpful", "awesome", "great", "nice",
        ]),
        reply: Reply::Pick(THANKS),
        update: ContextUpdate::NONE,
    },
    ChatRule {
        name: "affirmation",
        matcher: Matcher::Word(&["yes", "yeah", "yep", "sure", "ok", "okay", "sounds good"]),
        reply: Reply::FollowUp {
            after: Topic::NearestCenter,
            then: "Perfect! 🗺️ Head to the Map section to see all nearby centers. Click on any marker for directions! Want to know what you can recycle there?",
            otherwise: "Great! How else can I help you today? 😊",
        },
        update: ContextUpdate::NONE,
    },
    ChatRule {
        name: "safety",
        matcher: Matcher::Contains(&["safe", "safety", "danger", "harm", "risk"]),
        reply: Reply::Fixed("Great question! 🛡️ Yes, recycling e-waste is completely safe when done at certified centers like ours! We follow proper protocols to handle batteries, screens, and electronic components safely. Never try to dismantle devices yourself! Want to know what items we accept?"),
        update: ContextUpdate::topic(Topic::Safety),
    },
    ChatRule {
        name: "batteries",
        matcher: Matcher::Contains(&["batter", "lithium", "aa", "aaa", "cell", "power bank"]),
        reply: Reply::Fixed("✅ Absolutely! Batteries are SUPER important to recycle! We accept:\n• Lithium-ion (phones, laptops)\n• AA, AAA, D cells\n• Power banks\n• Car batteries\n\nBatteries contain valuable metals AND can be dangerous in landfills! Drop them at any EcoBin center. Should I show you the nearest one? 🔋"),
        update: ContextUpdate {
            topic: Some(Topic::Batteries),
            asked_about_recycling: true,
        },
    },
    ChatRule {
        name: "nearest_center",
        matcher: Matcher::Contains(&[
            "where", "location", "near", "closest", "find", "center", "station", "address",
            "direction",
        ]),
        reply: Reply::Fixed("📍 I can help you find the nearest center! Here's how:\n\n1. Click 'Start Recycling' on the home screen\n2. Select your e-waste type\n3. View the interactive map with ALL nearby centers\n4. Click any marker for contact info & directions!\n\nYour nearest center is probably less than 2 km away! Want me to tell you about their hours? ⏰"),
        update: ContextUpdate::topic(Topic::NearestCenter),
    },
    ChatRule {
        name: "points",
        matcher: Matcher::Contains(&[
            "point", "reward", "earn", "credit", "benefit", "prize", "incentive",
        ]),
        reply: Reply::Fixed("⭐ YES! You earn Eco Points for every item recycled!\n\n📱 Phone: 120 pts (₹450)\n💻 Laptop: 200 pts (₹850)\n🔋 Battery: 90 pts (₹200)\n🔌 Charger: 60 pts (₹150)\n\nPoints = Impact! Check 'View History' to track your progress. You're literally turning trash into treasure! Want to know what you can recycle? ♻️"),
        update: ContextUpdate::topic(Topic::Points),
    },
    ChatRule {
        name: "phone",
        matcher: Matcher::ContainsUnless {
            any: &["phone", "smartphone", "mobile", "iphone", "android", "cell"],
            unless: &["number", "contact"],
        },
        reply: Reply::Fixed("📱 Old phones are perfect for recycling! They contain:\n• Gold, silver, copper\n• Rare earth metals\n• Recyclable glass & plastic\n\n💰 Worth: ₹450 + 120 Eco Points\n\nJust scan it at any center and we'll handle the rest! Your old phone becomes someone's new resource! Ready to recycle? 🌍"),
        update: ContextUpdate::topic(Topic::Phone),
    },
    ChatRule {
        name: "laptop",
        matcher: Matcher::Contains(&["laptop", "computer", "pc", "desktop", "macbook"]),
        reply: Reply::Fixed("💻 Laptops are our HIGHEST value recyclables!\n\n💰 ₹850 + 200 Eco Points per laptop\n\nWe safely extract:\n• Circuit boards (precious metals)\n• Hard drives (securely wiped!)\n• Screens, keyboards, batteries\n\nDon't worry about your data - we ensure secure disposal! Have an old laptop ready? 🔒"),
        update: ContextUpdate::topic(Topic::Laptop),
    },
    ChatRule {
        name: "process",
        matcher: Matcher::Contains(&["how", "process", "work", "step", "procedure", "what do i"]),
        reply: Reply::Fixed("📝 Super easy 3-step process:\n\n1️⃣ **Scan**: Use our camera to identify your e-waste\n2️⃣ **Drop**: Visit nearest center (we show you on map!)\n3️⃣ **Earn**: Get Eco Points + cash value instantly!\n\nNo sorting needed - we handle everything! Ready to start? Just click 'Start Recycling'! 🚀"),
        update: ContextUpdate::topic(Topic::Process),
    },
    ChatRule {
        name: "accepted_items",
        matcher: Matcher::Contains(&["what", "which", "can i recycle", "accept", "take", "item"]),
        reply: Reply::Fixed("♻️ We accept these e-waste items:\n\n📱 Phones & tablets\n💻 Laptops & computers\n🔋 All types of batteries\n🔌 Chargers & cables\n⌚ Smartwatches\n🎮 Gaming devices\n📺 Old TVs & monitors\n\nBasically, if it has a plug or battery, we can recycle it! What do you have? 😊"),
        update: ContextUpdate::topic(Topic::AcceptedItems),
    },
    ChatRule {
        name: "contact",
        matcher: Matcher::Contains(&[
            "contact", "support", "help", "human", "talk", "call", "email", "phone number",
        ]),
        reply: Reply::Fixed("📞 Need to talk to a human? We've got you!\n\n📧 Email: support@ecobin.com\n📱 Phone: +91-1800-ECO-BIN\n⏰ Hours: 9 AM - 6 PM (Mon-Sat)\n\nOr keep chatting with me - I'm here 24/7! What would you like to know? 💚"),
        update: ContextUpdate::topic(Topic::Contact),
    },
    ChatRule {
        name: "negative",
        matcher: Matcher::Contains(&["no", "nope", "nah", "don't", "stop", "useless", "bad"]),
        reply: Reply::Fixed("Oh! Sorry if I misunderstood 😅 Let me try differently - what specific question do you have about recycling? I'm here to help! 🌱"),
        update: ContextUpdate::NONE,
    },
];
