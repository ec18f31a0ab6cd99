//! Fallback keyword table
//!
//! Consulted only when no ordered rule matched. Entries are scanned in
//! order and the first keyword found as a substring wins.

use super::Topic;

/// Follow-up appended to every keyword-table answer
pub const FOLLOW_UP: &str = "\n\nAnything else you'd like to know? 😊";

/// A canned answer with the keywords that trigger it
#[derive(Clone, Copy, Debug)]
pub struct KeywordEntry {
    /// Topic recorded when this entry answers
    pub topic: Topic,
    /// Substrings that trigger it
    pub keywords: &'static [&'static str],
    /// Canned answer (without the follow-up)
    pub response: &'static str,
}

impl KeywordEntry {
    /// Whether any keyword occurs in the lowercased message
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        self.keywords.iter().any(|k| message.contains(k))
    }
}

/// The keyword table, in scan order
pub const KEYWORD_TABLE: &[KeywordEntry] = &[
    KeywordEntry {
        topic: Topic::Batteries,
        keywords: &["battery", "batteries", "lithium", "recycle batteries"],
        response: "✅ Yes! Batteries are highly recyclable. We accept all types including lithium-ion, AA, AAA, and phone batteries. Find your nearest center in the Map section! 🔋",
    },
    KeywordEntry {
        topic: Topic::Nearest,
        keywords: &["nearest", "nearby", "location", "where", "find center", "closest"],
        response: "📍 To find the nearest recycling center:\n1. Click \"Start Recycling\"\n2. Select your e-waste type\n3. View the interactive map with your location\n4. Click any marker for directions! 🗺️",
    },
    KeywordEntry {
        topic: Topic::Points,
        keywords: &["points", "earn", "rewards", "eco points", "how do i"],
        response: "⭐ Earn Eco Points by recycling e-waste!\n• Phone: 120 points\n• Laptop: 200 points\n• Battery: 90 points\n• Charger: 60 points\n\nCheck your progress in \"View History\"! 🏆",
    },
    KeywordEntry {
        topic: Topic::Phone,
        keywords: &["phone", "smartphone", "mobile", "cell"],
        response: "📱 Smartphones are valuable e-waste! They contain precious metals like gold and copper. Worth ₹450 and 120 Eco Points. Just scan and recycle! ♻️",
    },
    KeywordEntry {
        topic: Topic::Laptop,
        keywords: &["laptop", "computer", "pc"],
        response: "💻 Laptops are our highest-value items! Worth ₹850 and 200 Eco Points. They contain rare earth metals that can be reused. Scan to recycle! 🌍",
    },
    KeywordEntry {
        topic: Topic::Contact,
        keywords: &["contact", "support", "help", "email", "phone number"],
        response: "📞 Need human help?\n📧 Email: support@ecobin.com\n📱 Phone: +91-1800-ECO-BIN\n⏰ Hours: 9 AM - 6 PM (Mon-Sat)\n\nOr visit our Help Center! 💚",
    },
];

/// First matching keyword entry, if any
#[must_use]
pub fn lookup(message: &str) -> Option<&'static KeywordEntry> {
    KEYWORD_TABLE.iter().find(|entry| entry.matches(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_scans_in_order() {
        // "phone" appears in both the phone and contact entries
        let entry = lookup("phone number").unwrap();
        assert_eq!(entry.topic, Topic::Phone);
    }

    #[test]
    fn test_lookup_miss() {
        assert!(lookup("toaster").is_none());
    }
}
