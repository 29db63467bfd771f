use std::fmt;

/// Sort rank of a help request's free-text urgency label.
///
/// Variants are declared in rank order, so the derived `Ord` puts the most
/// pressing requests first and anything unrecognized last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
    VeryUrgent,
    Urgent,
    Soon,
    NotUrgent,
    Unrecognized,
}

impl Urgency {
    /// Labels offered by the request form, most pressing first.
    pub const LABELS: [&'static str; 4] = [
        "Very Urgent (within 1 hour)",
        "Urgent (today)",
        "Soon (this week)",
        "Not urgent",
    ];

    /// Classify a stored label by prefix. Form labels carry a parenthesised
    /// hint ("Urgent (today)") that the rank keys do not, so exact matching
    /// would drop every real label into `Unrecognized`.
    pub fn classify(label: &str) -> Self {
        // "Very Urgent" must be tested before "Urgent".
        const PREFIXES: [(&str, Urgency); 4] = [
            ("Very Urgent", Urgency::VeryUrgent),
            ("Urgent", Urgency::Urgent),
            ("Soon", Urgency::Soon),
            ("Not urgent", Urgency::NotUrgent),
        ];

        PREFIXES
            .iter()
            .find(|(prefix, _)| label.starts_with(prefix))
            .map_or(Self::Unrecognized, |(_, urgency)| *urgency)
    }

    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VeryUrgent => "Very Urgent",
            Self::Urgent => "Urgent",
            Self::Soon => "Soon",
            Self::NotUrgent => "Not urgent",
            Self::Unrecognized => "Unrecognized",
        };
        f.write_str(name)
    }
}
