//! Fixed heuristic tables for mood detection and matching.

use super::Mood;

/// (mood, keywords) in [`Mood::ALL`] order.
pub const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Sad,
        &[
            "cry", "tears", "broken", "hurt", "pain", "lost", "miss", "gone", "alone", "empty",
        ],
    ),
    (
        Mood::Happy,
        &[
            "joy",
            "smile",
            "laugh",
            "bright",
            "sunshine",
            "celebrate",
            "love",
            "wonderful",
            "amazing",
            "blessed",
        ],
    ),
    (
        Mood::Angry,
        &[
            "rage", "fury", "hate", "mad", "pissed", "scream", "fight", "burn", "destroy",
            "revenge",
        ],
    ),
    (
        Mood::Lonely,
        &[
            "alone",
            "nobody",
            "isolated",
            "forgotten",
            "abandoned",
            "solitary",
            "empty",
            "belong",
            "disconnected",
        ],
    ),
    (
        Mood::Anxious,
        &[
            "worry",
            "fear",
            "nervous",
            "panic",
            "stress",
            "overwhelmed",
            "restless",
            "uncertain",
            "doubt",
        ],
    ),
    (
        Mood::Nostalgic,
        &[
            "remember",
            "memories",
            "past",
            "used to",
            "once",
            "old days",
            "reminisce",
            "looking back",
            "childhood",
        ],
    ),
    (
        Mood::Energetic,
        &[
            "pump",
            "hype",
            "energy",
            "power",
            "strength",
            "unstoppable",
            "fire",
            "ready",
            "go",
            "motivation",
        ],
    ),
    (
        Mood::Calm,
        &[
            "peace", "quiet", "serene", "tranquil", "relax", "breathe", "gentle", "soft", "still",
            "harmony",
        ],
    ),
];

/// Emotion vocabulary attached as tags when a mood comes from the keyword fallback.
pub fn related_emotions(mood: Mood) -> &'static [&'static str] {
    match mood {
        Mood::Sad => &["melancholic", "depressed", "sorrowful", "grief"],
        Mood::Happy => &["joyful", "excited", "cheerful", "elated"],
        Mood::Angry => &["frustrated", "bitter", "defiant", "aggressive"],
        Mood::Lonely => &["isolated", "disconnected", "yearning", "longing"],
        Mood::Anxious => &["worried", "tense", "uneasy", "stressed"],
        Mood::Nostalgic => &["sentimental", "wistful", "reflective", "bittersweet"],
        Mood::Energetic => &["pumped", "motivated", "dynamic", "vigorous"],
        Mood::Calm => &["peaceful", "relaxed", "meditative", "zen"],
    }
}

/// Moods close enough to `mood` to count as a partial match.
pub fn related_moods(mood: Mood) -> &'static [Mood] {
    match mood {
        Mood::Sad => &[Mood::Lonely, Mood::Nostalgic],
        Mood::Happy => &[Mood::Energetic, Mood::Calm],
        Mood::Angry => &[Mood::Energetic, Mood::Anxious],
        Mood::Lonely => &[Mood::Sad, Mood::Nostalgic],
        Mood::Anxious => &[Mood::Sad, Mood::Angry],
        Mood::Nostalgic => &[Mood::Sad, Mood::Lonely, Mood::Calm],
        Mood::Energetic => &[Mood::Happy, Mood::Angry],
        Mood::Calm => &[Mood::Happy, Mood::Nostalgic],
    }
}

pub fn match_reason_base(mood: Mood) -> &'static str {
    match mood {
        Mood::Sad => "This song captures feelings of sadness and melancholy",
        Mood::Happy => "This uplifting song matches your positive energy",
        Mood::Angry => "This song channels frustration and intensity",
        Mood::Lonely => "This song explores themes of isolation and longing",
        Mood::Anxious => "This song reflects feelings of uncertainty and tension",
        Mood::Nostalgic => "This song brings back memories and reflection",
        Mood::Energetic => "This high-energy track matches your motivated mood",
        Mood::Calm => "This peaceful song promotes relaxation and tranquility",
    }
}
