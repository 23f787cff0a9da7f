use super::{Mood, MoodBasedRecommendation};
use crate::music::{TrackSource, UnifiedTrack};

pub const MAX_SUGGESTIONS: usize = 10;

/// (id, name, artist, album, score)
type Suggestion = (&'static str, &'static str, &'static str, &'static str, f64);

const SAD: &[Suggestion] = &[
    ("2DjPkzR89MSYPGaWhK8uKQ", "Hurt", "Johnny Cash", "American IV: The Man Comes Around", 0.95),
    ("0SiQrCn2h2aKOEqz5Zxwow", "The Night We Met", "Lord Huron", "Strange Trails", 0.90),
];

const LONELY: &[Suggestion] = &[
    ("1mea3bSkSGXuIRvnydlB5b", "Somewhere I Belong", "Linkin Park", "Meteora", 0.95),
    ("4N3y2ChKKCG3zVCfyNiMQD", "Mad World", "Gary Jules", "Trading Snakeoil for Wolftickets", 0.90),
    ("u9HBEOlMgOtK8yXGKKMhRx", "The Sound of Silence", "Disturbed", "Immortalized", 0.88),
];

const HAPPY: &[Suggestion] = &[
    ("3BxnGCLFNdLKgVgVz6Vn5H", "Good Life", "OneRepublic", "Waking Up", 0.95),
    ("05wIrZSwuaVWhcv5FfqeJ0", "Walking on Sunshine", "Katrina and the Waves", "Walking on Sunshine", 0.93),
    ("60nZcImufyMA1MKQY3dcCH", "Happy", "Pharrell Williams", "G I R L", 0.98),
    ("0BxE4FqsDD1Ot4YuBXwn8F", "Can't Stop the Feeling!", "Justin Timberlake", "Trolls (Original Motion Picture Soundtrack)", 0.96),
    ("32OlwWuMpZ6b0aN2RZOeMS", "Uptown Funk", "Mark Ronson ft. Bruno Mars", "Uptown Special", 0.94),
    ("1WkMMavIMc4JZ8cfMmxHkI", "Good as Hell", "Lizzo", "Cuz I Love You", 0.92),
    ("0CFuMybe6s77w6QQrJjW7d", "I'm Gonna Be (500 Miles)", "The Proclaimers", "Sunshine on Leith", 0.90),
    ("5T8EDUDqKcs6OSOwEsfqG7", "Don't Stop Me Now", "Queen", "Jazz", 0.88),
    ("2RlgNHKcydI9sayD2Df2xp", "Mr. Blue Sky", "Electric Light Orchestra", "Out of the Blue", 0.86),
    ("3PPogGhAUjr4FLGzEFGzJI", "Best Day of My Life", "American Authors", "Oh, What a Life", 0.84),
];

const ANGRY: &[Suggestion] = &[
    ("2OzEKCmOoWhyuB8nHi8xhv", "Break Stuff", "Limp Bizkit", "Significant Other", 0.95),
    ("0yp7ORA8XPNO4kvNj5EYdx", "Bodies", "Drowning Pool", "Sinner", 0.92),
];

/// Fixed general suggestions for `mood`, at most `limit` of them.
///
/// Moods without their own list get the sad list.
pub fn general_suggestions(mood: Mood, limit: usize) -> Vec<MoodBasedRecommendation> {
    let table = match mood {
        Mood::Lonely => LONELY,
        Mood::Happy => HAPPY,
        Mood::Angry => ANGRY,
        _ => SAD,
    };

    table
        .iter()
        .take(limit.min(MAX_SUGGESTIONS))
        .map(|&(id, name, artist, album, score)| MoodBasedRecommendation {
            track: UnifiedTrack::new(id, name, artist, TrackSource::Spotify).with_album(album),
            match_reason: None,
            mood_score: score,
        })
        .collect()
}
