mod track;

pub use track::{
    is_valid_track_id, PayloadError, SpotifyTrack, TrackPayload, TrackSource, UnifiedTrack,
    YoutubeTrack,
};
