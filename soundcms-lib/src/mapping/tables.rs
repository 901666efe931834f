//! Built-in mapping tables

use log::warn;

use super::FieldMapping;
use crate::model::ModuleKey;

const SOUND: &[(&str, &str)] = &[
    ("name", "name"),
    ("description", "description"),
    ("coverImg", "cover_img_url"),
    ("femaleAudioUrl", "female_audio_url"),
    ("maleAudioUrl", "male_audio_url"),
    ("femaleScript", "female_script"),
    ("maleScript", "male_script"),
    ("usage", "usage_code"),
    ("durationSeconds", "duration"),
    ("status", "status"),
    ("createTime", "create_time"),
    ("updateTime", "update_time"),
];

const MUSIC: &[(&str, &str)] = &[
    ("name", "name"),
    ("coverImg", "cover_img_url"),
    ("audioUrl", "audio_file_url"),
    ("durationSeconds", "duration"),
    ("genre", "genre_code"),
    ("status", "status"),
    ("createTime", "create_time"),
    ("updateTime", "update_time"),
];

fn builtin(pairs: &[(&str, &str)]) -> FieldMapping {
    let mut table = FieldMapping::new();
    for (frontend, backend) in pairs {
        if let Err(e) = table.insert(*frontend, *backend) {
            warn!("skipping built-in mapping entry: {}", e);
        }
    }
    table
}

/// Explicit field names of the sound module.
pub fn sound_mapping() -> FieldMapping {
    builtin(SOUND)
}

/// Explicit field names of the music module.
pub fn music_mapping() -> FieldMapping {
    builtin(MUSIC)
}

/// Returns the built-in table for a module, if it declares one.
///
/// Modules without a table use the generic case transform for every key.
pub fn mapping_for(module: &ModuleKey) -> Option<FieldMapping> {
    match module {
        ModuleKey::Sound => Some(sound_mapping()),
        ModuleKey::Music => Some(music_mapping()),
        _ => None,
    }
}
