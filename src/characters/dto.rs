use serde::{Deserialize, Serialize};

use crate::store::Character;

#[derive(Debug, Serialize, Deserialize)]
pub struct CharacterView {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub hair_color: String,
    pub eye_color: String,
}

impl From<Character> for CharacterView {
    fn from(c: Character) -> Self {
        Self {
            id: c.id,
            name: c.name,
            gender: c.gender,
            hair_color: c.hair_color,
            eye_color: c.eye_color,
        }
    }
}
