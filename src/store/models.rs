use serde::Deserialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub mail: String,
    pub password_hash: String, // Argon2 PHC string, never serialized
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub mail: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub hair_color: String,
    pub eye_color: String,
}

/// Natural key of a character; also the registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub gender: String,
    pub hair_color: String,
    pub eye_color: String,
}

impl Character {
    pub fn matches(&self, new: &NewCharacter) -> bool {
        self.name == new.name
            && self.gender == new.gender
            && self.hair_color == new.hair_color
            && self.eye_color == new.eye_color
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub diameter: i64,
    pub population: i64,
    pub terrain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPlanet {
    pub name: String,
    pub diameter: i64,
    pub population: i64,
    pub terrain: String,
}

impl Planet {
    pub fn matches(&self, new: &NewPlanet) -> bool {
        self.name == new.name
            && self.diameter == new.diameter
            && self.population == new.population
            && self.terrain == new.terrain
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: Option<i64>, // weak reference to users.id
    pub favorite_type: String,
    pub favorite_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFavorite {
    pub user_id: i64,
    pub favorite_type: String,
    pub favorite_id: String,
}

impl Favorite {
    pub fn matches(&self, new: &NewFavorite) -> bool {
        self.user_id == Some(new.user_id)
            && self.favorite_type == new.favorite_type
            && self.favorite_id == new.favorite_id
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}
