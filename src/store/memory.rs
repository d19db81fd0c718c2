use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    Character, Favorite, NewCharacter, NewFavorite, NewPlanet, NewUser, Planet, Store,
    StoreError, StoreResult, User,
};

/// Rows plus the last id handed out; ids are never reused, even after deletes.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    characters: Table<Character>,
    planets: Table<Planet>,
    favorites: Table<Favorite>,
}

/// In-process store with the same uniqueness rules as the Postgres schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.rows.iter().any(|u| u.mail == new.mail) {
            return Err(StoreError::Duplicate { entity: "User" });
        }
        let user = User {
            id: t.users.next_id(),
            name: new.name,
            mail: new.mail,
            password_hash: new.password_hash,
        };
        t.users.rows.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.rows.clone())
    }

    async fn find_user(&self, id: i64) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_mail(&self, mail: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.rows.iter().find(|u| u.mail == mail).cloned())
    }

    async fn insert_character(&self, new: NewCharacter) -> StoreResult<Character> {
        let mut t = self.tables.write().await;
        if t.characters.rows.iter().any(|c| c.matches(&new)) {
            return Err(StoreError::Duplicate { entity: "Character" });
        }
        let row = Character {
            id: t.characters.next_id(),
            name: new.name,
            gender: new.gender,
            hair_color: new.hair_color,
            eye_color: new.eye_color,
        };
        t.characters.rows.push(row.clone());
        Ok(row)
    }

    async fn list_characters(&self) -> StoreResult<Vec<Character>> {
        Ok(self.tables.read().await.characters.rows.clone())
    }

    async fn find_character(&self, id: i64) -> StoreResult<Option<Character>> {
        let t = self.tables.read().await;
        Ok(t.characters.rows.iter().find(|c| c.id == id).cloned())
    }

    async fn find_matching_character(
        &self,
        new: &NewCharacter,
    ) -> StoreResult<Option<Character>> {
        let t = self.tables.read().await;
        Ok(t.characters.rows.iter().find(|c| c.matches(new)).cloned())
    }

    async fn insert_planet(&self, new: NewPlanet) -> StoreResult<Planet> {
        let mut t = self.tables.write().await;
        if t.planets.rows.iter().any(|p| p.matches(&new)) {
            return Err(StoreError::Duplicate { entity: "Planet" });
        }
        let row = Planet {
            id: t.planets.next_id(),
            name: new.name,
            diameter: new.diameter,
            population: new.population,
            terrain: new.terrain,
        };
        t.planets.rows.push(row.clone());
        Ok(row)
    }

    async fn list_planets(&self) -> StoreResult<Vec<Planet>> {
        Ok(self.tables.read().await.planets.rows.clone())
    }

    async fn find_planet(&self, id: i64) -> StoreResult<Option<Planet>> {
        let t = self.tables.read().await;
        Ok(t.planets.rows.iter().find(|p| p.id == id).cloned())
    }

    async fn find_matching_planet(&self, new: &NewPlanet) -> StoreResult<Option<Planet>> {
        let t = self.tables.read().await;
        Ok(t.planets.rows.iter().find(|p| p.matches(new)).cloned())
    }

    async fn insert_favorite(&self, new: NewFavorite) -> StoreResult<Favorite> {
        let mut t = self.tables.write().await;
        if t.favorites.rows.iter().any(|f| f.matches(&new)) {
            return Err(StoreError::Duplicate { entity: "Favorite" });
        }
        let row = Favorite {
            id: t.favorites.next_id(),
            user_id: Some(new.user_id),
            favorite_type: new.favorite_type,
            favorite_id: new.favorite_id,
        };
        t.favorites.rows.push(row.clone());
        Ok(row)
    }

    async fn list_favorites_by_user(&self, user_id: i64) -> StoreResult<Vec<Favorite>> {
        let t = self.tables.read().await;
        Ok(t.favorites
            .rows
            .iter()
            .filter(|f| f.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn find_favorite(&self, id: i64) -> StoreResult<Option<Favorite>> {
        let t = self.tables.read().await;
        Ok(t.favorites.rows.iter().find(|f| f.id == id).cloned())
    }

    async fn find_matching_favorite(&self, new: &NewFavorite) -> StoreResult<Option<Favorite>> {
        let t = self.tables.read().await;
        Ok(t.favorites.rows.iter().find(|f| f.matches(new)).cloned())
    }

    async fn delete_favorite(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        let before = t.favorites.rows.len();
        t.favorites.rows.retain(|f| f.id != id);
        Ok(t.favorites.rows.len() < before)
    }
}
