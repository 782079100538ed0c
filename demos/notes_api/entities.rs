//! Entities of the notes service

use mapcrud::prelude::*;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Author {
    pub id: u64,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub notes: Vec<Note>,
}

impl_crud_entity!(Author, "author", timestamps, {
    many notes: "note",
});

#[async_trait]
impl ValidateSave for Author {
    async fn validate_save(&self, _store: &Store) -> Result<(), CrudError> {
        validate_fields(self)
    }
}

/// Categories form a tree hanging off the root category (id 1)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub category_id: Option<u64>,
    pub categories: Vec<Category>,
    pub notes: Vec<Note>,
}

impl_crud_entity!(Category, "category", {
    many categories: "category",
    many notes: "note",
});

pub const ROOT_CATEGORY_ID: u64 = 1;

#[async_trait]
impl ValidateSave for Category {
    async fn validate_save(&self, store: &Store) -> Result<(), CrudError> {
        let Some(parent_id) = self.category_id else {
            return Err(CrudError::new("CategoryID can't not be null", 500));
        };

        match store.find::<Category>(parent_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(CrudError::new(
                format!("Parent category {} does not exist", parent_id),
                500,
            )),
            Err(err) => Err(CrudError::new(err.to_string(), 500)),
        }
    }
}

#[async_trait]
impl ValidateDelete for Category {
    async fn validate_delete(&self, _store: &Store) -> Result<(), CrudError> {
        if self.id == ROOT_CATEGORY_ID {
            return Err(CrudError::new("Root category can't be deleted", 500));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

impl_crud_entity!(Tag, "tag");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Note {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Option<Author>,
    pub tags: Vec<Tag>,
}

impl_crud_entity!(Note, "note", timestamps, {
    one author: "author",
    many tags: "tag",
});
