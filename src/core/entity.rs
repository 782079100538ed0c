//! Entity traits and the schema metadata the mapper reads from them

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Name of the primary key field every entity record carries.
pub const PRIMARY_KEY: &str = "id";

/// Cardinality of an association field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// To-one: the field holds a single target or `null`
    One,
    /// To-many / many-to-many: the field holds an array of targets
    Many,
}

/// Declaration of one association field on an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDef {
    /// Serialized field name on the root entity (e.g. "categories")
    pub field: &'static str,

    /// Kind of the target entity (e.g. "category")
    pub target: &'static str,

    pub cardinality: Cardinality,
}

/// Schema metadata for one record kind.
///
/// The mapper never defines descriptors itself; each entity type hands one
/// over through [`Entity::descriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Kind name, used as the storage table name (e.g. "category")
    pub kind: &'static str,

    /// Primary key field name
    pub primary_key: &'static str,

    /// Whether `created_at` / `updated_at` are managed by the store
    pub timestamps: bool,

    /// Association fields, in declaration order
    pub associations: Vec<AssociationDef>,
}

impl EntityDescriptor {
    /// Create a descriptor with no associations and unmanaged timestamps
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            primary_key: PRIMARY_KEY,
            timestamps: false,
            associations: Vec::new(),
        }
    }

    /// Let the store manage `created_at` and `updated_at`
    pub fn with_timestamps(mut self) -> Self {
        self.timestamps = true;
        self
    }

    /// Declare a to-many association
    pub fn has_many(mut self, field: &'static str, target: &'static str) -> Self {
        self.associations.push(AssociationDef {
            field,
            target,
            cardinality: Cardinality::Many,
        });
        self
    }

    /// Declare a to-one association
    pub fn has_one(mut self, field: &'static str, target: &'static str) -> Self {
        self.associations.push(AssociationDef {
            field,
            target,
            cardinality: Cardinality::One,
        });
        self
    }

    /// Look up an association by its exact field name
    pub fn association(&self, field: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.field == field)
    }

    /// Whether `field` is one of the declared association fields
    pub fn is_association(&self, field: &str) -> bool {
        self.association(field).is_some()
    }
}

/// Base trait for every record kind the mapper can expose.
///
/// Entities are plain serde records. Association fields should default
/// (`#[serde(default)]`) since stored records never carry them; the store
/// fills them in when it preloads a record.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// struct Tag {
///     id: u64,
///     name: String,
///     notes: Vec<Note>,
/// }
///
/// impl Entity for Tag {
///     fn descriptor() -> EntityDescriptor {
///         EntityDescriptor::new("tag").has_many("notes", "note")
///     }
/// }
/// ```
pub trait Entity: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {
    /// Schema metadata for this kind
    fn descriptor() -> EntityDescriptor;

    /// The kind name (shortcut for `descriptor().kind`)
    fn kind() -> &'static str {
        Self::descriptor().kind
    }
}
