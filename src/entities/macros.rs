//! Macros for reducing boilerplate when defining entities

/// Implement [`Entity`](crate::core::entity::Entity) from a short declaration
///
/// Associations are listed as `many field: "target"` or `one field: "target"`,
/// where `field` is the struct field holding the preloaded targets.
///
/// # Example
/// ```rust,ignore
/// #[derive(Clone, Debug, Default, Serialize, Deserialize)]
/// #[serde(default)]
/// pub struct Category {
///     pub id: u64,
///     pub name: String,
///     pub categories: Vec<Category>,
///     pub notes: Vec<Note>,
/// }
///
/// impl_crud_entity!(Category, "category", timestamps, {
///     many categories: "category",
///     many notes: "note",
/// });
///
/// impl_crud_entity!(Tag, "tag");
/// ```
#[macro_export]
macro_rules! impl_crud_entity {
    (@impl $type:ty, $kind:expr, $timestamps:expr $(, { $($card:ident $field:ident : $target:expr),* $(,)? })?) => {
        impl $crate::core::entity::Entity for $type {
            fn descriptor() -> $crate::core::entity::EntityDescriptor {
                let descriptor = $crate::core::entity::EntityDescriptor::new($kind);
                let descriptor = if $timestamps {
                    descriptor.with_timestamps()
                } else {
                    descriptor
                };
                $($(
                    let descriptor = $crate::impl_crud_entity!(
                        @assoc descriptor, $card, stringify!($field), $target
                    );
                )*)?
                descriptor
            }
        }
    };

    (@assoc $descriptor:ident, many, $field:expr, $target:expr) => {
        $descriptor.has_many($field, $target)
    };

    (@assoc $descriptor:ident, one, $field:expr, $target:expr) => {
        $descriptor.has_one($field, $target)
    };

    ($type:ty, $kind:expr, timestamps $(, { $($assoc:tt)* })?) => {
        $crate::impl_crud_entity!(@impl $type, $kind, true $(, { $($assoc)* })?);
    };

    ($type:ty, $kind:expr $(, { $($assoc:tt)* })?) => {
        $crate::impl_crud_entity!(@impl $type, $kind, false $(, { $($assoc)* })?);
    };
}
