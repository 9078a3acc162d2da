/// Binds a model to its table.
///
/// ```ignore
/// define_table!("videos" : Video = id);
/// ```
#[macro_export]
macro_rules! define_table {
    ($table:literal : $model:ty = $id:ident) => {
        impl $crate::database::Table for $model {
            fn id(&self) -> &$crate::database::Thing {
                self.$id.as_ref()
            }

            fn table() -> &'static str {
                $table
            }
        }
    };
}

/// Defines a method to query the database using SurrealQL.
///
/// # Syntax
/// ```ignore
/// [Base Type] > method_name(...arguments) > [Output Type] where "sql query"
/// ```
/// Where the `Base Type` is the type that the method is being defined for and the `Output Type` is the type that the method will return.
/// Every argument is bound to the query under its own name, and the generated method takes the [Database](crate::database::Database) as its last argument.
///
/// # Example
///
/// ```ignore
/// define_relation! {
///     Comment > for_video(video: &Record<Video>) > Vec<Comment>
///         where "SELECT * FROM comments WHERE video = $video"
/// }
///
/// let comments = Comment::for_video(&video_id, &db).await?;
/// ```
#[macro_export]
macro_rules! define_relation {
    ($model:ty > $relation:ident ($($binding:ident : $binding_type:ty),*) > $export:ty where $query:literal) => {
        impl $model {
            #[tracing::instrument(level = "debug", skip_all, fields(query = $query))]
            pub async fn $relation(
                $($binding : $binding_type ,)*
                db: &$crate::database::Database,
            ) -> ::std::result::Result<$export, $crate::database::DatabaseQueryError> {
                db.sql($query)
                    $(.bind((stringify!($binding), $binding)))*
                    .fetch_first()
                    .await
            }
        }
    };
}
