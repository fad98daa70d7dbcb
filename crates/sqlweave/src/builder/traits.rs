use crate::client::Executor;
use crate::db::Db;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::rows::{Rows, ValueMap};
use crate::template::Template;
use crate::value::FromValue;

/// Base trait for statement builders.
pub trait SqlBuilder: Sync {
    /// Assemble the statement. Pure and repeatable: calling it twice on the
    /// same state gives equal templates.
    fn build(&self) -> Template;

    /// Validate builder state.
    fn validate(&self) -> OrmResult<()> {
        self.build().validate()
    }

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.build().format
    }

    /// Run the query and return the raw row guard.
    fn fetch<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<Rows<E::Cursor>>> + Send {
        async move {
            self.validate()?;
            let template = self.build();
            db.query(&template).await
        }
    }

    /// Run the query and map all rows to `R`.
    fn fetch_all<R: Record + Default, E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<Vec<R>>> + Send {
        async move { self.fetch(db).await?.into_records() }
    }

    /// Run the query and map the first row to `R`.
    ///
    /// Returns [`OrmError::NotFound`] if there are no rows.
    fn fetch_one<R: Record + Default, E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<R>> + Send {
        async move { self.fetch(db).await?.into_record() }
    }

    /// Run the query and map the first row to `R`, if any.
    fn fetch_opt<R: Record + Default, E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<Option<R>>> + Send {
        async move {
            match self.fetch(db).await?.into_record() {
                Ok(record) => Ok(Some(record)),
                Err(OrmError::NotFound(_)) => Ok(None),
                Err(e) => Err(e),
            }
        }
    }

    /// Run the query and return every row as a map.
    fn fetch_maps<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<Vec<ValueMap>>> + Send {
        async move { self.fetch(db).await?.into_maps() }
    }

    /// Run a single-column query and decode the first row.
    fn fetch_scalar<T: FromValue + Send, E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<T>> + Send {
        async move { self.fetch(db).await?.into_scalar() }
    }

    /// Run a single-column query and decode every row.
    fn fetch_scalars<T: FromValue + Send, E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<Vec<T>>> + Send {
        async move { self.fetch(db).await?.into_scalars() }
    }
}

/// Trait for builders whose statements do not return rows.
pub trait MutationBuilder: SqlBuilder {
    /// Execute and return affected row count.
    fn execute<E: Executor>(
        &self,
        db: &Db<E>,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        async move {
            self.validate()?;
            let template = self.build();
            db.execute(&template).await
        }
    }
}
